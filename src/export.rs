use std::io;

use super::codes::ResolvedSnapshot;
use super::pipeline::Report;


/// Writes the per-region series as
/// `region,date,total_cases,total_deaths,death_rate` rows.
pub fn write_series<W: io::Write>(w: W, report: &Report) -> io::Result<()> {
	let mut w = csv::Writer::from_writer(w);
	for series in report.series.values() {
		for rec in series.iter() {
			w.serialize(rec)?;
		}
	}
	w.flush()?;
	Ok(())
}

/// Writes the resolved snapshot as `iso_code,region,total_cases` rows.
pub fn write_snapshot<W: io::Write>(w: W, resolved: &ResolvedSnapshot) -> io::Result<()> {
	let mut w = csv::Writer::from_writer(w);
	for rec in resolved.records.iter() {
		w.serialize(rec)?;
	}
	w.flush()?;
	Ok(())
}
