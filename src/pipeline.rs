use std::collections::BTreeMap;

use log::info;

use smartstring::alias::{String as SmartString};

use super::codes::{resolve, RegionCodes, ResolvedSnapshot};
use super::config::Config;
use super::error::{Error, SourceError};
use super::merge::merge;
use super::rate::{by_region, derive, DerivedRecord};
use super::reshape::reshape;
use super::snapshot::{build_snapshot, Snapshot};
use super::source::{load, Metric, WideSeriesTable};


/// Everything handed to the presentation layer after one run.
#[derive(Debug, Clone)]
pub struct Report {
	/// Derived records of the configured regions, per region, ordered by date.
	pub series: BTreeMap<SmartString, Vec<DerivedRecord>>,
	/// Unresolved snapshot over all regions of the confirmed table.
	pub snapshot: Snapshot,
	pub resolved: ResolvedSnapshot,
}

impl Report {
	pub fn latest(&self, region: &str) -> Option<&DerivedRecord> {
		self.series.get(region)?.last()
	}
}


/// Runs all stages after loading on two already loaded tables.
pub fn analyze<C: RegionCodes + ?Sized>(
		confirmed: &WideSeriesTable,
		deaths: &WideSeriesTable,
		regions: &[SmartString],
		codes: &C,
		) -> Result<Report, Error>
{
	let cases_long = reshape(confirmed, regions)?;
	let deaths_long = reshape(deaths, regions)?;
	let joined = merge(&cases_long, &deaths_long);
	info!("joined {} region-days from {} case and {} death records", joined.len(), cases_long.len(), deaths_long.len());
	let series = by_region(derive(&joined));

	// the loader refuses tables without date columns
	let snapshot = match build_snapshot(confirmed) {
		Some(s) => s,
		None => return Err(Error::SourceUnavailable{
			endpoint: Metric::Confirmed.to_string(),
			reason: SourceError::NoDateColumns,
		}),
	};
	let resolved = resolve(&snapshot, codes);

	Ok(Report{
		series,
		snapshot,
		resolved,
	})
}

/// Loads both sources named in `config` and analyzes them. Any failure
/// aborts the run; nothing is retried.
pub fn run<C: RegionCodes + ?Sized>(config: &Config, codes: &C) -> Result<Report, Error> {
	let confirmed = load(config.source(Metric::Confirmed), &config.region_column, &config.date_format)?;
	let deaths = load(config.source(Metric::Deaths), &config.region_column, &config.date_format)?;
	analyze(&confirmed, &deaths, &config.regions, codes)
}
