use std::fs::File;
use std::io;

use tracing_subscriber::EnvFilter;

use csse::{Config, Metric, Report};


fn print_summary(report: &Report) {
	for (region, series) in report.series.iter() {
		let rec = match series.last() {
			Some(rec) => rec,
			None => continue,
		};
		println!(
			"{:<24} {}  cases {:>12}  deaths {:>10}  death rate {:.4}",
			region.as_str(), rec.date, rec.total_cases, rec.total_deaths, rec.death_rate,
		);
	}
	println!(
		"snapshot {}: {} regions mapped, {} unmapped, {} without total",
		report.resolved.date,
		report.resolved.records.len(),
		report.resolved.unmapped.len(),
		report.resolved.missing_totals.len(),
	);
}


fn main() -> Result<(), Box<dyn std::error::Error>> {
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
		.with_writer(io::stderr)
		.init();

	let argv: Vec<String> = std::env::args().collect();
	let config = Config::from_env()?;
	let codes = config.load_region_codes()?;

	println!("loading {} and {} data ...", Metric::Confirmed, Metric::Deaths);
	let report = csse::run(&config, &codes)?;

	match argv.get(1) {
		Some(path) => {
			println!("writing series to {} ...", path);
			csse::write_series(File::create(path)?, &report)?;
		},
		None => print_summary(&report),
	}
	if let Some(path) = argv.get(2) {
		println!("writing snapshot to {} ...", path);
		csse::write_snapshot(File::create(path)?, &report.resolved)?;
	}
	Ok(())
}
