use std::env;
use std::path::PathBuf;

use enum_map::{enum_map, EnumMap};

use smartstring::alias::{String as SmartString};

use super::codes::CodeTable;
use super::error::Error;
use super::ioutil::magic_open;
use super::source::Metric;


pub static CONFIRMED_URL: &'static str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_covid19_confirmed_global.csv";
pub static DEATHS_URL: &'static str = "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_covid19_deaths_global.csv";
pub static DEFAULT_REGIONS: &'static [&'static str] = &["Kenya", "India", "US"];
pub static DEFAULT_REGION_COLUMN: &'static str = "Country/Region";
pub static DEFAULT_DATE_FORMAT: &'static str = "%m/%d/%y";


#[derive(Debug, Clone)]
pub struct Config {
	pub sources: EnumMap<Metric, String>,
	/// Region names as spelled in the region column, compared exactly.
	pub regions: Vec<SmartString>,
	pub region_column: SmartString,
	/// chrono format used to recognize date column headers.
	pub date_format: String,
	/// `region,iso_code` CSV; the builtin table is used when unset.
	pub region_codes: Option<PathBuf>,
}

impl Default for Config {
	fn default() -> Self {
		Self{
			sources: enum_map! {
				Metric::Confirmed => CONFIRMED_URL.to_string(),
				Metric::Deaths => DEATHS_URL.to_string(),
			},
			regions: DEFAULT_REGIONS.iter().map(|s| (*s).into()).collect(),
			region_column: DEFAULT_REGION_COLUMN.into(),
			date_format: DEFAULT_DATE_FORMAT.into(),
			region_codes: None,
		}
	}
}

/// Parses a region list written as CSV: names are separated by commas or
/// newlines, and a name containing a comma is quoted (`Kenya,"Korea, South"`).
pub fn parse_regions(s: &str) -> Result<Vec<SmartString>, csv::Error> {
	let mut r = csv::ReaderBuilder::new()
		.has_headers(false)
		.flexible(true)
		.trim(csv::Trim::All)
		.from_reader(s.as_bytes());
	let mut result = Vec::new();
	for record in r.records() {
		for name in record?.iter() {
			if name.len() > 0 {
				result.push(name.into());
			}
		}
	}
	Ok(result)
}

impl Config {
	/// Starts from the defaults and applies the `CSSE_*` overrides returned
	/// by `lookup`.
	pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Result<Self, Error> {
		let mut result = Self::default();
		if let Some(url) = lookup("CSSE_CONFIRMED_URL") {
			result.sources[Metric::Confirmed] = url;
		}
		if let Some(url) = lookup("CSSE_DEATHS_URL") {
			result.sources[Metric::Deaths] = url;
		}
		if let Some(regions) = lookup("CSSE_REGIONS") {
			result.regions = parse_regions(&regions)
				.map_err(|e| Error::InvalidConfig(format!("CSSE_REGIONS: {}", e)))?;
			if result.regions.len() == 0 {
				return Err(Error::InvalidConfig("CSSE_REGIONS does not name any region".into()))
			}
		}
		if let Some(column) = lookup("CSSE_REGION_COLUMN") {
			result.region_column = column.into();
		}
		if let Some(format) = lookup("CSSE_DATE_FORMAT") {
			if format.trim().is_empty() {
				return Err(Error::InvalidConfig("CSSE_DATE_FORMAT is empty".into()))
			}
			result.date_format = format;
		}
		if let Some(path) = lookup("CSSE_REGION_CODES") {
			result.region_codes = Some(path.into());
		}
		Ok(result)
	}

	pub fn from_env() -> Result<Self, Error> {
		Self::from_lookup(|key| env::var(key).ok())
	}

	pub fn source(&self, metric: Metric) -> &str {
		&self.sources[metric]
	}

	pub fn load_region_codes(&self) -> Result<CodeTable, Error> {
		let path = match &self.region_codes {
			Some(path) => path,
			None => return Ok(CodeTable::builtin()),
		};
		let location = path.display().to_string();
		let r = magic_open(path).map_err(|e| Error::InvalidCodeTable{
			location: location.clone(),
			reason: e.into(),
		})?;
		CodeTable::from_reader(r).map_err(|reason| Error::InvalidCodeTable{
			location,
			reason,
		})
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	use std::collections::HashMap;
	use std::io::Write;

	use crate::codes::RegionCodes;

	fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
		let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
		move |key| map.get(key).cloned()
	}

	#[test]
	fn defaults_without_overrides() {
		let config = Config::from_lookup(|_| None).unwrap();
		assert_eq!(config.source(Metric::Confirmed), CONFIRMED_URL);
		assert_eq!(config.source(Metric::Deaths), DEATHS_URL);
		let regions: Vec<&str> = config.regions.iter().map(|s| s.as_str()).collect();
		assert_eq!(regions, vec!["Kenya", "India", "US"]);
		assert_eq!(config.region_column.as_str(), "Country/Region");
		assert_eq!(config.date_format, "%m/%d/%y");
		assert!(config.region_codes.is_none());
	}

	#[test]
	fn overrides_apply() {
		let config = Config::from_lookup(lookup_from(&[
			("CSSE_CONFIRMED_URL", "cases.csv"),
			("CSSE_DEATHS_URL", "deaths.csv.gz"),
			("CSSE_REGIONS", " Kenya ,\"Korea, South\",US,"),
			("CSSE_DATE_FORMAT", "%Y-%m-%d"),
		])).unwrap();
		assert_eq!(config.source(Metric::Confirmed), "cases.csv");
		assert_eq!(config.source(Metric::Deaths), "deaths.csv.gz");
		let regions: Vec<&str> = config.regions.iter().map(|s| s.as_str()).collect();
		assert_eq!(regions, vec!["Kenya", "Korea, South", "US"]);
		assert_eq!(config.date_format, "%Y-%m-%d");
	}

	#[test]
	fn quoted_region_names_keep_their_commas() {
		let regions = parse_regions("\"Korea, South\"").unwrap();
		assert_eq!(regions.len(), 1);
		assert_eq!(regions[0].as_str(), "Korea, South");

		let regions = parse_regions("Kenya\n\"Korea, North\"\nIndia\n").unwrap();
		let regions: Vec<&str> = regions.iter().map(|s| s.as_str()).collect();
		assert_eq!(regions, vec!["Kenya", "Korea, North", "India"]);
	}

	#[test]
	fn empty_region_override_is_rejected() {
		match Config::from_lookup(lookup_from(&[("CSSE_REGIONS", " , ")])) {
			Err(Error::InvalidConfig(_)) => (),
			other => panic!("unexpected result {:?}", other),
		}
	}

	#[test]
	fn region_codes_load_from_file() {
		let mut f = tempfile::NamedTempFile::new().unwrap();
		f.write_all(b"region,iso_code\nUnmappedistan,UMP\n").unwrap();
		f.flush().unwrap();
		let config = Config::from_lookup(lookup_from(&[
			("CSSE_REGION_CODES", f.path().to_str().unwrap()),
		])).unwrap();
		let codes = config.load_region_codes().unwrap();
		assert_eq!(codes.code("Unmappedistan"), Some("UMP"));
		assert_eq!(codes.code("Kenya"), None);
	}

	#[test]
	fn missing_region_code_file_is_reported() {
		let config = Config::from_lookup(lookup_from(&[
			("CSSE_REGION_CODES", "/nonexistent/codes.csv"),
		])).unwrap();
		match config.load_region_codes() {
			Err(Error::InvalidCodeTable{location, ..}) => assert_eq!(location, "/nonexistent/codes.csv"),
			other => panic!("unexpected result {:?}", other),
		}
	}
}
