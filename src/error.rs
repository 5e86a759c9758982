use std::fmt;
use std::io;

use smartstring::alias::{String as SmartString};


/// Why a single source (endpoint or code table) could not be turned into a
/// table.
#[derive(Debug)]
pub enum SourceError {
	Io(io::Error),
	Request(reqwest::Error),
	Status(reqwest::StatusCode),
	Csv(csv::Error),
	MissingColumn(SmartString),
	NoDateColumns,
	InvalidValue{
		line: u64,
		column: SmartString,
		value: String,
	},
	/// A row does not have one cell per date column.
	RowLength{
		region: SmartString,
		expected: usize,
		found: usize,
	},
}

impl fmt::Display for SourceError {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Io(e) => fmt::Display::fmt(e, f),
			Self::Request(e) => fmt::Display::fmt(e, f),
			Self::Status(s) => write!(f, "unexpected http status {}", s),
			Self::Csv(e) => fmt::Display::fmt(e, f),
			Self::MissingColumn(name) => write!(f, "missing column {:?}", name.as_str()),
			Self::NoDateColumns => f.write_str("no column header matches the date format"),
			Self::InvalidValue{line, column, value} => write!(f, "invalid value {:?} in column {:?} on line {}", value, column.as_str(), line),
			Self::RowLength{region, expected, found} => write!(f, "row for {:?} has {} values, expected {}", region.as_str(), found, expected),
		}
	}
}

impl From<io::Error> for SourceError {
	fn from(other: io::Error) -> Self {
		Self::Io(other)
	}
}

impl From<reqwest::Error> for SourceError {
	fn from(other: reqwest::Error) -> Self {
		Self::Request(other)
	}
}

impl From<csv::Error> for SourceError {
	fn from(other: csv::Error) -> Self {
		Self::Csv(other)
	}
}

impl std::error::Error for SourceError {}


#[derive(Debug)]
pub enum Error {
	/// An endpoint could not be fetched or did not contain a usable wide table.
	SourceUnavailable{
		endpoint: String,
		reason: SourceError,
	},
	/// None of the configured regions matched a row.
	NoMatchingRegion{
		regions: Vec<SmartString>,
	},
	InvalidCodeTable{
		location: String,
		reason: SourceError,
	},
	InvalidConfig(String),
}

impl Error {
	pub fn source_unavailable<E: Into<SourceError>>(endpoint: &str, reason: E) -> Self {
		Self::SourceUnavailable{
			endpoint: endpoint.into(),
			reason: reason.into(),
		}
	}
}

impl fmt::Display for Error {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::SourceUnavailable{endpoint, reason} => write!(f, "source {} unavailable: {}", endpoint, reason),
			Self::NoMatchingRegion{regions} => {
				f.write_str("no row matches any of the regions [")?;
				for (i, region) in regions.iter().enumerate() {
					if i > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{:?}", region.as_str())?;
				}
				f.write_str("]")
			},
			Self::InvalidCodeTable{location, reason} => write!(f, "region code table {} invalid: {}", location, reason),
			Self::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
		}
	}
}

impl std::error::Error for Error {
	fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
		match self {
			Self::SourceUnavailable{reason, ..} | Self::InvalidCodeTable{reason, ..} => Some(reason),
			_ => None,
		}
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn no_matching_region_lists_the_regions() {
		let err = Error::NoMatchingRegion{
			regions: vec!["Kenya".into(), "india".into()],
		};
		assert_eq!(err.to_string(), "no row matches any of the regions [\"Kenya\", \"india\"]");
	}

	#[test]
	fn source_unavailable_names_endpoint_and_reason() {
		let err = Error::source_unavailable("cases.csv", SourceError::MissingColumn("Country/Region".into()));
		assert_eq!(err.to_string(), "source cases.csv unavailable: missing column \"Country/Region\"");
		assert!(std::error::Error::source(&err).is_some());
	}
}
