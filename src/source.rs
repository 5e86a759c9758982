use std::fmt;
use std::io;

use chrono::NaiveDate;

use enum_map::Enum;

use log::{debug, info};

use smartstring::alias::{String as SmartString};

use super::error::{Error, SourceError};
use super::ioutil::open_endpoint;


#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Enum)]
pub enum Metric {
	Confirmed,
	Deaths,
}

impl fmt::Display for Metric {
	fn fmt<'f>(&self, f: &'f mut fmt::Formatter) -> fmt::Result {
		match self {
			Self::Confirmed => f.write_str("confirmed"),
			Self::Deaths => f.write_str("deaths"),
		}
	}
}


#[derive(Debug, Clone, PartialEq)]
pub struct WideRow {
	pub region: SmartString,
	/// One cell per date column of the owning table, in column order.
	pub values: Vec<Option<u64>>,
}

impl WideRow {
	pub fn new<S: Into<SmartString>>(region: S, values: Vec<Option<u64>>) -> Self {
		Self{
			region: region.into(),
			values,
		}
	}
}


/// A table with one row per (sub-)region and one column per observation date.
///
/// Date columns are kept in the order they appear in the source. That order
/// is a contract: the snapshot builder picks the *positionally* last date
/// column as the most recent one, so loaders must never sort or otherwise
/// reorder them.
#[derive(Debug, Clone, PartialEq)]
pub struct WideSeriesTable {
	region_column: SmartString,
	identifier_columns: Vec<SmartString>,
	dates: Vec<NaiveDate>,
	rows: Vec<WideRow>,
}

pub fn parse_date_label(label: &str, format: &str) -> Option<NaiveDate> {
	NaiveDate::parse_from_str(label.trim(), format).ok()
}

fn parse_count(s: &str) -> Option<Option<u64>> {
	let s = s.trim();
	if s.is_empty() {
		return Some(None)
	}
	if let Ok(v) = s.parse::<u64>() {
		return Some(Some(v))
	}
	// some exports write integral counts as floats
	let v = s.parse::<f64>().ok()?;
	if v.is_finite() && v >= 0. && v.fract() == 0. && v <= u64::MAX as f64 {
		Some(Some(v as u64))
	} else {
		None
	}
}

impl WideSeriesTable {
	/// Builds a table without identifier columns. Every row must carry
	/// exactly one cell per date.
	pub fn new<S: Into<SmartString>>(region_column: S, dates: Vec<NaiveDate>, rows: Vec<WideRow>) -> Result<Self, SourceError> {
		for row in rows.iter() {
			if row.values.len() != dates.len() {
				return Err(SourceError::RowLength{
					region: row.region.clone(),
					expected: dates.len(),
					found: row.values.len(),
				})
			}
		}
		Ok(Self::from_parts(region_column, dates, rows))
	}

	/// Callers guarantee that every row has one cell per date.
	pub(crate) fn from_parts<S: Into<SmartString>>(region_column: S, dates: Vec<NaiveDate>, rows: Vec<WideRow>) -> Self {
		Self{
			region_column: region_column.into(),
			identifier_columns: Vec::new(),
			dates,
			rows,
		}
	}

	/// Parses a wide CSV table.
	///
	/// A header is a date column iff it parses with `date_format`; every
	/// other header (province, latitude, ...) is an identifier and is never
	/// treated as a value.
	pub fn from_reader<R: io::Read>(r: R, region_column: &str, date_format: &str) -> Result<Self, SourceError> {
		let mut r = csv::ReaderBuilder::new().from_reader(r);
		let headers = r.headers()?.clone();

		let mut region_index = None;
		let mut identifier_columns: Vec<SmartString> = Vec::new();
		let mut date_columns: Vec<(usize, NaiveDate)> = Vec::new();
		for (i, name) in headers.iter().enumerate() {
			if name == region_column && region_index.is_none() {
				region_index = Some(i);
				continue
			}
			match parse_date_label(name, date_format) {
				Some(date) => date_columns.push((i, date)),
				None => identifier_columns.push(name.into()),
			}
		}
		let region_index = match region_index {
			Some(i) => i,
			None => return Err(SourceError::MissingColumn(region_column.into())),
		};
		if date_columns.len() == 0 {
			return Err(SourceError::NoDateColumns)
		}

		let mut rows = Vec::new();
		for record in r.records() {
			let record = record?;
			let line = record.position().map(|p| p.line()).unwrap_or(0);
			// ragged rows are rejected by the reader, so every index is present
			let mut values = Vec::with_capacity(date_columns.len());
			for (i, _) in date_columns.iter() {
				let cell = &record[*i];
				match parse_count(cell) {
					Some(v) => values.push(v),
					None => return Err(SourceError::InvalidValue{
						line,
						column: headers[*i].into(),
						value: cell.into(),
					}),
				}
			}
			rows.push(WideRow{
				region: record[region_index].into(),
				values,
			});
		}

		Ok(Self{
			region_column: region_column.into(),
			identifier_columns,
			dates: date_columns.into_iter().map(|(_, date)| date).collect(),
			rows,
		})
	}

	#[inline(always)]
	pub fn region_column(&self) -> &str {
		&self.region_column
	}

	#[inline(always)]
	pub fn identifier_columns(&self) -> &[SmartString] {
		&self.identifier_columns[..]
	}

	#[inline(always)]
	pub fn dates(&self) -> &[NaiveDate] {
		&self.dates[..]
	}

	#[inline(always)]
	pub fn rows(&self) -> &[WideRow] {
		&self.rows[..]
	}

	#[inline(always)]
	pub fn len(&self) -> usize {
		self.rows.len()
	}

	/// Index and date of the last date column in source order.
	pub fn latest_date_column(&self) -> Option<(usize, NaiveDate)> {
		let i = self.dates.len().checked_sub(1)?;
		Some((i, self.dates[i]))
	}

	/// Returns a new table containing only the rows accepted by `f`, with
	/// the same columns.
	pub fn filtered<F: Fn(&WideRow) -> bool>(&self, f: F) -> Self {
		Self{
			region_column: self.region_column.clone(),
			identifier_columns: self.identifier_columns.clone(),
			dates: self.dates.clone(),
			rows: self.rows.iter().filter(|row| f(row)).cloned().collect(),
		}
	}
}


/// Loads a wide table from a URL or local path.
pub fn load(endpoint: &str, region_column: &str, date_format: &str) -> Result<WideSeriesTable, Error> {
	let r = open_endpoint(endpoint).map_err(|e| Error::source_unavailable(endpoint, e))?;
	let table = WideSeriesTable::from_reader(r, region_column, date_format)
		.map_err(|e| Error::source_unavailable(endpoint, e))?;
	debug!("identifier columns of {}: {:?}", endpoint, table.identifier_columns());
	match (table.dates().first(), table.dates().last()) {
		(Some(first), Some(last)) => info!("loaded {} rows x {} dates ({} .. {}) from {}", table.len(), table.dates().len(), first, last, endpoint),
		_ => info!("loaded {} rows from {}", table.len(), endpoint),
	}
	Ok(table)
}
