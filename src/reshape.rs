use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::NaiveDate;

use log::{debug, warn};

use smartstring::alias::{String as SmartString};

use super::error::Error;
use super::source::{WideRow, WideSeriesTable};


pub type RegionDateKey = (SmartString, NaiveDate);


/// One (region, date, value) triple of an un-pivoted wide table.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRecord {
	pub region: SmartString,
	pub date: NaiveDate,
	pub value: Option<u64>,
}

impl LongRecord {
	pub fn key(&self) -> RegionDateKey {
		(self.region.clone(), self.date)
	}
}


/// Keeps the rows whose region name is spelled exactly like one of
/// `regions`. Matching is case-sensitive and does not know about aliases.
pub fn filter_regions(table: &WideSeriesTable, regions: &[SmartString]) -> Result<WideSeriesTable, Error> {
	let wanted: HashSet<&str> = regions.iter().map(|r| r.as_str()).collect();
	let filtered = table.filtered(|row| wanted.contains(row.region.as_str()));

	let seen: HashSet<&str> = filtered.rows().iter().map(|row| row.region.as_str()).collect();
	for region in regions.iter() {
		if !seen.contains(region.as_str()) {
			warn!("region {:?} matches no row in column {:?}", region.as_str(), table.region_column());
		}
	}

	if filtered.len() == 0 {
		return Err(Error::NoMatchingRegion{
			regions: regions.to_vec(),
		})
	}
	debug!("selected {} of {} rows for {} regions", filtered.len(), table.len(), regions.len());
	Ok(filtered)
}

/// Turns every (row, date column) pair into one record.
pub fn melt(table: &WideSeriesTable) -> Vec<LongRecord> {
	let mut result = Vec::with_capacity(table.len() * table.dates().len());
	for row in table.rows() {
		for (date, value) in table.dates().iter().zip(row.values.iter()) {
			result.push(LongRecord{
				region: row.region.clone(),
				date: *date,
				value: *value,
			});
		}
	}
	result
}

pub fn reshape(table: &WideSeriesTable, regions: &[SmartString]) -> Result<Vec<LongRecord>, Error> {
	Ok(melt(&filter_regions(table, regions)?))
}

/// Rebuilds a wide table from long records.
///
/// Records sharing a (region, date) key are summed, missing values count as
/// zero. Rows appear in the order their region is first seen, date columns
/// ascend. A (region, date) pair without any record becomes an empty cell.
pub fn pivot<S: Into<SmartString>>(records: &[LongRecord], region_column: S) -> WideSeriesTable {
	let dates: Vec<NaiveDate> = records.iter()
		.map(|rec| rec.date)
		.collect::<BTreeSet<_>>()
		.into_iter()
		.collect();
	let date_index: HashMap<NaiveDate, usize> = dates.iter()
		.enumerate()
		.map(|(i, date)| (*date, i))
		.collect();

	let mut region_index: HashMap<SmartString, usize> = HashMap::new();
	let mut rows: Vec<WideRow> = Vec::new();
	for rec in records {
		let index = match region_index.get(&rec.region) {
			Some(i) => *i,
			None => {
				let i = rows.len();
				rows.push(WideRow::new(rec.region.clone(), vec![None; dates.len()]));
				region_index.insert(rec.region.clone(), i);
				i
			},
		};
		// every date was collected above
		let cell = &mut rows[index].values[date_index[&rec.date]];
		*cell = Some(cell.unwrap_or(0).saturating_add(rec.value.unwrap_or(0)));
	}

	// rows were created with one cell per collected date
	WideSeriesTable::from_parts(region_column, dates, rows)
}
