use std::collections::HashMap;

use chrono::NaiveDate;

use log::debug;

use serde::Serialize;

use smartstring::alias::{String as SmartString};

use super::source::{WideRow, WideSeriesTable};


#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotRecord {
	pub iso_code: Option<SmartString>,
	pub region: SmartString,
	pub total_cases: Option<u64>,
}


/// Cross-region values of a single date column.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
	pub date: NaiveDate,
	/// One record per distinct region, in the order the region first appears.
	pub records: Vec<SnapshotRecord>,
}

impl Snapshot {
	pub fn get(&self, region: &str) -> Option<&SnapshotRecord> {
		self.records.iter().find(|rec| rec.region.as_str() == region)
	}
}


/// Sums column `column` of all rows sharing a key. Rows for which `f`
/// returns `None` are skipped. A key whose cells are all empty maps to
/// `None`.
pub fn column_totals<K, F>(table: &WideSeriesTable, column: usize, f: F) -> Vec<(K, Option<u64>)>
	where K: std::hash::Hash + Eq + Clone,
	      F: Fn(&WideRow) -> Option<K>
{
	let mut index: HashMap<K, usize> = HashMap::new();
	let mut result: Vec<(K, Option<u64>)> = Vec::new();
	for row in table.rows() {
		let k = match f(row) {
			Some(k) => k,
			None => continue,
		};
		let i = match index.get(&k) {
			Some(i) => *i,
			None => {
				let i = result.len();
				result.push((k.clone(), None));
				index.insert(k, i);
				i
			},
		};
		if let Some(v) = row.values[column] {
			let total = &mut result[i].1;
			*total = Some(total.unwrap_or(0).saturating_add(v));
		}
	}
	result
}

/// Builds the snapshot of the latest date column of an unfiltered table.
///
/// "Latest" is positional: the last date column in source order is used,
/// whatever its calendar date. All rows of a region are summed, so
/// territories reported as separate rows of their country end up in the
/// country total. Returns `None` if the table has no date columns.
pub fn build_snapshot(table: &WideSeriesTable) -> Option<Snapshot> {
	let (column, date) = table.latest_date_column()?;
	let records: Vec<SnapshotRecord> = column_totals(table, column, |row| Some(row.region.clone()))
		.into_iter()
		.map(|(region, total_cases)| SnapshotRecord{
			iso_code: None,
			region,
			total_cases,
		})
		.collect();
	debug!("snapshot of {} has {} regions from {} rows", date, records.len(), table.len());
	Some(Snapshot{
		date,
		records,
	})
}
