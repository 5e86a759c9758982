use std::collections::HashMap;

use chrono::NaiveDate;

use log::debug;

use smartstring::alias::{String as SmartString};

use super::reshape::{LongRecord, RegionDateKey};


#[derive(Debug, Clone, PartialEq)]
pub struct JoinedRecord {
	pub region: SmartString,
	pub date: NaiveDate,
	pub total_cases: u64,
	pub total_deaths: u64,
}


/// Replaces missing values by zero and collapses records sharing a key by
/// summing them.
pub fn fill_missing(records: &[LongRecord]) -> HashMap<RegionDateKey, u64> {
	let mut result: HashMap<RegionDateKey, u64> = HashMap::with_capacity(records.len());
	let mut collapsed = 0usize;
	for rec in records {
		let v = rec.value.unwrap_or(0);
		match result.get_mut(&rec.key()) {
			Some(acc) => {
				*acc = acc.saturating_add(v);
				collapsed += 1;
			},
			None => {
				result.insert(rec.key(), v);
			},
		}
	}
	if collapsed > 0 {
		debug!("collapsed {} records sharing a (region, date) key", collapsed);
	}
	result
}

/// Inner join of case and death records on (region, date).
///
/// Each side is normalized with [`fill_missing`] first, so the result has
/// exactly one record per key present in both inputs. Keys present in only
/// one input are dropped. The result is sorted by region, then date.
pub fn merge(cases: &[LongRecord], deaths: &[LongRecord]) -> Vec<JoinedRecord> {
	let cases = fill_missing(cases);
	let deaths = fill_missing(deaths);

	let mut result = Vec::with_capacity(cases.len().min(deaths.len()));
	for ((region, date), total_cases) in cases.iter() {
		let total_deaths = match deaths.get(&(region.clone(), *date)) {
			Some(v) => *v,
			None => continue,
		};
		result.push(JoinedRecord{
			region: region.clone(),
			date: *date,
			total_cases: *total_cases,
			total_deaths,
		});
	}
	let dropped = cases.len() + deaths.len() - 2 * result.len();
	if dropped > 0 {
		debug!("dropped {} keys present in only one input", dropped);
	}
	result.sort_by(|a, b| (&a.region, a.date).cmp(&(&b.region, b.date)));
	result
}
