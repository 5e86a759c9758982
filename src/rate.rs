use std::collections::BTreeMap;

use chrono::NaiveDate;

use serde::Serialize;

use smartstring::alias::{String as SmartString};

use super::merge::JoinedRecord;


#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRecord {
	pub region: SmartString,
	pub date: NaiveDate,
	pub total_cases: u64,
	pub total_deaths: u64,
	pub death_rate: f64,
}

/// Deaths per confirmed case. An undefined rate (no cases) is reported as 0.
pub fn death_rate(total_cases: u64, total_deaths: u64) -> f64 {
	if total_cases == 0 {
		return 0.
	}
	total_deaths as f64 / total_cases as f64
}

impl From<JoinedRecord> for DerivedRecord {
	fn from(other: JoinedRecord) -> Self {
		Self{
			death_rate: death_rate(other.total_cases, other.total_deaths),
			region: other.region,
			date: other.date,
			total_cases: other.total_cases,
			total_deaths: other.total_deaths,
		}
	}
}

pub fn derive(joined: &[JoinedRecord]) -> Vec<DerivedRecord> {
	joined.iter().cloned().map(DerivedRecord::from).collect()
}

/// Groups records per region, each series ordered by date.
pub fn by_region(records: Vec<DerivedRecord>) -> BTreeMap<SmartString, Vec<DerivedRecord>> {
	let mut result: BTreeMap<SmartString, Vec<DerivedRecord>> = BTreeMap::new();
	for rec in records {
		result.entry(rec.region.clone()).or_insert_with(Vec::new).push(rec);
	}
	for series in result.values_mut() {
		series.sort_by_key(|rec| rec.date);
	}
	result
}
