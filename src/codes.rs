use std::collections::{BTreeMap, HashMap};
use std::io;

use chrono::NaiveDate;

use log::{debug, info};

use serde::Deserialize;

use smartstring::alias::{String as SmartString};

use super::error::SourceError;
use super::snapshot::{Snapshot, SnapshotRecord};


static BUILTIN_REGION_CODES: &'static str = include_str!("../data/region_codes.csv");


/// Lookup from region display name to a three letter region code.
pub trait RegionCodes {
	fn code(&self, region: &str) -> Option<&str>;
}

impl RegionCodes for HashMap<String, String> {
	fn code(&self, region: &str) -> Option<&str> {
		self.get(region).map(|s| s.as_str())
	}
}

impl RegionCodes for BTreeMap<String, String> {
	fn code(&self, region: &str) -> Option<&str> {
		self.get(region).map(|s| s.as_str())
	}
}


#[derive(Debug, Clone, Deserialize)]
struct RawCodeRow {
	region: String,
	iso_code: String,
}

fn valid_code(code: &str) -> bool {
	code.len() == 3 && code.bytes().all(|b| b.is_ascii_alphabetic())
}


#[derive(Debug, Clone, Default)]
pub struct CodeTable {
	codes: HashMap<String, SmartString>,
}

impl CodeTable {
	pub fn new() -> Self {
		Self::default()
	}

	/// Reads a `region,iso_code` CSV table.
	pub fn from_reader<R: io::Read>(r: R) -> Result<Self, SourceError> {
		let mut result = Self::new();
		let mut r = csv::Reader::from_reader(r);
		for (i, row) in r.deserialize().enumerate() {
			let rec: RawCodeRow = row?;
			let code = rec.iso_code.trim();
			if !valid_code(code) {
				return Err(SourceError::InvalidValue{
					// header is line 1
					line: i as u64 + 2,
					column: "iso_code".into(),
					value: rec.iso_code.clone(),
				})
			}
			result.insert(rec.region, code);
		}
		Ok(result)
	}

	/// The small table shipped with the crate. It only covers a handful of
	/// countries; pass a complete table where coverage matters.
	pub fn builtin() -> Self {
		Self::from_reader(BUILTIN_REGION_CODES.as_bytes()).expect("builtin region code table is malformed")
	}

	pub fn insert<S: Into<String>>(&mut self, region: S, code: &str) {
		self.codes.insert(region.into(), code.to_ascii_uppercase().into());
	}

	pub fn len(&self) -> usize {
		self.codes.len()
	}
}

impl RegionCodes for CodeTable {
	fn code(&self, region: &str) -> Option<&str> {
		self.codes.get(region).map(|s| s.as_str())
	}
}


#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSnapshot {
	pub date: NaiveDate,
	/// Every record carries a code and a total, ordered by code.
	pub records: Vec<SnapshotRecord>,
	/// Regions dropped because the code table has no entry for them.
	pub unmapped: Vec<SmartString>,
	/// Regions dropped because they have no value on the snapshot date.
	pub missing_totals: Vec<SmartString>,
}

impl ResolvedSnapshot {
	pub fn by_code(&self) -> BTreeMap<&str, &SnapshotRecord> {
		let mut result = BTreeMap::new();
		for rec in self.records.iter() {
			if let Some(code) = &rec.iso_code {
				result.insert(code.as_str(), rec);
			}
		}
		result
	}
}

/// Attaches region codes to a snapshot.
///
/// Regions without a code (unmapped) and regions without a total are left
/// out of the result and listed separately.
pub fn resolve<C: RegionCodes + ?Sized>(snapshot: &Snapshot, codes: &C) -> ResolvedSnapshot {
	let mut records = Vec::new();
	let mut unmapped = Vec::new();
	let mut missing_totals = Vec::new();
	for rec in snapshot.records.iter() {
		let code = match codes.code(&rec.region) {
			Some(code) => code,
			None => {
				debug!("no region code for {:?}", rec.region.as_str());
				unmapped.push(rec.region.clone());
				continue
			},
		};
		if rec.total_cases.is_none() {
			debug!("no total for {:?} on {}", rec.region.as_str(), snapshot.date);
			missing_totals.push(rec.region.clone());
			continue
		}
		records.push(SnapshotRecord{
			iso_code: Some(code.into()),
			region: rec.region.clone(),
			total_cases: rec.total_cases,
		});
	}
	records.sort_by(|a, b| a.iso_code.cmp(&b.iso_code));
	info!("resolved {} of {} regions ({} unmapped, {} without total)", records.len(), snapshot.records.len(), unmapped.len(), missing_totals.len());
	ResolvedSnapshot{
		date: snapshot.date,
		records,
		unmapped,
		missing_totals,
	}
}


#[cfg(test)]
mod tests {
	use super::*;

	fn snapshot(rows: &[(&str, Option<u64>)]) -> Snapshot {
		Snapshot{
			date: NaiveDate::from_ymd(2020, 1, 3),
			records: rows.iter().map(|(region, total_cases)| SnapshotRecord{
				iso_code: None,
				region: (*region).into(),
				total_cases: *total_cases,
			}).collect(),
		}
	}

	#[test]
	fn only_mapped_regions_survive() {
		let mut codes = HashMap::new();
		codes.insert("A".to_string(), "AAA".to_string());
		let resolved = resolve(&snapshot(&[("A", Some(1)), ("B", Some(2))]), &codes);
		assert_eq!(resolved.records, vec![SnapshotRecord{
			iso_code: Some("AAA".into()),
			region: "A".into(),
			total_cases: Some(1),
		}]);
		let unmapped: Vec<&str> = resolved.unmapped.iter().map(|s| s.as_str()).collect();
		assert_eq!(unmapped, vec!["B"]);
	}

	#[test]
	fn absent_totals_are_dropped() {
		let mut codes = CodeTable::new();
		codes.insert("A", "aaa");
		codes.insert("B", "BBB");
		let resolved = resolve(&snapshot(&[("A", None), ("B", Some(0))]), &codes);
		assert_eq!(resolved.records.len(), 1);
		assert_eq!(resolved.records[0].iso_code.as_ref().map(|s| s.as_str()), Some("BBB"));
		assert_eq!(resolved.missing_totals.len(), 1);
		assert_eq!(resolved.missing_totals[0].as_str(), "A");
		assert!(resolved.unmapped.is_empty());
	}

	#[test]
	fn resolved_records_always_carry_a_code() {
		let resolved = resolve(&snapshot(&[("Kenya", Some(3)), ("Unmappedistan", Some(9)), ("India", Some(30))]), &CodeTable::builtin());
		assert!(resolved.records.iter().all(|r| r.iso_code.is_some()));
		let codes: Vec<&str> = resolved.by_code().keys().cloned().collect();
		assert_eq!(codes, vec!["IND", "KEN"]);
	}

	#[test]
	fn builtin_table_parses() {
		let table = CodeTable::builtin();
		assert!(table.len() >= 10);
		assert_eq!(table.code("US"), Some("USA"));
		assert_eq!(table.code("united kingdom"), None);
	}

	#[test]
	fn invalid_codes_are_rejected() {
		let data = "region,iso_code\nKenya,KE\n";
		match CodeTable::from_reader(data.as_bytes()) {
			Err(SourceError::InvalidValue{value, ..}) => assert_eq!(value, "KE"),
			other => panic!("unexpected result {:?}", other),
		}
	}
}
