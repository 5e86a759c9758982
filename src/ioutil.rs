use std::io;
use std::io::Read;
use std::fs;
use std::path::Path;

use bytes::{Buf, Bytes};

use flate2;

use log::debug;

use super::error::SourceError;


pub fn is_remote(endpoint: &str) -> bool {
	endpoint.starts_with("http://") || endpoint.starts_with("https://")
}

fn is_gzip(name: &str) -> bool {
	name.ends_with(".gz")
}


pub fn magic_open<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn Read>> {
	let path = path.as_ref();
	match path.extension() {
		Some(x) if x == "gz" => {
			Ok(Box::new(flate2::read::GzDecoder::new(fs::File::open(path)?)))
		},
		_ => Ok(Box::new(fs::File::open(path)?)),
	}
}


pub fn fetch(url: &str) -> Result<Bytes, SourceError> {
	debug!("fetching {}", url);
	let resp = reqwest::blocking::Client::new().get(url).send()?;
	let status = resp.status();
	if !status.is_success() {
		return Err(SourceError::Status(status))
	}
	let body = resp.bytes()?;
	debug!("fetched {} bytes from {}", body.len(), url);
	Ok(body)
}


/// Opens either a URL or a local path for reading. Anything ending in `.gz`
/// is transparently decompressed.
pub fn open_endpoint(endpoint: &str) -> Result<Box<dyn Read>, SourceError> {
	if !is_remote(endpoint) {
		return Ok(magic_open(endpoint)?)
	}
	let body = fetch(endpoint)?.reader();
	if is_gzip(endpoint) {
		Ok(Box::new(flate2::read::GzDecoder::new(body)))
	} else {
		Ok(Box::new(body))
	}
}
