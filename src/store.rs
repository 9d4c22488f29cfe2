//! The geolocated network database and the address list
//!
//! Both are loaded once, before any matching starts, and are read-only for
//! the rest of the run.
//!
//! The database is comma-separated text with no header, one
//! `network,latitude,longitude` row per line:
//!
//! ```text
//! 1.0.0.0/24,-33.4940,143.2104
//! 8.8.8.0/24,37.7510,-97.8220
//! ```
//!
//! Any row that doesn't parse is fatal. The address list is the opposite:
//! one raw entry per line, kept verbatim (trimmed), and validated only when
//! matched.

use crate::error::{GeoIpMapError, Result};
use crate::file_reader;
use crate::network::Ipv4Network;
use std::io::{BufRead, Read};
use std::ops::Range;
use std::path::Path;

/// One database row: a prefix and the location it is assigned to
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoRecord {
    /// Network prefix
    pub network: Ipv4Network,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
}

impl GeoRecord {
    /// Create a record
    pub fn new(network: Ipv4Network, lat: f64, lon: f64) -> Self {
        Self { network, lat, lon }
    }
}

/// Ordered, immutable collection of [`GeoRecord`]s
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeoStore {
    records: Vec<GeoRecord>,
}

impl GeoStore {
    /// Load a database file (`.gz` and `-` for stdin supported)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = file_reader::open(path)?;
        Self::from_reader(reader)
    }

    /// Parse database rows from any reader
    ///
    /// # Errors
    ///
    /// Returns [`GeoIpMapError::Parse`] with the row's line number if a row
    /// doesn't have exactly three columns, its prefix isn't an IPv4 CIDR, or
    /// its latitude/longitude isn't a number.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut records = Vec::new();
        for row in csv_reader.records() {
            let row = row?;
            let line = row
                .position()
                .map(|pos| pos.line() as usize)
                .unwrap_or(records.len() + 1);
            records.push(parse_row(&row, line)?);
        }

        Ok(Self { records })
    }

    /// Wrap already-parsed records
    pub fn from_records(records: Vec<GeoRecord>) -> Self {
        Self { records }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the database has no rows
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records in file order
    pub fn records(&self) -> &[GeoRecord] {
        &self.records
    }

    /// Records in an index range
    pub fn slice(&self, range: Range<usize>) -> &[GeoRecord] {
        &self.records[range]
    }
}

fn parse_row(row: &csv::StringRecord, line: usize) -> Result<GeoRecord> {
    if row.len() != 3 {
        return Err(GeoIpMapError::parse(
            line,
            format!("expected 3 columns (network,lat,lon), found {}", row.len()),
        ));
    }

    let network = row[0]
        .parse::<Ipv4Network>()
        .map_err(|e| GeoIpMapError::parse(line, e.to_string()))?;
    let lat = parse_degrees(&row[1], "latitude", line)?;
    let lon = parse_degrees(&row[2], "longitude", line)?;

    Ok(GeoRecord::new(network, lat, lon))
}

fn parse_degrees(field: &str, name: &str, line: usize) -> Result<f64> {
    field
        .parse::<f64>()
        .map_err(|_| GeoIpMapError::parse(line, format!("{} '{}' is not a number", name, field)))
}

/// Ordered, immutable list of raw address entries
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressList {
    entries: Vec<String>,
}

impl AddressList {
    /// Load an address file, one entry per line (`.gz` and `-` supported)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = file_reader::open(path)?;
        Self::from_reader(reader)
    }

    /// Read entries from a buffered reader, trimming each line
    ///
    /// Lines are split on raw bytes. A line that isn't valid UTF-8 is kept
    /// lossily decoded, so it stays an entry that never parses.
    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<Self> {
        let mut entries = Vec::new();
        let mut buf = Vec::with_capacity(64);
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            let line = buf.strip_suffix(b"\n").unwrap_or(&buf);
            entries.push(String::from_utf8_lossy(line).trim().to_string());
        }
        Ok(Self { entries })
    }

    /// Number of entries, invalid ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries in file order
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Entries in an index range
    pub fn slice(&self, range: Range<usize>) -> &[String] {
        &self.entries[range]
    }
}

impl<S: AsRef<str>> FromIterator<S> for AddressList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .collect(),
        }
    }
}
