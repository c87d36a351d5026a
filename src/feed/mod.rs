//! Flat-file timetable ingestion.
//!
//! Feeds are CSV rows of the form
//! `routeId,depCity,arrCity,depTime,arrTime,trainType,days,first,second`,
//! where the days field may be a quoted comma list and the arrival time
//! may carry a ` (+1d)` marker for overnight legs. Malformed rows are
//! skipped and counted, never fatal to the batch.

use std::{fs::File, io::Read, path::Path, time::Instant};

use csv::StringRecord;
use thiserror::Error;
use tracing::{debug, trace};

use crate::{
    catalog::{Catalog, Connection},
    shared::time::Time,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("No csv entry found in archive {0}")]
    NoCsvEntry(String),
}

/// What a batch load did: rows turned into connections, and rows dropped
/// by the lenient row policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

/// Loads a CSV timetable file into the catalog.
pub fn load_csv_file<P: AsRef<Path>>(path: P, catalog: &mut Catalog) -> Result<LoadReport, Error> {
    let file = File::open(path)?;
    load_reader(file, catalog)
}

/// Loads the first `.csv` entry of a zipped feed archive into the catalog.
pub fn load_zip_file<P: AsRef<Path>>(path: P, catalog: &mut Catalog) -> Result<LoadReport, Error> {
    let file = File::open(&path)?;
    let mut archive = zip::ZipArchive::new(file)?;
    for i in 0..archive.len() {
        let entry = archive.by_index(i)?;
        if entry.name().ends_with(".csv") {
            return load_reader(entry, catalog);
        }
    }
    Err(Error::NoCsvEntry(path.as_ref().display().to_string()))
}

/// Streams CSV rows from any reader into the catalog.
pub fn load_reader<R: Read>(reader: R, catalog: &mut Catalog) -> Result<LoadReport, Error> {
    debug!("Loading connections...");
    let now = Instant::now();

    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut report = LoadReport::default();
    for (row, record) in csv_reader.records().enumerate() {
        let record = record?;
        if row == 0 && is_header(&record) {
            continue;
        }
        if append_row(&record, catalog) {
            report.loaded += 1;
        } else {
            trace!("skipping malformed feed row {}", row + 1);
            report.skipped += 1;
        }
    }

    debug!(
        "Loading connections took {:?} ({} loaded, {} skipped)",
        now.elapsed(),
        report.loaded,
        report.skipped
    );
    Ok(report)
}

/// A leading header row announces itself with "route" in the first cell.
fn is_header(record: &StringRecord) -> bool {
    record
        .get(0)
        .is_some_and(|cell| cell.to_lowercase().contains("route"))
}

/// Parses one row and appends it to the catalog. Returns false when the
/// row is not usable: too few fields, empty identifiers, a time that
/// does not parse, or a fare that is not a non-negative number.
fn append_row(record: &StringRecord, catalog: &mut Catalog) -> bool {
    if record.len() < 9 {
        return false;
    }
    let field = |i: usize| record.get(i).unwrap_or("").trim();

    let route_id = field(0);
    let departure_city = field(1);
    let arrival_city = field(2);
    if route_id.is_empty() || departure_city.is_empty() || arrival_city.is_empty() {
        return false;
    }

    let departure_raw = field(3);
    let arrival_raw = field(4);
    // Overnight legs mark the arrival with "(+1d)"; any parenthetical is
    // stripped before the time itself is parsed.
    let crosses_midnight = arrival_raw.contains("(+1d)");
    let (Some(departure_time), Some(arrival_time)) = (
        Time::from_hm(strip_marker(departure_raw)),
        Time::from_hm(strip_marker(arrival_raw)),
    ) else {
        return false;
    };

    let (Some(first_class_fare), Some(second_class_fare)) =
        (parse_fare(field(7)), parse_fare(field(8)))
    else {
        return false;
    };

    let departure_city = catalog.find_or_create_city(departure_city);
    let arrival_city = catalog.find_or_create_city(arrival_city);
    let train_type = catalog.find_or_create_train_type(field(5));

    catalog.add(Connection {
        route_id: route_id.into(),
        departure_city,
        arrival_city,
        departure_time,
        arrival_time,
        train_type,
        days_of_operation: field(6).into(),
        first_class_fare,
        second_class_fare,
        crosses_midnight,
    });
    true
}

fn strip_marker(time: &str) -> &str {
    time.find('(').map_or(time, |i| &time[..i]).trim()
}

fn parse_fare(raw: &str) -> Option<f64> {
    let fare: f64 = raw.parse().ok()?;
    (fare.is_finite() && fare >= 0.0).then_some(fare)
}
