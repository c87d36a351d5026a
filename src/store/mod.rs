//! Durable storage for connections and booked trips.
//!
//! A [`CsvStore`] keeps two csv files under one directory and treats them
//! as append-only logs: saves append a row, loads replay every row back
//! through the catalog's dedup path, clears remove the file. A failed
//! operation surfaces as an [`Error`] and leaves the in-memory model
//! untouched, since records are fully read and validated before the
//! catalog sees any of them.

use std::{
    fs::{self, File, OpenOptions},
    path::{Path, PathBuf},
    sync::Arc,
    time::Instant,
};

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

mod records;
pub use records::*;

use crate::{
    booking::BookedTrip,
    catalog::{Catalog, Connection, FareClass},
    planner::Trip,
    shared::time::{Duration, Time},
};

const CONNECTIONS_FILE: &str = "connections.csv";
const BOOKED_TRIPS_FILE: &str = "booked_trips.csv";

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Malformed stored record {0}: bad {1}")]
    Malformed(String, &'static str),
}

/// File-backed store rooted at a directory.
#[derive(Debug, Clone)]
pub struct CsvStore {
    dir: PathBuf,
}

impl CsvStore {
    /// Opens (and creates if needed) the store directory.
    pub fn open<P: AsRef<Path>>(dir: P) -> Result<Self, Error> {
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir: dir.as_ref().to_owned(),
        })
    }

    pub fn save_connection(&self, connection: &Connection) -> Result<(), Error> {
        self.append(CONNECTIONS_FILE, &ConnectionRecord::from(connection))
    }

    /// Replays every stored connection into the catalog and returns the
    /// connections that were appended.
    ///
    /// Cities and train types go through the same find-or-create path as
    /// feed ingestion, so identity and equality behave the same no matter
    /// where a connection came from.
    pub fn load_all_connections(
        &self,
        catalog: &mut Catalog,
    ) -> Result<Vec<Arc<Connection>>, Error> {
        debug!("Loading stored connections...");
        let now = Instant::now();
        let records: Vec<ConnectionRecord> = self.read_all(CONNECTIONS_FILE)?;

        // Validate the whole batch before the catalog is touched.
        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let departure_time = Time::from_hm(&record.departure_time)
                .ok_or_else(|| Error::Malformed(record.route_id.clone(), "departure time"))?;
            let arrival_time = Time::from_hm(&record.arrival_time)
                .ok_or_else(|| Error::Malformed(record.route_id.clone(), "arrival time"))?;
            rows.push((record, departure_time, arrival_time));
        }

        let start = catalog.len();
        for (record, departure_time, arrival_time) in rows {
            let departure_city = catalog.find_or_create_city(&record.departure_city);
            let arrival_city = catalog.find_or_create_city(&record.arrival_city);
            let train_type = catalog.find_or_create_train_type(&record.train_type);
            catalog.add(Connection {
                route_id: record.route_id.into(),
                departure_city,
                arrival_city,
                departure_time,
                arrival_time,
                train_type,
                days_of_operation: record.days_of_operation.into(),
                first_class_fare: record.first_class_fare,
                second_class_fare: record.second_class_fare,
                crosses_midnight: record.crosses_midnight,
            });
        }

        let loaded = catalog.connections()[start..].to_vec();
        debug!(
            "Loading stored connections took {:?} ({} loaded)",
            now.elapsed(),
            loaded.len()
        );
        Ok(loaded)
    }

    pub fn clear_connections(&self) -> Result<(), Error> {
        self.remove(CONNECTIONS_FILE)
    }

    pub fn save_booked_trip(&self, booked: &BookedTrip) -> Result<(), Error> {
        self.append(BOOKED_TRIPS_FILE, &BookedTripRecord::from(booked))
    }

    /// Rebuilds every stored booking.
    ///
    /// The stored itinerary is flat (city pair, end-to-end times, one
    /// rollover flag), so each booking comes back as a single synthetic
    /// leg priced at the booked fare in both classes.
    pub fn load_all_booked_trips(&self, catalog: &mut Catalog) -> Result<Vec<BookedTrip>, Error> {
        debug!("Loading booked trips...");
        let now = Instant::now();
        let records: Vec<BookedTripRecord> = self.read_all(BOOKED_TRIPS_FILE)?;

        let mut rows = Vec::with_capacity(records.len());
        for record in records {
            let departure_time = Time::from_hm(&record.departure_time)
                .ok_or_else(|| Error::Malformed(record.trip_id.clone(), "departure time"))?;
            let arrival_time = Time::from_hm(&record.arrival_time)
                .ok_or_else(|| Error::Malformed(record.trip_id.clone(), "arrival time"))?;
            rows.push((record, departure_time, arrival_time));
        }

        let mut booked_trips = Vec::with_capacity(rows.len());
        for (record, departure_time, arrival_time) in rows {
            let departure_city = catalog.find_or_create_city(&record.departure_city);
            let arrival_city = catalog.find_or_create_city(&record.arrival_city);
            let train_type = catalog.find_or_create_train_type("Saved Trip");
            let leg = Arc::new(Connection {
                route_id: format!("DB-{}", record.trip_id).into(),
                departure_city,
                arrival_city,
                departure_time,
                arrival_time,
                train_type,
                days_of_operation: "Daily".into(),
                first_class_fare: record.price,
                second_class_fare: record.price,
                crosses_midnight: record.crosses_midnight,
            });

            let fare_class = if record.first_class {
                FareClass::First
            } else {
                FareClass::Second
            };
            let mut trip = Trip::new();
            trip.add_leg(leg);
            trip.compute_totals(fare_class, Duration::ZERO);

            booked_trips.push(BookedTrip::restore(
                trip,
                fare_class,
                record.trip_id,
                record.booking_date,
                record.departure_date,
                record.arrival_date,
            ));
        }

        debug!(
            "Loading booked trips took {:?} ({} loaded)",
            now.elapsed(),
            booked_trips.len()
        );
        Ok(booked_trips)
    }

    pub fn clear_booked_trips(&self) -> Result<(), Error> {
        self.remove(BOOKED_TRIPS_FILE)
    }

    fn append<T: Serialize>(&self, file_name: &str, row: &T) -> Result<(), Error> {
        let path = self.dir.join(file_name);
        let write_headers = !path.exists();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(write_headers)
            .from_writer(file);
        writer.serialize(row)?;
        writer.flush()?;
        Ok(())
    }

    fn read_all<T: serde::de::DeserializeOwned>(&self, file_name: &str) -> Result<Vec<T>, Error> {
        let path = self.dir.join(file_name);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_reader(File::open(path)?);
        let mut rows = Vec::new();
        for record in reader.deserialize() {
            rows.push(record?);
        }
        Ok(rows)
    }

    fn remove(&self, file_name: &str) -> Result<(), Error> {
        let path = self.dir.join(file_name);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}
