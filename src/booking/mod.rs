//! Booked trips.
//!
//! A booking freezes a selected [`Trip`] with a timestamp and a planned
//! departure date, and derives the planned arrival date by walking the
//! legs: an overnight leg advances the calendar, and so does a transfer
//! whose connecting departure falls past midnight.

use std::sync::atomic::{AtomicU32, Ordering};

use chrono::{Days, Local, NaiveDate, NaiveDateTime};

use crate::{catalog::FareClass, planner::Trip};

static TRIP_SEQUENCE: AtomicU32 = AtomicU32::new(0);

/// A selected itinerary turned into a booking record.
#[derive(Debug, Clone)]
pub struct BookedTrip {
    trip_id: String,
    trip: Trip,
    fare_class: FareClass,
    booking_date: NaiveDateTime,
    departure_date: NaiveDate,
    arrival_date: NaiveDate,
}

impl BookedTrip {
    /// Books a trip for the given departure date, stamping the current
    /// local time and a fresh trip id.
    pub fn new(trip: Trip, fare_class: FareClass, departure_date: NaiveDate) -> Self {
        let arrival_date = arrival_date_for(&trip, departure_date);
        Self {
            trip_id: next_trip_id(),
            trip,
            fare_class,
            booking_date: Local::now().naive_local(),
            departure_date,
            arrival_date,
        }
    }

    /// Rebuilds a booking from persisted fields, keeping its original id
    /// and timestamp.
    pub fn restore(
        trip: Trip,
        fare_class: FareClass,
        trip_id: String,
        booking_date: NaiveDateTime,
        departure_date: NaiveDate,
        arrival_date: NaiveDate,
    ) -> Self {
        Self {
            trip_id,
            trip,
            fare_class,
            booking_date,
            departure_date,
            arrival_date,
        }
    }

    pub fn trip_id(&self) -> &str {
        &self.trip_id
    }

    pub fn trip(&self) -> &Trip {
        &self.trip
    }

    pub fn fare_class(&self) -> FareClass {
        self.fare_class
    }

    pub fn booking_date(&self) -> NaiveDateTime {
        self.booking_date
    }

    pub fn departure_date(&self) -> NaiveDate {
        self.departure_date
    }

    pub fn arrival_date(&self) -> NaiveDate {
        self.arrival_date
    }

    /// The booked fare: the trip total for the class this booking chose.
    pub fn price(&self) -> f64 {
        match self.fare_class {
            FareClass::First => self.trip.total_first_class_fare(),
            FareClass::Second => self.trip.total_second_class_fare(),
        }
    }

    /// Whether the planned departure is today or later.
    pub fn is_future(&self) -> bool {
        self.departure_date >= Local::now().date_naive()
    }
}

/// Walks the legs of a trip to find which calendar day it arrives on.
fn arrival_date_for(trip: &Trip, departure_date: NaiveDate) -> NaiveDate {
    let mut date = departure_date;
    let legs = trip.legs();
    for (i, leg) in legs.iter().enumerate() {
        if leg.crosses_midnight {
            date = next_day(date);
        }
        if let Some(next) = legs.get(i + 1)
            && next.departure_time < leg.arrival_time
        {
            // The connecting train leaves after the clock wrapped.
            date = next_day(date);
        }
    }
    date
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}

/// Six uppercase hex digits, seeded from the clock plus a process-local
/// sequence so ids stay distinct across restarts.
fn next_trip_id() -> String {
    let sequence = TRIP_SEQUENCE.fetch_add(1, Ordering::Relaxed) as i64;
    let stamp = Local::now().timestamp_millis();
    format!("TR-{:06X}", (stamp + sequence) as u32 & 0xFF_FFFF)
}
