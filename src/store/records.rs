use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{booking::BookedTrip, catalog::Connection};

/// One persisted connection row, flat enough for a csv file.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ConnectionRecord {
    pub route_id: String,
    pub departure_city: String,
    pub arrival_city: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub train_type: String,
    pub days_of_operation: String,
    pub first_class_fare: f64,
    pub second_class_fare: f64,
    pub crosses_midnight: bool,
}

impl From<&Connection> for ConnectionRecord {
    fn from(connection: &Connection) -> Self {
        Self {
            route_id: connection.route_id.to_string(),
            departure_city: connection.departure_city.name.to_string(),
            arrival_city: connection.arrival_city.name.to_string(),
            departure_time: connection.departure_time.to_string(),
            arrival_time: connection.arrival_time.to_string(),
            train_type: connection.train_type.label.to_string(),
            days_of_operation: connection.days_of_operation.to_string(),
            first_class_fare: connection.first_class_fare,
            second_class_fare: connection.second_class_fare,
            crosses_midnight: connection.crosses_midnight,
        }
    }
}

/// One persisted booking, with its itinerary flattened to the city pair
/// and end-to-end times.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BookedTripRecord {
    pub trip_id: String,
    pub departure_city: String,
    pub arrival_city: String,
    pub departure_time: String,
    pub arrival_time: String,
    pub crosses_midnight: bool,
    pub first_class: bool,
    pub price: f64,
    pub duration_minutes: u32,
    pub stop_count: u32,
    pub booking_date: NaiveDateTime,
    pub departure_date: NaiveDate,
    pub arrival_date: NaiveDate,
}

impl From<&BookedTrip> for BookedTripRecord {
    fn from(booked: &BookedTrip) -> Self {
        let trip = booked.trip();
        Self {
            trip_id: booked.trip_id().to_owned(),
            departure_city: trip.departure_city().unwrap_or_default().to_owned(),
            arrival_city: trip.arrival_city().unwrap_or_default().to_owned(),
            departure_time: trip
                .departure_time()
                .map(|time| time.to_string())
                .unwrap_or_default(),
            arrival_time: trip
                .arrival_time()
                .map(|time| time.to_string())
                .unwrap_or_default(),
            crosses_midnight: trip.legs().last().is_some_and(|leg| leg.crosses_midnight),
            first_class: booked.fare_class().is_first(),
            price: booked.price(),
            duration_minutes: trip.total_duration().as_minutes(),
            stop_count: trip.stop_count() as u32,
            booking_date: booked.booking_date(),
            departure_date: booked.departure_date(),
            arrival_date: booked.arrival_date(),
        }
    }
}
