use std::sync::Arc;

use crate::{
    catalog::{Connection, FareClass},
    shared::time::{Duration, Time},
};

/// An assembled itinerary: an ordered, non-empty chain of legs plus the
/// totals derived from them.
///
/// A trip is built once: legs are attached, then [`Trip::compute_totals`]
/// runs exactly once. Recomputing starts from zero again, so totals never
/// accumulate across calls.
#[derive(Debug, Clone, Default)]
pub struct Trip {
    legs: Vec<Arc<Connection>>,
    fare_class: FareClass,
    total_duration: Duration,
    total_first_class_fare: f64,
    total_second_class_fare: f64,
    transfer_time: Duration,
}

impl Trip {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn add_leg(&mut self, connection: Arc<Connection>) {
        self.legs.push(connection);
    }

    /// Derives duration and fare totals from the attached legs.
    ///
    /// `transfer_time` is the summed layover over all junctions; it is
    /// additive into the total duration. Both fare totals are computed
    /// regardless of `fare_class`; the class only selects which one
    /// [`Trip::selected_fare`] reports.
    pub fn compute_totals(&mut self, fare_class: FareClass, transfer_time: Duration) {
        self.fare_class = fare_class;
        self.transfer_time = transfer_time;
        self.total_duration = Duration::ZERO;
        self.total_first_class_fare = 0.0;
        self.total_second_class_fare = 0.0;

        for leg in &self.legs {
            self.total_duration += leg.duration();
            self.total_first_class_fare += leg.first_class_fare;
            self.total_second_class_fare += leg.second_class_fare;
        }

        self.total_duration += transfer_time;
    }

    pub fn legs(&self) -> &[Arc<Connection>] {
        &self.legs
    }

    /// Intermediate stops: legs minus one, zero for an empty trip.
    pub fn stop_count(&self) -> usize {
        self.legs.len().saturating_sub(1)
    }

    pub fn fare_class(&self) -> FareClass {
        self.fare_class
    }

    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    pub fn total_first_class_fare(&self) -> f64 {
        self.total_first_class_fare
    }

    pub fn total_second_class_fare(&self) -> f64 {
        self.total_second_class_fare
    }

    /// The fare total for the class the query asked for.
    pub fn selected_fare(&self) -> f64 {
        match self.fare_class {
            FareClass::First => self.total_first_class_fare,
            FareClass::Second => self.total_second_class_fare,
        }
    }

    pub fn transfer_time(&self) -> Duration {
        self.transfer_time
    }

    pub fn departure_city(&self) -> Option<&str> {
        self.legs.first().map(|leg| &*leg.departure_city.name)
    }

    pub fn arrival_city(&self) -> Option<&str> {
        self.legs.last().map(|leg| &*leg.arrival_city.name)
    }

    pub fn departure_time(&self) -> Option<Time> {
        self.legs.first().map(|leg| leg.departure_time)
    }

    pub fn arrival_time(&self) -> Option<Time> {
        self.legs.last().map(|leg| leg.arrival_time)
    }

    /// Arrival time of the last leg, with a `(+1d)` marker when that leg
    /// crosses midnight.
    pub fn formatted_arrival(&self) -> Option<String> {
        self.legs.last().map(|leg| leg.formatted_arrival())
    }

    /// Total duration as "4h 30m".
    pub fn formatted_duration(&self) -> String {
        self.total_duration.to_string()
    }
}
