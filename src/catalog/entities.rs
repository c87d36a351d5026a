use std::sync::Arc;

use crate::shared::{
    calendar,
    time::{Duration, Time, MINUTES_PER_DAY},
};

/// A station city. Owned by the [`Catalog`](super::Catalog); connections
/// reference it, they never own it.
#[derive(Debug, Clone)]
pub struct City {
    /// Internal index into the catalog's city list.
    pub index: u32,
    /// Display name with the casing of the first insertion.
    pub name: Arc<str>,
}

/// A train category such as "ICE" or "TGV". Same lifecycle as [`City`].
#[derive(Debug, Clone)]
pub struct TrainType {
    pub index: u32,
    /// Label with the casing of the first insertion.
    pub label: Arc<str>,
}

/// Which of the two fixed price classes a traveler asked for.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FareClass {
    First,
    #[default]
    Second,
}

impl FareClass {
    pub fn is_first(&self) -> bool {
        matches!(self, FareClass::First)
    }
}

/// One scheduled leg between two cities.
///
/// Immutable once added to the catalog. The arrival time of day alone does
/// not determine how long the leg runs: an overnight service arrives on
/// the following calendar day, and only `crosses_midnight` says so.
#[derive(Debug, Clone)]
pub struct Connection {
    pub route_id: Arc<str>,
    pub departure_city: Arc<City>,
    pub arrival_city: Arc<City>,
    pub departure_time: Time,
    pub arrival_time: Time,
    pub train_type: Arc<TrainType>,
    /// Raw day-of-operation spec, e.g. "Daily" or "Mon-Fri". Kept as
    /// authored; all matching goes through [`calendar`].
    pub days_of_operation: Arc<str>,
    pub first_class_fare: f64,
    pub second_class_fare: f64,
    /// Arrival is on the calendar day after departure.
    pub crosses_midnight: bool,
}

impl Connection {
    /// Running time of this leg in minutes, rollover included.
    pub fn duration(&self) -> Duration {
        let mut minutes =
            self.arrival_time.as_minutes() as i64 - self.departure_time.as_minutes() as i64;
        if self.crosses_midnight {
            minutes += MINUTES_PER_DAY as i64;
        }
        Duration::from_minutes(minutes.max(0) as u32)
    }

    pub fn fare(&self, class: FareClass) -> f64 {
        match class {
            FareClass::First => self.first_class_fare,
            FareClass::Second => self.second_class_fare,
        }
    }

    /// Arrival time with the next-day marker the feeds use.
    pub fn formatted_arrival(&self) -> String {
        if self.crosses_midnight {
            format!("{} (+1d)", self.arrival_time)
        } else {
            self.arrival_time.to_string()
        }
    }
}

/// Query predicate for [`Catalog::find_matching`](super::Catalog::find_matching).
///
/// Every field is optional and absent fields constrain nothing; an empty
/// string counts as absent, mirroring how form input reaches the engine.
#[derive(Debug, Default, Clone)]
pub struct ConnectionFilter {
    /// Departure city name, matched trimmed and case-insensitively.
    pub departure_city: Option<String>,
    /// Arrival city name, matched like the departure city.
    pub arrival_city: Option<String>,
    /// Earliest departure time of day, inclusive.
    pub departs_after: Option<Time>,
    /// Latest arrival time of day, inclusive.
    pub arrives_by: Option<Time>,
    /// Train type label, matched trimmed and case-insensitively.
    pub train_type: Option<String>,
    /// Day-of-operation filter; comma-separated multi-day filters match
    /// when any listed day is served.
    pub operating_days: Option<String>,
}

impl ConnectionFilter {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from(mut self, city: &str) -> Self {
        self.departure_city = Some(city.to_owned());
        self
    }

    pub fn to(mut self, city: &str) -> Self {
        self.arrival_city = Some(city.to_owned());
        self
    }

    pub fn departing_after(mut self, time: Time) -> Self {
        self.departs_after = Some(time);
        self
    }

    pub fn arriving_by(mut self, time: Time) -> Self {
        self.arrives_by = Some(time);
        self
    }

    pub fn with_train_type(mut self, label: &str) -> Self {
        self.train_type = Some(label.to_owned());
        self
    }

    pub fn on_days(mut self, spec: &str) -> Self {
        self.operating_days = Some(spec.to_owned());
        self
    }

    /// Checks every present field against one connection.
    pub fn matches(&self, connection: &Connection) -> bool {
        if let Some(city) = non_empty(&self.departure_city)
            && !connection.departure_city.name.eq_ignore_ascii_case(city)
        {
            return false;
        }
        if let Some(city) = non_empty(&self.arrival_city)
            && !connection.arrival_city.name.eq_ignore_ascii_case(city)
        {
            return false;
        }
        if let Some(earliest) = self.departs_after
            && connection.departure_time < earliest
        {
            return false;
        }
        if let Some(latest) = self.arrives_by
            && connection.arrival_time > latest
        {
            return false;
        }
        if let Some(label) = non_empty(&self.train_type)
            && !connection.train_type.label.eq_ignore_ascii_case(label)
        {
            return false;
        }
        if let Some(days) = non_empty(&self.operating_days)
            && !calendar::filter_matches(&connection.days_of_operation, days)
        {
            return false;
        }
        true
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}
