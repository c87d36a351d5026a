use chrono::Weekday;

use crate::catalog::FareClass;

/// One itinerary search request.
///
/// Time bounds stay in their raw `"HH:MM"` form: a string that does not
/// parse is treated as no constraint at search time, never as an error.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    pub origin: Option<String>,
    pub destination: Option<String>,
    /// Earliest departure time of day, inclusive, as `"HH:MM"`.
    pub earliest_departure: Option<String>,
    /// Latest arrival time of day, inclusive, as `"HH:MM"`.
    pub latest_arrival: Option<String>,
    pub train_type: Option<String>,
    /// Day-of-operation filter, e.g. "Daily" or "Monday,Wednesday".
    pub days_filter: Option<String>,
    pub fare_class: FareClass,
    /// How many intermediate stops to allow, capped at 2.
    pub max_stops: u8,
    /// Pin the first leg to connections operating on this weekday.
    pub start_weekday: Option<Weekday>,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            origin: None,
            destination: None,
            earliest_departure: None,
            latest_arrival: None,
            train_type: None,
            days_filter: None,
            fare_class: FareClass::Second,
            max_stops: 2,
            start_weekday: None,
        }
    }
}

impl SearchQuery {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from(mut self, city: &str) -> Self {
        self.origin = Some(city.to_owned());
        self
    }

    pub fn to(mut self, city: &str) -> Self {
        self.destination = Some(city.to_owned());
        self
    }

    pub fn departing_after(mut self, time: &str) -> Self {
        self.earliest_departure = Some(time.to_owned());
        self
    }

    pub fn arriving_by(mut self, time: &str) -> Self {
        self.latest_arrival = Some(time.to_owned());
        self
    }

    pub fn with_train_type(mut self, label: &str) -> Self {
        self.train_type = Some(label.to_owned());
        self
    }

    pub fn on_days(mut self, spec: &str) -> Self {
        self.days_filter = Some(spec.to_owned());
        self
    }

    pub fn in_fare_class(mut self, fare_class: FareClass) -> Self {
        self.fare_class = fare_class;
        self
    }

    pub fn with_max_stops(mut self, max_stops: u8) -> Self {
        self.max_stops = max_stops;
        self
    }

    pub fn starting_on(mut self, day: Weekday) -> Self {
        self.start_weekday = Some(day);
        self
    }

    /// True when at least one field constrains the search. A query with
    /// nothing set would dump the whole catalog, so the planner answers
    /// it with an empty result instead.
    pub fn has_constraints(&self) -> bool {
        let set = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|value| !value.trim().is_empty())
        };
        set(&self.origin)
            || set(&self.destination)
            || set(&self.earliest_departure)
            || set(&self.latest_arrival)
            || set(&self.train_type)
            || set(&self.days_filter)
            || self.start_weekday.is_some()
    }
}
