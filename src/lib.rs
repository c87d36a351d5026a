//! An in-memory itinerary search engine for scheduled rail connections.
//!
//! A [`catalog::Catalog`] holds de-duplicated cities, train types, and
//! timetable connections; [`planner::Planner`] assembles direct, one-stop,
//! and two-stop itineraries under time, weekly-calendar, and layover
//! constraints. [`feed`] ingests CSV timetables and [`store::CsvStore`]
//! persists connections and booked trips.

pub mod booking;
pub mod catalog;
pub mod feed;
pub mod planner;
pub mod shared;
pub mod store;

pub mod prelude {
    pub use crate::booking::BookedTrip;
    pub use crate::catalog::{Catalog, City, Connection, ConnectionFilter, FareClass, TrainType};
    pub use crate::feed::{self, LoadReport};
    pub use crate::planner::{Planner, SearchConfig, SearchQuery, Trip};
    pub use crate::shared::calendar::{self, WeekdaySet};
    pub use crate::shared::time::{Duration, Time};
    pub use crate::store::CsvStore;
}
