//! Itinerary assembly.
//!
//! The planner turns one [`SearchQuery`] into a list of [`Trip`]s by
//! composing catalog legs: direct connections first, then one-stop and
//! two-stop chains, depth-bounded at two intermediate stops by design.
//! Layovers outside the configured floor/ceiling reject a chain, and a
//! chain never reuses a leg that is already offered as a direct result.

use std::{collections::HashSet, sync::Arc};

use rayon::prelude::*;
use tracing::debug;

mod config;
mod query;
mod trip;

pub use config::*;
pub use query::*;
pub use trip::*;

use crate::{
    catalog::{Catalog, Connection, ConnectionFilter},
    shared::{
        calendar,
        time::{Duration, Time},
    },
};

/// Identity of a scheduled leg for reuse suppression: two legs with the
/// same city pair and the same times are the same offer.
type LegKey = (u32, u32, Time, Time);

fn leg_key(connection: &Connection) -> LegKey {
    (
        connection.departure_city.index,
        connection.arrival_city.index,
        connection.departure_time,
        connection.arrival_time,
    )
}

/// Search handle borrowing a [`Catalog`].
pub struct Planner<'a> {
    catalog: &'a Catalog,
    config: SearchConfig,
}

impl<'a> Planner<'a> {
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            config: SearchConfig::default(),
        }
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Runs the full search: direct, one-stop, and two-stop results
    /// concatenated in that order.
    ///
    /// Never fails: bad time strings mean "no constraint", and a query
    /// that constrains nothing at all returns an empty list rather than
    /// the entire catalog.
    pub fn search(&self, query: &SearchQuery) -> Vec<Trip> {
        if !query.has_constraints() {
            return Vec::new();
        }

        // A time that does not parse constrains nothing.
        let earliest = query
            .earliest_departure
            .as_deref()
            .and_then(Time::from_hm);
        let latest = query.latest_arrival.as_deref().and_then(Time::from_hm);

        let direct = self.direct_legs(query, earliest, latest);
        let direct_keys: HashSet<LegKey> = direct.iter().map(|leg| leg_key(leg)).collect();
        debug!("{} direct connections", direct.len());

        let mut trips: Vec<Trip> = direct
            .into_iter()
            .map(|leg| self.assemble(vec![leg], query, Duration::ZERO))
            .collect();

        // Connecting itineraries need both endpoints pinned down, or the
        // expansion space explodes.
        let both_endpoints = has_value(&query.origin) && has_value(&query.destination);
        if both_endpoints && query.max_stops >= 1 {
            let one_stop = self.one_stop_trips(query, earliest, latest, &direct_keys);
            debug!("{} one-stop itineraries", one_stop.len());
            trips.extend(one_stop);
        }
        if both_endpoints && query.max_stops >= 2 {
            let two_stop = self.two_stop_trips(query, earliest, latest, &direct_keys);
            debug!("{} two-stop itineraries", two_stop.len());
            trips.extend(two_stop);
        }

        trips
    }

    /// Step 1: direct connections matching every query filter at once.
    fn direct_legs(
        &self,
        query: &SearchQuery,
        earliest: Option<Time>,
        latest: Option<Time>,
    ) -> Vec<Arc<Connection>> {
        let filter = ConnectionFilter {
            departure_city: query.origin.clone(),
            arrival_city: query.destination.clone(),
            departs_after: earliest,
            arrives_by: latest,
            train_type: query.train_type.clone(),
            operating_days: query.days_filter.clone(),
        };
        let mut legs = self.catalog.find_matching(&filter);
        if let Some(day) = query.start_weekday {
            legs.retain(|leg| calendar::operates_on(&leg.days_of_operation, day));
        }
        legs
    }

    /// First legs out of the origin: everything the direct step filters
    /// on except the destination and the arrival bound, which belong to
    /// the final leg of a chain.
    fn first_legs(
        &self,
        query: &SearchQuery,
        earliest: Option<Time>,
        direct_keys: &HashSet<LegKey>,
    ) -> Vec<Arc<Connection>> {
        let filter = ConnectionFilter {
            departure_city: query.origin.clone(),
            arrival_city: None,
            departs_after: earliest,
            arrives_by: None,
            train_type: query.train_type.clone(),
            operating_days: query.days_filter.clone(),
        };
        let mut legs = self.catalog.find_matching(&filter);
        if let Some(day) = query.start_weekday {
            legs.retain(|leg| calendar::operates_on(&leg.days_of_operation, day));
        }
        legs.retain(|leg| !direct_keys.contains(&leg_key(leg)));
        legs
    }

    /// Step 2: origin -> stop -> destination.
    fn one_stop_trips(
        &self,
        query: &SearchQuery,
        earliest: Option<Time>,
        latest: Option<Time>,
        direct_keys: &HashSet<LegKey>,
    ) -> Vec<Trip> {
        let firsts = self.first_legs(query, earliest, direct_keys);
        firsts
            .par_iter()
            .flat_map_iter(|first| {
                let filter = ConnectionFilter {
                    departure_city: Some(first.arrival_city.name.to_string()),
                    arrival_city: query.destination.clone(),
                    departs_after: None,
                    arrives_by: latest,
                    train_type: query.train_type.clone(),
                    operating_days: query.days_filter.clone(),
                };
                self.catalog
                    .find_matching(&filter)
                    .into_iter()
                    .filter(|second| !direct_keys.contains(&leg_key(second)))
                    .filter_map(|second| {
                        let wait = first.arrival_time.wait_until(second.departure_time);
                        self.layover_ok(wait).then(|| {
                            self.assemble(vec![first.clone(), second], query, wait)
                        })
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Step 3: origin -> stop -> stop -> destination, layover-checked at
    /// both junctions, transfer times summed.
    fn two_stop_trips(
        &self,
        query: &SearchQuery,
        earliest: Option<Time>,
        latest: Option<Time>,
        direct_keys: &HashSet<LegKey>,
    ) -> Vec<Trip> {
        let firsts = self.first_legs(query, earliest, direct_keys);
        firsts
            .par_iter()
            .flat_map_iter(|first| {
                let middle_filter = ConnectionFilter {
                    departure_city: Some(first.arrival_city.name.to_string()),
                    arrival_city: None,
                    departs_after: None,
                    arrives_by: None,
                    train_type: query.train_type.clone(),
                    operating_days: query.days_filter.clone(),
                };
                let mut chains = Vec::new();
                for second in self.catalog.find_matching(&middle_filter) {
                    if direct_keys.contains(&leg_key(&second)) {
                        continue;
                    }
                    // A middle leg back to the origin or straight to the
                    // destination leaves nothing sensible for a third leg.
                    if Arc::ptr_eq(&second.arrival_city, &first.departure_city)
                        || is_destination(query, &second.arrival_city.name)
                    {
                        continue;
                    }
                    let first_wait = first.arrival_time.wait_until(second.departure_time);
                    if !self.layover_ok(first_wait) {
                        continue;
                    }

                    let last_filter = ConnectionFilter {
                        departure_city: Some(second.arrival_city.name.to_string()),
                        arrival_city: query.destination.clone(),
                        departs_after: None,
                        arrives_by: latest,
                        train_type: query.train_type.clone(),
                        operating_days: query.days_filter.clone(),
                    };
                    for third in self.catalog.find_matching(&last_filter) {
                        if direct_keys.contains(&leg_key(&third)) {
                            continue;
                        }
                        let second_wait = second.arrival_time.wait_until(third.departure_time);
                        if !self.layover_ok(second_wait) {
                            continue;
                        }
                        chains.push(self.assemble(
                            vec![first.clone(), second.clone(), third],
                            query,
                            first_wait + second_wait,
                        ));
                    }
                }
                chains
            })
            .collect()
    }

    fn assemble(&self, legs: Vec<Arc<Connection>>, query: &SearchQuery, transfer: Duration) -> Trip {
        let mut trip = Trip::new();
        for leg in legs {
            trip.add_leg(leg);
        }
        trip.compute_totals(query.fare_class, transfer);
        trip
    }

    /// Inclusive at both bounds.
    fn layover_ok(&self, wait: Duration) -> bool {
        wait >= self.config.min_layover() && wait <= self.config.max_layover()
    }
}

fn has_value(field: &Option<String>) -> bool {
    field
        .as_deref()
        .is_some_and(|value| !value.trim().is_empty())
}

fn is_destination(query: &SearchQuery, city: &str) -> bool {
    query
        .destination
        .as_deref()
        .is_some_and(|destination| destination.trim().eq_ignore_ascii_case(city))
}
