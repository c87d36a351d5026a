use std::{collections::HashMap, sync::Arc};

mod entities;
pub use entities::*;
use rayon::prelude::*;

use crate::planner::Planner;

/// De-duplicated store of cities, train types, and connections.
///
/// Ingestion appends through `&mut self` while searches only read, so the
/// borrow checker enforces the single-writer discipline the engine
/// assumes. A search sees every connection fully appended before it began.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    cities: Vec<Arc<City>>,
    city_lookup: HashMap<String, u32>,
    train_types: Vec<Arc<TrainType>>,
    train_type_lookup: HashMap<String, u32>,
    connections: Vec<Arc<Connection>>,
}

impl Catalog {
    pub fn new() -> Self {
        Default::default()
    }

    /// Returns the city with this name, creating it on first sight.
    /// Lookup is case-insensitive on the trimmed name; the casing of the
    /// first insertion stays canonical.
    pub fn find_or_create_city(&mut self, name: &str) -> Arc<City> {
        let name = name.trim();
        let key = name.to_lowercase();
        if let Some(index) = self.city_lookup.get(&key) {
            return self.cities[*index as usize].clone();
        }
        let city = Arc::new(City {
            index: self.cities.len() as u32,
            name: name.into(),
        });
        self.city_lookup.insert(key, city.index);
        self.cities.push(city.clone());
        city
    }

    /// Returns the train type with this label, creating it on first sight.
    /// Same dedup rules as [`Catalog::find_or_create_city`].
    pub fn find_or_create_train_type(&mut self, label: &str) -> Arc<TrainType> {
        let label = label.trim();
        let key = label.to_lowercase();
        if let Some(index) = self.train_type_lookup.get(&key) {
            return self.train_types[*index as usize].clone();
        }
        let train_type = Arc::new(TrainType {
            index: self.train_types.len() as u32,
            label: label.into(),
        });
        self.train_type_lookup.insert(key, train_type.index);
        self.train_types.push(train_type.clone());
        train_type
    }

    pub fn add(&mut self, connection: Connection) {
        self.connections.push(Arc::new(connection));
    }

    /// Get a city by name if it exists, without creating it.
    pub fn city(&self, name: &str) -> Option<&Arc<City>> {
        let index = self.city_lookup.get(&name.trim().to_lowercase())?;
        Some(&self.cities[*index as usize])
    }

    /// Get a train type by label if it exists, without creating it.
    pub fn train_type(&self, label: &str) -> Option<&Arc<TrainType>> {
        let index = self.train_type_lookup.get(&label.trim().to_lowercase())?;
        Some(&self.train_types[*index as usize])
    }

    pub fn cities(&self) -> &[Arc<City>] {
        &self.cities
    }

    pub fn train_types(&self) -> &[Arc<TrainType>] {
        &self.train_types
    }

    pub fn connections(&self) -> &[Arc<Connection>] {
        &self.connections
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// All connections satisfying every present filter field, as a fresh
    /// list in catalog insertion order.
    pub fn find_matching(&self, filter: &ConnectionFilter) -> Vec<Arc<Connection>> {
        self.connections
            .par_iter()
            .filter(|connection| filter.matches(connection))
            .cloned()
            .collect()
    }

    pub fn clear(&mut self) {
        self.cities.clear();
        self.city_lookup.clear();
        self.train_types.clear();
        self.train_type_lookup.clear();
        self.connections.clear();
    }

    /// An itinerary planner borrowing this catalog.
    pub fn planner(&self) -> Planner<'_> {
        Planner::new(self)
    }
}
