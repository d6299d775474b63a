//! Coordinate lookup seam between the map renderer and the city store.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Latitude / longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Resolves a city name to its coordinates. Names are matched exactly (case-sensitive, no trimming).
#[async_trait]
pub trait CityLookup: Send + Sync {
    async fn lookup_coordinates(&self, city_name: &str) -> Result<Option<Coordinates>>;
}
