//! Seed records for the `cities` table.

use serde::{Deserialize, Serialize};

/// Seed file record (`[{"city": "Paris", "lat": 48.85, "lng": 2.35}, ...]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySeed {
    pub city: String,
    pub lat: f64,
    pub lng: f64,
}
