//! Render options shared by the dispatcher and the map renderer.
//!
//! [`MarkerColor`] is the single marker colour contract: the dispatcher parses it from `color:<value>`
//! and the renderer turns it into pixels.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerColor {
    #[default]
    Red,
    Blue,
    Green,
    Yellow,
    Black,
    Purple,
    Orange,
}

impl MarkerColor {
    pub const ALL: [MarkerColor; 7] = [
        MarkerColor::Red,
        MarkerColor::Blue,
        MarkerColor::Green,
        MarkerColor::Yellow,
        MarkerColor::Black,
        MarkerColor::Purple,
        MarkerColor::Orange,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MarkerColor::Red => "red",
            MarkerColor::Blue => "blue",
            MarkerColor::Green => "green",
            MarkerColor::Yellow => "yellow",
            MarkerColor::Black => "black",
            MarkerColor::Purple => "purple",
            MarkerColor::Orange => "orange",
        }
    }

    /// RGB triple for the colour name (CSS / matplotlib named colours).
    pub fn rgb(&self) -> [u8; 3] {
        match self {
            MarkerColor::Red => [255, 0, 0],
            MarkerColor::Blue => [0, 0, 255],
            MarkerColor::Green => [0, 128, 0],
            MarkerColor::Yellow => [255, 255, 0],
            MarkerColor::Black => [0, 0, 0],
            MarkerColor::Purple => [128, 0, 128],
            MarkerColor::Orange => [255, 165, 0],
        }
    }

    /// Comma-separated list of every accepted name, for user-facing hints.
    pub fn names() -> String {
        Self::ALL
            .iter()
            .map(MarkerColor::as_str)
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for MarkerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown marker color: {0}")]
pub struct UnknownColor(pub String);

impl FromStr for MarkerColor {
    type Err = UnknownColor;

    /// Case-insensitive match against the enumerated names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| UnknownColor(s.to_string()))
    }
}

/// Display options for one map drawing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderOptions {
    pub marker_color: MarkerColor,
    /// Land / ocean fill instead of the stock background.
    pub fill_continents: bool,
    /// Borders, states, lakes and rivers.
    pub show_features: bool,
}

/// Cities to plot (order kept, duplicates allowed) plus display options. Never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RenderRequest {
    pub cities: Vec<String>,
    pub options: RenderOptions,
}

impl RenderRequest {
    pub fn new(cities: Vec<String>, options: RenderOptions) -> Self {
        Self { cities, options }
    }
}
