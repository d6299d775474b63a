//! # map-renderer
//!
//! Draws world maps with city markers. Coordinates come from any [`citymap_core::CityLookup`];
//! output is a PNG on a plate carrée canvas.
//!
//! ## Modules
//!
//! - [`basemap`] – GeoJSON layers and stock background loaded from a data directory
//! - [`projection`] – plate carrée projection and great-circle interpolation
//! - [`canvas`] – raster drawing primitives (polygons, lines, markers, legend, text)
//! - [`renderer`] – `MapRenderer::render` / `render_distance`

pub mod basemap;
pub mod canvas;
mod error;
pub mod projection;
pub mod renderer;

pub use basemap::{Basemap, Layer};
pub use error::RenderError;
pub use renderer::{builtin_font, load_font, DistanceOutcome, MapRenderer, RenderSummary};
