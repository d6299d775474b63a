//! Basemap data: vector layers read from GeoJSON and an optional stock background raster.
//!
//! A data directory may contain `land`, `ocean`, `coastline`, `borders`, `states`, `lakes` and
//! `rivers` as `<name>.geojson` FeatureCollections (Natural Earth exports work as-is) plus a
//! `stock.png` equirectangular background. Anything missing becomes an empty layer.
//!
//! Without a data directory, [`Basemap::builtin`] supplies a coarse world compiled into the binary.

use std::fs;
use std::path::Path;

use image::RgbImage;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::error::RenderError;

const BUILTIN_LAND: &str = include_str!("../assets/basemap/land.geojson");
const BUILTIN_LAKES: &str = include_str!("../assets/basemap/lakes.geojson");
const BUILTIN_RIVERS: &str = include_str!("../assets/basemap/rivers.geojson");
const BUILTIN_BORDERS: &str = include_str!("../assets/basemap/borders.geojson");
const BUILTIN_STATES: &str = include_str!("../assets/basemap/states.geojson");

/// A ring or line as (lng, lat) pairs.
pub type Path2 = Vec<(f64, f64)>;

/// One drawable layer. Polygons are exterior ring first, then holes.
#[derive(Debug, Clone, Default)]
pub struct Layer {
    pub polygons: Vec<Vec<Path2>>,
    pub lines: Vec<Path2>,
}

impl Layer {
    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty() && self.lines.is_empty()
    }

    /// Parses a GeoJSON FeatureCollection. Points are ignored; polygon outlines are kept as polygons.
    pub fn from_geojson(name: &str, raw: &str) -> Result<Self, RenderError> {
        let invalid = |reason: String| RenderError::Basemap {
            layer: name.to_string(),
            reason,
        };

        let collection: FeatureCollection =
            serde_json::from_str(raw).map_err(|e| invalid(e.to_string()))?;

        let mut layer = Layer::default();
        for feature in collection.features {
            if let Some(geometry) = feature.geometry {
                layer
                    .push_geometry(geometry)
                    .map_err(|e| invalid(e.to_string()))?;
            }
        }
        Ok(layer)
    }

    fn push_geometry(&mut self, geometry: Geometry) -> Result<(), serde_json::Error> {
        match geometry.kind.as_str() {
            "LineString" => {
                let line: Vec<Vec<f64>> = serde_json::from_value(geometry.coordinates)?;
                self.lines.push(to_path(line));
            }
            "MultiLineString" => {
                let lines: Vec<Vec<Vec<f64>>> = serde_json::from_value(geometry.coordinates)?;
                self.lines.extend(lines.into_iter().map(to_path));
            }
            "Polygon" => {
                let rings: Vec<Vec<Vec<f64>>> = serde_json::from_value(geometry.coordinates)?;
                self.polygons.push(rings.into_iter().map(to_path).collect());
            }
            "MultiPolygon" => {
                let polygons: Vec<Vec<Vec<Vec<f64>>>> =
                    serde_json::from_value(geometry.coordinates)?;
                self.polygons.extend(
                    polygons
                        .into_iter()
                        .map(|rings| rings.into_iter().map(to_path).collect()),
                );
            }
            "GeometryCollection" => {
                for inner in geometry.geometries {
                    self.push_geometry(inner)?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: Option<Geometry>,
}

#[derive(Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    coordinates: Value,
    #[serde(default)]
    geometries: Vec<Geometry>,
}

fn to_path(positions: Vec<Vec<f64>>) -> Path2 {
    positions
        .into_iter()
        .filter(|p| p.len() >= 2)
        .map(|p| (p[0], p[1]))
        .collect()
}

/// All basemap layers. Cheap to share behind an `Arc`; loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct Basemap {
    pub land: Layer,
    pub ocean: Layer,
    pub coastline: Layer,
    pub borders: Layer,
    pub states: Layer,
    pub lakes: Layer,
    pub rivers: Layer,
    /// Background raster used when continents are not filled.
    pub stock: Option<RgbImage>,
}

impl Basemap {
    /// No layers, no stock image: markers on a generated background.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Low-resolution world embedded in the crate. Land outlines double as the coastline;
    /// there is no ocean layer or stock image.
    pub fn builtin() -> Result<Self, RenderError> {
        let land = Layer::from_geojson("land", BUILTIN_LAND)?;
        Ok(Self {
            coastline: land.clone(),
            land,
            ocean: Layer::default(),
            borders: Layer::from_geojson("borders", BUILTIN_BORDERS)?,
            states: Layer::from_geojson("states", BUILTIN_STATES)?,
            lakes: Layer::from_geojson("lakes", BUILTIN_LAKES)?,
            rivers: Layer::from_geojson("rivers", BUILTIN_RIVERS)?,
            stock: None,
        })
    }

    /// Loads every known layer from `dir`. Missing files are logged and left empty;
    /// files that exist but do not parse are an error.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, RenderError> {
        let dir = dir.as_ref();
        let layer = |name: &str| -> Result<Layer, RenderError> {
            let path = dir.join(format!("{name}.geojson"));
            if !path.exists() {
                warn!(layer = %name, path = %path.display(), "Basemap layer missing, drawing without it");
                return Ok(Layer::default());
            }
            let raw = fs::read_to_string(&path)?;
            let layer = Layer::from_geojson(name, &raw)?;
            info!(
                layer = %name,
                polygons = layer.polygons.len(),
                lines = layer.lines.len(),
                "Loaded basemap layer"
            );
            Ok(layer)
        };

        let stock_path = dir.join("stock.png");
        let stock = if stock_path.exists() {
            Some(image::open(&stock_path)?.to_rgb8())
        } else {
            warn!(path = %stock_path.display(), "Stock background missing, using generated gradient");
            None
        };

        Ok(Self {
            land: layer("land")?,
            ocean: layer("ocean")?,
            coastline: layer("coastline")?,
            borders: layer("borders")?,
            states: layer("states")?,
            lakes: layer("lakes")?,
            rivers: layer("rivers")?,
            stock,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {}, "geometry": {
                "type": "Polygon",
                "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 0]]]
            }},
            {"type": "Feature", "properties": {}, "geometry": {
                "type": "MultiLineString",
                "coordinates": [[[0, 0, 5], [1, 1, 5]], [[2, 2], [3, 3]]]
            }},
            {"type": "Feature", "properties": {}, "geometry": {
                "type": "Point",
                "coordinates": [4, 4]
            }},
            {"type": "Feature", "properties": {}, "geometry": null}
        ]
    }"#;

    #[test]
    fn test_layer_from_geojson() {
        let layer = Layer::from_geojson("sample", SAMPLE).unwrap();
        assert_eq!(layer.polygons.len(), 1);
        assert_eq!(layer.polygons[0][0].len(), 4);
        assert_eq!(layer.lines.len(), 2);
        assert_eq!(layer.lines[0], vec![(0.0, 0.0), (1.0, 1.0)]);
    }

    #[test]
    fn test_layer_from_geojson_invalid() {
        let err = Layer::from_geojson("broken", "{\"features\": 3}").unwrap_err();
        assert!(matches!(err, RenderError::Basemap { .. }));
    }

    #[test]
    fn test_load_missing_dir_yields_empty_layers() {
        let dir = tempfile::tempdir().unwrap();
        let basemap = Basemap::load(dir.path()).unwrap();
        assert!(basemap.land.is_empty());
        assert!(basemap.rivers.is_empty());
        assert!(basemap.stock.is_none());
    }

    #[test]
    fn test_load_reads_present_layers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("land.geojson"), SAMPLE).unwrap();

        let basemap = Basemap::load(dir.path()).unwrap();
        assert_eq!(basemap.land.polygons.len(), 1);
        assert!(basemap.coastline.is_empty());
    }

    fn contains(ring: &Path2, (x, y): (f64, f64)) -> bool {
        let mut inside = false;
        for pair in ring.windows(2) {
            let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
            if (y1 > y) != (y2 > y) && x < (x2 - x1) * (y - y1) / (y2 - y1) + x1 {
                inside = !inside;
            }
        }
        inside
    }

    /// **Test: Built-in basemap parses and covers major cities with land**
    #[test]
    fn test_builtin_basemap() {
        let basemap = Basemap::builtin().unwrap();
        assert!(basemap.land.polygons.len() > 20);
        assert_eq!(basemap.coastline.polygons.len(), basemap.land.polygons.len());
        assert!(basemap.ocean.is_empty());
        assert!(!basemap.lakes.is_empty());
        assert!(!basemap.rivers.is_empty());
        assert!(!basemap.borders.is_empty());
        assert!(!basemap.states.is_empty());
        assert!(basemap.stock.is_none());

        for city in [(2.35, 48.85), (139.69, 35.69), (-73.9, 40.7), (151.2, -33.9)] {
            assert!(
                basemap.land.polygons.iter().any(|p| contains(&p[0], city)),
                "{city:?} not on built-in land"
            );
        }
        for ring in basemap.land.polygons.iter().map(|p| &p[0]) {
            assert_eq!(ring.first(), ring.last());
        }
    }
}
