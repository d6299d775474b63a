//! Integration tests for [`map_renderer::MapRenderer`].
//!
//! Uses an in-memory [`CityLookup`] and an empty basemap; checks that files are always produced,
//! unknown cities are skipped, markers land where the projection says, and distance rendering
//! bails out without a file when a city is missing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use citymap_core::{CityLookup, Coordinates, DbotError, MarkerColor, RenderOptions};
use image::Rgb;
use map_renderer::projection::PlateCarree;
use map_renderer::renderer::{MAP_HEIGHT, MAP_WIDTH};
use map_renderer::{Basemap, DistanceOutcome, Layer, MapRenderer, RenderError};
use tempfile::TempDir;

struct FixedLookup {
    cities: HashMap<String, Coordinates>,
    calls: AtomicUsize,
}

impl FixedLookup {
    fn new() -> Self {
        let mut cities = HashMap::new();
        cities.insert("Paris".to_string(), Coordinates::new(48.85, 2.35));
        cities.insert("Tokyo".to_string(), Coordinates::new(35.6897, 139.6922));
        cities.insert("London".to_string(), Coordinates::new(51.5072, -0.1275));
        Self {
            cities,
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CityLookup for FixedLookup {
    async fn lookup_coordinates(
        &self,
        city_name: &str,
    ) -> citymap_core::Result<Option<Coordinates>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.cities.get(city_name).copied())
    }
}

struct FailingLookup;

#[async_trait]
impl CityLookup for FailingLookup {
    async fn lookup_coordinates(
        &self,
        _city_name: &str,
    ) -> citymap_core::Result<Option<Coordinates>> {
        Err(DbotError::Database("database is locked".to_string()))
    }
}

fn renderer_with(lookup: Arc<dyn CityLookup>) -> MapRenderer {
    MapRenderer::new(lookup, Arc::new(Basemap::empty()))
}

fn pixel_at(path: &std::path::Path, coords: Coordinates) -> Rgb<u8> {
    let image = image::open(path).unwrap().to_rgb8();
    let (x, y) = PlateCarree::new(MAP_WIDTH, MAP_HEIGHT).project_coords(coords);
    *image.get_pixel(x.round() as u32, y.round() as u32)
}

/// **Test: An empty city list still produces a decodable, non-empty PNG of the canvas size.**
#[tokio::test]
async fn test_render_empty_list_writes_image() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("empty.png");
    let renderer = renderer_with(Arc::new(FixedLookup::new()));

    let summary = renderer
        .render(&path, &[], RenderOptions::default())
        .await
        .unwrap();

    assert!(summary.plotted.is_empty());
    assert!(std::fs::metadata(&path).unwrap().len() > 0);
    let image = image::open(&path).unwrap();
    assert_eq!(image.width(), MAP_WIDTH);
    assert_eq!(image.height(), MAP_HEIGHT);
}

/// **Test: One unknown city among known ones is skipped; the known ones are plotted.**
#[tokio::test]
async fn test_render_skips_unknown_city() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("mixed.png");
    let lookup = Arc::new(FixedLookup::new());
    let renderer = renderer_with(lookup.clone());

    let cities = vec![
        "Paris".to_string(),
        "Atlantis".to_string(),
        "Tokyo".to_string(),
    ];
    let options = RenderOptions {
        marker_color: MarkerColor::Blue,
        ..RenderOptions::default()
    };
    let summary = renderer.render(&path, &cities, options).await.unwrap();

    assert_eq!(summary.plotted, vec!["Paris".to_string(), "Tokyo".to_string()]);
    assert_eq!(summary.skipped, vec!["Atlantis".to_string()]);
    assert_eq!(lookup.calls.load(Ordering::SeqCst), 3);
    assert_eq!(
        pixel_at(&path, Coordinates::new(48.85, 2.35)),
        Rgb(MarkerColor::Blue.rgb())
    );
    assert_eq!(
        pixel_at(&path, Coordinates::new(35.6897, 139.6922)),
        Rgb(MarkerColor::Blue.rgb())
    );
}

/// **Test: Every requested city is looked up again, duplicates included.**
#[tokio::test]
async fn test_render_keeps_duplicates() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("dupes.png");
    let renderer = renderer_with(Arc::new(FixedLookup::new()));

    let cities = vec!["Paris".to_string(), "Paris".to_string()];
    let summary = renderer
        .render(&path, &cities, RenderOptions::default())
        .await
        .unwrap();

    assert_eq!(summary.plotted.len(), 2);
}

/// **Test: Fill mode paints land polygons light gray and the sea light blue.**
#[tokio::test]
async fn test_render_fill_continents() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("fill.png");
    let basemap = Basemap {
        land: Layer {
            polygons: vec![vec![vec![
                (-30.0, 30.0),
                (30.0, 30.0),
                (30.0, -30.0),
                (-30.0, -30.0),
                (-30.0, 30.0),
            ]]],
            lines: vec![],
        },
        ..Basemap::empty()
    };
    let renderer = MapRenderer::new(Arc::new(FixedLookup::new()), Arc::new(basemap));

    let options = RenderOptions {
        fill_continents: true,
        ..RenderOptions::default()
    };
    renderer.render(&path, &[], options).await.unwrap();

    assert_eq!(
        pixel_at(&path, Coordinates::new(0.0, 0.0)),
        Rgb([211, 211, 211])
    );
    assert_eq!(
        pixel_at(&path, Coordinates::new(-60.0, 120.0)),
        Rgb([173, 216, 230])
    );
}

/// **Test: A lookup failure fails the render and writes nothing.**
#[tokio::test]
async fn test_render_propagates_lookup_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("fail.png");
    let renderer = renderer_with(Arc::new(FailingLookup));

    let err = renderer
        .render(&path, &["Paris".to_string()], RenderOptions::default())
        .await
        .unwrap_err();

    assert!(matches!(err, RenderError::Lookup(_)));
    assert!(!path.exists());
}

/// **Test: Writing into a missing directory surfaces the image error.**
#[tokio::test]
async fn test_render_unwritable_path_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("missing").join("map.png");
    let renderer = renderer_with(Arc::new(FixedLookup::new()));

    let result = renderer.render(&path, &[], RenderOptions::default()).await;
    assert!(result.is_err());
}

/// **Test: Distance map between two known cities is written with both endpoints marked.**
#[tokio::test]
async fn test_render_distance_known_cities() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("distance.png");
    let renderer = renderer_with(Arc::new(FixedLookup::new()));

    let options = RenderOptions {
        marker_color: MarkerColor::Green,
        ..RenderOptions::default()
    };
    let outcome = renderer
        .render_distance(&path, "Tokyo", "London", options)
        .await
        .unwrap();

    assert_eq!(outcome, DistanceOutcome::Rendered);
    assert_eq!(
        pixel_at(&path, Coordinates::new(51.5072, -0.1275)),
        Rgb(MarkerColor::Green.rgb())
    );
}

/// **Test: Distance map with an unknown city draws nothing and reports which city is missing.**
#[tokio::test]
async fn test_render_distance_missing_city() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("distance.png");
    let renderer = renderer_with(Arc::new(FixedLookup::new()));

    let outcome = renderer
        .render_distance(&path, "Tokyo", "Atlantis", RenderOptions::default())
        .await
        .unwrap();

    assert_eq!(
        outcome,
        DistanceOutcome::MissingCoordinates(vec!["Atlantis".to_string()])
    );
    assert!(!path.exists());
}

fn count_pixels(
    image: &image::RgbImage,
    x: std::ops::Range<u32>,
    y: std::ops::Range<u32>,
    hit: impl Fn(&Rgb<u8>) -> bool,
) -> usize {
    image
        .enumerate_pixels()
        .filter(|(px, py, p)| x.contains(px) && y.contains(py) && hit(p))
        .count()
}

fn is_dark(pixel: &Rgb<u8>) -> bool {
    pixel.0.iter().all(|&c| c < 80)
}

/// **Test: With no data directory or font configured, a filled render shows land, coastlines and legend text.**
#[tokio::test]
async fn test_default_render_has_land_and_labels() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("default.png");
    let renderer = MapRenderer::new(
        Arc::new(FixedLookup::new()),
        Arc::new(Basemap::builtin().unwrap()),
    );

    let options = RenderOptions {
        fill_continents: true,
        show_features: true,
        ..RenderOptions::default()
    };
    renderer
        .render(&path, &["Paris".to_string()], options)
        .await
        .unwrap();

    let image = image::open(&path).unwrap().to_rgb8();
    let all_x = 0..MAP_WIDTH;
    let all_y = 0..MAP_HEIGHT;
    let land = count_pixels(&image, all_x.clone(), all_y.clone(), |p| {
        *p == Rgb([211, 211, 211])
    });
    let coast = count_pixels(&image, all_x, all_y, |p| *p == Rgb([0, 0, 0]));
    assert!(land > 50_000, "only {land} land pixels");
    assert!(coast > 1_000, "only {coast} outline pixels");

    // Legend label "Paris" right of the swatch in the first row.
    let label = count_pixels(&image, 35..70, 18..40, is_dark);
    assert!(label > 20, "only {label} label pixels");
    assert_eq!(
        pixel_at(&path, Coordinates::new(48.85, 2.35)),
        Rgb(MarkerColor::default().rgb())
    );
}

/// **Test: The built-in coastlines are drawn over the generated background when continents are not filled.**
#[tokio::test]
async fn test_default_render_unfilled_has_coastlines() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("outline.png");
    let renderer = MapRenderer::new(
        Arc::new(FixedLookup::new()),
        Arc::new(Basemap::builtin().unwrap()),
    );

    renderer
        .render(&path, &[], RenderOptions::default())
        .await
        .unwrap();

    let image = image::open(&path).unwrap().to_rgb8();
    let coast = count_pixels(&image, 0..MAP_WIDTH, 0..MAP_HEIGHT, |p| *p == Rgb([0, 0, 0]));
    assert!(coast > 1_000, "only {coast} coastline pixels");
}
