//! Map renderer: resolves city names through a [`CityLookup`] and draws them onto the basemap.
//!
//! Lookups run on the async side; the drawing itself is CPU-bound and runs on a blocking worker.

use std::path::Path;
use std::sync::Arc;

use ab_glyph::FontArc;
use citymap_core::{CityLookup, Coordinates, RenderOptions};
use image::Rgb;
use tracing::{debug, info, instrument, warn};

use crate::basemap::Basemap;
use crate::canvas::{self, Align, Canvas, Stroke};
use crate::error::RenderError;
use crate::projection::great_circle;

pub const MAP_WIDTH: u32 = 1000;
pub const MAP_HEIGHT: u32 = 500;
const GREAT_CIRCLE_SEGMENTS: usize = 100;
const DISTANCE_LINE_WIDTH: u32 = 2;
/// Label offset from each endpoint in degrees (lng, lat).
const LABEL_OFFSET: (f64, f64) = (3.0, -12.0);

/// Which requested cities made it onto the map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderSummary {
    pub plotted: Vec<String>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DistanceOutcome {
    Rendered,
    /// Nothing was drawn; lists the cities without coordinates.
    MissingCoordinates(Vec<String>),
}

const BUILTIN_FONT: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");

/// DejaVu Sans, compiled into the crate. Used until [`MapRenderer::with_font`] replaces it.
pub fn builtin_font() -> Result<FontArc, RenderError> {
    FontArc::try_from_slice(BUILTIN_FONT).map_err(|e| RenderError::Font(e.to_string()))
}

/// Loads a TrueType/OpenType font for legend and label text.
pub fn load_font(path: impl AsRef<Path>) -> Result<FontArc, RenderError> {
    let bytes = std::fs::read(path.as_ref())?;
    FontArc::try_from_vec(bytes).map_err(|e| RenderError::Font(e.to_string()))
}

#[derive(Clone)]
pub struct MapRenderer {
    lookup: Arc<dyn CityLookup>,
    basemap: Arc<Basemap>,
    font: Option<FontArc>,
}

impl MapRenderer {
    pub fn new(lookup: Arc<dyn CityLookup>, basemap: Arc<Basemap>) -> Self {
        let font = match builtin_font() {
            Ok(font) => Some(font),
            Err(e) => {
                warn!(error = %e, "Built-in font unusable, legends without text");
                None
            }
        };
        Self {
            lookup,
            basemap,
            font,
        }
    }

    /// Replaces the font used in legends and distance labels.
    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    /// Draws every resolvable city in `cities` (order kept, duplicates drawn again) and writes a PNG
    /// to `path`. Unknown cities are skipped. The file is written even when nothing resolved.
    #[instrument(skip(self, path, cities), fields(path = %path.display(), count = cities.len()))]
    pub async fn render(
        &self,
        path: &Path,
        cities: &[String],
        options: RenderOptions,
    ) -> Result<RenderSummary, RenderError> {
        let mut summary = RenderSummary::default();
        let mut points = Vec::with_capacity(cities.len());

        for city in cities {
            match self.lookup.lookup_coordinates(city).await? {
                Some(coords) => {
                    points.push((city.clone(), coords));
                    summary.plotted.push(city.clone());
                }
                None => {
                    debug!(city = %city, "No coordinates, skipping city");
                    summary.skipped.push(city.clone());
                }
            }
        }

        let basemap = Arc::clone(&self.basemap);
        let font = self.font.clone();
        let path_buf = path.to_path_buf();
        let with_legend = !cities.is_empty();

        tokio::task::spawn_blocking(move || {
            draw_city_map(&basemap, font, &points, options, with_legend, &path_buf)
        })
        .await??;

        info!(
            plotted = summary.plotted.len(),
            skipped = summary.skipped.len(),
            "Map rendered"
        );
        Ok(summary)
    }

    /// Draws a great-circle path and a straight reference line between two cities, with labels.
    /// When either city has no coordinates nothing is drawn and no file is written.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub async fn render_distance(
        &self,
        path: &Path,
        city_a: &str,
        city_b: &str,
        options: RenderOptions,
    ) -> Result<DistanceOutcome, RenderError> {
        let coords_a = self.lookup.lookup_coordinates(city_a).await?;
        let coords_b = self.lookup.lookup_coordinates(city_b).await?;

        let (a, b) = match (coords_a, coords_b) {
            (Some(a), Some(b)) => (a, b),
            (a, b) => {
                let missing: Vec<String> = [(city_a, a), (city_b, b)]
                    .into_iter()
                    .filter(|(_, c)| c.is_none())
                    .map(|(name, _)| name.to_string())
                    .collect();
                warn!(missing = ?missing, "Could not get coordinates for one or both cities");
                return Ok(DistanceOutcome::MissingCoordinates(missing));
            }
        };

        let basemap = Arc::clone(&self.basemap);
        let font = self.font.clone();
        let path_buf = path.to_path_buf();
        let labels = (city_a.to_string(), city_b.to_string());

        tokio::task::spawn_blocking(move || {
            draw_distance_map(
                &basemap,
                font,
                (labels.0.as_str(), a),
                (labels.1.as_str(), b),
                options,
                &path_buf,
            )
        })
        .await??;

        info!(city_a = %city_a, city_b = %city_b, "Distance map rendered");
        Ok(DistanceOutcome::Rendered)
    }
}

/// Background, coastlines and optional feature layers in their fixed order.
fn draw_base(canvas: &mut Canvas, basemap: &Basemap, options: RenderOptions) {
    if options.fill_continents {
        canvas.fill(canvas::OCEAN);
        canvas.fill_polygons(&basemap.ocean, canvas::OCEAN, None);
        canvas.fill_polygons(&basemap.land, canvas::LAND, Some(canvas::OCEAN));
    } else {
        canvas.draw_stock_background(basemap.stock.as_ref());
    }

    canvas.stroke_layer(&basemap.coastline, canvas::COASTLINE, Stroke::Solid);

    if options.show_features {
        canvas.stroke_layer(&basemap.borders, canvas::BORDER, Stroke::DOTTED);
        canvas.stroke_layer(&basemap.states, canvas::STATE, Stroke::Solid);
        canvas.fill_polygons(&basemap.lakes, canvas::LAKE, None);
        canvas.stroke_layer(&basemap.rivers, canvas::RIVER, Stroke::Solid);
    }
}

fn new_canvas(font: Option<FontArc>) -> Canvas {
    Canvas::new(MAP_WIDTH, MAP_HEIGHT, font)
}

fn draw_city_map(
    basemap: &Basemap,
    font: Option<FontArc>,
    points: &[(String, Coordinates)],
    options: RenderOptions,
    with_legend: bool,
    path: &Path,
) -> Result<(), RenderError> {
    let mut canvas = new_canvas(font);
    draw_base(&mut canvas, basemap, options);

    let color = Rgb(options.marker_color.rgb());
    for (_, coords) in points {
        canvas.draw_marker(coords.lng, coords.lat, color);
    }

    if with_legend {
        let entries: Vec<(String, Rgb<u8>)> =
            points.iter().map(|(name, _)| (name.clone(), color)).collect();
        canvas.draw_legend(&entries);
    }

    canvas.save(path)
}

fn draw_distance_map(
    basemap: &Basemap,
    font: Option<FontArc>,
    (name_a, a): (&str, Coordinates),
    (name_b, b): (&str, Coordinates),
    options: RenderOptions,
    path: &Path,
) -> Result<(), RenderError> {
    let mut canvas = new_canvas(font);
    draw_base(&mut canvas, basemap, options);

    // Reference line sits under the arc and markers.
    let projection = canvas.projection();
    canvas.segment(
        projection.project_coords(a),
        projection.project_coords(b),
        canvas::REFERENCE_LINE,
        1,
        Stroke::DASHED,
        0.0,
    );

    let color = Rgb(options.marker_color.rgb());
    let arc: Vec<(f64, f64)> = great_circle(a, b, GREAT_CIRCLE_SEGMENTS)
        .into_iter()
        .map(|c| (c.lng, c.lat))
        .collect();
    canvas.stroke_path(&arc, color, DISTANCE_LINE_WIDTH, Stroke::Solid);
    canvas.draw_marker(a.lng, a.lat, color);
    canvas.draw_marker(b.lng, b.lat, color);

    let labeled_a = canvas.draw_label(
        a.lng - LABEL_OFFSET.0,
        a.lat + LABEL_OFFSET.1,
        name_a,
        Align::Right,
    );
    let labeled_b = canvas.draw_label(
        b.lng + LABEL_OFFSET.0,
        b.lat + LABEL_OFFSET.1,
        name_b,
        Align::Left,
    );
    if !(labeled_a && labeled_b) {
        debug!("No font loaded, distance labels omitted");
    }

    canvas.save(path)
}
