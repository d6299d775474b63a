//! Raster drawing on a plate carrée canvas: background, layers, markers, legend and labels.

use std::path::Path;

use ab_glyph::{FontArc, PxScale};
use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut,
    draw_polygon_mut, draw_text_mut, text_size,
};
use imageproc::point::Point;
use imageproc::rect::Rect;

use crate::basemap::{Layer, Path2};
use crate::error::RenderError;
use crate::projection::PlateCarree;

pub const LAND: Rgb<u8> = Rgb([211, 211, 211]);
pub const OCEAN: Rgb<u8> = Rgb([173, 216, 230]);
pub const COASTLINE: Rgb<u8> = Rgb([0, 0, 0]);
pub const BORDER: Rgb<u8> = Rgb([0, 0, 0]);
pub const STATE: Rgb<u8> = Rgb([110, 110, 110]);
pub const LAKE: Rgb<u8> = Rgb([173, 216, 230]);
pub const RIVER: Rgb<u8> = Rgb([0, 0, 255]);
pub const REFERENCE_LINE: Rgb<u8> = Rgb([128, 128, 128]);
const LEGEND_BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const LEGEND_FRAME: Rgb<u8> = Rgb([80, 80, 80]);
const TEXT: Rgb<u8> = Rgb([0, 0, 0]);

pub const MARKER_RADIUS: i32 = 4;
const LEGEND_MARGIN: i32 = 10;
const LEGEND_ROW: i32 = 20;
const LEGEND_PADDING: i32 = 8;
const LEGEND_SWATCH: i32 = 24;
const FONT_SIZE: f32 = 15.0;

/// Stroke pattern for lines: solid, or (on, off) pixel runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stroke {
    Solid,
    Dashed { on: f32, off: f32 },
}

impl Stroke {
    pub const DOTTED: Stroke = Stroke::Dashed { on: 2.0, off: 3.0 };
    pub const DASHED: Stroke = Stroke::Dashed { on: 8.0, off: 5.0 };
}

/// Horizontal anchor of a text label relative to its point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

pub struct Canvas {
    image: RgbImage,
    projection: PlateCarree,
    font: Option<FontArc>,
}

impl Canvas {
    pub fn new(width: u32, height: u32, font: Option<FontArc>) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, OCEAN),
            projection: PlateCarree::new(width, height),
            font,
        }
    }

    pub fn projection(&self) -> PlateCarree {
        self.projection
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    /// Stretches `stock` over the canvas, or paints a latitude gradient when there is none.
    pub fn draw_stock_background(&mut self, stock: Option<&RgbImage>) {
        if let Some(stock) = stock {
            let (w, h) = self.image.dimensions();
            self.image = imageops::resize(stock, w, h, imageops::FilterType::Triangle);
            return;
        }

        let height = self.image.height();
        for (_, y, pixel) in self.image.enumerate_pixels_mut() {
            // 0.0 at the equator, 1.0 at either pole.
            let t = ((y as f32 / height as f32) - 0.5).abs() * 2.0;
            *pixel = Rgb([
                lerp(38, 226, t),
                lerp(86, 236, t),
                lerp(150, 244, t),
            ]);
        }
    }

    pub fn fill(&mut self, color: Rgb<u8>) {
        for pixel in self.image.pixels_mut() {
            *pixel = color;
        }
    }

    /// Fills every polygon's exterior ring with `color` and its holes with `hole_color`.
    pub fn fill_polygons(&mut self, layer: &Layer, color: Rgb<u8>, hole_color: Option<Rgb<u8>>) {
        for polygon in &layer.polygons {
            let mut rings = polygon.iter();
            if let Some(exterior) = rings.next() {
                self.fill_ring(exterior, color);
            }
            if let Some(hole_color) = hole_color {
                for hole in rings {
                    self.fill_ring(hole, hole_color);
                }
            }
        }
    }

    fn fill_ring(&mut self, ring: &Path2, color: Rgb<u8>) {
        let points = self.ring_points(ring);
        if points.len() >= 3 {
            draw_polygon_mut(&mut self.image, &points, color);
        }
    }

    /// Projected integer ring with consecutive duplicates and the closing point removed.
    fn ring_points(&self, ring: &Path2) -> Vec<Point<i32>> {
        let mut points: Vec<Point<i32>> = Vec::with_capacity(ring.len());
        for &(lng, lat) in ring {
            let (x, y) = self.projection.project(lng, lat);
            let point = Point::new(x.round() as i32, y.round() as i32);
            if points.last() != Some(&point) {
                points.push(point);
            }
        }
        while points.len() > 1 && points.first() == points.last() {
            points.pop();
        }
        points
    }

    /// Strokes every line of the layer and the outline of every polygon.
    pub fn stroke_layer(&mut self, layer: &Layer, color: Rgb<u8>, stroke: Stroke) {
        for line in &layer.lines {
            self.stroke_path(line, color, 1, stroke);
        }
        for polygon in &layer.polygons {
            for ring in polygon {
                self.stroke_path(ring, color, 1, stroke);
            }
        }
    }

    /// Strokes a (lng, lat) path. Segments that cross the antimeridian are skipped.
    pub fn stroke_path(&mut self, path: &Path2, color: Rgb<u8>, width: u32, stroke: Stroke) {
        let mut dash_offset = 0.0;
        for pair in path.windows(2) {
            let a = self.projection.project(pair[0].0, pair[0].1);
            let b = self.projection.project(pair[1].0, pair[1].1);
            if self.projection.wraps(a, b) {
                continue;
            }
            dash_offset = self.segment(a, b, color, width, stroke, dash_offset);
        }
    }

    /// Draws one pixel-space segment and returns the dash phase to continue with.
    pub fn segment(
        &mut self,
        a: (f32, f32),
        b: (f32, f32),
        color: Rgb<u8>,
        width: u32,
        stroke: Stroke,
        dash_offset: f32,
    ) -> f32 {
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let length = (dx * dx + dy * dy).sqrt();

        let (on, off) = match stroke {
            Stroke::Solid => {
                self.thick_line(a, b, color, width);
                return 0.0;
            }
            Stroke::Dashed { on, off } => (on, off),
        };
        if length == 0.0 {
            return dash_offset;
        }

        let period = on + off;
        let (ux, uy) = (dx / length, dy / length);
        let mut t = -dash_offset;
        while t < length {
            let start = t.max(0.0);
            let end = (t + on).min(length);
            if end > start {
                self.thick_line(
                    (a.0 + ux * start, a.1 + uy * start),
                    (a.0 + ux * end, a.1 + uy * end),
                    color,
                    width,
                );
            }
            t += period;
        }
        (dash_offset + length) % period
    }

    fn thick_line(&mut self, a: (f32, f32), b: (f32, f32), color: Rgb<u8>, width: u32) {
        let width = width.max(1);
        let (dx, dy) = (b.0 - a.0, b.1 - a.1);
        let length = (dx * dx + dy * dy).sqrt();
        let (nx, ny) = if length > 0.0 {
            (-dy / length, dx / length)
        } else {
            (0.0, 0.0)
        };

        let center = (width as f32 - 1.0) / 2.0;
        for k in 0..width {
            let offset = k as f32 - center;
            draw_line_segment_mut(
                &mut self.image,
                (a.0 + nx * offset, a.1 + ny * offset),
                (b.0 + nx * offset, b.1 + ny * offset),
                color,
            );
        }
    }

    /// Filled dot at (lng, lat).
    pub fn draw_marker(&mut self, lng: f64, lat: f64, color: Rgb<u8>) {
        let (x, y) = self.projection.project(lng, lat);
        draw_filled_circle_mut(
            &mut self.image,
            (x.round() as i32, y.round() as i32),
            MARKER_RADIUS,
            color,
        );
    }

    /// Text anchored at (lng, lat): the baseline sits on the point, `align` picks which end touches it.
    /// Without a font nothing is drawn and false is returned.
    pub fn draw_label(&mut self, lng: f64, lat: f64, text: &str, align: Align) -> bool {
        let Some(font) = self.font.as_ref() else {
            return false;
        };
        let scale = PxScale::from(FONT_SIZE);
        let (w, h) = text_size(scale, font, text);
        let (x, y) = self.projection.project(lng, lat);
        let left = match align {
            Align::Left => x,
            Align::Right => x - w as f32,
        };
        draw_text_mut(
            &mut self.image,
            TEXT,
            left.round() as i32,
            (y - h as f32).round() as i32,
            scale,
            font,
            text,
        );
        true
    }

    /// Upper-left legend: one row per entry with a colour swatch and, when a font is loaded, the label.
    pub fn draw_legend(&mut self, entries: &[(String, Rgb<u8>)]) {
        if entries.is_empty() {
            return;
        }
        let scale = PxScale::from(FONT_SIZE);

        let text_width = match self.font.as_ref() {
            Some(font) => entries
                .iter()
                .map(|(label, _)| text_size(scale, font, label).0 as i32)
                .max()
                .unwrap_or(0),
            None => 0,
        };

        let max_height = self.image.height() as i32 - 2 * LEGEND_MARGIN;
        let rows = (entries.len() as i32).min((max_height - 2 * LEGEND_PADDING) / LEGEND_ROW).max(1);
        let width = LEGEND_SWATCH + text_width + LEGEND_PADDING;
        let height = rows * LEGEND_ROW + 2 * LEGEND_PADDING;

        let frame = Rect::at(LEGEND_MARGIN, LEGEND_MARGIN).of_size(width as u32, height as u32);
        draw_filled_rect_mut(&mut self.image, frame, LEGEND_BACKGROUND);
        draw_hollow_rect_mut(&mut self.image, frame, LEGEND_FRAME);

        for (row, (label, color)) in entries.iter().take(rows as usize).enumerate() {
            let top = LEGEND_MARGIN + LEGEND_PADDING + row as i32 * LEGEND_ROW;
            let middle = top + LEGEND_ROW / 2;
            draw_filled_circle_mut(
                &mut self.image,
                (LEGEND_MARGIN + LEGEND_SWATCH / 2, middle),
                MARKER_RADIUS,
                *color,
            );
            if let Some(font) = self.font.as_ref() {
                let (_, h) = text_size(scale, font, label);
                draw_text_mut(
                    &mut self.image,
                    TEXT,
                    LEGEND_MARGIN + LEGEND_SWATCH,
                    middle - h as i32 / 2,
                    scale,
                    font,
                    label,
                );
            }
        }
    }

    /// Writes the canvas; the format follows the file extension (PNG for `.png`).
    pub fn save(&self, path: &Path) -> Result<(), RenderError> {
        self.image.save(path)?;
        Ok(())
    }
}

fn lerp(from: u8, to: u8, t: f32) -> u8 {
    (from as f32 + (to as f32 - from as f32) * t.clamp(0.0, 1.0)).round() as u8
}
