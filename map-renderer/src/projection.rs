//! Plate carrée (equirectangular) projection over the whole globe, plus great-circle interpolation.

use citymap_core::Coordinates;

/// Maps longitude [-180, 180] to x in [0, width) and latitude [90, -90] to y in [0, height).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateCarree {
    pub width: u32,
    pub height: u32,
}

impl PlateCarree {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel position of a (lng, lat) pair, clamped to the canvas.
    pub fn project(&self, lng: f64, lat: f64) -> (f32, f32) {
        let w = self.width as f64;
        let h = self.height as f64;
        let x = ((lng + 180.0) / 360.0 * w).clamp(0.0, w - 1.0);
        let y = ((90.0 - lat) / 180.0 * h).clamp(0.0, h - 1.0);
        (x as f32, y as f32)
    }

    pub fn project_coords(&self, coords: Coordinates) -> (f32, f32) {
        self.project(coords.lng, coords.lat)
    }

    /// True when a segment between two projected points wraps around the antimeridian
    /// and must not be drawn straight across the map.
    pub fn wraps(&self, a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() > self.width as f32 / 2.0
    }
}

const DEGENERATE_DOT_EPSILON: f64 = 1e-12;

fn to_unit_vector(c: Coordinates) -> [f64; 3] {
    let lat = c.lat.to_radians();
    let lng = c.lng.to_radians();
    [lat.cos() * lng.cos(), lat.cos() * lng.sin(), lat.sin()]
}

fn from_unit_vector(v: [f64; 3]) -> Coordinates {
    let lat = v[2].clamp(-1.0, 1.0).asin().to_degrees();
    let lng = v[1].atan2(v[0]).to_degrees();
    Coordinates::new(lat, lng)
}

/// Points along the shorter great-circle arc from `a` to `b`, endpoints included.
/// `segments` is the number of steps; at least one is used.
pub fn great_circle(a: Coordinates, b: Coordinates, segments: usize) -> Vec<Coordinates> {
    let segments = segments.max(1);
    let va = to_unit_vector(a);
    let vb = to_unit_vector(b);
    let dot = (va[0] * vb[0] + va[1] * vb[1] + va[2] * vb[2]).clamp(-1.0, 1.0);

    // Coincident or antipodal endpoints have no unique arc; fall back to the endpoints.
    // Checked on the dot product: acos near 1.0 is too coarse to compare against a small epsilon.
    if dot.abs() >= 1.0 - DEGENERATE_DOT_EPSILON {
        return vec![a, b];
    }

    let omega = dot.acos();

    let sin_omega = omega.sin();
    (0..=segments)
        .map(|i| {
            let t = i as f64 / segments as f64;
            let ka = ((1.0 - t) * omega).sin() / sin_omega;
            let kb = (t * omega).sin() / sin_omega;
            from_unit_vector([
                ka * va[0] + kb * vb[0],
                ka * va[1] + kb * vb[1],
                ka * va[2] + kb * vb[2],
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_corners_and_center() {
        let p = PlateCarree::new(1000, 500);
        assert_eq!(p.project(0.0, 0.0), (500.0, 250.0));
        assert_eq!(p.project(-180.0, 90.0), (0.0, 0.0));
        assert_eq!(p.project(180.0, -90.0), (999.0, 499.0));
    }

    #[test]
    fn test_project_paris() {
        let p = PlateCarree::new(1000, 500);
        let (x, y) = p.project_coords(Coordinates::new(48.85, 2.35));
        assert!((x - 506.53).abs() < 0.01);
        assert!((y - 114.31).abs() < 0.01);
    }

    #[test]
    fn test_wraps_detects_antimeridian_jump() {
        let p = PlateCarree::new(1000, 500);
        let west = p.project(-179.0, 0.0);
        let east = p.project(179.0, 0.0);
        assert!(p.wraps(west, east));
        assert!(!p.wraps(p.project(0.0, 0.0), p.project(10.0, 0.0)));
    }

    #[test]
    fn test_great_circle_endpoints() {
        let tokyo = Coordinates::new(35.6897, 139.6922);
        let london = Coordinates::new(51.5072, -0.1275);
        let points = great_circle(tokyo, london, 50);

        assert_eq!(points.len(), 51);
        let first = points[0];
        let last = points[50];
        assert!((first.lat - tokyo.lat).abs() < 1e-6 && (first.lng - tokyo.lng).abs() < 1e-6);
        assert!((last.lat - london.lat).abs() < 1e-6 && (last.lng - london.lng).abs() < 1e-6);
    }

    #[test]
    fn test_great_circle_bends_poleward() {
        // Two points on the same parallel: the arc's midpoint lies closer to the pole.
        let a = Coordinates::new(45.0, -60.0);
        let b = Coordinates::new(45.0, 60.0);
        let points = great_circle(a, b, 2);
        assert!(points[1].lat > 45.0);
        assert!(points[1].lng.abs() < 1e-6);
    }

    #[test]
    fn test_great_circle_same_point() {
        let a = Coordinates::new(10.0, 10.0);
        assert_eq!(great_circle(a, a, 10), vec![a, a]);
    }

    #[test]
    fn test_great_circle_same_point_awkward_coordinates() {
        // Dot products of these round to just below 1.0.
        for a in [
            Coordinates::new(35.6897, 139.6922),
            Coordinates::new(-33.8688, 151.2093),
            Coordinates::new(48.85, 2.35),
        ] {
            assert_eq!(great_circle(a, a, 100), vec![a, a]);
        }
    }

    #[test]
    fn test_great_circle_antipodal_points() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(0.0, 180.0);
        assert_eq!(great_circle(a, b, 10), vec![a, b]);
    }
}
