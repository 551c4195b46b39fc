// src/utils/geometry.rs

use serde::{Deserialize, Serialize};

/// A 2D point in plan coordinates (pixels of the background plan image).
///
/// Serialized as a `[x, y]` pair to match the coordinate arrays both input
/// formats carry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// The point rotated rigidly about `center` by `degrees`, using the
    /// standard 2D rotation matrix.
    pub fn rotated_about(&self, center: &Point2D, degrees: f64) -> Point2D {
        if degrees == 0.0 {
            return *self;
        }
        let theta = degrees.to_radians();
        let (sin, cos) = theta.sin_cos();
        let dx = self.x - center.x;
        let dy = self.y - center.y;
        Point2D::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
    }
}

impl From<(f64, f64)> for Point2D {
    fn from((x, y): (f64, f64)) -> Self {
        Point2D::new(x, y)
    }
}

impl From<Point2D> for (f64, f64) {
    fn from(point: Point2D) -> Self {
        (point.x, point.y)
    }
}

/// Axis-aligned bounding box accumulated from a point stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Bounds of the given points. Non-finite coordinates are skipped; when
    /// none survive there is no box.
    pub fn from_points<'a, I>(points: I) -> Option<BoundingBox>
    where
        I: IntoIterator<Item = &'a Point2D>,
    {
        let mut bounds: Option<BoundingBox> = None;
        for point in points {
            if !point.is_finite() {
                continue;
            }
            match bounds.as_mut() {
                None => {
                    bounds = Some(BoundingBox {
                        min_x: point.x,
                        min_y: point.y,
                        max_x: point.x,
                        max_y: point.y,
                    });
                }
                Some(b) => {
                    b.min_x = b.min_x.min(point.x);
                    b.min_y = b.min_y.min(point.y);
                    b.max_x = b.max_x.max(point.x);
                    b.max_y = b.max_y.max(point.y);
                }
            }
        }
        bounds
    }

    /// The box midpoint. This is the centroid approximation the whole model
    /// uses; it is not an area-weighted centroid.
    pub fn midpoint(&self) -> Point2D {
        Point2D::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }
}

/// Polygon ring area by the shoelace formula. `None` for rings with fewer
/// than 3 points or non-finite coordinates.
pub fn polygon_area(ring: &[Point2D]) -> Option<f64> {
    if ring.len() < 3 || ring.iter().any(|p| !p.is_finite()) {
        return None;
    }
    let mut area = 0.0;
    for i in 0..ring.len() {
        let j = (i + 1) % ring.len();
        area += ring[i].x * ring[j].y;
        area -= ring[j].x * ring[i].y;
    }
    Some(area.abs() / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_rotation_preserves_distance() {
        let center = Point2D::new(3.0, 7.0);
        let a = Point2D::new(10.0, 2.0);
        let b = Point2D::new(-4.0, 5.5);
        let before = a.distance_to(&b);
        let after = a
            .rotated_about(&center, 37.0)
            .distance_to(&b.rotated_about(&center, 37.0));
        assert_approx_eq!(before, after, 1e-9);
    }

    #[test]
    fn test_rotation_quarter_turn() {
        let center = Point2D::new(0.0, 0.0);
        let p = Point2D::new(1.0, 0.0).rotated_about(&center, 90.0);
        assert_approx_eq!(p.x, 0.0, 1e-12);
        assert_approx_eq!(p.y, 1.0, 1e-12);
    }

    #[test]
    fn test_bounds_skip_non_finite() {
        let points = vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(f64::NAN, 100.0),
            Point2D::new(10.0, 4.0),
        ];
        let bounds = BoundingBox::from_points(&points).unwrap();
        assert_eq!(bounds.max_x, 10.0);
        assert_eq!(bounds.max_y, 4.0);
        let mid = bounds.midpoint();
        assert_eq!(mid, Point2D::new(5.0, 2.0));
    }

    #[test]
    fn test_bounds_of_nothing() {
        let points = vec![Point2D::new(f64::NAN, f64::NAN)];
        assert!(BoundingBox::from_points(&points).is_none());
    }

    #[test]
    fn test_shoelace_area() {
        let square = vec![
            Point2D::new(0.0, 0.0),
            Point2D::new(10.0, 0.0),
            Point2D::new(10.0, 10.0),
            Point2D::new(0.0, 10.0),
        ];
        assert_approx_eq!(polygon_area(&square).unwrap(), 100.0, 1e-9);
        assert!(polygon_area(&square[..2]).is_none());
    }
}
