use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use crate::error::GeometryError;

/// A point in the local planar frame, in metres.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A planar point with an optional elevation.
///
/// The elevation is never changed in place: [`Position::with_elevation`]
/// returns a new value and the owner swaps it in.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub point: Point,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
}

impl Position {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            point: Point::new(x, y),
            elevation: None,
        }
    }

    #[must_use]
    pub const fn x(&self) -> f64 {
        self.point.x
    }

    #[must_use]
    pub const fn y(&self) -> f64 {
        self.point.y
    }

    #[must_use]
    pub const fn with_elevation(self, elevation: f64) -> Self {
        Self {
            point: self.point,
            elevation: Some(elevation),
        }
    }
}

impl From<Point> for Position {
    fn from(point: Point) -> Self {
        Self {
            point,
            elevation: None,
        }
    }
}

/// Axis-aligned rectangle with inclusive edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
}

impl Rect {
    /// Create a rectangle from its corners
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::InvertedRect`] if a max coordinate is below its min
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Result<Self, GeometryError> {
        if max_x < min_x || max_y < min_y {
            return Err(GeometryError::InvertedRect { min_x, min_y, max_x, max_y });
        }
        Ok(Self { min_x, min_y, max_x, max_y })
    }

    /// Smallest rectangle holding both points
    #[must_use]
    pub fn spanning(a: Point, b: Point) -> Self {
        Self {
            min_x: a.x.min(b.x),
            min_y: a.y.min(b.y),
            max_x: a.x.max(b.x),
            max_y: a.y.max(b.y),
        }
    }

    /// Square of half-side `radius` centred on `center`
    #[must_use]
    pub fn around(center: Point, radius: f64) -> Self {
        let radius = radius.abs();
        Self {
            min_x: center.x - radius,
            min_y: center.y - radius,
            max_x: center.x + radius,
            max_y: center.y + radius,
        }
    }

    /// Smallest rectangle holding every point
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::EmptyPointSet`] if `points` is empty
    pub fn bounds(points: &[Point]) -> Result<Self, GeometryError> {
        let (first, rest) = points.split_first().ok_or(GeometryError::EmptyPointSet)?;
        Ok(rest
            .iter()
            .fold(Self::spanning(*first, *first), |rect, p| rect.union(&Self::spanning(*p, *p))))
    }

    #[must_use]
    pub const fn min_x(&self) -> f64 {
        self.min_x
    }

    #[must_use]
    pub const fn min_y(&self) -> f64 {
        self.min_y
    }

    #[must_use]
    pub const fn max_x(&self) -> f64 {
        self.max_x
    }

    #[must_use]
    pub const fn max_y(&self) -> f64 {
        self.max_y
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    #[must_use]
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// Perimeter of the rectangle
    #[must_use]
    pub fn margin(&self) -> f64 {
        2.0 * self.width() + 2.0 * self.height()
    }

    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x && point.x <= self.max_x && point.y >= self.min_y && point.y <= self.max_y
    }

    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        !(other.min_x > self.max_x
            || other.max_x < self.min_x
            || other.min_y > self.max_y
            || other.max_y < self.min_y)
    }

    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Overlapping part of both rectangles, `None` if they are disjoint
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        if !self.intersects(other) {
            return None;
        }
        Some(Self {
            min_x: self.min_x.max(other.min_x),
            min_y: self.min_y.max(other.min_y),
            max_x: self.max_x.min(other.max_x),
            max_y: self.max_y.min(other.max_y),
        })
    }
}

/// Calculates the shortest angular distance between two angles in radians.
///
/// Returns a value in the range [0, π], representing the smallest angle
/// between the two input angles when considering the circular nature of angles.
/// Inputs may lie outside [−π, π]; they are reduced modulo 2π first.
///
/// # Examples
/// ```
/// use railbed::geometry::angle_difference;
/// use std::f64::consts::PI;
///
/// // Angles close together
/// let diff = angle_difference(0.1, 0.2);
/// assert!((diff - 0.1).abs() < 1e-10);
///
/// // Angles wrapping around (350° and 10° are only 20° apart)
/// let diff = angle_difference(350.0 * PI / 180.0, 10.0 * PI / 180.0);
/// assert!((diff - 20.0 * PI / 180.0).abs() < 1e-10);
/// ```
#[must_use]
pub fn angle_difference(a1: f64, a2: f64) -> f64 {
    let diff = (a1 - a2).rem_euclid(2.0 * PI);
    if diff > PI {
        2.0 * PI - diff
    } else {
        diff
    }
}

/// Deviation of `direction` from the line through `axis`, ignoring which way
/// either points. Always in [0, π/2].
#[must_use]
pub fn axis_deviation(direction: f64, axis: f64) -> f64 {
    let diff = (direction - axis).rem_euclid(PI);
    diff.min(PI - diff)
}

/// Direction in radians under which `to` sees `from`, i.e. `atan2(from - to)`.
#[must_use]
pub fn direction_between(from: Point, to: Point) -> f64 {
    (from.y - to.y).atan2(from.x - to.x)
}

/// Computes the 2D cross product to determine the orientation of a point relative to a line.
///
/// Returns a positive value if the point is to the left of the line (counter-clockwise),
/// negative if to the right (clockwise), and zero if collinear.
#[must_use]
pub fn cross_product_2d(line_start: Point, line_end: Point, point: Point) -> f64 {
    (line_end.x - line_start.x) * (point.y - line_start.y)
        - (line_end.y - line_start.y) * (point.x - line_start.x)
}

/// Checks if two line segments intersect.
///
/// Touching endpoints and collinear overlap count as an intersection.
#[must_use]
pub fn line_segments_intersect(a1: Point, a2: Point, b1: Point, b2: Point) -> bool {
    let d1 = cross_product_2d(b1, b2, a1);
    let d2 = cross_product_2d(b1, b2, a2);
    let d3 = cross_product_2d(a1, a2, b1);
    let d4 = cross_product_2d(a1, a2, b2);

    if ((d1 > 0.0 && d2 < 0.0) || (d1 < 0.0 && d2 > 0.0))
        && ((d3 > 0.0 && d4 < 0.0) || (d3 < 0.0 && d4 > 0.0))
    {
        return true;
    }

    (d1 == 0.0 && on_segment(b1, b2, a1))
        || (d2 == 0.0 && on_segment(b1, b2, a2))
        || (d3 == 0.0 && on_segment(a1, a2, b1))
        || (d4 == 0.0 && on_segment(a1, a2, b2))
}

/// Whether a point known to be collinear with a segment lies within its extent
fn on_segment(seg_start: Point, seg_end: Point, point: Point) -> bool {
    Rect::spanning(seg_start, seg_end).contains(point)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_rejects_inverted_corners() {
        assert!(Rect::new(0.0, 0.0, 1.0, 1.0).is_ok());
        assert!(matches!(
            Rect::new(2.0, 0.0, 1.0, 1.0),
            Err(GeometryError::InvertedRect { .. })
        ));
        assert!(Rect::new(0.0, 3.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_bounds_of_points() {
        let rect = Rect::bounds(&[Point::new(3.0, -1.0), Point::new(-2.0, 4.0), Point::new(0.0, 0.0)])
            .expect("non-empty point set");
        assert_eq!(rect.min_x(), -2.0);
        assert_eq!(rect.min_y(), -1.0);
        assert_eq!(rect.max_x(), 3.0);
        assert_eq!(rect.max_y(), 4.0);

        assert_eq!(Rect::bounds(&[]), Err(GeometryError::EmptyPointSet));
    }

    #[test]
    fn test_rect_intersection_and_margin() {
        let a = Rect::spanning(Point::new(0.0, 0.0), Point::new(4.0, 2.0));
        let b = Rect::spanning(Point::new(3.0, 1.0), Point::new(6.0, 5.0));
        let c = Rect::spanning(Point::new(10.0, 10.0), Point::new(11.0, 11.0));

        assert_eq!(a.margin(), 12.0);
        assert_eq!(a.intersection(&b).map(|r| r.area()), Some(1.0));
        assert!(a.intersection(&c).is_none());
        assert_eq!(a.union(&c).area(), 11.0 * 11.0);
    }

    #[test]
    fn test_edges_are_inclusive() {
        let a = Rect::spanning(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        let b = Rect::spanning(Point::new(1.0, 1.0), Point::new(2.0, 2.0));
        assert!(a.intersects(&b));
        assert_eq!(a.intersection(&b).map(|r| r.area()), Some(0.0));
    }

    #[test]
    fn test_angle_difference_outside_principal_range() {
        assert!((angle_difference(3.0 * PI, 0.0) - PI).abs() < 1e-10);
        assert!((angle_difference(-0.1, 2.0 * PI + 0.1) - 0.2).abs() < 1e-10);
    }

    #[test]
    fn test_axis_deviation_ignores_orientation() {
        assert!(axis_deviation(PI, 0.0) < 1e-10);
        assert!((axis_deviation(PI / 2.0, 0.0) - PI / 2.0).abs() < 1e-10);
        assert!((axis_deviation(PI + 0.2, 0.0) - 0.2).abs() < 1e-10);
        assert!((axis_deviation(-0.2, 0.0) - 0.2).abs() < 1e-10);
    }

    #[test]
    fn test_segments_crossing() {
        let hit = line_segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(10.0, 0.0),
        );
        assert!(hit);

        let miss = line_segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(5.0, 0.0),
            Point::new(6.0, -1.0),
        );
        assert!(!miss);
    }

    #[test]
    fn test_segments_touching_and_collinear() {
        // Shared endpoint
        assert!(line_segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 1.0),
        ));
        // Collinear overlap
        assert!(line_segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(6.0, 0.0),
        ));
        // Collinear but apart
        assert!(!line_segments_intersect(
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(3.0, 0.0),
        ));
    }

    #[test]
    fn test_direction_between() {
        let d = direction_between(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
        assert!((d.abs() - PI).abs() < 1e-10);
        let d = direction_between(Point::new(0.0, 5.0), Point::new(0.0, 0.0));
        assert!((d - PI / 2.0).abs() < 1e-10);
    }
}
