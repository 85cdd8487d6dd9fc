use crate::geometry::Point;

/// Terrain height lookup in the local planar frame.
///
/// Lookups may fail with NaN; callers treat that as zero.
pub trait GroundHeight {
    fn height(&self, point: Point) -> f64;
}

impl<F> GroundHeight for F
where
    F: Fn(Point) -> f64,
{
    fn height(&self, point: Point) -> f64 {
        self(point)
    }
}

/// Ground at the same height everywhere
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FlatGround(pub f64);

impl GroundHeight for FlatGround {
    fn height(&self, _point: Point) -> f64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closures_and_flat_ground() {
        let slope = |p: Point| p.x / 10.0;
        assert_eq!(slope.height(Point::new(50.0, 3.0)), 5.0);
        assert_eq!(FlatGround(12.0).height(Point::new(-4.0, 9.0)), 12.0);
    }
}
