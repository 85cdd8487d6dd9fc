use crate::geometry::Point;
use crate::models::Connection;

/// Position of a point relative to a connection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Distance {
    /// Along the connection, measured from its start
    pub forward: f64,
    /// Across the connection, positive on the left when looking from start to end
    pub sideward: f64,
    /// How far `forward` lies outside `[0, length]`
    pub overhead: f64,
}

impl Distance {
    /// Decompose `point` relative to the segment `start` → `end`.
    ///
    /// A zero-length segment is treated as pointing along the x axis.
    #[must_use]
    pub fn between(point: Point, start: Point, end: Point) -> Self {
        let length = start.distance(end);
        let (dx, dy) = if length > 0.0 {
            ((end.x - start.x) / length, (end.y - start.y) / length)
        } else {
            (1.0, 0.0)
        };
        let px = point.x - start.x;
        let py = point.y - start.y;

        let forward = px * dx + py * dy;
        let sideward = dx * py - dy * px;
        let overhead = (-forward).max(0.0) + (forward - length).max(0.0);
        Self {
            forward,
            sideward,
            overhead,
        }
    }

    #[must_use]
    pub fn to_connection(point: Point, connection: &Connection) -> Self {
        Self::between(point, connection.start_point(), connection.end_point())
    }

    /// Squared distance to the segment as used for ranking candidates
    #[must_use]
    pub fn rating(&self) -> f64 {
        self.overhead * self.overhead + self.sideward * self.sideward
    }
}
