//! Geometric queries against the connections of a track network.

mod distance;

pub use distance::Distance;

use crate::error::NetworkError;
use crate::geometry::{line_segments_intersect, Point, Rect};
use crate::models::{Connection, ConnectionId, Connections, Subnetwork, TrackNetwork};

/// Extension trait for proximity queries on `TrackNetwork`
pub trait ProximityQuery {
    /// Connection nearest to `point`, optionally restricted to one subnetwork
    fn closest(&self, point: Point, subnetwork: Option<Subnetwork>) -> Option<ConnectionId>;

    /// Connections `point` lies next to: at most `max_sideward` across and at most
    /// `max_forward` beyond either end
    fn within(
        &self,
        point: Point,
        subnetwork: Option<Subnetwork>,
        max_sideward: f64,
        max_forward: f64,
    ) -> Vec<ConnectionId>;

    /// Connections whose segment intersects `connection`, ignoring the ones it shares a node with
    fn crossing(&self, connection: ConnectionId) -> Vec<ConnectionId>;

    /// Decompose `point` relative to `connection`
    ///
    /// # Errors
    ///
    /// Returns an error if the connection is not part of the network
    fn distances(&self, point: Point, connection: ConnectionId) -> Result<Distance, NetworkError>;
}

fn in_subnetwork(connection: &Connection, subnetwork: Option<Subnetwork>) -> bool {
    subnetwork.is_none_or(|s| connection.track_type.subnetwork == s)
}

impl ProximityQuery for TrackNetwork {
    fn closest(&self, point: Point, subnetwork: Option<Subnetwork>) -> Option<ConnectionId> {
        self.connections()
            .filter(|c| in_subnetwork(c, subnetwork))
            .map(|c| (c.id, Distance::to_connection(point, c).rating()))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    fn within(
        &self,
        point: Point,
        subnetwork: Option<Subnetwork>,
        max_sideward: f64,
        max_forward: f64,
    ) -> Vec<ConnectionId> {
        let area = Rect::around(point, max_sideward.max(max_forward));
        self.connections_in(&area)
            .into_iter()
            .filter(|&id| {
                self.connection(id).is_some_and(|c| {
                    if !in_subnetwork(c, subnetwork) {
                        return false;
                    }
                    let d = Distance::to_connection(point, c);
                    d.sideward.abs() <= max_sideward && d.overhead <= max_forward
                })
            })
            .collect()
    }

    fn crossing(&self, connection: ConnectionId) -> Vec<ConnectionId> {
        let Some(this) = self.connection(connection) else {
            return Vec::new();
        };
        self.connections_in(&this.bounds())
            .into_iter()
            .filter(|&id| {
                self.connection(id).is_some_and(|other| {
                    other.id != this.id
                        && !other.touches(this.start())
                        && !other.touches(this.end())
                        && line_segments_intersect(
                            this.start_point(),
                            this.end_point(),
                            other.start_point(),
                            other.end_point(),
                        )
                })
            })
            .collect()
    }

    fn distances(&self, point: Point, connection: ConnectionId) -> Result<Distance, NetworkError> {
        self.connection(connection)
            .map(|c| Distance::to_connection(point, c))
            .ok_or(NetworkError::UnknownConnection(connection))
    }
}
