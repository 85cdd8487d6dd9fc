use indexmap::map::Values;

use super::TrackNetwork;
use crate::error::NetworkError;
use crate::geometry::{direction_between, Rect};
use crate::height::ElevationSource;
use crate::models::id::{ConnectionId, NodeId};
use crate::models::track::{Connection, HeightPlane, HeightType, TrackType};

/// Extension trait for connection-related operations on `TrackNetwork`
pub trait Connections {
    /// Connect two nodes with a default rail connection; adds no height rules
    ///
    /// # Errors
    ///
    /// Returns an error if either node is not part of the network or both are the same node
    fn connect(&mut self, start: NodeId, end: NodeId) -> Result<ConnectionId, NetworkError>;

    /// Connect two nodes with the given track and height type
    ///
    /// # Errors
    ///
    /// Returns an error if either node is not part of the network or both are the same node
    fn connect_typed(
        &mut self,
        start: NodeId,
        end: NodeId,
        track_type: TrackType,
        height_type: HeightType,
        height_plane: Option<HeightPlane>,
    ) -> Result<ConnectionId, NetworkError>;

    /// Get connection by id
    fn connection(&self, id: ConnectionId) -> Option<&Connection>;

    /// Get mutable connection by id
    fn connection_mut(&mut self, id: ConnectionId) -> Option<&mut Connection>;

    /// All connections in creation order
    fn connections(&self) -> Values<'_, ConnectionId, Connection>;

    /// Connections whose bounds intersect `rect`, in creation order
    fn connections_in(&self, rect: &Rect) -> Vec<ConnectionId>;

    /// Distinct track types in use, in order of first use
    fn used_track_types(&self) -> Vec<TrackType>;

    /// Height change per metre from start to end, `None` while an endpoint has no elevation
    fn incline(&self, id: ConnectionId) -> Option<f64>;

    /// Whether either endpoint has an elevation
    fn is_height_set(&self, id: ConnectionId) -> bool;
}

impl Connections for TrackNetwork {
    fn connect(&mut self, start: NodeId, end: NodeId) -> Result<ConnectionId, NetworkError> {
        self.connect_typed(start, end, TrackType::default(), HeightType::default(), None)
    }

    fn connect_typed(
        &mut self,
        start: NodeId,
        end: NodeId,
        track_type: TrackType,
        height_type: HeightType,
        height_plane: Option<HeightPlane>,
    ) -> Result<ConnectionId, NetworkError> {
        if start == end {
            return Err(NetworkError::SelfLoop(start));
        }
        let start_point = self
            .nodes
            .get(&start)
            .ok_or(NetworkError::UnknownNode(start))?
            .position()
            .point;
        let end_point = self
            .nodes
            .get(&end)
            .ok_or(NetworkError::UnknownNode(end))?
            .position()
            .point;

        let id = ConnectionId(self.connection_ids.next_id());
        let mut connection = Connection::new(id, (start, start_point), (end, end_point));
        connection.track_type = track_type;
        connection.height_type = height_type;
        connection.height_plane = height_plane;

        if let Some(node) = self.nodes.get_mut(&start) {
            node.attach(id, direction_between(start_point, end_point));
        }
        if let Some(node) = self.nodes.get_mut(&end) {
            node.attach(id, direction_between(end_point, start_point));
        }

        self.connection_tree.insert(connection.bounds(), id);
        self.connections.insert(id, connection);
        Ok(id)
    }

    fn connection(&self, id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&id)
    }

    fn connection_mut(&mut self, id: ConnectionId) -> Option<&mut Connection> {
        self.connections.get_mut(&id)
    }

    fn connections(&self) -> Values<'_, ConnectionId, Connection> {
        self.connections.values()
    }

    fn connections_in(&self, rect: &Rect) -> Vec<ConnectionId> {
        let mut found: Vec<ConnectionId> = self.connection_tree.query(rect).into_iter().copied().collect();
        found.sort_unstable();
        found
    }

    fn used_track_types(&self) -> Vec<TrackType> {
        let mut used: Vec<TrackType> = Vec::new();
        for connection in self.connections.values() {
            if !used.iter().any(|t| t.id == connection.track_type.id) {
                used.push(connection.track_type);
            }
        }
        used
    }

    fn incline(&self, id: ConnectionId) -> Option<f64> {
        let connection = self.connections.get(&id)?;
        let start = self.elevation(connection.start())?;
        let end = self.elevation(connection.end())?;
        Some((end - start) / connection.length())
    }

    fn is_height_set(&self, id: ConnectionId) -> bool {
        self.connections.get(&id).is_some_and(|connection| {
            self.elevation(connection.start()).is_some() || self.elevation(connection.end()).is_some()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Position};
    use crate::models::track_network::test_support::{node, rail};
    use crate::models::{Nodes, Subnetwork};

    #[test]
    fn test_connect_registers_with_both_nodes() {
        let mut network = TrackNetwork::new();
        let a = node(&mut network, 0.0, 0.0);
        let b = node(&mut network, 10.0, 0.0);

        let c = rail(&mut network, a, b);

        assert_eq!(network.connection_count(), 1);
        let connection = network.connection(c).expect("connection exists");
        assert_eq!((connection.start(), connection.end()), (a, b));
        assert_eq!(connection.length(), 10.0);
        assert_eq!(network.node(a).expect("exists").forward(), &[c]);
        assert_eq!(network.node(b).expect("exists").forward(), &[c]);
    }

    #[test]
    fn test_connect_rejects_unknown_nodes() {
        let mut network = TrackNetwork::new();
        let a = node(&mut network, 0.0, 0.0);

        assert_eq!(network.connect(a, NodeId(5)), Err(NetworkError::UnknownNode(NodeId(5))));
        assert_eq!(network.connect(NodeId(6), a), Err(NetworkError::UnknownNode(NodeId(6))));
        assert_eq!(network.connect(a, a), Err(NetworkError::SelfLoop(a)));
        assert_eq!(network.connection_count(), 0);
        assert_eq!(network.node(a).expect("exists").connection_count(), 0);
    }

    #[test]
    fn test_directions_at_both_ends_are_opposite() {
        let mut network = TrackNetwork::new();
        let a = node(&mut network, 0.0, 0.0);
        let b = node(&mut network, 3.0, 4.0);
        let c = rail(&mut network, a, b);

        let at_a = network.node(a).and_then(|n| n.direction_of(c)).expect("attached");
        let at_b = network.node(b).and_then(|n| n.direction_of(c)).expect("attached");
        assert!((crate::geometry::angle_difference(at_a, at_b) - std::f64::consts::PI).abs() < 1e-10);
    }

    #[test]
    fn test_connections_in_rect() {
        let mut network = TrackNetwork::new();
        let a = node(&mut network, 0.0, 0.0);
        let b = node(&mut network, 10.0, 0.0);
        let c = node(&mut network, 100.0, 100.0);
        let d = node(&mut network, 110.0, 100.0);
        let near = rail(&mut network, a, b);
        let far = rail(&mut network, c, d);

        let rect = Rect::around(Point::new(5.0, 1.0), 2.0);
        assert_eq!(network.connections_in(&rect), vec![near]);
        let rect = Rect::around(Point::new(50.0, 50.0), 60.0);
        assert_eq!(network.connections_in(&rect), vec![near, far]);
    }

    #[test]
    fn test_incline_and_height_set() {
        let mut network = TrackNetwork::new();
        let a = network.add_node(Position::new(0.0, 0.0));
        let b = network.add_node(Position::new(100.0, 0.0));
        let c = rail(&mut network, a, b);

        assert!(!network.is_height_set(c));
        assert_eq!(network.incline(c), None);

        network.set_elevation(b, 2.0).expect("exists");
        assert!(network.is_height_set(c));
        assert_eq!(network.incline(c), None);

        network.set_elevation(a, 1.0).expect("exists");
        assert_eq!(network.incline(c), Some(0.01));
    }

    #[test]
    fn test_used_track_types_are_distinct() {
        let mut network = TrackNetwork::new();
        let a = node(&mut network, 0.0, 0.0);
        let b = node(&mut network, 10.0, 0.0);
        let c = node(&mut network, 20.0, 0.0);
        let street = TrackType::new(7, Subnetwork::Street);
        network.connect_typed(a, b, street, HeightType::OnGround, None).expect("nodes exist");
        network.connect_typed(b, c, street, HeightType::OnGround, None).expect("nodes exist");
        rail(&mut network, a, c);

        let used = network.used_track_types();
        assert_eq!(used.len(), 2);
        assert_eq!(used[0], street);
        assert_eq!(used[1], TrackType::default());
    }
}
