use super::TrackNetwork;
use crate::constants::STRAIGHT_LENGTH_FACTOR;
use crate::models::id::{ConnectionId, NodeId};
use crate::models::track::Connection;

/// Extension trait flagging connections that should be drawn straight
pub trait Straightness {
    /// Recompute the `straight` flag of every connection and return how many are straight.
    ///
    /// A connection is straight when one of its ends does not continue into exactly
    /// one other connection, or when it is much longer than both of its continuations.
    fn classify_straightness(&mut self) -> usize;
}

impl Straightness for TrackNetwork {
    fn classify_straightness(&mut self) -> usize {
        let decisions: Vec<(ConnectionId, bool)> = self
            .connections
            .values()
            .map(|c| {
                let scaled = c.length() / STRAIGHT_LENGTH_FACTOR;
                let straight = match (
                    self.continuation_length(c.start(), c.id),
                    self.continuation_length(c.end(), c.id),
                ) {
                    (Some(start), Some(end)) => scaled > start && scaled > end,
                    _ => true,
                };
                (c.id, straight)
            })
            .collect();

        let mut count = 0;
        for (id, straight) in decisions {
            if let Some(connection) = self.connections.get_mut(&id) {
                connection.straight = straight;
                count += usize::from(straight);
            }
        }
        count
    }
}

impl TrackNetwork {
    /// Length of the single connection continuing `connection` at `node`
    fn continuation_length(&self, node: NodeId, connection: ConnectionId) -> Option<f64> {
        match self.nodes.get(&node)?.opposite_tracks(connection)? {
            [single] => self.connections.get(single).map(Connection::length),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::track_network::test_support::{node, rail};
    use crate::models::Connections;

    fn is_straight(network: &TrackNetwork, id: ConnectionId) -> bool {
        network.connection(id).expect("exists").straight
    }

    #[test]
    fn test_dead_ends_are_straight() {
        let mut network = TrackNetwork::new();
        let a = node(&mut network, 0.0, 0.0);
        let b = node(&mut network, 10.0, 0.0);
        let c = node(&mut network, 20.0, 0.0);
        let first = rail(&mut network, a, b);
        let second = rail(&mut network, b, c);

        assert_eq!(network.classify_straightness(), 2);
        assert!(is_straight(&network, first));
        assert!(is_straight(&network, second));
    }

    #[test]
    fn test_evenly_spaced_chain_is_curved() {
        let mut network = TrackNetwork::new();
        let ids: Vec<_> = (0..4).map(|i| node(&mut network, f64::from(i) * 10.0, 0.0)).collect();
        let first = rail(&mut network, ids[0], ids[1]);
        let middle = rail(&mut network, ids[1], ids[2]);
        let last = rail(&mut network, ids[2], ids[3]);

        network.classify_straightness();

        assert!(is_straight(&network, first));
        assert!(!is_straight(&network, middle));
        assert!(is_straight(&network, last));
    }

    #[test]
    fn test_long_connection_between_short_ones_is_straight() {
        let mut network = TrackNetwork::new();
        let a = node(&mut network, 0.0, 0.0);
        let b = node(&mut network, 1.0, 0.0);
        let c = node(&mut network, 31.0, 0.0);
        let d = node(&mut network, 32.0, 0.0);
        rail(&mut network, a, b);
        let long = rail(&mut network, b, c);
        rail(&mut network, c, d);

        network.classify_straightness();
        assert!(is_straight(&network, long));
    }

    #[test]
    fn test_long_on_one_side_only_is_curved() {
        let mut network = TrackNetwork::new();
        let a = node(&mut network, 0.0, 0.0);
        let b = node(&mut network, 1.0, 0.0);
        let c = node(&mut network, 31.0, 0.0);
        let d = node(&mut network, 61.0, 0.0);
        rail(&mut network, a, b);
        let long = rail(&mut network, b, c);
        rail(&mut network, c, d);

        network.classify_straightness();
        assert!(!is_straight(&network, long));
    }

    #[test]
    fn test_switch_branch_is_straight() {
        let mut network = TrackNetwork::new();
        let a = node(&mut network, -10.0, 0.0);
        let b = node(&mut network, 0.0, 0.0);
        let c = node(&mut network, 10.0, 0.0);
        let d = node(&mut network, 10.0, 1.0);
        let e = node(&mut network, -20.0, 0.0);
        rail(&mut network, e, a);
        let approach = rail(&mut network, a, b);
        rail(&mut network, b, c);
        rail(&mut network, b, d);

        network.classify_straightness();
        // Two continuations at the switch
        assert!(is_straight(&network, approach));
    }
}
