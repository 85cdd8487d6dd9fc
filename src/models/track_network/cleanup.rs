use std::collections::VecDeque;

use super::{Nodes, TrackNetwork};
use crate::constants::{MAX_ALIGNED_CONNECTIONS, MAX_AXIS_DEVIATION};
use crate::geometry::axis_deviation;
use crate::height::HeightRule;
use crate::logging::dev_log;
use crate::models::id::{ConnectionId, NodeId};

/// Outcome of a cleanup run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanupReport {
    /// Nodes removed because no connection touched them
    pub pruned: usize,
    /// Nodes created by splitting
    pub split: usize,
}

/// Extension trait repairing junction geometry on `TrackNetwork`
pub trait Cleanup {
    /// Remove isolated nodes, then split nodes until every node holds
    /// connections of one subnetwork along one axis.
    ///
    /// The number of connections never changes.
    fn cleanup(&mut self) -> CleanupReport;

    /// Move the connections that do not fit at `node` to a new colocated node.
    ///
    /// Returns the new node, or `None` if the node is fine as it is (or unknown).
    fn extract_unwanted(&mut self, node: NodeId) -> Option<NodeId>;

    /// Mark two nodes as colocated; everything linked to either side gets linked to the other side too
    fn link_nodes(&mut self, a: NodeId, b: NodeId);
}

impl Cleanup for TrackNetwork {
    fn cleanup(&mut self) -> CleanupReport {
        #[cfg(feature = "perf_timing")]
        let _timer = crate::logging::PhaseTimer::start("cleanup");

        let before = self.nodes.len();
        self.nodes.retain(|id, node| {
            let keep = node.connection_count() > 0;
            if !keep {
                dev_log!("Pruning isolated node {}", id);
            }
            keep
        });
        let pruned = before - self.nodes.len();

        let mut queue: VecDeque<NodeId> = self.nodes.keys().copied().collect();
        let mut split = 0;
        while let Some(id) = queue.pop_front() {
            if let Some(sibling) = self.extract_unwanted(id) {
                split += 1;
                queue.push_back(sibling);
                queue.push_back(id);
            }
        }

        log::debug!(
            "Cleanup pruned {} nodes and split off {} nodes, {} nodes remain",
            pruned,
            split,
            self.nodes.len()
        );
        CleanupReport { pruned, split }
    }

    fn extract_unwanted(&mut self, id: NodeId) -> Option<NodeId> {
        let node = self.nodes.get(&id)?;
        let tracks = node.attached_tracks();
        let first = tracks.first()?;
        let subnetwork = self.connections.get(&first.connection)?.track_type.subnetwork;

        let wrong_subnetwork: Vec<ConnectionId> = tracks
            .iter()
            .filter(|t| {
                self.connections
                    .get(&t.connection)
                    .is_some_and(|c| c.track_type.subnetwork != subnetwork)
            })
            .map(|t| t.connection)
            .collect();

        let moved = if wrong_subnetwork.is_empty() {
            let off_axis: Vec<ConnectionId> = tracks
                .iter()
                .filter(|t| axis_deviation(t.direction, first.direction) > MAX_AXIS_DEVIATION)
                .map(|t| t.connection)
                .collect();

            if !off_axis.is_empty() {
                off_axis
            } else if node.backward_desires_forward() {
                node.backward().to_vec()
            } else if tracks.len() > MAX_ALIGNED_CONNECTIONS {
                tracks[MAX_ALIGNED_CONNECTIONS..].iter().map(|t| t.connection).collect()
            } else {
                return None;
            }
        } else {
            wrong_subnetwork
        };

        self.move_to_new_node(id, &moved)
    }

    fn link_nodes(&mut self, a: NodeId, b: NodeId) {
        let group_a = self.linked_group(a);
        let group_b = self.linked_group(b);
        for &x in &group_a {
            for &y in &group_b {
                if x != y {
                    self.add_link(x, y);
                    self.add_link(y, x);
                }
            }
        }
    }
}

impl TrackNetwork {
    fn move_to_new_node(&mut self, from: NodeId, moved: &[ConnectionId]) -> Option<NodeId> {
        let position = self.nodes.get(&from)?.position();
        let sibling = self.add_node(position);

        for &connection in moved {
            let Some(track) = self.nodes.get_mut(&from).and_then(|n| n.detach(connection)) else {
                continue;
            };
            if let Some(node) = self.nodes.get_mut(&sibling) {
                node.attach(connection, track.direction);
            }
            if let Some(c) = self.connections.get_mut(&connection) {
                if let Some(which) = c.endpoint_of(from) {
                    c.set_endpoint(which, sibling, position.point);
                }
            }
        }

        debug_assert!(self.nodes.get(&from).is_some_and(|n| n.connection_count() > 0));
        dev_log!("Split {} connections off node {} into {}", moved.len(), from, sibling);
        self.link_nodes(from, sibling);
        Some(sibling)
    }

    fn add_link(&mut self, from: NodeId, to: NodeId) {
        if let Some(node) = self.nodes.get_mut(&from) {
            if !node.linked_nodes().any(|n| n == to) {
                node.add_height_rule(HeightRule::LinkedTo { other: to });
            }
        }
    }
}
