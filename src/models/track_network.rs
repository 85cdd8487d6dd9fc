mod cleanup;
mod connections;
mod nodes;
mod straightness;

pub use cleanup::{Cleanup, CleanupReport};
pub use connections::Connections;
pub use nodes::Nodes;
pub use straightness::Straightness;

use indexmap::IndexMap;

use super::id::{ConnectionId, IdCounter, NodeId};
use super::node::TrackNode;
use super::track::Connection;
use crate::height::ElevationSource;
use crate::spatial::RTree;

/// Nodes and connections of a track network, plus a spatial index over the connections.
///
/// The network owns everything; nodes and connections refer to each other by id.
/// Both tables keep creation order, which is the order exports and the height
/// solver walk them in.
#[derive(Debug, Clone, Default)]
pub struct TrackNetwork {
    nodes: IndexMap<NodeId, TrackNode>,
    connections: IndexMap<ConnectionId, Connection>,
    node_ids: IdCounter,
    connection_ids: IdCounter,
    connection_tree: RTree<ConnectionId>,
}

impl TrackNetwork {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl ElevationSource for TrackNetwork {
    fn elevation(&self, node: NodeId) -> Option<f64> {
        self.nodes.get(&node).and_then(TrackNode::elevation)
    }
}
