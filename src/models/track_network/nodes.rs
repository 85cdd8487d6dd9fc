use indexmap::map::Values;

use super::TrackNetwork;
use crate::error::NetworkError;
use crate::geometry::Position;
use crate::height::HeightRule;
use crate::models::id::NodeId;
use crate::models::node::TrackNode;

/// Extension trait for node-related operations on `TrackNetwork`
pub trait Nodes {
    /// Add a node at `position` and return its id
    fn add_node(&mut self, position: Position) -> NodeId;

    /// Get a node by id
    fn node(&self, id: NodeId) -> Option<&TrackNode>;

    /// Whether the node is (still) part of the network
    fn contains_node(&self, id: NodeId) -> bool;

    /// All nodes in creation order
    fn nodes(&self) -> Values<'_, NodeId, TrackNode>;

    /// Ids of all nodes in creation order
    fn node_ids(&self) -> Vec<NodeId>;

    /// Replace the elevation of a node
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not part of the network
    fn set_elevation(&mut self, id: NodeId, elevation: f64) -> Result<(), NetworkError>;

    /// Append a height rule to a node
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not part of the network
    fn add_height_rule(&mut self, id: NodeId, rule: HeightRule) -> Result<(), NetworkError>;

    /// The node and every node reachable from it over `LinkedTo` rules
    fn linked_group(&self, id: NodeId) -> Vec<NodeId>;
}

impl Nodes for TrackNetwork {
    fn add_node(&mut self, position: Position) -> NodeId {
        let id = NodeId(self.node_ids.next_id());
        self.nodes.insert(id, TrackNode::new(id, position));
        id
    }

    fn node(&self, id: NodeId) -> Option<&TrackNode> {
        self.nodes.get(&id)
    }

    fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    fn nodes(&self) -> Values<'_, NodeId, TrackNode> {
        self.nodes.values()
    }

    fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    fn set_elevation(&mut self, id: NodeId, elevation: f64) -> Result<(), NetworkError> {
        let node = self.nodes.get_mut(&id).ok_or(NetworkError::UnknownNode(id))?;
        node.set_elevation(elevation);
        Ok(())
    }

    fn add_height_rule(&mut self, id: NodeId, rule: HeightRule) -> Result<(), NetworkError> {
        let node = self.nodes.get_mut(&id).ok_or(NetworkError::UnknownNode(id))?;
        node.add_height_rule(rule);
        Ok(())
    }

    fn linked_group(&self, id: NodeId) -> Vec<NodeId> {
        let mut group = vec![id];
        let mut idx = 0;
        while idx < group.len() {
            if let Some(node) = self.nodes.get(&group[idx]) {
                for linked in node.linked_nodes() {
                    if !group.contains(&linked) {
                        group.push(linked);
                    }
                }
            }
            idx += 1;
        }
        group
    }
}
