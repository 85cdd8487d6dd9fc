//! Ordered node and connection lists for consumers of a finished network.

mod file;

pub use file::{snapshot_from_bytes, snapshot_to_bytes, CURRENT_SNAPSHOT_VERSION};

use serde::{Deserialize, Serialize};
use std::io;

use crate::error::ExportError;
use crate::models::{Connections, ConnectionId, NodeId, Nodes, TrackNetwork, TrackNode};

/// A node with its position and its connections by side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    pub elevation: Option<f64>,
    pub forward: Vec<ConnectionId>,
    pub backward: Vec<ConnectionId>,
}

/// A connection with its endpoints and flags
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionRecord {
    pub id: ConnectionId,
    pub start: NodeId,
    pub end: NodeId,
    pub straight: bool,
    /// Whether either endpoint has an elevation
    pub height_fixed: bool,
    pub track_type: i64,
}

/// Everything a consumer needs from a network, in network order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub nodes: Vec<NodeRecord>,
    pub connections: Vec<ConnectionRecord>,
}

/// Flat CSV row; connection lists are joined with `;`
#[derive(Serialize)]
struct NodeRow<'a> {
    id: NodeId,
    x: f64,
    y: f64,
    elevation: Option<f64>,
    forward: &'a str,
    backward: &'a str,
}

impl From<&TrackNode> for NodeRecord {
    fn from(node: &TrackNode) -> Self {
        let position = node.position();
        Self {
            id: node.id,
            x: position.x(),
            y: position.y(),
            elevation: position.elevation,
            forward: node.forward().to_vec(),
            backward: node.backward().to_vec(),
        }
    }
}

fn join_ids(ids: &[ConnectionId]) -> String {
    ids.iter().map(|id| id.0.to_string()).collect::<Vec<_>>().join(";")
}

impl NetworkSnapshot {
    #[must_use]
    pub fn capture(network: &TrackNetwork) -> Self {
        let nodes = network.nodes().map(NodeRecord::from).collect();
        let connections = network
            .connections()
            .map(|c| ConnectionRecord {
                id: c.id,
                start: c.start(),
                end: c.end(),
                straight: c.straight,
                height_fixed: network.is_height_set(c.id),
                track_type: c.track_type.id,
            })
            .collect();
        Self { nodes, connections }
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a snapshot
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Write the nodes as CSV with a header row
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails
    pub fn write_nodes_csv<W: io::Write>(&self, writer: W) -> Result<(), ExportError> {
        let mut csv = csv::Writer::from_writer(writer);
        for node in &self.nodes {
            let forward = join_ids(&node.forward);
            let backward = join_ids(&node.backward);
            csv.serialize(NodeRow {
                id: node.id,
                x: node.x,
                y: node.y,
                elevation: node.elevation,
                forward: &forward,
                backward: &backward,
            })?;
        }
        csv.flush()?;
        Ok(())
    }

    /// Write the connections as CSV with a header row
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails
    pub fn write_connections_csv<W: io::Write>(&self, writer: W) -> Result<(), ExportError> {
        let mut csv = csv::Writer::from_writer(writer);
        for connection in &self.connections {
            csv.serialize(connection)?;
        }
        csv.flush()?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns an error if `MessagePack` serialization fails
    pub fn to_bytes(&self) -> Result<Vec<u8>, ExportError> {
        snapshot_to_bytes(self)
    }

    /// # Errors
    ///
    /// Returns an error if the data is not a snapshot of a supported version
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ExportError> {
        snapshot_from_bytes(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::track_network::test_support::{node, rail};
    use crate::models::Straightness;

    fn small_network() -> TrackNetwork {
        let mut network = TrackNetwork::new();
        let a = node(&mut network, 0.0, 0.0);
        let b = node(&mut network, 10.0, 0.0);
        let c = node(&mut network, 20.0, 0.0);
        rail(&mut network, a, b);
        rail(&mut network, b, c);
        network.set_elevation(b, 2.5).expect("exists");
        network.classify_straightness();
        network
    }

    #[test]
    fn test_capture_keeps_network_order() {
        let network = small_network();
        let snapshot = NetworkSnapshot::capture(&network);

        let ids: Vec<NodeId> = snapshot.nodes.iter().map(|n| n.id).collect();
        assert_eq!(ids, network.node_ids());
        assert_eq!(snapshot.nodes[1].elevation, Some(2.5));
        assert_eq!(snapshot.nodes[1].forward, vec![ConnectionId(0)]);
        assert_eq!(snapshot.nodes[1].backward, vec![ConnectionId(1)]);
        assert_eq!(
            snapshot.connections[0],
            ConnectionRecord {
                id: ConnectionId(0),
                start: NodeId(0),
                end: NodeId(1),
                straight: true,
                height_fixed: true,
                track_type: -1,
            }
        );
    }

    #[test]
    fn test_json_round_trip() {
        let snapshot = NetworkSnapshot::capture(&small_network());
        let json = snapshot.to_json().expect("serializes");
        assert_eq!(NetworkSnapshot::from_json(&json).expect("parses"), snapshot);
        assert!(NetworkSnapshot::from_json("[1, 2").is_err());
    }

    #[test]
    fn test_csv_rows() {
        let snapshot = NetworkSnapshot::capture(&small_network());

        let mut nodes = Vec::new();
        snapshot.write_nodes_csv(&mut nodes).expect("writes");
        let nodes = String::from_utf8(nodes).expect("utf-8");
        let lines: Vec<&str> = nodes.lines().collect();
        assert_eq!(lines[0], "id,x,y,elevation,forward,backward");
        assert_eq!(lines[1], "0,0.0,0.0,,0,");
        assert_eq!(lines[2], "1,10.0,0.0,2.5,0,1");

        let mut connections = Vec::new();
        snapshot.write_connections_csv(&mut connections).expect("writes");
        let connections = String::from_utf8(connections).expect("utf-8");
        assert_eq!(
            connections.lines().next(),
            Some("id,start,end,straight,height_fixed,track_type")
        );
        assert_eq!(connections.lines().nth(1), Some("0,0,1,true,true,-1"));
    }

    #[test]
    fn test_bytes_round_trip() {
        let snapshot = NetworkSnapshot::capture(&small_network());
        let bytes = snapshot.to_bytes().expect("encodes");
        assert_eq!(NetworkSnapshot::from_bytes(&bytes).expect("decodes"), snapshot);
    }
}
