use serde::{Deserialize, Serialize};
use std::f64::consts::FRAC_PI_2;

use super::id::{ConnectionId, NodeId};
use crate::geometry::{angle_difference, Position};
use crate::height::HeightRule;

/// A connection as seen from one of its nodes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttachedTrack {
    pub connection: ConnectionId,
    /// Direction under which the node sees the connection, `atan2(node - other)`
    pub direction: f64,
}

/// Forward/backward split of a node's connections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackGroups {
    pub forward: Vec<ConnectionId>,
    pub backward: Vec<ConnectionId>,
    /// Direction of the first forward connection
    pub forward_direction: f64,
    /// The single backward connection really points forward; there was nothing better yet
    pub backward_desires_forward: bool,
}

impl TrackGroups {
    /// Replay the classification over connections in attachment order
    #[must_use]
    pub fn classify(tracks: &[AttachedTrack]) -> Self {
        let mut groups = Self::default();
        for track in tracks {
            groups.push(track);
        }
        groups
    }

    fn push(&mut self, track: &AttachedTrack) {
        if self.forward.is_empty() {
            self.forward.push(track.connection);
            self.forward_direction = track.direction;
            return;
        }

        if self.backward_desires_forward {
            // Someone else can take the backward side now
            self.forward.extend(self.backward.drain(..));
            self.backward_desires_forward = false;
        }

        let should_be_forward = angle_difference(track.direction, self.forward_direction) < FRAC_PI_2;
        if self.backward.is_empty() {
            self.backward.push(track.connection);
            self.backward_desires_forward = should_be_forward;
        } else if should_be_forward {
            self.forward.push(track.connection);
        } else {
            self.backward.push(track.connection);
        }
        debug_assert!(self.backward.is_empty() || !self.forward.is_empty());
    }
}

/// A junction or waypoint of the track network
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackNode {
    pub id: NodeId,
    position: Position,
    tracks: Vec<AttachedTrack>,
    groups: TrackGroups,
    height_rules: Vec<HeightRule>,
}

impl TrackNode {
    #[must_use]
    pub fn new(id: NodeId, position: Position) -> Self {
        Self {
            id,
            position,
            tracks: Vec::new(),
            groups: TrackGroups::default(),
            height_rules: Vec::new(),
        }
    }

    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    #[must_use]
    pub const fn elevation(&self) -> Option<f64> {
        self.position.elevation
    }

    /// Replace the position with one carrying the new elevation
    pub fn set_elevation(&mut self, elevation: f64) {
        self.position = self.position.with_elevation(elevation);
    }

    /// All connections in attachment order
    pub fn connections(&self) -> impl Iterator<Item = ConnectionId> + '_ {
        self.tracks.iter().map(|t| t.connection)
    }

    #[must_use]
    pub fn attached_tracks(&self) -> &[AttachedTrack] {
        &self.tracks
    }

    #[must_use]
    pub fn connection_count(&self) -> usize {
        self.tracks.len()
    }

    #[must_use]
    pub fn forward(&self) -> &[ConnectionId] {
        &self.groups.forward
    }

    #[must_use]
    pub fn backward(&self) -> &[ConnectionId] {
        &self.groups.backward
    }

    #[must_use]
    pub fn groups(&self) -> &TrackGroups {
        &self.groups
    }

    #[must_use]
    pub fn backward_desires_forward(&self) -> bool {
        self.groups.backward_desires_forward
    }

    /// Direction under which this node sees `connection`
    #[must_use]
    pub fn direction_of(&self, connection: ConnectionId) -> Option<f64> {
        self.tracks
            .iter()
            .find(|t| t.connection == connection)
            .map(|t| t.direction)
    }

    /// The group on the other side of `connection`, `None` if it is not attached here
    #[must_use]
    pub fn opposite_tracks(&self, connection: ConnectionId) -> Option<&[ConnectionId]> {
        if self.groups.forward.contains(&connection) {
            Some(&self.groups.backward)
        } else if self.groups.backward.contains(&connection) {
            Some(&self.groups.forward)
        } else {
            None
        }
    }

    #[must_use]
    pub fn height_rules(&self) -> &[HeightRule] {
        &self.height_rules
    }

    pub fn add_height_rule(&mut self, rule: HeightRule) {
        self.height_rules.push(rule);
    }

    /// Nodes this node is linked to by `LinkedTo` rules
    pub fn linked_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.height_rules.iter().filter_map(HeightRule::linked_node)
    }

    pub(crate) fn attach(&mut self, connection: ConnectionId, direction: f64) {
        let track = AttachedTrack { connection, direction };
        self.groups.push(&track);
        self.tracks.push(track);
    }

    /// Remove a connection and derive the groups again from the remaining ones
    pub(crate) fn detach(&mut self, connection: ConnectionId) -> Option<AttachedTrack> {
        let idx = self.tracks.iter().position(|t| t.connection == connection)?;
        let removed = self.tracks.remove(idx);
        self.groups = TrackGroups::classify(&self.tracks);
        Some(removed)
    }
}
