use serde::{Deserialize, Serialize};

use super::id::{ConnectionId, NodeId};
use crate::error::HeightRuleError;
use crate::geometry::{Point, Rect};

/// Category of track with its own default incline bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Subnetwork {
    Rail,
    Street,
    /// Fences, walls and similar
    Barrier,
    Waterway,
    /// Overhead wire of an electrified track, always linked to one
    ContactWire,
}

impl Subnetwork {
    /// Default (min, max) incline as height change per metre
    #[must_use]
    pub const fn default_inclines(self) -> (f64, f64) {
        match self {
            Subnetwork::Rail => (-0.05, 0.05),
            Subnetwork::Street => (-0.5, 0.5),
            Subnetwork::Barrier => (-1.0, 1.0),
            Subnetwork::Waterway => (-0.3, 0.0),
            Subnetwork::ContactWire => (-0.3, 0.3),
        }
    }
}

/// Identity, subnetwork and incline bounds of a connection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackType {
    pub id: i64,
    pub subnetwork: Subnetwork,
    min_incline: f64,
    max_incline: f64,
}

impl TrackType {
    /// Track type with the subnetwork's default incline bounds
    #[must_use]
    pub const fn new(id: i64, subnetwork: Subnetwork) -> Self {
        let (min_incline, max_incline) = subnetwork.default_inclines();
        Self {
            id,
            subnetwork,
            min_incline,
            max_incline,
        }
    }

    /// Track type with custom incline bounds
    ///
    /// # Errors
    ///
    /// Returns an error if `min_incline` is greater than `max_incline`
    pub fn with_inclines(
        id: i64,
        subnetwork: Subnetwork,
        min_incline: f64,
        max_incline: f64,
    ) -> Result<Self, HeightRuleError> {
        if min_incline > max_incline {
            return Err(HeightRuleError::InvertedInclineRange {
                min: min_incline,
                max: max_incline,
            });
        }
        Ok(Self {
            id,
            subnetwork,
            min_incline,
            max_incline,
        })
    }

    #[must_use]
    pub const fn min_incline(&self) -> f64 {
        self.min_incline
    }

    #[must_use]
    pub const fn max_incline(&self) -> f64 {
        self.max_incline
    }
}

impl Default for TrackType {
    fn default() -> Self {
        Self::new(-1, Subnetwork::Rail)
    }
}

/// Vertical placement of a connection relative to the ground
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HeightType {
    Bridge,
    Embankment,
    OnGround,
    Tunnel,
    #[default]
    Unspecified,
}

impl HeightType {
    /// Offset above ground in metres, `None` where the height is unconstrained
    #[must_use]
    pub const fn offset_above_ground(self) -> Option<f64> {
        match self {
            HeightType::Bridge => Some(8.0),
            HeightType::Embankment => Some(3.0),
            HeightType::OnGround => Some(0.0),
            HeightType::Tunnel | HeightType::Unspecified => None,
        }
    }
}

/// Opaque layer tag; tracks on different planes are placed independently of each other
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeightPlane(pub u32);

/// Which end of a connection a node sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    End,
}

/// A straight track segment between two nodes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub id: ConnectionId,
    start: NodeId,
    end: NodeId,
    start_point: Point,
    end_point: Point,
    bounds: Rect,
    pub track_type: TrackType,
    pub height_type: HeightType,
    pub straight: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_plane: Option<HeightPlane>,
}

impl Connection {
    /// Only builds the connection; registering it with its nodes is up to the network
    #[must_use]
    pub fn new(id: ConnectionId, start: (NodeId, Point), end: (NodeId, Point)) -> Self {
        Self {
            id,
            start: start.0,
            end: end.0,
            start_point: start.1,
            end_point: end.1,
            bounds: Rect::spanning(start.1, end.1),
            track_type: TrackType::default(),
            height_type: HeightType::default(),
            straight: false,
            height_plane: None,
        }
    }

    #[must_use]
    pub const fn start(&self) -> NodeId {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> NodeId {
        self.end
    }

    #[must_use]
    pub const fn start_point(&self) -> Point {
        self.start_point
    }

    #[must_use]
    pub const fn end_point(&self) -> Point {
        self.end_point
    }

    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.start_point.distance(self.end_point)
    }

    #[must_use]
    pub fn touches(&self, node: NodeId) -> bool {
        self.start == node || self.end == node
    }

    /// Which end `node` is on, `None` if it is not an endpoint
    #[must_use]
    pub fn endpoint_of(&self, node: NodeId) -> Option<Endpoint> {
        if self.start == node {
            Some(Endpoint::Start)
        } else if self.end == node {
            Some(Endpoint::End)
        } else {
            None
        }
    }

    /// The node at the other end, `None` if `node` is not an endpoint
    #[must_use]
    pub fn opposite(&self, node: NodeId) -> Option<NodeId> {
        match self.endpoint_of(node)? {
            Endpoint::Start => Some(self.end),
            Endpoint::End => Some(self.start),
        }
    }

    /// Planar position of the node at the other end
    #[must_use]
    pub fn opposite_point(&self, node: NodeId) -> Option<Point> {
        match self.endpoint_of(node)? {
            Endpoint::Start => Some(self.end_point),
            Endpoint::End => Some(self.start_point),
        }
    }

    /// Incline bounds seen when walking away from `node`
    #[must_use]
    pub fn inclines_from(&self, node: NodeId) -> Option<(f64, f64)> {
        let (min, max) = (self.track_type.min_incline(), self.track_type.max_incline());
        match self.endpoint_of(node)? {
            Endpoint::Start => Some((min, max)),
            Endpoint::End => Some((-max, -min)),
        }
    }

    /// Rebind one end to another node; the bounds follow the new position
    pub(crate) fn set_endpoint(&mut self, which: Endpoint, node: NodeId, point: Point) {
        match which {
            Endpoint::Start => {
                self.start = node;
                self.start_point = point;
            }
            Endpoint::End => {
                self.end = node;
                self.end_point = point;
            }
        }
        self.bounds = Rect::spanning(self.start_point, self.end_point);
    }
}
