use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::geometry::Point;
use crate::models::{HeightPlane, HeightType, TrackType};

/// A point of a source way; equal keys mean the same node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourceNode {
    pub key: u64,
    pub position: Point,
}

/// A polyline of the source data together with its tags
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceWay {
    pub id: u64,
    pub nodes: Vec<SourceNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_plane: Option<HeightPlane>,
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

impl SourceWay {
    #[must_use]
    pub fn new(id: u64, nodes: Vec<SourceNode>) -> Self {
        Self {
            id,
            nodes,
            height_plane: None,
            tags: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_tag(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.tags.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags.get(key).map(String::as_str)
    }

    /// Consecutive node pairs
    pub fn segments(&self) -> impl Iterator<Item = (&SourceNode, &SourceNode)> {
        self.nodes.windows(2).map(|pair| (&pair[0], &pair[1]))
    }
}

/// Decides whether a way becomes track and how it sits relative to the ground
pub trait WayTyper {
    /// Track type for the way, `None` if this typer does not handle it
    fn track_type(&self, way: &SourceWay) -> Option<TrackType>;

    fn height_type(&self, way: &SourceWay) -> HeightType;
}
