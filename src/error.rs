use thiserror::Error;

use crate::models::{ConnectionId, NodeId};

/// Construction errors of the geometry primitives
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("rectangle max ({max_x}, {max_y}) lies below min ({min_x}, {min_y})")]
    InvertedRect {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    },

    #[error("cannot compute the bounds of an empty point set")]
    EmptyPointSet,
}

/// Structural errors of the track network
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetworkError {
    #[error("node {0} is not part of the network")]
    UnknownNode(NodeId),

    #[error("connection {0} is not part of the network")]
    UnknownConnection(ConnectionId),

    #[error("cannot connect node {0} to itself")]
    SelfLoop(NodeId),
}

/// Errors raised while building height rules or track types
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HeightRuleError {
    #[error("incline range is inverted: min {min} > max {max}")]
    InvertedInclineRange { min: f64, max: f64 },
}

/// Errors of the settings layer
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors of the export formats
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    #[error("failed to decode snapshot: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("failed to write json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot too small: {0} bytes")]
    Truncated(usize),

    #[error("unsupported snapshot version: {0}")]
    UnsupportedVersion(u32),
}

/// Any error raised by this crate
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Network(#[from] NetworkError),

    #[error(transparent)]
    HeightRule(#[from] HeightRuleError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type Result<T> = std::result::Result<T, Error>;
