//! Per-node height constraints.
//!
//! Every rule rates a candidate height of its node (0 is optimal, larger is
//! worse) and proposes a height change that would satisfy it.

use serde::{Deserialize, Serialize};

use crate::constants::{BETWEEN_NODES_TOLERANCE, MIN_INCLINE_HALF_WIDTH};
use crate::error::HeightRuleError;
use crate::models::NodeId;

/// Read access to the current elevation of other nodes
pub trait ElevationSource {
    fn elevation(&self, node: NodeId) -> Option<f64>;
}

impl<F> ElevationSource for F
where
    F: Fn(NodeId) -> Option<f64>,
{
    fn elevation(&self, node: NodeId) -> Option<f64> {
        self(node)
    }
}

/// A height constraint attached to a node
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum HeightRule {
    /// Stay near `target`; deviations of `tolerance` cost 1
    FixedHeight { target: f64, tolerance: f64, weight: f64 },
    /// Sit on the line between two nodes: `(1 - ratio) * h(first) + ratio * h(second)`
    BetweenNodes {
        first: NodeId,
        second: NodeId,
        ratio: f64,
        weight: f64,
    },
    /// Keep the incline towards `other` within `[min_incline, max_incline]`
    InclineBetween {
        min_incline: f64,
        max_incline: f64,
        other: NodeId,
        length: f64,
        weight: f64,
    },
    /// Marks `other` as colocated with this node; never rates anything
    LinkedTo { other: NodeId },
}

impl HeightRule {
    /// Incline rule towards `other`
    ///
    /// # Errors
    ///
    /// Returns an error if `min_incline` is greater than `max_incline`
    pub fn incline_between(
        min_incline: f64,
        max_incline: f64,
        other: NodeId,
        length: f64,
        weight: f64,
    ) -> Result<Self, HeightRuleError> {
        if min_incline > max_incline {
            return Err(HeightRuleError::InvertedInclineRange {
                min: min_incline,
                max: max_incline,
            });
        }
        Ok(HeightRule::InclineBetween {
            min_incline,
            max_incline,
            other,
            length,
            weight,
        })
    }

    #[must_use]
    pub fn weight(&self) -> f64 {
        match *self {
            HeightRule::FixedHeight { weight, .. }
            | HeightRule::BetweenNodes { weight, .. }
            | HeightRule::InclineBetween { weight, .. } => weight,
            HeightRule::LinkedTo { .. } => 0.0,
        }
    }

    /// Node this rule links to, if it is a `LinkedTo` rule
    #[must_use]
    pub fn linked_node(&self) -> Option<NodeId> {
        match *self {
            HeightRule::LinkedTo { other } => Some(other),
            _ => None,
        }
    }

    /// Unweighted cost of placing the node at `height`
    #[must_use]
    pub fn cost(&self, height: f64, elevations: &impl ElevationSource) -> f64 {
        match *self {
            HeightRule::FixedHeight { target, tolerance, .. } => quadratic(target - height, tolerance),
            HeightRule::BetweenNodes { first, second, .. } => {
                let (Some(h1), Some(h2)) = (elevations.elevation(first), elevations.elevation(second)) else {
                    return 0.0;
                };
                let diff = self.suggested_delta(height, elevations);
                if diff == 0.0 {
                    return 0.0;
                }
                quadratic(diff, (h1 - h2).abs() / 4.0 + BETWEEN_NODES_TOLERANCE)
            }
            HeightRule::InclineBetween {
                min_incline,
                max_incline,
                other,
                length,
                ..
            } => {
                let Some(other_height) = elevations.elevation(other) else {
                    return 0.0;
                };
                let (mean, half_width) = incline_band(min_incline, max_incline);
                let incline = (other_height - height) / length;
                let x = (incline - mean) / half_width;
                let x2 = x * x;
                x2 * x2
            }
            HeightRule::LinkedTo { .. } => 0.0,
        }
    }

    /// Height change that would satisfy this rule, linearised around `height`
    #[must_use]
    pub fn suggested_delta(&self, height: f64, elevations: &impl ElevationSource) -> f64 {
        match *self {
            HeightRule::FixedHeight { target, .. } => target - height,
            HeightRule::BetweenNodes { first, second, ratio, .. } => {
                let (Some(h1), Some(h2)) = (elevations.elevation(first), elevations.elevation(second)) else {
                    return 0.0;
                };
                let target = (1.0 - ratio) * h1 + ratio * h2;
                if target.is_nan() {
                    0.0
                } else {
                    target - height
                }
            }
            HeightRule::InclineBetween {
                min_incline,
                max_incline,
                other,
                length,
                ..
            } => {
                let Some(other_height) = elevations.elevation(other) else {
                    return 0.0;
                };
                let (mean, _) = incline_band(min_incline, max_incline);
                other_height - mean * length - height
            }
            HeightRule::LinkedTo { .. } => 0.0,
        }
    }
}

fn quadratic(diff: f64, tolerance: f64) -> f64 {
    diff * diff / (tolerance * tolerance)
}

/// Centre and half-width of an incline range
fn incline_band(min_incline: f64, max_incline: f64) -> (f64, f64) {
    let mean = (min_incline + max_incline) / 2.0;
    (mean, (max_incline - mean).max(MIN_INCLINE_HALF_WIDTH))
}
