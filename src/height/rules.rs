//! Derives the height rules of every node from its connections and surroundings.

use super::provider::GroundHeight;
use super::rule::HeightRule;
use crate::error::NetworkError;
use crate::logging::dev_log;
use crate::models::{Connection, Connections, HeightType, Nodes, TrackNetwork, TrackNode};
use crate::proximity::{Distance, ProximityQuery};
use crate::settings::RuleSettings;

/// Seed every node's elevation from the ground and attach its height rules.
///
/// Nodes are visited in network order. Returns the number of rules added.
///
/// # Errors
///
/// Returns an error if a node disappears while its rules are attached
pub fn add_rules(
    network: &mut TrackNetwork,
    ground: &impl GroundHeight,
    settings: &RuleSettings,
) -> Result<usize, NetworkError> {
    #[cfg(feature = "perf_timing")]
    let _timer = crate::logging::PhaseTimer::start("add_rules");

    let mut added = 0;
    for id in network.node_ids() {
        let Some(node) = network.node(id) else {
            continue;
        };
        let point = node.position().point;
        let mut height = ground.height(point);
        if height.is_nan() {
            log::warn!("Ground height at ({:.1}, {:.1}) is NaN, using 0", point.x, point.y);
            height = 0.0;
        }

        let (baseline, rules) = node_rules(network, node, height, settings);
        added += rules.len();
        dev_log!("Node {} starts at {:.2} with {} rules", id, baseline, rules.len());

        network.set_elevation(id, baseline)?;
        for rule in rules {
            network.add_height_rule(id, rule)?;
        }
    }
    Ok(added)
}

fn node_rules(
    network: &TrackNetwork,
    node: &TrackNode,
    ground: f64,
    settings: &RuleSettings,
) -> (f64, Vec<HeightRule>) {
    let connections: Vec<&Connection> = node.connections().filter_map(|c| network.connection(c)).collect();
    let mut rules = Vec::new();

    // Ground-relative baseline
    let offsets: Vec<f64> = connections
        .iter()
        .filter_map(|c| c.height_type.offset_above_ground())
        .collect();
    let baseline = if offsets.is_empty() {
        ground
    } else {
        #[allow(clippy::cast_precision_loss)]
        let mean = offsets.iter().sum::<f64>() / offsets.len() as f64;
        ground + mean
    };

    let embankments = connections
        .iter()
        .filter(|c| c.height_type == HeightType::Embankment)
        .count();
    let follows_ground = connections
        .iter()
        .any(|c| matches!(c.height_type, HeightType::OnGround | HeightType::Embankment));
    if follows_ground {
        #[allow(clippy::cast_precision_loss)]
        let tolerance = settings.base_tolerance + settings.embankment_tolerance * embankments as f64;
        rules.push(HeightRule::FixedHeight {
            target: baseline,
            tolerance,
            weight: settings.fixed_height_weight,
        });
    }

    // Smooth transitions through the node
    for forward in node.forward().iter().filter_map(|&c| network.connection(c)) {
        let Some(forward_node) = forward.opposite(node.id) else {
            continue;
        };
        for backward in node.backward().iter().filter_map(|&c| network.connection(c)) {
            let Some(backward_node) = backward.opposite(node.id) else {
                continue;
            };
            rules.push(HeightRule::BetweenNodes {
                first: forward_node,
                second: backward_node,
                ratio: forward.length() / (forward.length() + backward.length()),
                weight: settings.smooth_incline_weight,
            });
        }
    }

    // Inclines along the connections
    for connection in &connections {
        let (Some((min_incline, max_incline)), Some(other)) =
            (connection.inclines_from(node.id), connection.opposite(node.id))
        else {
            continue;
        };
        rules.push(HeightRule::InclineBetween {
            min_incline,
            max_incline,
            other,
            length: connection.length(),
            weight: settings.incline_weight,
        });
    }

    // Tracks passing right under or over the node on the same level
    let point = node.position().point;
    for id in network.within(point, None, settings.neighbour_max_sideward, settings.neighbour_max_forward) {
        let Some(neighbour) = network.connection(id) else {
            continue;
        };
        if neighbour.touches(node.id) || !connections.iter().any(|c| c.height_plane == neighbour.height_plane) {
            continue;
        }
        let distance = Distance::to_connection(point, neighbour);
        let closeness = 1.0 - (distance.sideward / settings.neighbour_max_sideward).abs();
        rules.push(HeightRule::BetweenNodes {
            first: neighbour.start(),
            second: neighbour.end(),
            ratio: distance.forward / neighbour.length(),
            weight: closeness * settings.neighbour_weight,
        });
    }

    (baseline, rules)
}
