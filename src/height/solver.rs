//! Iterative relaxation of node elevations against their height rules.
//!
//! Every pass walks the nodes in network order. A node first jumps by the
//! weighted average of what its rules suggest, then refines that jump with a
//! few rounds of a shrinking up/down search. The result is only kept when it
//! rates better than the node's current elevation, so a single step never
//! makes the node's own cost worse. Later nodes already see the heights
//! committed earlier in the same pass.

use std::ops::ControlFlow;

use super::rule::{ElevationSource, HeightRule};
use crate::logging::dev_log;
use crate::models::{NodeId, Nodes, TrackNetwork};
use crate::settings::SolverSettings;

/// Outcome of an optimization run
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SolveReport {
    /// Passes actually run
    pub passes: usize,
    /// Node moves committed over all passes
    pub moves: usize,
    /// Weighted cost of all rules before the first pass
    pub initial_cost: f64,
    /// Weighted cost of all rules after the last pass
    pub final_cost: f64,
}

/// Relaxation solver for node elevations
#[derive(Debug, Clone, Default)]
pub struct HeightSolver {
    settings: SolverSettings,
}

impl HeightSolver {
    #[must_use]
    pub fn new(settings: SolverSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn settings(&self) -> &SolverSettings {
        &self.settings
    }

    /// Run all configured passes
    pub fn optimize(&self, network: &mut TrackNetwork) -> SolveReport {
        self.optimize_with(network, |_, _| ControlFlow::Continue(()))
    }

    /// Run the configured passes, asking `after_pass` whether to go on after each one.
    ///
    /// The callback receives the number of finished passes and the network.
    pub fn optimize_with<F>(&self, network: &mut TrackNetwork, mut after_pass: F) -> SolveReport
    where
        F: FnMut(usize, &TrackNetwork) -> ControlFlow<()>,
    {
        #[cfg(feature = "perf_timing")]
        let _timer = crate::logging::PhaseTimer::start("optimize");

        let mut report = SolveReport {
            initial_cost: total_cost(network),
            ..SolveReport::default()
        };
        let mut cooling = self.settings.initial_cooling;
        for pass in 0..self.settings.iterations {
            let moves = self.run_pass(network, cooling);
            report.moves += moves;
            report.passes += 1;
            dev_log!("Pass {} with cooling {:.3} moved {} nodes", pass, cooling, moves);
            cooling *= self.settings.cooling_decay;

            if after_pass(report.passes, network).is_break() {
                log::debug!("Height optimization stopped after {} passes", report.passes);
                break;
            }
        }
        report.final_cost = total_cost(network);
        log::debug!(
            "Height optimization: cost {:.3} -> {:.3} in {} passes",
            report.initial_cost,
            report.final_cost,
            report.passes
        );
        report
    }

    /// One pass over all nodes in network order; returns how many nodes moved
    pub fn run_pass(&self, network: &mut TrackNetwork, cooling: f64) -> usize {
        let mut moves = 0;
        for id in network.node_ids() {
            if self.optimize_node(network, id, cooling) {
                moves += 1;
            }
        }
        moves
    }

    /// Try to improve the elevation of one node; returns whether it moved.
    ///
    /// Nodes without an elevation are left alone.
    pub fn optimize_node(&self, network: &mut TrackNetwork, id: NodeId, cooling: f64) -> bool {
        let Some(height) = network.elevation(id) else {
            return false;
        };
        let rules = self.rules_for(network, id);
        let elevations: &TrackNetwork = network;

        let mut delta = weighted_delta(&rules, height, elevations);
        let mut step = cooling * delta;
        let mut current = rated(&rules, height + delta, elevations);
        for _ in 0..self.settings.refinement_rounds {
            let up = rated(&rules, height + delta + step, elevations);
            let down = rated(&rules, height + delta - step, elevations);
            if up < current && up < down {
                delta += step;
                current = up;
            } else if down < current {
                delta -= step;
                current = down;
            }
            step /= self.settings.step_shrink;
        }

        if current < rated(&rules, height, elevations) {
            network.set_elevation(id, height + delta).is_ok()
        } else {
            false
        }
    }

    /// Weighted cost of the rules that decide where node `id` goes, at `height`
    #[must_use]
    pub fn node_cost(&self, network: &TrackNetwork, id: NodeId, height: f64) -> f64 {
        rated(&self.rules_for(network, id), height, network)
    }

    fn rules_for(&self, network: &TrackNetwork, id: NodeId) -> Vec<HeightRule> {
        let Some(node) = network.node(id) else {
            return Vec::new();
        };
        let mut rules = node.height_rules().to_vec();
        if self.settings.pool_linked_rules {
            for linked in node.linked_nodes() {
                if let Some(other) = network.node(linked) {
                    rules.extend_from_slice(other.height_rules());
                }
            }
        }
        rules
    }
}

/// Weighted cost of every rule of every node at the current elevations
#[must_use]
pub fn total_cost(network: &TrackNetwork) -> f64 {
    network
        .nodes()
        .filter_map(|node| node.elevation().map(|h| rated(node.height_rules(), h, network)))
        .sum()
}

fn rated(rules: &[HeightRule], height: f64, elevations: &impl ElevationSource) -> f64 {
    rules
        .iter()
        .map(|rule| rule.weight() * rule.cost(height, elevations))
        .sum()
}

fn weighted_delta(rules: &[HeightRule], height: f64, elevations: &impl ElevationSource) -> f64 {
    let mut weights = 0.0;
    let mut delta = 0.0;
    for rule in rules {
        let weight = rule.weight();
        weights += weight;
        delta += rule.suggested_delta(height, elevations) * weight;
    }
    if weights <= 0.0 || weights.is_nan() || delta.is_nan() {
        0.0
    } else {
        delta / weights
    }
}
