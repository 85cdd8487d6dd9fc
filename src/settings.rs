use serde::{Deserialize, Serialize};

use crate::constants::{
    BASE_HEIGHT_TOLERANCE, COOLING_DECAY, EMBANKMENT_TOLERANCE, FIXED_HEIGHT_WEIGHT, INCLINE_WEIGHT,
    INITIAL_COOLING, NEIGHBOUR_MAX_FORWARD, NEIGHBOUR_MAX_SIDEWARD, NEIGHBOUR_WEIGHT, REFINEMENT_ROUNDS,
    SMOOTH_INCLINE_WEIGHT, SOLVER_ITERATIONS, STEP_SHRINK,
};
use crate::error::SettingsError;

/// Tunables of one conversion run
///
/// Every section falls back to its defaults when missing, so a JSON document
/// only needs to name the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConversionSettings {
    #[serde(default)]
    pub solver: SolverSettings,
    #[serde(default)]
    pub rules: RuleSettings,
}

/// Relaxation schedule of the height solver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    pub iterations: usize,
    pub initial_cooling: f64,
    pub cooling_decay: f64,
    pub refinement_rounds: usize,
    pub step_shrink: f64,
    /// Also rate a node's height against the rules of the nodes it is linked to
    pub pool_linked_rules: bool,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            iterations: SOLVER_ITERATIONS,
            initial_cooling: INITIAL_COOLING,
            cooling_decay: COOLING_DECAY,
            refinement_rounds: REFINEMENT_ROUNDS,
            step_shrink: STEP_SHRINK,
            pool_linked_rules: false,
        }
    }
}

/// Weights and search distances used when deriving height rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleSettings {
    pub fixed_height_weight: f64,
    pub base_tolerance: f64,
    pub embankment_tolerance: f64,
    pub incline_weight: f64,
    pub smooth_incline_weight: f64,
    pub neighbour_weight: f64,
    pub neighbour_max_sideward: f64,
    pub neighbour_max_forward: f64,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            fixed_height_weight: FIXED_HEIGHT_WEIGHT,
            base_tolerance: BASE_HEIGHT_TOLERANCE,
            embankment_tolerance: EMBANKMENT_TOLERANCE,
            incline_weight: INCLINE_WEIGHT,
            smooth_incline_weight: SMOOTH_INCLINE_WEIGHT,
            neighbour_weight: NEIGHBOUR_WEIGHT,
            neighbour_max_sideward: NEIGHBOUR_MAX_SIDEWARD,
            neighbour_max_forward: NEIGHBOUR_MAX_FORWARD,
        }
    }
}

impl ConversionSettings {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from JSON and validate them
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Serialize to pretty-printed JSON
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails
    pub fn to_json_string(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Invalid` naming the first offending field
    #[allow(clippy::neg_cmp_op_on_partial_ord)]
    pub fn validate(&self) -> Result<(), SettingsError> {
        let solver = &self.solver;
        if solver.iterations == 0 {
            return Err(invalid("solver.iterations", "must be positive"));
        }
        if solver.refinement_rounds == 0 {
            return Err(invalid("solver.refinement_rounds", "must be positive"));
        }
        if !(solver.initial_cooling > 0.0 && solver.initial_cooling <= 1.0) {
            return Err(invalid(
                "solver.initial_cooling",
                format!("{} is outside (0, 1]", solver.initial_cooling),
            ));
        }
        if !(solver.cooling_decay > 0.0 && solver.cooling_decay <= 1.0) {
            return Err(invalid(
                "solver.cooling_decay",
                format!("{} is outside (0, 1]", solver.cooling_decay),
            ));
        }
        if !(solver.step_shrink > 1.0) {
            return Err(invalid("solver.step_shrink", "must be greater than 1"));
        }

        let rules = &self.rules;
        for (field, value) in [
            ("rules.base_tolerance", rules.base_tolerance),
            ("rules.neighbour_max_sideward", rules.neighbour_max_sideward),
        ] {
            if !(value > 0.0) {
                return Err(invalid(field, format!("{value} must be positive")));
            }
        }
        for (field, value) in [
            ("rules.fixed_height_weight", rules.fixed_height_weight),
            ("rules.embankment_tolerance", rules.embankment_tolerance),
            ("rules.incline_weight", rules.incline_weight),
            ("rules.smooth_incline_weight", rules.smooth_incline_weight),
            ("rules.neighbour_weight", rules.neighbour_weight),
            ("rules.neighbour_max_forward", rules.neighbour_max_forward),
        ] {
            if !(value >= 0.0) {
                return Err(invalid(field, format!("{value} must not be negative")));
            }
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.into(),
    }
}
