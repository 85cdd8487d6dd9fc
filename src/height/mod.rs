//! Height constraints and the relaxation solver that satisfies them.

mod provider;
mod rule;
mod rules;
mod solver;

pub use provider::{FlatGround, GroundHeight};
pub use rule::{ElevationSource, HeightRule};
pub use rules::add_rules;
pub use solver::{HeightSolver, SolveReport};
