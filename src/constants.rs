use std::f64::consts::PI;

/// Maximum number of children of an R-tree subtree
pub const CHILDREN_PER_NODE: usize = 20;

/// Minimum number of children on either side of an R-tree split (40% of capacity)
pub const SPLIT_BOUNDS: usize = CHILDREN_PER_NODE * 2 / 5;

/// Half-width of the band around a node's main axis in which connections count as aligned (30°)
pub const MAX_AXIS_DEVIATION: f64 = PI / 6.0;

/// Connections on one axis a node may keep before the surplus is split off
pub const MAX_ALIGNED_CONNECTIONS: usize = 4;

/// A connection this many times longer than both of its neighbours is drawn straight
pub const STRAIGHT_LENGTH_FACTOR: f64 = 2.5;

/// Number of relaxation passes over all nodes
pub const SOLVER_ITERATIONS: usize = 20;

/// Cooling factor of the first relaxation pass
pub const INITIAL_COOLING: f64 = 0.8;

/// Per-pass decay of the cooling factor
pub const COOLING_DECAY: f64 = 0.95;

/// Shrinking step-search rounds per node and pass
pub const REFINEMENT_ROUNDS: usize = 4;

/// Divisor applied to the search step after every refinement round
pub const STEP_SHRINK: f64 = 3.0;

/// Weight of the rule pinning a node to its ground-derived height
pub const FIXED_HEIGHT_WEIGHT: f64 = 0.2;

/// Height deviation tolerated by every fixed-height rule
pub const BASE_HEIGHT_TOLERANCE: f64 = 1.0;

/// Extra tolerance per embankment connection at a node
pub const EMBANKMENT_TOLERANCE: f64 = 5.0;

/// Weight of the incline rule towards each directly connected node
pub const INCLINE_WEIGHT: f64 = 1.0;

/// Weight of the rule keeping a node on the line between its forward and backward neighbour
pub const SMOOTH_INCLINE_WEIGHT: f64 = 0.5;

/// Weight of a neighbour rule for a track lying exactly under/over the node
pub const NEIGHBOUR_WEIGHT: f64 = 2.0;

/// Sideward search distance for neighbouring tracks, in metres
pub const NEIGHBOUR_MAX_SIDEWARD: f64 = 10.0;

/// Distance a neighbouring track may end before the node, in metres
pub const NEIGHBOUR_MAX_FORWARD: f64 = 1.0;

/// Smallest half-width of an incline band, keeps the quartic cost finite for fixed inclines
pub const MIN_INCLINE_HALF_WIDTH: f64 = 0.000_05;

/// Base tolerance of a between-nodes rule, added to a quarter of the nodes' height difference
pub const BETWEEN_NODES_TOLERANCE: f64 = 0.1;
