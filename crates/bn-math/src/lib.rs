//! Numerical primitives shared by the inference engine.

pub mod math;

pub use math::assignments::{boolean_assignments, BooleanAssignments};
pub use math::normalize::{normalize_pair, round_to, DEFAULT_PRECISION, MAX_PRECISION};
pub use math::stable::{approx_eq, total_variation};
