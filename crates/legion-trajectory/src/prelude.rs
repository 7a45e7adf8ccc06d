//! Convenience re-exports for trajectory users.

pub use crate::{Interpolator, RobotState, StepOutcome};
