//! Robot state and synchronized foot interpolation for Legion.
//!
//! [`RobotState`] is the one mutable aggregate of the motion core: current
//! foot sites, their targets, the motion rate and the idle counter.
//! [`Interpolator`] moves the current sites toward the targets a little
//! every tick so that all axes of all legs arrive on the same tick.
//!
//! # Example
//!
//! ```
//! use legion_geometry::{KEEP, LegId, MovementConfig, SiteTarget};
//! use legion_trajectory::{Interpolator, RobotState, StepOutcome};
//!
//! let mut state = RobotState::standing(&MovementConfig::default());
//! state.set_target(LegId::FrontLeft, SiteTarget::new(KEEP, KEEP, -30.0));
//! state.set_move_speed(10.0);
//!
//! let mut interp = Interpolator::new();
//! let mut ticks = 1;
//! while interp.step(&mut state) != StepOutcome::Arrived {
//!     ticks += 1;
//! }
//! assert_eq!(ticks, 2);
//! assert!(Interpolator::arrived(&state));
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod interpolator;
pub mod prelude;
pub mod state;

pub use interpolator::{Interpolator, MIN_RATE, StepOutcome};
pub use state::RobotState;
