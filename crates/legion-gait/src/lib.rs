//! Motion commands, gait sequencing and idle parking for Legion.
//!
//! A [`MotionCommand`] is validated and handed to the [`GaitSequencer`],
//! which expands it through the [`Planner`] into a queue of [`Phase`]s and
//! feeds them to the robot state one at a time, each only after the
//! interpolator reports arrival of the previous one. The [`RestController`]
//! watches for idleness and asks for a sit after a configurable timeout.
//!
//! # Example
//!
//! ```
//! use legion_gait::{CommandKind, GaitSequencer, GaitState, MotionCommand};
//! use legion_geometry::RobotConfig;
//! use legion_trajectory::{Interpolator, RobotState};
//!
//! # fn main() -> Result<(), legion_gait::CommandError> {
//! let config = RobotConfig::default();
//! let mut sequencer = GaitSequencer::new(&config);
//! let mut interp = Interpolator::new();
//! let mut state = RobotState::standing(&config.movement);
//!
//! sequencer.submit(MotionCommand::new(CommandKind::TurnLeft).with_steps(2))?;
//! let mut phases = 0;
//! while !sequencer.is_idle() {
//!     let arrived = Interpolator::arrived(&state);
//!     if sequencer.advance(&mut state, arrived).is_some() {
//!         phases += 1;
//!     }
//!     interp.step(&mut state);
//! }
//! assert_eq!(phases, 14);
//! assert_eq!(sequencer.state(), GaitState::Idle);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod command;
pub mod error;
pub mod phase;
pub mod planner;
pub mod prelude;
pub mod rest;
pub mod sequencer;

pub use command::{CommandKind, MotionCommand};
pub use error::CommandError;
pub use phase::{Phase, PhaseKind};
pub use planner::Planner;
pub use rest::{RestAction, RestController};
pub use sequencer::{GaitSequencer, GaitState, PhaseIssued};
