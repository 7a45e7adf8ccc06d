//! Per-tick motion control for Legion.
//!
//! [`MotionController`] owns the robot state and runs sequencing, rest
//! detection, interpolation and kinematics once per tick, writing twelve
//! joint angles to an [`legion_kinematics::ActuatorSink`] and reporting
//! faults to a [`legion_tracing::TraceSink`]. Commands arrive through a
//! [`CommandMailbox`] that any thread can post into.
//!
//! [`MotionEngine`] pairs a controller with a
//! [`legion_scheduler::TickSource`] and drives it on the caller's thread.
//!
//! # Example
//!
//! ```
//! use legion_engine::{MotionController, MotionEngine};
//! use legion_gait::{CommandKind, MotionCommand};
//! use legion_geometry::{JointId, LegId, RobotConfig};
//! use legion_kinematics::ActuatorSink;
//! use legion_scheduler::ManualTicks;
//! use legion_tracing::LogSink;
//!
//! #[derive(Default)]
//! struct Count(usize);
//! impl ActuatorSink for Count {
//!     fn set_joint_angle(&mut self, _: LegId, _: JointId, _: f32) {
//!         self.0 += 1;
//!     }
//! }
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let controller = MotionController::new(RobotConfig::default(), Count::default(), LogSink::new())?;
//! let mut engine = MotionEngine::new(controller, ManualTicks::from_millis(20)?);
//!
//! engine.mailbox().post(MotionCommand::new(CommandKind::TurnLeft));
//! let summary = engine.run_until_settled(10_000);
//! assert_eq!(summary.phases, 7);
//! assert_eq!(engine.controller().actuator().0 as u64, 12 * summary.ticks);
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod controller;
pub mod error;
pub mod mailbox;
pub mod prelude;
pub mod runner;

pub use controller::{MotionController, TickReport};
pub use error::{EngineError, EngineResult};
pub use mailbox::{CommandMailbox, MailboxStats};
pub use runner::{MotionEngine, RunSummary};
