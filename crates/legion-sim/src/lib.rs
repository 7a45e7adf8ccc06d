//! Headless simulator for the Legion motion core.
//!
//! Runs a script of motion commands through a [`legion_engine::MotionEngine`]
//! whose actuators write into an in-memory [`PwmFrame`], and reports the
//! final pose, loop timing and fault counters. The `legion-sim` binary wraps
//! this with a command line.
//!
//! # Example
//!
//! ```
//! use legion_geometry::RobotConfig;
//! use legion_sim::{RunOptions, parse_script, run_script, simulated_engine};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let commands = parse_script(&["forward:2", "sit"])?;
//! let mut engine = simulated_engine(RobotConfig::default())?;
//! let report = run_script(&mut engine, &commands, &RunOptions::default());
//!
//! assert_eq!(report.commands.len(), 2);
//! assert!(report.commands.iter().all(|c| !c.rejected && !c.timed_out));
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod error;
pub mod frame;
pub mod report;
pub mod script;
pub mod session;

pub use error::SimError;
pub use frame::{FRAME_CHANNELS, PwmFrame};
pub use report::{CommandReport, LegReport, RunReport, TimingReport, TraceReport};
pub use script::{parse_script, parse_token};
pub use session::{RunOptions, SimActuator, SimEngine, realtime_engine, run_script, simulated_engine};
