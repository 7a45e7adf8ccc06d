//! Fixed-period tick sources for the Legion control loop.
//!
//! The motion core runs one tick every 20 ms by default. A [`TickSource`]
//! paces the loop and reports, for every tick, how late it woke and whether
//! the previous tick overran its budget.
//!
//! - [`AbsoluteScheduler`] sleeps to absolute wall-clock deadlines
//! - [`ManualTicks`] advances a virtual clock without sleeping
//! - [`JitterMetrics`] keeps lateness percentiles and miss counts
//!
//! A missed deadline is a fault to report, not a reason to stop: the tick
//! still runs and the schedule re-anchors if the loop fell a full period
//! behind.

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod error;
pub mod jitter;
pub mod manual;
pub mod prelude;
pub mod scheduler;

pub use error::{SchedulerError, SchedulerResult};
pub use jitter::{DEFAULT_SAMPLE_CAPACITY, JitterBudget, JitterMetrics, JitterSummary};
pub use manual::ManualTicks;
pub use scheduler::{AbsoluteScheduler, DEFAULT_PERIOD, DEFAULT_SPIN, TickInfo, TickSource};
