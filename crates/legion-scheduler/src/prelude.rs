//! Convenience re-exports for loop drivers.

pub use crate::{
    AbsoluteScheduler, JitterMetrics, ManualTicks, SchedulerError, SchedulerResult, TickInfo,
    TickSource,
};
