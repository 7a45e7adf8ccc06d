//! Scheduler errors.

use legion_errors::{LegionError, MotionFault, ValidationError};

/// Timing problems reported by a tick source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SchedulerError {
    /// The tick period must be at least one nanosecond
    #[error("tick period must be positive")]
    ZeroPeriod,

    /// A tick began after its scheduled deadline
    #[error("tick {tick} started {late_ns} ns after its deadline")]
    DeadlineMissed {
        /// Tick that was late
        tick: u64,
        /// Lateness in nanoseconds
        late_ns: u64,
    },
}

impl SchedulerError {
    /// Fault code for errors raised while ticking; construction errors have none.
    pub fn fault(&self) -> Option<MotionFault> {
        match self {
            SchedulerError::ZeroPeriod => None,
            SchedulerError::DeadlineMissed { .. } => Some(MotionFault::DeadlineMissed),
        }
    }
}

impl From<SchedulerError> for LegionError {
    fn from(e: SchedulerError) -> Self {
        match e {
            SchedulerError::ZeroPeriod => {
                LegionError::Validation(ValidationError::non_positive("tick_period_ms", 0))
            }
            SchedulerError::DeadlineMissed { .. } => LegionError::Motion(MotionFault::DeadlineMissed),
        }
    }
}

/// Result alias for scheduler operations.
pub type SchedulerResult<T = ()> = Result<T, SchedulerError>;
