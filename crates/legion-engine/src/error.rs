//! Engine construction errors.

use legion_errors::{ConfigError, LegionError};
use legion_scheduler::SchedulerError;

/// Reasons an engine cannot be built.
///
/// Nothing on the tick path returns an error; faults there are traced and
/// recovered in place.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The robot configuration failed validation
    #[error("invalid robot configuration: {0}")]
    Config(#[from] ConfigError),

    /// The tick source could not be created
    #[error("scheduler setup failed: {0}")]
    Scheduler(#[from] SchedulerError),
}

impl From<EngineError> for LegionError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Config(e) => LegionError::Config(e),
            EngineError::Scheduler(e) => e.into(),
        }
    }
}

/// Result alias for engine setup.
pub type EngineResult<T> = Result<T, EngineError>;
