//! Tracing error types

use core::fmt;

/// Errors raised while setting up logging.
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    /// The global subscriber could not be installed
    #[error("Logging initialization failed: {0}")]
    InitializationFailed(String),

    /// A filter directive could not be parsed
    #[error("Invalid log filter: {0}")]
    InvalidFilter(String),
}

impl TracingError {
    /// Whether the program can continue without logging.
    ///
    /// A second initialization fails because a subscriber is already
    /// installed, which leaves logging working.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, TracingError::InitializationFailed(_))
    }

    /// Create an initialization error with context
    pub fn init_failed(context: impl fmt::Display) -> Self {
        TracingError::InitializationFailed(context.to_string())
    }
}
