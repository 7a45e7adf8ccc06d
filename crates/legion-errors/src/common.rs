//! Common error types and utilities used across all Legion crates.
//!
//! This module provides the top-level error enum that can wrap all sub-errors,
//! along with error classification, severity levels, and utility traits.

use core::fmt;

use crate::{ConfigError, MotionFault, ValidationError};

/// Top-level error type that can wrap all Legion sub-errors.
#[derive(Debug, thiserror::Error)]
pub enum LegionError {
    /// Motion faults raised on the control path
    #[error("Motion fault: {0}")]
    Motion(#[from] MotionFault),

    /// Configuration loading errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[source] std::io::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl LegionError {
    /// Get the error category for classification.
    pub fn category(&self) -> ErrorCategory {
        match self {
            LegionError::Motion(_) => ErrorCategory::Motion,
            LegionError::Config(_) => ErrorCategory::Config,
            LegionError::Validation(_) => ErrorCategory::Validation,
            LegionError::Io(_) => ErrorCategory::IO,
            LegionError::Other(_) => ErrorCategory::Other,
        }
    }

    /// Get the error severity level.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            LegionError::Motion(f) => f.severity(),
            LegionError::Config(e) => e.severity(),
            LegionError::Validation(e) => e.severity(),
            LegionError::Io(_) => ErrorSeverity::Error,
            LegionError::Other(_) => ErrorSeverity::Error,
        }
    }

    /// Check if this error is recoverable.
    pub fn is_recoverable(&self) -> bool {
        self.severity() < ErrorSeverity::Critical
    }

    /// Create a generic error with a message.
    pub fn other(msg: impl Into<String>) -> Self {
        LegionError::Other(msg.into())
    }

    /// The motion fault carried by this error, if any.
    pub fn fault(&self) -> Option<MotionFault> {
        match self {
            LegionError::Motion(f) => Some(*f),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LegionError {
    fn from(e: std::io::Error) -> Self {
        LegionError::Io(e)
    }
}

/// Error category for classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Control-path motion faults
    Motion = 0,
    /// Configuration errors
    Config = 1,
    /// I/O errors
    IO = 2,
    /// Validation errors
    Validation = 3,
    /// Other errors
    Other = 255,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Motion => write!(f, "Motion"),
            ErrorCategory::Config => write!(f, "Config"),
            ErrorCategory::IO => write!(f, "IO"),
            ErrorCategory::Validation => write!(f, "Validation"),
            ErrorCategory::Other => write!(f, "Other"),
        }
    }
}

/// Error severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ErrorSeverity {
    /// Informational, no action required
    Info = 0,
    /// Warning, may require attention
    Warning = 1,
    /// Error, operation failed
    Error = 2,
    /// Critical, system may be in unstable state
    Critical = 3,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "INFO"),
            ErrorSeverity::Warning => write!(f, "WARN"),
            ErrorSeverity::Error => write!(f, "ERROR"),
            ErrorSeverity::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Context information for errors.
#[derive(Debug, Clone)]
pub struct ErrorContext {
    /// The operation that was being performed
    pub operation: String,
    /// Additional context key-value pairs
    pub context: Vec<(String, String)>,
}

impl ErrorContext {
    /// Create a new error context for an operation.
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            operation: operation.into(),
            context: Vec::new(),
        }
    }

    /// Add a context key-value pair.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "operation: {}", self.operation)?;
        for (key, value) in &self.context {
            write!(f, ", {key}: {value}")?;
        }
        Ok(())
    }
}

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    /// Add context to an error.
    fn context(self, ctx: ErrorContext) -> Result<T, LegionError>;

    /// Add context with an operation name.
    fn with_context(self, operation: impl Into<String>) -> Result<T, LegionError>;
}

impl<T, E: Into<LegionError>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, ctx: ErrorContext) -> Result<T, LegionError> {
        self.map_err(|e| {
            let err: LegionError = e.into();
            LegionError::Other(format!("{ctx}: {err}"))
        })
    }

    fn with_context(self, operation: impl Into<String>) -> Result<T, LegionError> {
        self.context(ErrorContext::new(operation))
    }
}
