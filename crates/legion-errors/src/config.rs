//! Configuration loading and validation errors.

use crate::common::ErrorSeverity;
use crate::validation::ValidationError;

/// Errors raised while loading a robot configuration.
///
/// # Examples
///
/// ```
/// use legion_errors::{ConfigError, ErrorSeverity};
///
/// let err = ConfigError::parse("robot.yaml", "expected a mapping");
/// assert_eq!(err.severity(), ErrorSeverity::Error);
/// assert!(err.to_string().contains("robot.yaml"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to read configuration from {path}: {source}")]
    Read {
        /// File path
        path: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Configuration text could not be parsed
    #[error("Failed to parse configuration from {origin}: {reason}")]
    Parse {
        /// File path or format label
        origin: String,
        /// Parser message
        reason: String,
    },

    /// File extension does not map to a known format
    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    /// Configuration parsed but failed validation
    #[error("Invalid configuration: {0}")]
    Invalid(#[from] ValidationError),
}

impl ConfigError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }

    /// Create a parse error.
    pub fn parse(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Parse {
            origin: origin.into(),
            reason: reason.into(),
        }
    }

    /// Create a read error.
    pub fn read(path: impl Into<String>, source: std::io::Error) -> Self {
        ConfigError::Read {
            path: path.into(),
            source,
        }
    }

    /// Check if this error came from validation rather than I/O or parsing.
    pub fn is_validation(&self) -> bool {
        matches!(self, ConfigError::Invalid(_))
    }
}
