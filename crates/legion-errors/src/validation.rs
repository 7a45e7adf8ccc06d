//! Input validation error types.
//!
//! Used for range checks on configuration values and command parameters.

use core::fmt;

use crate::common::ErrorSeverity;

/// Validation error types.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// Value out of range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        /// Field name
        field: String,
        /// The invalid value
        value: String,
        /// Minimum allowed value
        min: String,
        /// Maximum allowed value
        max: String,
    },

    /// Value must be strictly positive
    #[error("{field} must be positive, got {value}")]
    NonPositive {
        /// Field name
        field: String,
        /// The invalid value
        value: String,
    },

    /// Value is NaN or infinite
    #[error("{field} must be finite")]
    NonFinite {
        /// Field name
        field: String,
    },

    /// Value is required but missing
    #[error("Required field '{0}' is missing")]
    Required(String),

    /// Value appears more than once where it must be unique
    #[error("Duplicate value {value} in '{field}'")]
    Duplicate {
        /// Field name
        field: String,
        /// The repeated value
        value: String,
    },

    /// Constraint violation spanning several fields
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

impl ValidationError {
    /// Get the error severity.
    pub fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Error
    }

    /// Create an out of range error.
    pub fn out_of_range<T: fmt::Display>(field: impl Into<String>, value: T, min: T, max: T) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    /// Create a non-positive value error.
    pub fn non_positive<T: fmt::Display>(field: impl Into<String>, value: T) -> Self {
        ValidationError::NonPositive {
            field: field.into(),
            value: value.to_string(),
        }
    }

    /// Create a non-finite value error.
    pub fn non_finite(field: impl Into<String>) -> Self {
        ValidationError::NonFinite {
            field: field.into(),
        }
    }

    /// Create a required field error.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required(field.into())
    }

    /// Create a duplicate value error.
    pub fn duplicate<T: fmt::Display>(field: impl Into<String>, value: T) -> Self {
        ValidationError::Duplicate {
            field: field.into(),
            value: value.to_string(),
        }
    }

    /// Create a constraint violation error.
    pub fn constraint(msg: impl Into<String>) -> Self {
        ValidationError::ConstraintViolation(msg.into())
    }

    /// Name of the offending field, when the error concerns a single field.
    pub fn field(&self) -> Option<&str> {
        match self {
            ValidationError::OutOfRange { field, .. }
            | ValidationError::NonPositive { field, .. }
            | ValidationError::NonFinite { field }
            | ValidationError::Duplicate { field, .. } => Some(field),
            ValidationError::Required(field) => Some(field),
            ValidationError::ConstraintViolation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_message() {
        let err = ValidationError::out_of_range("steps", 0, 1, 64);
        assert_eq!(err.to_string(), "steps value 0 is out of range [1, 64]");
    }

    #[test]
    fn test_field_accessor() {
        assert_eq!(ValidationError::non_finite("amount").field(), Some("amount"));
        assert_eq!(ValidationError::constraint("z_up below z_default").field(), None);
    }

    #[test]
    fn test_duplicate_message() {
        let err = ValidationError::duplicate("channels", 4);
        assert!(err.to_string().contains("channels"));
        assert!(err.to_string().contains('4'));
    }
}
