//! Prelude module for convenient error handling imports.
//!
//! ```
//! use legion_errors::prelude::*;
//!
//! fn speed(value: f32) -> Result<f32> {
//!     validate_range!("speed_multiple", value, 0.1_f32, 4.0_f32);
//!     Ok(value)
//! }
//!
//! assert!(speed(1.0).is_ok());
//! assert!(speed(8.0).is_err());
//! ```

pub use crate::{
    FaultResult, Result,
    common::{ErrorCategory, ErrorContext, ErrorSeverity, LegionError, ResultExt},
    config::ConfigError,
    fault::MotionFault,
    validation::ValidationError,
};

pub use crate::validate_range;

/// Return an out of range validation error when `$value` is outside `[$min, $max]`.
///
/// NaN never satisfies the range check, so non-finite input is rejected too.
#[macro_export]
macro_rules! validate_range {
    ($field:expr, $value:expr, $min:expr, $max:expr) => {
        if !($value >= $min && $value <= $max) {
            return Err($crate::ValidationError::out_of_range($field, $value, $min, $max).into());
        }
    };
}
