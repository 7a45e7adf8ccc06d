//! Centralized error types for the Legion motion core
//!
//! This crate provides the shared error vocabulary for every Legion crate,
//! covering both the per-tick control path and the load-time configuration
//! path.
//!
//! # Architecture
//!
//! - [`common`]: Top-level error type, classification and context helpers
//! - [`fault`]: Copy-able motion fault codes reported from the control tick
//! - [`config`]: Configuration loading and validation errors
//! - [`validation`]: Field-level validation errors
//!
//! # RT Safety
//!
//! [`MotionFault`] is the only type meant for the control tick: it is `Copy`,
//! `#[repr(u8)]` and carries no heap data. Everything else may allocate and
//! belongs on the load-time path.
//!
//! # Example
//!
//! ```
//! use legion_errors::prelude::*;
//!
//! fn check_link(length_mm: f32) -> Result<f32> {
//!     if length_mm <= 0.0 {
//!         return Err(ValidationError::non_positive("length_b", length_mm).into());
//!     }
//!     Ok(length_mm)
//! }
//!
//! assert!(check_link(55.0).is_ok());
//! assert!(check_link(-1.0).is_err());
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, rust_2018_idioms)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod common;
pub mod config;
pub mod fault;
pub mod prelude;
pub mod validation;

pub use common::{ErrorCategory, ErrorContext, ErrorSeverity, LegionError, ResultExt};
pub use config::ConfigError;
pub use fault::MotionFault;
pub use validation::ValidationError;

/// A specialized `Result` type for Legion operations.
pub type Result<T> = std::result::Result<T, LegionError>;

/// A specialized `Result` type for the control tick.
pub type FaultResult<T = ()> = std::result::Result<T, MotionFault>;
