//! Shared test utilities for Legion.
//!
//! # Modules
//!
//! - [`mod@must`] - Unwrap helpers with `#[track_caller]`
//! - [`assertions`] - Tolerance-based float and site assertions
//! - [`tracking`] - Allocation tracking for tick-path tests
//! - [`mock`] - Recording actuator and trace sinks
//! - [`fixtures`] - Stock configurations and sample sites
//! - [`prelude`] - Convenience re-exports
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! legion-test-helpers = { workspace = true }
//! ```
//!
//! ```rust,ignore
//! use legion_test_helpers::prelude::*;
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::unwrap_used, clippy::panic)]

pub mod assertions;
pub mod must;
pub mod prelude;

#[cfg(feature = "tracking")]
pub mod tracking;

#[cfg(all(test, feature = "tracking"))]
#[global_allocator]
static GLOBAL_TEST: tracking::TrackingAllocator = tracking::TrackingAllocator;

#[cfg(feature = "mock")]
pub mod mock;

#[cfg(feature = "fixtures")]
pub mod fixtures;

pub use must::*;

#[cfg(feature = "tracking")]
pub use tracking::track;

#[doc(hidden)]
pub mod __private {
    pub use legion_geometry::Site;
}
