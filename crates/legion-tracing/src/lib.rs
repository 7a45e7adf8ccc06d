//! Motion trace events and logging for Legion
//!
//! The control tick reports what it did through a [`TraceSink`]: phase
//! transitions, clamps, rejected commands, parking and deadline misses. The
//! events are `Copy` values so emission is allocation-free; what happens to
//! them is up to the sink.
//!
//! - [`LogSink`] forwards to `tracing` and keeps [`TracingMetrics`]
//! - [`NullSink`] discards everything
//! - [`init_logging`] installs a `tracing-subscriber` formatter with an
//!   `EnvFilter` driven by `RUST_LOG` or a verbosity count
//!
//! # Example
//!
//! ```
//! use legion_errors::MotionFault;
//! use legion_tracing::{LogSink, MotionTraceEvent, TraceSink};
//!
//! let mut sink = LogSink::new();
//! sink.emit(MotionTraceEvent::CommandRejected {
//!     tick: 12,
//!     reason: MotionFault::InvalidCommand,
//! });
//! assert_eq!(sink.metrics().commands_rejected, 1);
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![warn(missing_docs, missing_debug_implementations)]

pub mod error;
pub mod events;
pub mod metrics;
pub mod prelude;
pub mod sink;
pub mod subscriber;

pub use error::TracingError;
pub use events::{EventCategory, MotionTraceEvent};
pub use metrics::TracingMetrics;
pub use sink::{LogSink, NullSink, TraceSink};
pub use subscriber::{env_filter, init_logging, level_for_verbosity};
