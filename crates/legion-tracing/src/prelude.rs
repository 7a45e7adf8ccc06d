//! Prelude for legion-tracing

pub use crate::{
    EventCategory, LogSink, MotionTraceEvent, NullSink, TraceSink, TracingError, TracingMetrics,
    init_logging,
};
