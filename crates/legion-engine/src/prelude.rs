//! Convenience re-exports for embedding the controller.

pub use crate::{
    CommandMailbox, EngineError, EngineResult, MotionController, MotionEngine, RunSummary,
    TickReport,
};
