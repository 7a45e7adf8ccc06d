//! Common imports for driving the sequencer.

pub use crate::{
    CommandError, CommandKind, GaitSequencer, GaitState, MotionCommand, Phase, PhaseIssued,
    PhaseKind, RestAction, RestController,
};
