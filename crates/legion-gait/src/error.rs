//! Command errors.

use legion_errors::{LegionError, MotionFault, ValidationError};

use crate::command::CommandKind;

/// Reasons a motion command is refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    /// A parameter is outside its accepted range
    #[error("invalid {kind} command: {source}")]
    InvalidCommand {
        /// Command that was refused
        kind: CommandKind,
        /// Offending parameter
        #[source]
        source: ValidationError,
    },

    /// The command name is not recognised
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
}

impl CommandError {
    /// Fault code reported for this error.
    pub fn fault(&self) -> MotionFault {
        MotionFault::InvalidCommand
    }

    pub(crate) fn invalid(kind: CommandKind, source: ValidationError) -> Self {
        CommandError::InvalidCommand { kind, source }
    }
}

impl From<CommandError> for LegionError {
    fn from(e: CommandError) -> Self {
        match e {
            CommandError::InvalidCommand { source, .. } => LegionError::Validation(source),
            CommandError::UnknownCommand(name) => {
                LegionError::Validation(ValidationError::constraint(format!("unknown command '{name}'")))
            }
        }
    }
}
