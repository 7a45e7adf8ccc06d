//! Error types for legion-sim

use legion_errors::ConfigError;
use legion_gait::CommandError;

/// Failures the simulator reports with a dedicated exit code.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// A script token could not be parsed
    #[error("invalid script token '{token}': {reason}")]
    Script {
        /// Token as written
        token: String,
        /// What was wrong with it
        reason: String,
    },

    /// The command name was not recognised
    #[error(transparent)]
    Command(#[from] CommandError),

    /// The configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SimError {
    /// Script error for `token`.
    pub fn script(token: &str, reason: impl Into<String>) -> Self {
        SimError::Script {
            token: token.to_string(),
            reason: reason.into(),
        }
    }

    /// Process exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            SimError::Script { .. } | SimError::Command(_) => 4,
            SimError::Config(_) => 3,
        }
    }
}
