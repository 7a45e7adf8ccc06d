//! Motion commands and their validation.

use core::fmt;
use core::str::FromStr;

use legion_errors::{ValidationError, validate_range};
use legion_geometry::CommandLimits;
use serde::{Deserialize, Serialize};

use crate::error::CommandError;

/// What the robot is asked to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandKind {
    /// Creep forward
    Forward,
    /// Creep backward
    Backward,
    /// Turn in place to the left
    TurnLeft,
    /// Turn in place to the right
    TurnRight,
    /// Raise the body to standing height
    Stand,
    /// Lower the body to seated height
    Sit,
    /// Shift the body to the left without stepping
    BodyLeft,
    /// Shift the body to the right without stepping
    BodyRight,
    /// Tilt the front of the body up
    HeadUp,
    /// Tilt the front of the body down
    HeadDown,
    /// Wave a front leg
    Wave,
    /// Offer a front leg and bob it
    Shake,
    /// Crouch and sway
    Dance,
}

impl CommandKind {
    /// Every command kind.
    pub const ALL: [CommandKind; 13] = [
        CommandKind::Forward,
        CommandKind::Backward,
        CommandKind::TurnLeft,
        CommandKind::TurnRight,
        CommandKind::Stand,
        CommandKind::Sit,
        CommandKind::BodyLeft,
        CommandKind::BodyRight,
        CommandKind::HeadUp,
        CommandKind::HeadDown,
        CommandKind::Wave,
        CommandKind::Shake,
        CommandKind::Dance,
    ];

    /// Stable lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            CommandKind::Forward => "forward",
            CommandKind::Backward => "backward",
            CommandKind::TurnLeft => "turn_left",
            CommandKind::TurnRight => "turn_right",
            CommandKind::Stand => "stand",
            CommandKind::Sit => "sit",
            CommandKind::BodyLeft => "body_left",
            CommandKind::BodyRight => "body_right",
            CommandKind::HeadUp => "head_up",
            CommandKind::HeadDown => "head_down",
            CommandKind::Wave => "wave",
            CommandKind::Shake => "shake",
            CommandKind::Dance => "dance",
        }
    }

    /// Repetitions performed when a command leaves `steps` unset.
    pub const fn default_steps(self) -> u32 {
        match self {
            CommandKind::Wave | CommandKind::Shake => 3,
            CommandKind::Dance => 5,
            _ => 1,
        }
    }

    /// Whether the command moves feet along the ground.
    pub const fn is_locomotion(self) -> bool {
        matches!(
            self,
            CommandKind::Forward | CommandKind::Backward | CommandKind::TurnLeft | CommandKind::TurnRight
        )
    }

    /// Whether the command takes an `amount` in millimetres.
    pub const fn takes_amount(self) -> bool {
        matches!(
            self,
            CommandKind::BodyLeft | CommandKind::BodyRight | CommandKind::HeadUp | CommandKind::HeadDown
        )
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandKind {
    type Err = CommandError;

    /// Accepts the snake_case name, with `-` allowed in place of `_`, and a
    /// few short aliases.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase().replace('-', "_");
        let kind = match name.as_str() {
            "forward" | "fwd" => CommandKind::Forward,
            "backward" | "back" => CommandKind::Backward,
            "turn_left" | "left" => CommandKind::TurnLeft,
            "turn_right" | "right" => CommandKind::TurnRight,
            "stand" | "stop" => CommandKind::Stand,
            "sit" => CommandKind::Sit,
            "body_left" => CommandKind::BodyLeft,
            "body_right" => CommandKind::BodyRight,
            "head_up" => CommandKind::HeadUp,
            "head_down" => CommandKind::HeadDown,
            "wave" | "hand_wave" => CommandKind::Wave,
            "shake" | "hand_shake" => CommandKind::Shake,
            "dance" => CommandKind::Dance,
            _ => return Err(CommandError::UnknownCommand(s.trim().to_string())),
        };
        Ok(kind)
    }
}

/// A request for motion, as posted by a producer.
///
/// # Examples
///
/// ```
/// use legion_gait::{CommandKind, MotionCommand};
/// use legion_geometry::CommandLimits;
///
/// let cmd = MotionCommand::new(CommandKind::Forward).with_steps(3).with_speed_multiple(1.5);
/// assert!(cmd.validate(&CommandLimits::default()).is_ok());
/// assert!(MotionCommand::new(CommandKind::Forward).with_steps(0).validate(&CommandLimits::default()).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionCommand {
    /// What to do
    pub kind: CommandKind,
    /// Steps or repetitions; [`CommandKind::default_steps`] when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    /// Rate multiplier for the whole command
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed_multiple: Option<f32>,
    /// Offset for body and head commands, in millimetres
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f32>,
}

impl MotionCommand {
    /// A command with every parameter left at its default.
    pub const fn new(kind: CommandKind) -> Self {
        Self {
            kind,
            steps: None,
            speed_multiple: None,
            amount: None,
        }
    }

    /// Set the step or repetition count.
    pub const fn with_steps(mut self, steps: u32) -> Self {
        self.steps = Some(steps);
        self
    }

    /// Set the rate multiplier.
    pub const fn with_speed_multiple(mut self, speed_multiple: f32) -> Self {
        self.speed_multiple = Some(speed_multiple);
        self
    }

    /// Set the body or head offset.
    pub const fn with_amount(mut self, amount: f32) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Step or repetition count after defaults.
    pub fn steps_or_default(&self) -> u32 {
        self.steps.unwrap_or(self.kind.default_steps())
    }

    /// Check every parameter against `limits`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidCommand`] naming the first offending
    /// parameter.
    pub fn validate(&self, limits: &CommandLimits) -> Result<(), CommandError> {
        self.check(limits).map_err(|e| CommandError::invalid(self.kind, e))
    }

    fn check(&self, limits: &CommandLimits) -> Result<(), ValidationError> {
        if let Some(steps) = self.steps {
            validate_range!("steps", steps, 1, limits.max_steps);
        }
        if let Some(multiple) = self.speed_multiple {
            if !multiple.is_finite() {
                return Err(ValidationError::non_finite("speed_multiple"));
            }
            validate_range!(
                "speed_multiple",
                multiple,
                limits.min_speed_multiple,
                limits.max_speed_multiple
            );
        }
        if let Some(amount) = self.amount {
            if !amount.is_finite() {
                return Err(ValidationError::non_finite("amount"));
            }
            if amount <= 0.0 {
                return Err(ValidationError::non_positive("amount", amount));
            }
            validate_range!("amount", amount, 0.0, limits.max_pose_offset);
        }
        Ok(())
    }
}

impl From<CommandKind> for MotionCommand {
    fn from(kind: CommandKind) -> Self {
        MotionCommand::new(kind)
    }
}
