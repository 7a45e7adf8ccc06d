//! The gait state machine.
//!
//! The sequencer owns the phase queue of the command in progress and at most
//! one pending command. Once per tick the controller calls
//! [`GaitSequencer::advance`] with whether the interpolator has arrived; the
//! sequencer then issues the next phase, starts the pending command at a
//! stable boundary, or falls back to [`GaitState::Idle`].

use core::fmt;
use std::collections::VecDeque;

use legion_geometry::{CommandLimits, RobotConfig};
use legion_trajectory::RobotState;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::command::{CommandKind, MotionCommand};
use crate::error::CommandError;
use crate::phase::{Phase, PhaseKind};
use crate::planner::Planner;

/// Named states of the sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GaitState {
    /// No command in progress
    #[default]
    Idle,
    /// Rising to standing height
    Standing,
    /// Lowering to seated height
    Sitting,
    /// Creeping forward
    MovingForward,
    /// Creeping backward
    MovingBackward,
    /// Turning left in place
    TurningLeft,
    /// Turning right in place
    TurningRight,
    /// Adjusting body posture
    ShiftingBody,
    /// Performing a wave, shake or dance
    Gesturing,
}

impl GaitState {
    /// State entered while `kind` runs.
    pub const fn for_command(kind: CommandKind) -> Self {
        match kind {
            CommandKind::Forward => GaitState::MovingForward,
            CommandKind::Backward => GaitState::MovingBackward,
            CommandKind::TurnLeft => GaitState::TurningLeft,
            CommandKind::TurnRight => GaitState::TurningRight,
            CommandKind::Stand => GaitState::Standing,
            CommandKind::Sit => GaitState::Sitting,
            CommandKind::BodyLeft | CommandKind::BodyRight | CommandKind::HeadUp | CommandKind::HeadDown => {
                GaitState::ShiftingBody
            }
            CommandKind::Wave | CommandKind::Shake | CommandKind::Dance => GaitState::Gesturing,
        }
    }

    /// Stable snake_case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            GaitState::Idle => "idle",
            GaitState::Standing => "standing",
            GaitState::Sitting => "sitting",
            GaitState::MovingForward => "moving_forward",
            GaitState::MovingBackward => "moving_backward",
            GaitState::TurningLeft => "turning_left",
            GaitState::TurningRight => "turning_right",
            GaitState::ShiftingBody => "shifting_body",
            GaitState::Gesturing => "gesturing",
        }
    }
}

impl fmt::Display for GaitState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A phase the sequencer has just written into the robot state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseIssued {
    /// State the sequencer is in
    pub state: GaitState,
    /// Command the phase belongs to
    pub command: CommandKind,
    /// What the phase does
    pub kind: PhaseKind,
    /// Position of the phase within its command, from zero
    pub index: u16,
    /// Phases in the command
    pub total: u16,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Pending {
    command: MotionCommand,
    parking: bool,
}

/// Explicit finite state machine over a queue of phases.
///
/// # Examples
///
/// ```
/// use legion_gait::{CommandKind, GaitSequencer, GaitState, MotionCommand};
/// use legion_geometry::RobotConfig;
/// use legion_trajectory::{Interpolator, RobotState};
///
/// # fn main() -> Result<(), legion_gait::CommandError> {
/// let config = RobotConfig::default();
/// let mut sequencer = GaitSequencer::new(&config);
/// let mut state = RobotState::standing(&config.movement);
///
/// sequencer.submit(MotionCommand::new(CommandKind::Sit))?;
/// let issued = sequencer.advance(&mut state, true);
/// assert_eq!(issued.map(|p| p.state), Some(GaitState::Sitting));
/// assert!(!Interpolator::arrived(&state));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct GaitSequencer {
    planner: Planner,
    limits: CommandLimits,
    default_speed_multiple: f32,
    state: GaitState,
    command: Option<CommandKind>,
    queue: VecDeque<Phase>,
    current: Option<Phase>,
    phase_index: u16,
    phase_total: u16,
    speed_multiple: f32,
    pending: Option<Pending>,
}

impl GaitSequencer {
    /// Sequencer for `config`, starting idle.
    pub fn new(config: &RobotConfig) -> Self {
        Self {
            planner: Planner::new(config),
            limits: config.limits.clone(),
            default_speed_multiple: config.control.speed_multiple,
            state: GaitState::Idle,
            command: None,
            queue: VecDeque::with_capacity(64),
            current: None,
            phase_index: 0,
            phase_total: 0,
            speed_multiple: config.control.speed_multiple,
            pending: None,
        }
    }

    /// Current state.
    #[inline]
    pub fn state(&self) -> GaitState {
        self.state
    }

    /// Index of the phase in flight within its command.
    #[inline]
    pub fn phase_index(&self) -> u16 {
        self.phase_index
    }

    /// Phase in flight, if any.
    pub fn current_phase(&self) -> Option<&Phase> {
        self.current.as_ref()
    }

    /// Phases still queued after the one in flight.
    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    /// Whether a command is waiting to start.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Idle with nothing pending.
    pub fn is_idle(&self) -> bool {
        self.state == GaitState::Idle && self.pending.is_none()
    }

    /// The planner used to expand commands.
    pub fn planner(&self) -> &Planner {
        &self.planner
    }

    /// Validate `command` and make it the pending command.
    ///
    /// A pending command that has not started yet is replaced.
    ///
    /// # Errors
    ///
    /// Returns [`CommandError::InvalidCommand`] if a parameter is out of
    /// range. The sequencer is left untouched.
    pub fn submit(&mut self, command: MotionCommand) -> Result<(), CommandError> {
        if let Err(e) = command.validate(&self.limits) {
            warn!(command = %command.kind, error = %e, "command rejected");
            return Err(e);
        }
        if let Some(old) = self.pending.replace(Pending {
            command,
            parking: false,
        }) {
            debug!(replaced = %old.command.kind, by = %command.kind, "pending command superseded");
        }
        Ok(())
    }

    /// Queue a sit on behalf of the rest controller.
    pub fn park(&mut self) {
        if self.pending.is_none() {
            self.pending = Some(Pending {
                command: MotionCommand::new(CommandKind::Sit),
                parking: true,
            });
        }
    }

    /// Drop the plan and any pending command and go idle.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.current = None;
        self.pending = None;
        self.command = None;
        self.phase_index = 0;
        self.phase_total = 0;
        self.state = GaitState::Idle;
    }

    /// Advance the machine by one tick.
    ///
    /// Does nothing while the phase in flight is still moving. Once it has
    /// arrived, starts the pending command if the robot stands on all four
    /// feet, then writes the next phase's targets and speed into `state`.
    ///
    /// # RT Safety
    ///
    /// Starting a command plans into a preallocated queue; plans longer than
    /// its capacity grow it once.
    pub fn advance(&mut self, state: &mut RobotState, arrived: bool) -> Option<PhaseIssued> {
        if !arrived {
            return None;
        }

        let at_boundary = self.current.as_ref().is_none_or(|phase| phase.grounded);
        if at_boundary && let Some(pending) = self.pending.take() {
            self.begin(pending, state);
        }

        let Some(phase) = self.queue.pop_front() else {
            self.finish();
            return None;
        };

        if self.current.is_some() {
            self.phase_index = self.phase_index.saturating_add(1);
        }
        state.set_speed_multiple(self.speed_multiple);
        state.set_targets(phase.targets, phase.speed);
        self.current = Some(phase);

        let command = self.command.unwrap_or(CommandKind::Stand);
        debug!(
            state = %self.state,
            phase = %phase.kind,
            index = self.phase_index,
            total = self.phase_total,
            speed = phase.speed,
            "phase issued"
        );
        Some(PhaseIssued {
            state: self.state,
            command,
            kind: phase.kind,
            index: self.phase_index,
            total: self.phase_total,
        })
    }

    fn begin(&mut self, pending: Pending, state: &RobotState) {
        let Pending { command, parking } = pending;
        let from = state.projected_sites();
        self.planner.plan_into(&command, from, &mut self.queue);

        let previous = self.state;
        self.state = GaitState::for_command(command.kind);
        self.command = Some(command.kind);
        self.current = None;
        self.phase_index = 0;
        self.phase_total = u16::try_from(self.queue.len()).unwrap_or(u16::MAX);
        self.speed_multiple = command.speed_multiple.unwrap_or(self.default_speed_multiple);

        info!(
            from = %previous,
            to = %self.state,
            command = %command.kind,
            steps = command.steps_or_default(),
            phases = self.phase_total,
            parking,
            "command started"
        );
    }

    fn finish(&mut self) {
        if self.state != GaitState::Idle {
            info!(from = %self.state, "command complete");
        }
        self.state = GaitState::Idle;
        self.command = None;
        self.current = None;
        self.phase_index = 0;
        self.phase_total = 0;
    }
}
