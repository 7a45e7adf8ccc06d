//! The per-tick motion controller.

use std::sync::Arc;
use std::time::Instant;

use legion_gait::{GaitSequencer, GaitState, MotionCommand, PhaseIssued, RestAction, RestController};
use legion_geometry::{LegId, LegMap, RobotConfig, Site};
use legion_kinematics::{ActuatorSink, JointAngles, Kinematics, write_leg};
use legion_scheduler::TickInfo;
use legion_tracing::{MotionTraceEvent, TraceSink};
use legion_trajectory::{Interpolator, RobotState};
use tracing::info;

use crate::error::EngineResult;
use crate::mailbox::CommandMailbox;

/// What one tick did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    /// Tick number
    pub tick: u64,
    /// Sequencer state after the tick
    pub state: GaitState,
    /// Phase issued this tick, if any
    pub phase: Option<PhaseIssued>,
    /// A command was taken from the mailbox
    pub command_received: bool,
    /// The taken command was refused
    pub command_rejected: bool,
    /// The rest controller asked to park
    pub parked: bool,
    /// Every foot is at its target after interpolation
    pub arrived: bool,
    /// Fault events raised this tick
    pub faults: u32,
}

/// Owns the robot state and every motion component, and runs them in a
/// fixed order once per tick:
///
/// 1. take at most one command from the mailbox
/// 2. hand it to the rest controller and the sequencer
/// 3. advance the sequencer if the current phase has arrived
/// 4. let the rest controller observe idleness and park if due
/// 5. interpolate every foot one step
/// 6. solve joint angles per leg and write all twelve to the actuators
///
/// Faults never stop the tick: unreachable sites and out-of-range joints are
/// clamped, non-finite sites hold that leg's last angles, and refused
/// commands leave the current motion untouched. Each one is reported to the
/// trace sink.
///
/// # Examples
///
/// ```
/// use legion_engine::MotionController;
/// use legion_gait::{CommandKind, GaitState, MotionCommand};
/// use legion_geometry::{JointId, LegId, RobotConfig};
/// use legion_kinematics::ActuatorSink;
/// use legion_scheduler::{ManualTicks, TickSource};
/// use legion_tracing::NullSink;
///
/// struct Discard;
/// impl ActuatorSink for Discard {
///     fn set_joint_angle(&mut self, _: LegId, _: JointId, _: f32) {}
/// }
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut controller = MotionController::new(RobotConfig::default(), Discard, NullSink)?;
/// let mut ticks = ManualTicks::from_millis(20)?;
///
/// controller.mailbox().post(MotionCommand::new(CommandKind::Forward));
/// let report = controller.tick(ticks.wait_for_tick());
/// assert_eq!(report.state, GaitState::MovingForward);
/// assert!(report.phase.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MotionController<A, T> {
    state: RobotState,
    sequencer: GaitSequencer,
    rest: RestController,
    interpolator: Interpolator,
    kinematics: Kinematics,
    angles: LegMap<JointAngles>,
    mailbox: Arc<CommandMailbox>,
    actuator: A,
    trace: T,
    ticks: u64,
}

impl<A: ActuatorSink, T: TraceSink> MotionController<A, T> {
    /// Controller for a validated copy of `config`.
    ///
    /// The robot starts standing, or seated when `control.start_seated` is
    /// set, and the initial angles are solved from that posture.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EngineError::Config`] when `config` fails validation.
    pub fn new(config: RobotConfig, actuator: A, trace: T) -> EngineResult<Self> {
        config.validate()?;
        let state = if config.control.start_seated {
            RobotState::seated(&config.movement)
        } else {
            RobotState::standing(&config.movement)
        };
        let kinematics = Kinematics::new(config.geometry.clone());
        let angles = LegMap::from_fn(|leg| {
            kinematics
                .solve(state.site_now()[leg], leg)
                .map_or(JointAngles::CENTERED, |s| s.angles)
        });
        info!(
            seated = config.control.start_seated,
            rest_after_ticks = config.control.rest_after_ticks,
            "motion controller ready"
        );
        Ok(Self {
            sequencer: GaitSequencer::new(&config),
            rest: RestController::from_config(&config),
            interpolator: Interpolator::new(),
            kinematics,
            angles,
            mailbox: Arc::new(CommandMailbox::new()),
            state,
            actuator,
            trace,
            ticks: 0,
        })
    }

    /// Run one control tick.
    ///
    /// # RT Safety
    ///
    /// Allocation-free except when a new command plans more phases than the
    /// sequencer queue has room for.
    pub fn tick(&mut self, info: TickInfo) -> TickReport {
        let started = Instant::now();
        let tick = info.tick;
        self.ticks = self.ticks.saturating_add(1);
        let mut faults = 0_u32;

        self.emit(MotionTraceEvent::TickStart {
            tick,
            timestamp_ns: info.timestamp_ns,
        });
        if info.missed_deadline {
            faults += 1;
            self.emit(MotionTraceEvent::DeadlineMiss {
                tick,
                jitter_ns: info.jitter_ns,
            });
        }

        let command = self.mailbox.take();
        let command_received = command.is_some();
        let mut command_rejected = false;
        if let Some(command) = command {
            self.rest.on_command(&mut self.state);
            if let Err(e) = self.sequencer.submit(command) {
                command_rejected = true;
                faults += 1;
                self.emit(MotionTraceEvent::CommandRejected {
                    tick,
                    reason: e.fault(),
                });
            }
        }

        let arrived = Interpolator::arrived(&self.state);
        let mut phase = self.sequencer.advance(&mut self.state, arrived);
        self.report_phase(tick, phase);

        let idle = !command_received && self.sequencer.is_idle();
        let parked = self.rest.on_tick(idle, &mut self.state) == RestAction::Park;
        if parked {
            self.sequencer.park();
            self.emit(MotionTraceEvent::RestEngaged {
                tick,
                idle_ticks: self.state.rest_counter,
            });
            phase = self.sequencer.advance(&mut self.state, arrived);
            self.report_phase(tick, phase);
        }

        let outcome = self.interpolator.step(&mut self.state);
        faults += self.actuate(tick);

        let processing_ns = u64::try_from(started.elapsed().as_nanos()).unwrap_or(u64::MAX);
        self.emit(MotionTraceEvent::TickEnd {
            tick,
            processing_ns,
        });

        TickReport {
            tick,
            state: self.sequencer.state(),
            phase,
            command_received,
            command_rejected,
            parked,
            arrived: outcome.is_arrived(),
            faults,
        }
    }

    /// Solve and write every leg, returning the number of fault events.
    fn actuate(&mut self, tick: u64) -> u32 {
        let mut faults = 0;
        for leg in LegId::ALL {
            let site = self.state.site_now()[leg];
            match self.kinematics.solve(site, leg) {
                Ok(solution) => {
                    if solution.workspace.clamped {
                        faults += 1;
                        self.emit(MotionTraceEvent::WorkspaceClamp {
                            tick,
                            leg,
                            requested_mm: solution.workspace.requested_distance,
                            clamped_mm: solution.workspace.clamped_distance,
                        });
                    }
                    for joint in solution.clamped_joints() {
                        faults += 1;
                        self.emit(MotionTraceEvent::JointClamp {
                            tick,
                            leg,
                            joint,
                            requested_deg: solution.raw.get(joint),
                        });
                    }
                    self.angles[leg] = solution.angles;
                }
                Err(_) => {
                    faults += 1;
                    self.emit(MotionTraceEvent::SiteHeld { tick, leg });
                }
            }
            write_leg(&mut self.actuator, leg, &self.angles[leg]);
        }
        faults
    }

    fn report_phase(&mut self, tick: u64, phase: Option<PhaseIssued>) {
        if let Some(issued) = phase {
            self.emit(MotionTraceEvent::PhaseStarted {
                tick,
                state: issued.state.as_str(),
                phase: issued.kind.as_str(),
                index: issued.index,
            });
        }
    }

    #[inline]
    fn emit(&mut self, event: MotionTraceEvent) {
        if self.trace.is_enabled() {
            self.trace.emit(event);
        }
    }
}

impl<A, T> MotionController<A, T> {
    /// Shared handle producers post commands into.
    pub fn mailbox(&self) -> Arc<CommandMailbox> {
        Arc::clone(&self.mailbox)
    }

    /// Post a command for the next tick.
    pub fn post(&self, command: MotionCommand) -> bool {
        self.mailbox.post(command)
    }

    /// Robot state after the last tick.
    pub fn state(&self) -> &RobotState {
        &self.state
    }

    /// Current foot sites.
    pub fn sites(&self) -> &LegMap<Site> {
        self.state.site_now()
    }

    /// Angles written on the last tick.
    pub fn angles(&self) -> &LegMap<JointAngles> {
        &self.angles
    }

    /// Sequencer state.
    pub fn gait_state(&self) -> GaitState {
        self.sequencer.state()
    }

    /// Whether nothing is moving, queued or waiting in the mailbox.
    pub fn is_settled(&self) -> bool {
        self.sequencer.is_idle() && self.mailbox.is_empty() && Interpolator::arrived(&self.state)
    }

    /// Ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// The gait sequencer.
    pub fn sequencer(&self) -> &GaitSequencer {
        &self.sequencer
    }

    /// The rest controller.
    pub fn rest(&self) -> &RestController {
        &self.rest
    }

    /// The actuator output.
    pub fn actuator(&self) -> &A {
        &self.actuator
    }

    /// The trace sink.
    pub fn trace(&self) -> &T {
        &self.trace
    }

    /// Mutable trace sink, for draining metrics.
    pub fn trace_mut(&mut self) -> &mut T {
        &mut self.trace
    }

    /// Override the current foot sites without planning, for diagnostics.
    pub fn state_mut(&mut self) -> &mut RobotState {
        &mut self.state
    }

    /// Give back the actuator and trace sink.
    pub fn into_parts(self) -> (A, T) {
        (self.actuator, self.trace)
    }
}
