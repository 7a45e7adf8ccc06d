//! Running a command script through the engine.

use legion_engine::{EngineResult, MotionController, MotionEngine};
use legion_gait::MotionCommand;
use legion_geometry::{LegId, RobotConfig};
use legion_kinematics::ChannelActuator;
use legion_scheduler::{AbsoluteScheduler, ManualTicks, TickSource};
use legion_tracing::LogSink;
use tracing::{info, warn};

use crate::frame::PwmFrame;
use crate::report::{CommandReport, LegReport, RunReport, TraceReport};

/// Actuator the simulator drives: the configured wiring onto one PWM frame.
pub type SimActuator = ChannelActuator<PwmFrame>;

/// Engine as the simulator builds it.
pub type SimEngine<S> = MotionEngine<SimActuator, LogSink, S>;

/// Limits on a scripted run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunOptions {
    /// Longest a single command may run before the next one is posted
    pub max_ticks_per_command: u64,
    /// Ticks to keep running after the last command
    pub idle_ticks: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            max_ticks_per_command: 20_000,
            idle_ticks: 0,
        }
    }
}

/// Engine on a virtual clock that never sleeps.
///
/// # Errors
///
/// Returns [`legion_engine::EngineError`] if the configuration is invalid.
pub fn simulated_engine(config: RobotConfig) -> EngineResult<SimEngine<ManualTicks>> {
    let ticks = ManualTicks::from_millis(config.control.tick_period_ms)?;
    let actuator = ChannelActuator::new(config.channels.clone(), PwmFrame::new());
    let controller = MotionController::new(config, actuator, LogSink::new())?;
    Ok(MotionEngine::new(controller, ticks))
}

/// Engine paced by the wall clock.
///
/// # Errors
///
/// Returns [`legion_engine::EngineError`] if the configuration is invalid.
pub fn realtime_engine(config: RobotConfig) -> EngineResult<SimEngine<AbsoluteScheduler>> {
    let actuator = ChannelActuator::new(config.channels.clone(), PwmFrame::new());
    MotionEngine::from_config(config, actuator, LogSink::new())
}

/// Post each command in turn, waiting for the robot to settle before the
/// next, then idle for `options.idle_ticks`.
pub fn run_script<S: TickSource>(
    engine: &mut SimEngine<S>,
    commands: &[MotionCommand],
    options: &RunOptions,
) -> RunReport {
    let mut reports = Vec::with_capacity(commands.len());
    for &command in commands {
        engine.mailbox().post(command);
        let summary = engine.run_until_settled(options.max_ticks_per_command);
        let timed_out = !engine.controller().is_settled();
        if timed_out {
            warn!(kind = %command.kind, ticks = summary.ticks, "command did not settle");
        }
        reports.push(CommandReport {
            command,
            ticks: summary.ticks,
            phases: summary.phases,
            rejected: summary.rejected > 0,
            timed_out,
        });
    }
    if options.idle_ticks > 0 {
        let idle = engine.run_for(options.idle_ticks);
        info!(ticks = idle.ticks, parks = idle.parks, "idle period finished");
    }
    report(engine, reports, options.idle_ticks)
}

fn report<S: TickSource>(engine: &mut SimEngine<S>, commands: Vec<CommandReport>, idle_ticks: u64) -> RunReport {
    let timing = engine.timing().into();
    let controller = engine.controller();
    let legs = LegId::ALL
        .into_iter()
        .map(|leg| LegReport::new(leg, controller.sites()[leg], controller.angles()[leg]))
        .collect();
    RunReport {
        commands,
        idle_ticks,
        ticks: controller.ticks(),
        final_state: controller.gait_state(),
        parked: controller.rest().is_parked(),
        legs,
        channels: *controller.actuator().sink().channels(),
        timing,
        trace: TraceReport::from(controller.trace().metrics()),
    }
}
