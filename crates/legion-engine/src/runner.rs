//! Driving the controller from a tick source.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use legion_geometry::RobotConfig;
use legion_kinematics::ActuatorSink;
use legion_scheduler::{AbsoluteScheduler, JitterSummary, TickSource};
use legion_tracing::TraceSink;
use tracing::info;

use crate::controller::{MotionController, TickReport};
use crate::error::EngineResult;
use crate::mailbox::CommandMailbox;

/// Totals over a run of ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Ticks executed
    pub ticks: u64,
    /// Phases issued
    pub phases: u64,
    /// Commands taken from the mailbox
    pub commands: u64,
    /// Commands refused
    pub rejected: u64,
    /// Times the robot parked
    pub parks: u64,
    /// Ticks that started late
    pub deadline_misses: u64,
    /// Fault events of any kind
    pub faults: u64,
}

impl RunSummary {
    fn record(&mut self, report: &TickReport, missed_deadline: bool) {
        self.ticks += 1;
        self.phases += u64::from(report.phase.is_some());
        self.commands += u64::from(report.command_received);
        self.rejected += u64::from(report.command_rejected);
        self.parks += u64::from(report.parked);
        self.deadline_misses += u64::from(missed_deadline);
        self.faults += u64::from(report.faults);
    }
}

/// A controller paired with the tick source that paces it.
///
/// The loop runs on the caller's thread. Producers on other threads post
/// through [`MotionEngine::mailbox`]; a stop flag from
/// [`MotionEngine::stop_handle`] ends [`MotionEngine::run`] between ticks.
#[derive(Debug)]
pub struct MotionEngine<A, T, S> {
    controller: MotionController<A, T>,
    ticks: S,
    running: Arc<AtomicBool>,
}

impl<A: ActuatorSink, T: TraceSink> MotionEngine<A, T, AbsoluteScheduler> {
    /// Engine on a wall-clock scheduler using `control.tick_period_ms`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EngineError`] if the configuration is invalid or the
    /// period is zero.
    pub fn from_config(config: RobotConfig, actuator: A, trace: T) -> EngineResult<Self> {
        let scheduler = AbsoluteScheduler::from_millis(config.control.tick_period_ms)?;
        let controller = MotionController::new(config, actuator, trace)?;
        Ok(Self::new(controller, scheduler))
    }
}

impl<A: ActuatorSink, T: TraceSink, S: TickSource> MotionEngine<A, T, S> {
    /// Pair a controller with a tick source.
    pub fn new(controller: MotionController<A, T>, ticks: S) -> Self {
        Self {
            controller,
            ticks,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Wait for the next tick and run it.
    pub fn step(&mut self) -> TickReport {
        let info = self.ticks.wait_for_tick();
        self.controller.tick(info)
    }

    /// Run exactly `ticks` ticks.
    pub fn run_for(&mut self, ticks: u64) -> RunSummary {
        let mut summary = RunSummary::default();
        for _ in 0..ticks {
            self.step_into(&mut summary);
        }
        summary
    }

    /// Run until the robot settles with nothing left to do, or `max_ticks`
    /// have passed.
    pub fn run_until_settled(&mut self, max_ticks: u64) -> RunSummary {
        let mut summary = RunSummary::default();
        while summary.ticks < max_ticks {
            self.step_into(&mut summary);
            if self.controller.is_settled() {
                break;
            }
        }
        summary
    }

    /// Run until the stop handle is cleared.
    pub fn run(&mut self) -> RunSummary {
        self.running.store(true, Ordering::Release);
        info!(period_ms = self.ticks.period().as_millis(), "control loop started");
        let mut summary = RunSummary::default();
        while self.running.load(Ordering::Acquire) {
            self.step_into(&mut summary);
        }
        info!(ticks = summary.ticks, faults = summary.faults, "control loop stopped");
        summary
    }

    /// Flag that [`MotionEngine::run`] polls between ticks; store `false` to
    /// stop it.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    fn step_into(&mut self, summary: &mut RunSummary) {
        let info = self.ticks.wait_for_tick();
        let report = self.controller.tick(info);
        summary.record(&report, info.missed_deadline);
    }
}

impl<A, T, S: TickSource> MotionEngine<A, T, S> {
    /// Producer handle.
    pub fn mailbox(&self) -> Arc<CommandMailbox> {
        self.controller.mailbox()
    }

    /// The controller.
    pub fn controller(&self) -> &MotionController<A, T> {
        &self.controller
    }

    /// Mutable controller.
    pub fn controller_mut(&mut self) -> &mut MotionController<A, T> {
        &mut self.controller
    }

    /// The tick source.
    pub fn tick_source(&self) -> &S {
        &self.ticks
    }

    /// Mutable tick source, for injecting delays into virtual clocks.
    pub fn tick_source_mut(&mut self) -> &mut S {
        &mut self.ticks
    }

    /// Timing figures so far.
    pub fn timing(&mut self) -> JitterSummary {
        self.ticks.metrics_mut().summary()
    }

    /// Split back into controller and tick source.
    pub fn into_parts(self) -> (MotionController<A, T>, S) {
        (self.controller, self.ticks)
    }
}
