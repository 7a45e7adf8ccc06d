//! Whole-tick behaviour of the controller and engine.

use std::time::Duration;

use legion_engine::prelude::*;
use legion_errors::MotionFault;
use legion_gait::{CommandKind, GaitState, MotionCommand, PhaseKind};
use legion_geometry::{JointId, LegId, RobotConfig, Site};
use legion_kinematics::{ACTUATOR_MAX_DEG, ACTUATOR_MIN_DEG};
use legion_scheduler::ManualTicks;
use legion_test_helpers::prelude::*;
use legion_tracing::{LogSink, MotionTraceEvent};

type Engine = MotionEngine<RecordingActuator, RecordingTraceSink, ManualTicks>;

struct Rig {
    engine: Engine,
    actuator: RecordingActuator,
    trace: RecordingTraceSink,
}

fn rig(config: RobotConfig) -> Result<Rig, Box<dyn std::error::Error>> {
    let actuator = RecordingActuator::new();
    let trace = RecordingTraceSink::new();
    let controller = MotionController::new(config, actuator.clone(), trace.clone())?;
    let engine = MotionEngine::new(controller, ManualTicks::from_millis(20)?);
    Ok(Rig {
        engine,
        actuator,
        trace,
    })
}

#[test]
fn test_every_tick_writes_twelve_angles_in_range() -> TestResult {
    let mut r = rig(robot_config())?;
    r.engine.mailbox().post(MotionCommand::new(CommandKind::Forward).with_steps(2));
    let summary = r.engine.run_for(50);

    assert_eq!(r.actuator.len() as u64, 12 * summary.ticks);
    for write in r.actuator.writes() {
        assert!(
            (ACTUATOR_MIN_DEG..=ACTUATOR_MAX_DEG).contains(&write.degrees),
            "{write:?}"
        );
    }
    Ok(())
}

#[test]
fn test_posted_command_starts_on_the_next_tick() -> TestResult {
    let mut r = rig(robot_config())?;
    let idle = r.engine.step();
    assert_eq!(idle.state, GaitState::Idle);
    assert!(idle.phase.is_none());

    r.engine.mailbox().post(MotionCommand::new(CommandKind::TurnRight));
    let report = r.engine.step();
    assert!(report.command_received);
    assert_eq!(report.state, GaitState::TurningRight);
    let phase = must_some(report.phase, "first phase");
    assert_eq!(phase.index, 0);
    assert_eq!(r.trace.count("phase_started"), 1);
    Ok(())
}

#[test]
fn test_newer_command_supersedes_untaken_one() -> TestResult {
    let mut r = rig(robot_config())?;
    let mailbox = r.engine.mailbox();
    mailbox.post(MotionCommand::new(CommandKind::Forward));
    mailbox.post(MotionCommand::new(CommandKind::Backward));

    let report = r.engine.step();
    assert_eq!(report.state, GaitState::MovingBackward);
    let stats = mailbox.stats();
    assert_eq!((stats.posted, stats.superseded, stats.taken), (2, 1, 1));
    Ok(())
}

#[test]
fn test_rejected_command_is_traced_and_motion_continues() -> TestResult {
    let mut r = rig(robot_config())?;
    r.engine.mailbox().post(MotionCommand::new(CommandKind::Forward));
    r.engine.run_for(3);

    r.engine
        .mailbox()
        .post(MotionCommand::new(CommandKind::HeadUp).with_speed_multiple(f32::NAN));
    let report = r.engine.step();

    assert!(report.command_rejected);
    assert_eq!(report.state, GaitState::MovingForward);
    assert!(!r.engine.controller().sequencer().has_pending());
    let rejected = r.trace.of_type("command_rejected");
    assert_eq!(rejected.len(), 1);
    assert_eq!(
        rejected.first().and_then(MotionTraceEvent::fault),
        Some(MotionFault::InvalidCommand)
    );
    Ok(())
}

#[test]
fn test_late_tick_is_reported_but_still_actuates() -> TestResult {
    let mut r = rig(robot_config())?;
    r.engine.step();
    r.engine.tick_source_mut().delay_next(Duration::from_millis(25));
    let report = r.engine.step();

    assert!(report.faults >= 1);
    let misses = r.trace.of_type("deadline_miss");
    assert_eq!(
        misses,
        vec![MotionTraceEvent::DeadlineMiss {
            tick: 2,
            jitter_ns: 25_000_000
        }]
    );
    assert_eq!(r.actuator.len(), 24);
    assert_eq!(r.engine.timing().skipped_ticks, 1);
    Ok(())
}

#[test]
fn test_non_finite_site_holds_previous_angles() -> TestResult {
    let mut r = rig(robot_config())?;
    r.engine.step();
    let held = must_some(r.actuator.last_frame(), "first frame");

    let mut sites = *r.engine.controller().sites();
    sites[LegId::FrontLeft] = Site::new(f32::NAN, 0.0, -50.0);
    r.engine.controller_mut().state_mut().reset_to(sites);
    r.actuator.clear();
    r.engine.step();

    assert_eq!(r.actuator.len(), 12);
    let frame = must_some(r.actuator.last_frame(), "second frame");
    assert_eq!(frame[LegId::FrontLeft], held[LegId::FrontLeft]);
    let events = r.trace.of_type("site_held");
    assert_eq!(events.len(), 1);
    assert_eq!(events.first().and_then(MotionTraceEvent::leg), Some(LegId::FrontLeft));
    Ok(())
}

#[test]
fn test_unreachable_site_is_clamped_and_reported() -> TestResult {
    let config = robot_config();
    let g = &config.geometry;
    let far = g.length_a + g.length_b + g.length_c + 30.0;
    let mut r = rig(config.clone())?;

    let mut sites = *r.engine.controller().sites();
    sites[LegId::RearRight] = Site::new(far, 0.0, 0.0);
    r.engine.controller_mut().state_mut().reset_to(sites);
    let report = r.engine.step();

    assert!(report.faults >= 1);
    let clamps = r.trace.of_type("workspace_clamp");
    assert_eq!(clamps.len(), 1);
    match clamps.first() {
        Some(MotionTraceEvent::WorkspaceClamp {
            leg, clamped_mm, ..
        }) => {
            assert_eq!(*leg, LegId::RearRight);
            assert_approx_eq!(*clamped_mm, g.length_b + g.length_c, 1e-3);
        }
        other => return Err(format!("unexpected event {other:?}").into()),
    }
    let hip = must_some(r.actuator.last_angle(LegId::RearRight, JointId::Hip), "hip write");
    assert!((ACTUATOR_MIN_DEG..=ACTUATOR_MAX_DEG).contains(&hip));
    Ok(())
}

#[test]
fn test_idle_engine_parks_once_after_timeout() -> TestResult {
    let config = config_with_rest(25);
    let z_boot = config.movement.z_boot;
    let mut r = rig(config)?;

    let first = r.engine.run_for(24);
    assert_eq!(first.parks, 0);
    let report = r.engine.step();
    assert!(report.parked);
    assert_eq!(report.state, GaitState::Sitting);
    assert!(report.phase.is_some());
    assert_eq!(r.trace.count("rest_engaged"), 1);

    let rest = r.engine.run_for(2_000);
    assert_eq!(rest.parks, 0);
    assert!(r.engine.controller().state().all_feet_at_height(z_boot, 1e-3));
    assert!(r.engine.controller().rest().is_parked());
    Ok(())
}

#[test]
fn test_seated_start_stands_before_moving() -> TestResult {
    let mut config = robot_config();
    config.control.start_seated = true;
    let z_default = config.movement.z_default;
    let mut r = rig(config)?;

    r.engine.mailbox().post(MotionCommand::new(CommandKind::Forward));
    let report = r.engine.step();
    let phase = must_some(report.phase, "rise phase");
    assert_eq!(phase.state, GaitState::MovingForward);
    assert_eq!(phase.kind, PhaseKind::Rise);

    r.engine.run_until_settled(10_000);
    let sites = r.engine.controller().sites();
    assert!(sites.iter().all(|(_, s)| (s.z - z_default).abs() < 1e-3));
    Ok(())
}

#[test]
fn test_turn_left_then_right_restores_stance() -> TestResult {
    let mut r = rig(robot_config())?;
    let start = *r.engine.controller().sites();

    r.engine.mailbox().post(MotionCommand::new(CommandKind::TurnLeft).with_steps(2));
    r.engine.run_until_settled(20_000);
    r.engine.mailbox().post(MotionCommand::new(CommandKind::TurnRight).with_steps(2));
    let summary = r.engine.run_until_settled(20_000);

    assert_eq!(summary.phases, 14);
    let end = r.engine.controller().sites();
    for leg in LegId::ALL {
        assert_site_approx_eq!(end[leg], start[leg], 1e-3);
    }
    Ok(())
}

#[test]
fn test_log_sink_counts_every_tick() -> TestResult {
    let controller = MotionController::new(robot_config(), RecordingActuator::new(), LogSink::new())?;
    let mut engine = MotionEngine::new(controller, ManualTicks::from_millis(20)?);
    engine.mailbox().post(MotionCommand::new(CommandKind::Shake).with_steps(0));
    let summary = engine.run_for(40);

    let metrics = engine.controller().trace().metrics();
    assert_eq!(metrics.ticks, 40);
    assert_eq!(metrics.commands_rejected, 1);
    assert_eq!(summary.rejected, 1);
    Ok(())
}

#[test]
fn test_invalid_config_is_refused() {
    let mut config = robot_config();
    config.control.tick_period_ms = 0;
    let err = must_err(MotionEngine::from_config(
        config,
        RecordingActuator::new(),
        RecordingTraceSink::new(),
    ));
    insta::assert_snapshot!(err.to_string(), @"scheduler setup failed: tick period must be positive");
}
