//! End-to-end sequencing through the interpolator.

use legion_gait::prelude::*;
use legion_geometry::{LegId, LegMap, RobotConfig, Site};
use legion_test_helpers::prelude::*;
use legion_trajectory::{Interpolator, RobotState};
use proptest::prelude::*;

struct Rig {
    sequencer: GaitSequencer,
    rest: RestController,
    interp: Interpolator,
    state: RobotState,
    ticks: u64,
}

impl Rig {
    fn new(config: &RobotConfig) -> Self {
        Self {
            sequencer: GaitSequencer::new(config),
            rest: RestController::from_config(config),
            interp: Interpolator::new(),
            state: RobotState::standing(&config.movement),
            ticks: 0,
        }
    }

    /// One control tick in controller order.
    fn tick(&mut self, command: Option<MotionCommand>) -> (Option<PhaseIssued>, RestAction) {
        let received = command.is_some();
        if let Some(command) = command {
            self.rest.on_command(&mut self.state);
            // Rejections are checked separately.
            let _rejected = self.sequencer.submit(command).is_err();
        }
        let arrived = Interpolator::arrived(&self.state);
        let issued = self.sequencer.advance(&mut self.state, arrived);
        let idle = !received && self.sequencer.is_idle();
        let action = self.rest.on_tick(idle, &mut self.state);
        if action == RestAction::Park {
            self.sequencer.park();
        }
        self.interp.step(&mut self.state);
        self.ticks += 1;
        (issued, action)
    }

    fn run(&mut self, command: MotionCommand) -> usize {
        let mut phases = usize::from(self.tick(Some(command)).0.is_some());
        while !self.sequencer.is_idle() {
            if self.tick(None).0.is_some() {
                phases += 1;
            }
            assert!(self.ticks < 1_000_000, "sequence did not finish");
        }
        phases
    }

    fn sites(&self) -> LegMap<Site> {
        *self.state.site_now()
    }
}

fn assert_stance_eq(actual: &LegMap<Site>, expected: &LegMap<Site>) {
    for leg in LegId::ALL {
        assert_site_approx_eq!(actual[leg], expected[leg], 1e-3);
    }
}

fn mirrored_stance(config: &RobotConfig) -> LegMap<Site> {
    let m = &config.movement;
    LegMap::from_fn(|leg| {
        if leg.is_left() {
            Site::new(m.x_default - m.x_offset, m.y_start + m.y_step, m.z_default)
        } else {
            Site::new(m.x_default + m.x_offset, m.y_start, m.z_default)
        }
    })
}

#[test]
fn test_turn_left_then_right_returns_every_foot() {
    let config = robot_config();
    for steps in [1, 2, 3] {
        let mut rig = Rig::new(&config);
        let start = rig.sites();
        rig.run(MotionCommand::new(CommandKind::TurnLeft).with_steps(steps));
        rig.run(MotionCommand::new(CommandKind::TurnRight).with_steps(steps));
        assert_stance_eq(&rig.sites(), &start);
    }
}

#[test]
fn test_forward_steps_alternate_between_stances() {
    let config = robot_config();
    let mut rig = Rig::new(&config);
    let neutral = config.movement.neutral_stance();

    assert_eq!(rig.run(MotionCommand::new(CommandKind::Forward)), 7);
    assert_stance_eq(&rig.sites(), &mirrored_stance(&config));

    assert_eq!(rig.run(MotionCommand::new(CommandKind::Forward)), 7);
    assert_stance_eq(&rig.sites(), &neutral);
}

#[test]
fn test_at_most_one_foot_is_lifted_while_walking() {
    let config = robot_config();
    let mut rig = Rig::new(&config);
    rig.tick(Some(MotionCommand::new(CommandKind::Backward).with_steps(2)));
    while !rig.sequencer.is_idle() {
        rig.tick(None);
        let lifted = rig
            .sites()
            .iter()
            .filter(|(_, s)| s.z > config.movement.z_default + 1e-3)
            .count();
        assert!(lifted <= 1, "{lifted} feet in the air");
    }
}

#[test]
fn test_invalid_command_does_not_disturb_motion() -> TestResult {
    let config = robot_config();
    let mut sequencer = GaitSequencer::new(&config);
    let mut state = RobotState::standing(&config.movement);

    sequencer.submit(MotionCommand::new(CommandKind::Forward))?;
    let issued = must_some(sequencer.advance(&mut state, true), "first phase");
    let expect = *state.site_expect();

    let err = must_err(sequencer.submit(MotionCommand::new(CommandKind::Forward).with_steps(0)));
    insta::assert_snapshot!(err.to_string(), @"invalid forward command: steps value 0 is out of range [1, 64]");
    assert_eq!(err.fault(), legion_errors::MotionFault::InvalidCommand);

    assert_eq!(sequencer.state(), GaitState::MovingForward);
    assert_eq!(sequencer.phase_index(), issued.index);
    assert_eq!(*state.site_expect(), expect);
    assert!(!sequencer.has_pending());
    Ok(())
}

#[test]
fn test_seated_robot_stands_before_walking() {
    let config = robot_config();
    let mut rig = Rig::new(&config);
    rig.state = RobotState::seated(&config.movement);

    let (issued, _) = rig.tick(Some(MotionCommand::new(CommandKind::Forward)));
    let issued = must_some(issued, "first phase");
    assert_eq!(issued.kind, PhaseKind::Rise);
    assert_eq!(issued.total, 8);
}

#[test]
fn test_idle_robot_parks_after_exactly_the_timeout() {
    let config = config_with_rest(40);
    let mut rig = Rig::new(&config);
    let mut parked_at = None;
    for tick in 1..=39 {
        let (_, action) = rig.tick(None);
        assert_eq!(action, RestAction::None, "tick {tick}");
    }
    let (_, action) = rig.tick(None);
    if action == RestAction::Park {
        parked_at = Some(rig.ticks);
    }
    assert_eq!(parked_at, Some(40));

    // The sit runs, then the robot stays seated without parking again.
    while !rig.sequencer.is_idle() {
        rig.tick(None);
    }
    assert!(rig.state.all_feet_at_height(config.movement.z_boot, 1e-3));
    for _ in 0..200 {
        assert_eq!(rig.tick(None).1, RestAction::None);
    }
}

#[test]
fn test_command_resets_idle_counter() {
    let config = config_with_rest(30);
    let mut rig = Rig::new(&config);
    for _ in 0..20 {
        rig.tick(None);
    }
    assert_eq!(rig.state.rest_counter, 20);
    rig.run(MotionCommand::new(CommandKind::HeadUp).with_amount(5.0));
    assert!(rig.state.rest_counter < 30);
    assert!(!rig.rest.is_parked());
}

#[test]
fn test_gestures_return_to_stance() {
    let config = robot_config();
    for kind in [CommandKind::Wave, CommandKind::Shake, CommandKind::Dance] {
        let mut rig = Rig::new(&config);
        let start = rig.sites();
        rig.run(MotionCommand::new(kind).with_steps(2));
        assert_stance_eq(&rig.sites(), &start);
    }
}

#[test]
fn test_command_round_trips_through_json() -> TestResult {
    let cmd: MotionCommand = serde_json::from_str(r#"{"kind":"turn_left","steps":2}"#)?;
    assert_eq!(cmd, MotionCommand::new(CommandKind::TurnLeft).with_steps(2));
    let text = serde_json::to_string(&MotionCommand::new(CommandKind::Sit))?;
    assert_eq!(text, r#"{"kind":"sit"}"#);
    Ok(())
}

fn locomotion() -> impl Strategy<Value = MotionCommand> {
    (
        prop_oneof![
            Just(CommandKind::Forward),
            Just(CommandKind::Backward),
            Just(CommandKind::TurnLeft),
            Just(CommandKind::TurnRight),
        ],
        1_u32..=3,
    )
        .prop_map(|(kind, steps)| MotionCommand::new(kind).with_steps(steps))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_locomotion_always_ends_in_a_canonical_stance(commands in prop::collection::vec(locomotion(), 1..5)) {
        let config = robot_config();
        let mut rig = Rig::new(&config);
        let neutral = config.movement.neutral_stance();
        let mirrored = mirrored_stance(&config);
        for command in commands {
            rig.run(command);
            let sites = rig.sites();
            let matches = |stance: &LegMap<Site>| LegId::ALL.iter().all(|&leg| sites[leg].approx_eq(&stance[leg], 1e-3));
            prop_assert!(matches(&neutral) || matches(&mirrored));
        }
    }
}
