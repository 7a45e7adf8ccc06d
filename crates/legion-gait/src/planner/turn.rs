//! Turning in place.
//!
//! A turn step moves one diagonal group. The first leg lifts and the body
//! swings about the turn pivots while it is in the air; the first leg lands,
//! the body swings back across, then the second leg lifts and every foot
//! returns to the opposite canonical stance.

use legion_geometry::{LegId, Site};

use super::{PlanBuilder, legs, stance};
use crate::phase::PhaseKind;

/// Which turn point a foot is sent to.
#[derive(Debug, Clone, Copy)]
enum Pivot {
    /// `(turn_x0, turn_y0)`
    Near,
    /// `(turn_x1, turn_y1)`
    Far,
}

/// Lateral sign of `x_offset` for a foot.
#[derive(Debug, Clone, Copy)]
enum Side {
    Out,
    In,
}

impl Side {
    fn flip(self) -> Side {
        match self {
            Side::Out => Side::In,
            Side::In => Side::Out,
        }
    }
}

struct TurnStep {
    first: LegId,
    second: LegId,
    /// Feet during the first swing, as front-left, front-right, rear-left,
    /// rear-right. The second swing uses the same pivots with the side flipped.
    swing: [(Pivot, Side); 4],
    /// Whether the step ends with the right feet at `y_start`.
    ends_right_back: bool,
}

const RIGHT_FROM_LEFT_BACK: TurnStep = TurnStep {
    first: LegId::FrontLeft,
    second: LegId::FrontRight,
    swing: [
        (Pivot::Near, Side::Out),
        (Pivot::Near, Side::In),
        (Pivot::Far, Side::Out),
        (Pivot::Far, Side::In),
    ],
    ends_right_back: true,
};

const RIGHT_FROM_RIGHT_BACK: TurnStep = TurnStep {
    first: LegId::RearRight,
    second: LegId::RearLeft,
    swing: [
        (Pivot::Far, Side::In),
        (Pivot::Far, Side::Out),
        (Pivot::Near, Side::In),
        (Pivot::Near, Side::Out),
    ],
    ends_right_back: false,
};

const LEFT_FROM_LEFT_BACK: TurnStep = TurnStep {
    first: LegId::RearLeft,
    second: LegId::RearRight,
    swing: [
        (Pivot::Far, Side::Out),
        (Pivot::Far, Side::In),
        (Pivot::Near, Side::Out),
        (Pivot::Near, Side::In),
    ],
    ends_right_back: true,
};

const LEFT_FROM_RIGHT_BACK: TurnStep = TurnStep {
    first: LegId::FrontRight,
    second: LegId::FrontLeft,
    swing: [
        (Pivot::Near, Side::In),
        (Pivot::Near, Side::Out),
        (Pivot::Far, Side::In),
        (Pivot::Far, Side::Out),
    ],
    ends_right_back: false,
};

/// Queue one step turning right.
pub(super) fn right(b: &mut PlanBuilder<'_>) {
    let step = if b.at_start(LegId::FrontLeft) {
        &RIGHT_FROM_LEFT_BACK
    } else {
        &RIGHT_FROM_RIGHT_BACK
    };
    push_step(b, step);
}

/// Queue one step turning left.
pub(super) fn left(b: &mut PlanBuilder<'_>) {
    let step = if b.at_start(LegId::RearLeft) {
        &LEFT_FROM_LEFT_BACK
    } else {
        &LEFT_FROM_RIGHT_BACK
    };
    push_step(b, step);
}

fn push_step(b: &mut PlanBuilder<'_>, step: &TurnStep) {
    let layout = b.layout();
    let turn = *b.turn();
    let speed = b.speeds().spot_turn_speed;
    let offset = b.movement().x_offset;

    let point = |(pivot, side): (Pivot, Side), z: f32| {
        let (x, y) = match pivot {
            Pivot::Near => (turn.turn_x0, turn.turn_y0),
            Pivot::Far => (turn.turn_x1, turn.turn_y1),
        };
        let x = match side {
            Side::Out => x + offset,
            Side::In => x - offset,
        };
        Site::new(x, y, z)
    };
    let landing = point((Pivot::Near, Side::Out), layout.z_ground);

    b.one(
        PhaseKind::Lift,
        step.first,
        Site::new(layout.x_out, layout.y_start, layout.z_up),
        speed,
        false,
    );

    let [fl, fr, rl, rr] = step.swing;
    let first_swing = legs(fl, fr, rl, rr).map(|leg, slot| {
        let z = if leg == step.first { layout.z_up } else { layout.z_ground };
        point(slot, z)
    });
    b.all(PhaseKind::BodyShift, first_swing, speed, false);
    b.one(PhaseKind::Plant, step.first, landing, speed, true);

    let second_swing =
        legs(fl, fr, rl, rr).map(|_, (pivot, side)| point((pivot, side.flip()), layout.z_ground));
    b.all(PhaseKind::BodyShift, second_swing, speed, true);

    b.one(
        PhaseKind::Lift,
        step.second,
        Site::new(landing.x, landing.y, layout.z_up),
        speed,
        false,
    );

    let end = stance(&layout, step.ends_right_back);
    let mut carried = end;
    carried[step.second].z = layout.z_up;
    b.all(PhaseKind::BodyShift, carried, speed, false);
    b.one(PhaseKind::Plant, step.second, end[step.second], speed, true);
}

#[cfg(test)]
mod tests {
    use legion_geometry::{LegMap, RobotConfig, Site};

    use super::super::{Planner, stance};
    use crate::command::{CommandKind, MotionCommand};
    use crate::phase::PhaseKind;

    fn run(planner: &Planner, kind: CommandKind, steps: u32, from: LegMap<Site>) -> LegMap<Site> {
        let mut sites = from;
        for phase in planner.plan(&MotionCommand::new(kind).with_steps(steps), from) {
            for (leg, target) in phase.targets.iter() {
                sites[leg] = target.resolve(&sites[leg]);
            }
        }
        sites
    }

    #[test]
    fn test_turn_step_toggles_stance() {
        let planner = Planner::new(&RobotConfig::default());
        let layout = planner.layout();
        let start = stance(&layout, false);
        assert_eq!(run(&planner, CommandKind::TurnRight, 1, start), stance(&layout, true));
        assert_eq!(run(&planner, CommandKind::TurnLeft, 1, start), stance(&layout, true));
    }

    #[test]
    fn test_left_then_right_returns_home() {
        let planner = Planner::new(&RobotConfig::default());
        let start = planner.movement().neutral_stance();
        for steps in 1..=4 {
            let turned = run(&planner, CommandKind::TurnLeft, steps, start);
            let back = run(&planner, CommandKind::TurnRight, steps, turned);
            assert_eq!(back, start, "{steps} steps");
        }
    }

    #[test]
    fn test_turn_runs_at_spot_turn_speed() {
        let config = RobotConfig::default();
        let planner = Planner::new(&config);
        let plan = planner.plan(
            &MotionCommand::new(CommandKind::TurnRight),
            planner.movement().neutral_stance(),
        );
        assert_eq!(plan.len(), 7);
        assert!(plan.iter().all(|p| (p.speed - config.speeds.spot_turn_speed).abs() < f32::EPSILON));
        assert_eq!(plan.back().map(|p| p.kind), Some(PhaseKind::Plant));
    }
}
