//! Height changes and body posture adjustments.

use legion_geometry::{KEEP, LegMap, SiteTarget};

use super::PlanBuilder;
use crate::phase::PhaseKind;

/// All feet to standing height.
pub(super) fn stand(b: &mut PlanBuilder<'_>) {
    let z = b.movement().z_default;
    let speed = b.speeds().stand_seat_speed;
    b.push(PhaseKind::Rise, height(z), speed, true);
}

/// All feet to seated height.
pub(super) fn sit(b: &mut PlanBuilder<'_>) {
    let z = b.movement().z_boot;
    let speed = b.speeds().stand_seat_speed;
    b.push(PhaseKind::Lower, height(z), speed, true);
}

/// Slide the body sideways by moving every foot the opposite way.
///
/// Positive `offset` moves the body to the right: right feet move inward,
/// left feet outward.
pub(super) fn body_shift(b: &mut PlanBuilder<'_>, offset: f32, speed: f32) {
    let targets = b.sites.map(|leg, site| {
        let x = if leg.is_left() { site.x + offset } else { site.x - offset };
        SiteTarget::new(x, KEEP, KEEP)
    });
    b.push(PhaseKind::Pose, targets, speed, true);
}

/// Pitch the body by pushing the front feet down and drawing the rear feet up.
///
/// Positive `lift` raises the front of the body.
pub(super) fn head_tilt(b: &mut PlanBuilder<'_>, lift: f32, speed: f32) {
    let targets = b.sites.map(|leg, site| {
        let z = if leg.is_front() { site.z - lift } else { site.z + lift };
        SiteTarget::new(KEEP, KEEP, z)
    });
    b.push(PhaseKind::Pose, targets, speed, true);
}

fn height(z: f32) -> LegMap<SiteTarget> {
    LegMap::splat(SiteTarget::new(KEEP, KEEP, z))
}

#[cfg(test)]
mod tests {
    use legion_geometry::{LegId, RobotConfig};
    use legion_test_helpers::prelude::*;

    use super::super::Planner;
    use crate::command::{CommandKind, MotionCommand};
    use crate::phase::PhaseKind;

    #[test]
    fn test_body_left_moves_right_feet_out() -> TestResult {
        let planner = Planner::new(&RobotConfig::default());
        let start = planner.movement().neutral_stance();
        let plan = planner.plan(&MotionCommand::new(CommandKind::BodyLeft).with_amount(10.0), start);
        let phase = must_some(plan.front().copied(), "pose phase");
        assert_eq!(phase.kind, PhaseKind::Pose);

        let fr = phase.targets[LegId::FrontRight].resolve(&start[LegId::FrontRight]);
        let fl = phase.targets[LegId::FrontLeft].resolve(&start[LegId::FrontLeft]);
        assert_approx_eq!(fr.x, start[LegId::FrontRight].x + 10.0, 1e-5);
        assert_approx_eq!(fl.x, start[LegId::FrontLeft].x - 10.0, 1e-5);
        assert!(phase.targets[LegId::FrontRight].y.is_keep());
        Ok(())
    }

    #[test]
    fn test_head_up_lowers_front_feet() -> TestResult {
        let planner = Planner::new(&RobotConfig::default());
        let start = planner.movement().neutral_stance();
        let plan = planner.plan(&MotionCommand::new(CommandKind::HeadUp), start);
        let phase = must_some(plan.front().copied(), "pose phase");
        let z = planner.movement().z_default;
        let shift = RobotConfig::default().gestures.body_shift;
        let front = phase.targets[LegId::FrontLeft].resolve(&start[LegId::FrontLeft]);
        let rear = phase.targets[LegId::RearRight].resolve(&start[LegId::RearRight]);
        assert_approx_eq!(front.z, z - shift, 1e-5);
        assert_approx_eq!(rear.z, z + shift, 1e-5);
        Ok(())
    }

    #[test]
    fn test_sit_keeps_feet_in_place() -> TestResult {
        let planner = Planner::new(&RobotConfig::default());
        let plan = planner.plan(&MotionCommand::new(CommandKind::Sit), planner.movement().neutral_stance());
        let phase = must_some(plan.front().copied(), "lower phase");
        assert_eq!(phase.kind, PhaseKind::Lower);
        for (_, target) in phase.targets.iter() {
            assert!(target.x.is_keep() && target.y.is_keep());
            let z = must_some(target.z.value(), "z target");
            assert_approx_eq!(z, planner.movement().z_boot, 1e-6);
        }
        Ok(())
    }
}
