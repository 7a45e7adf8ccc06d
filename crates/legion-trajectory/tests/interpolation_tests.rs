//! Interpolation scenarios and properties.

use legion_geometry::{KEEP, LegId, LegMap, MovementConfig, Site, SiteTarget};
use legion_test_helpers::prelude::*;
use legion_trajectory::{Interpolator, RobotState, StepOutcome};
use proptest::prelude::*;

fn run_to_arrival(interp: &mut Interpolator, state: &mut RobotState, limit: u32) -> Option<u32> {
    for tick in 1..=limit {
        if interp.step(state).is_arrived() {
            return Some(tick);
        }
    }
    None
}

#[test]
fn test_step_up_scenario_needs_three_ticks_and_lands_exactly() {
    let m = MovementConfig::default();
    let start = Site::new(m.x_default, m.y_default, m.z_default);
    let goal = Site::new(m.x_default, m.y_default + m.y_step, m.z_up);
    let mut state = RobotState::at(LegMap::splat(start));
    state.set_target(LegId::FrontLeft, SiteTarget::to(goal));
    state.set_move_speed(15.0);

    let mut interp = Interpolator::new();
    let ticks = must_some(run_to_arrival(&mut interp, &mut state, 10), "never arrived");

    assert_eq!(ticks, 3);
    assert_eq!(state.site_now()[LegId::FrontLeft], goal);
    assert_eq!(state.site_now()[LegId::RearRight], start);
}

#[test]
fn test_keep_axes_are_never_touched() {
    let mut state = RobotState::standing(&MovementConfig::default());
    let before = *state.site_now();
    state.set_targets(LegMap::splat(SiteTarget::new(KEEP, 100.0, KEEP)), 7.0);

    let mut interp = Interpolator::new();
    let mut xs = Vec::new();
    while !interp.step(&mut state).is_arrived() {
        xs.push(state.site_now()[LegId::RearLeft].x);
        for (leg, site) in state.site_now().iter() {
            assert_eq!(site.x.to_bits(), before[leg].x.to_bits());
            assert_eq!(site.z.to_bits(), before[leg].z.to_bits());
        }
    }
    assert!(!xs.is_empty());
    assert!(Interpolator::arrived(&state));
}

#[test]
fn test_arrival_does_not_modify_targets() {
    let mut state = RobotState::standing(&MovementConfig::default());
    let targets = LegMap::from_fn(|leg| {
        if leg.is_front() {
            SiteTarget::new(KEEP, KEEP, -30.0)
        } else {
            SiteTarget::HOLD
        }
    });
    state.set_targets(targets, 5.0);
    let mut interp = Interpolator::new();
    let _ = run_to_arrival(&mut interp, &mut state, 100);
    assert_eq!(*state.site_expect(), targets);
}

#[test]
fn test_stepping_after_arrival_stays_put() {
    let mut state = RobotState::standing(&MovementConfig::default());
    state.set_target(LegId::RearLeft, SiteTarget::new(70.0, KEEP, KEEP));
    let mut interp = Interpolator::new();
    let _ = run_to_arrival(&mut interp, &mut state, 100);
    let settled = *state.site_now();
    assert_eq!(interp.step(&mut state), StepOutcome::Arrived);
    assert_eq!(*state.site_now(), settled);
}

fn axis_target() -> impl Strategy<Value = Option<f32>> {
    prop_oneof![Just(None), (-120.0f32..120.0).prop_map(Some)]
}

fn site_target() -> impl Strategy<Value = SiteTarget> {
    (axis_target(), axis_target(), axis_target()).prop_map(|(x, y, z)| {
        let pick = |v: Option<f32>| v.map_or(KEEP, Into::into);
        SiteTarget::new(pick(x), pick(y), pick(z))
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn test_never_overshoots_and_arrives_together(
        targets in prop::array::uniform4(site_target()),
        rate in 0.5f32..20.0,
        multiple in 0.1f32..4.0,
    ) {
        let mut state = RobotState::standing(&MovementConfig::default());
        let start = *state.site_now();
        state.set_speed_multiple(multiple);
        state.set_targets(LegMap::new(targets), rate);
        let expected_ticks = Interpolator::governing_ticks(&state);

        let mut interp = Interpolator::new();
        let mut ticks = 0u32;
        loop {
            let previous = *state.site_now();
            let outcome = interp.step(&mut state);
            ticks += 1;
            for (leg, site) in state.site_now().iter() {
                let target = state.site_expect()[leg].resolve(&start[leg]);
                for axis in legion_geometry::Axis::ALL {
                    let o = start[leg].axis(axis);
                    let t = target.axis(axis);
                    let v = site.axis(axis);
                    prop_assert!(v >= o.min(t) - 1e-4 && v <= o.max(t) + 1e-4);
                    let prev_gap = (t - previous[leg].axis(axis)).abs();
                    prop_assert!((t - v).abs() <= prev_gap + 1e-4);
                }
            }
            if outcome.is_arrived() {
                break;
            }
            prop_assert!(ticks <= expected_ticks);
        }

        prop_assert_eq!(ticks, expected_ticks.max(1));
        for (leg, site) in state.site_now().iter() {
            prop_assert_eq!(*site, state.site_expect()[leg].resolve(&start[leg]));
        }
    }
}
