//! Wave, shake and dance.

use legion_geometry::{KEEP, LegId, LegMap, Site, SiteTarget};

use super::{PlanBuilder, pose, stance};
use crate::phase::PhaseKind;

/// Wave a front leg between the two turn points `times` times.
pub(super) fn wave(b: &mut PlanBuilder<'_>, times: u32) {
    let height = b.gestures().wave_height;
    let turn = *b.turn();
    let strokes = [
        Site::new(turn.turn_x1, turn.turn_y1, height),
        Site::new(turn.turn_x0, turn.turn_y0, height),
    ];
    front_leg_gesture(b, times, strokes);
}

/// Offer a front leg and bob it up and down `times` times.
pub(super) fn shake(b: &mut PlanBuilder<'_>, times: u32) {
    let g = b.gestures();
    let m = b.movement();
    let x = m.x_default - g.shake_reach;
    let y = m.y_start + 2.0 * m.y_step;
    let strokes = [Site::new(x, y, g.shake_high), Site::new(x, y, g.shake_low)];
    front_leg_gesture(b, times, strokes);
}

/// Shift the body away from one front leg, stroke it through `strokes`
/// `times` times, put it back, and undo the shift.
///
/// The leg whose diagonal partner is planted behind gestures: the front-left
/// leg when the rear-left foot sits at `y_start`, the front-right otherwise.
fn front_leg_gesture(b: &mut PlanBuilder<'_>, times: u32, strokes: [Site; 2]) {
    let shift = b.gestures().body_shift;
    let shift_speed = b.speeds().pose_speed;
    let stroke_speed = b.speeds().body_move_speed;

    let (leg, offset) = if b.at_start(LegId::RearLeft) {
        (LegId::FrontLeft, shift)
    } else {
        (LegId::FrontRight, -shift)
    };

    pose::body_shift(b, offset, shift_speed);
    let rest = b.site(leg);
    for _ in 0..times {
        for site in strokes {
            b.one(PhaseKind::Swing, leg, site, stroke_speed, false);
        }
    }
    b.one(PhaseKind::Plant, leg, rest, stroke_speed, true);
    pose::body_shift(b, -offset, shift_speed);
}

/// Sit, crouch with the feet centred, and sway `times` times with rising
/// speed before standing back up in the neutral stance.
pub(super) fn dance(b: &mut PlanBuilder<'_>, times: u32) {
    let m = b.movement().clone();
    let g = b.gestures().clone();
    let speeds = b.speeds().clone();

    pose::sit(b);
    let centred = SiteTarget::new(m.x_default, m.y_default, KEEP);
    b.push(PhaseKind::Pose, LegMap::splat(centred), speeds.pose_speed, true);
    let crouch = SiteTarget::new(m.x_default, m.y_default, m.z_default - g.dance_drop);
    b.push(PhaseKind::Pose, LegMap::splat(crouch), speeds.pose_speed, true);
    pose::head_tilt(b, g.dance_tilt, speeds.dance_speed);

    let forward = sway(m.y_default, g.dance_sway);
    let backward = sway(m.y_default, -g.dance_sway);
    let quarter = f64::from(times) / 4.0;
    let half = f64::from(times) / 2.0;
    for j in 0..times {
        let beat = f64::from(j);
        let factor = if beat > half {
            3.0
        } else if beat > quarter {
            2.0
        } else {
            1.0
        };
        let speed = speeds.dance_speed * factor;
        b.push(PhaseKind::Pose, forward, speed, true);
        b.push(PhaseKind::Pose, backward, speed, true);
    }
    pose::head_tilt(b, -g.dance_tilt, speeds.dance_speed);

    pose::sit(b);
    let layout = b.planner.layout();
    let home = stance(&layout, false).map(|_, s| SiteTarget::new(s.x, s.y, KEEP));
    b.push(PhaseKind::Pose, home, speeds.pose_speed, true);
    pose::stand(b);
}

/// Front feet `offset` behind `y`, rear feet `offset` ahead of it.
fn sway(y: f32, offset: f32) -> LegMap<SiteTarget> {
    LegMap::from_fn(|leg| {
        let y = if leg.is_front() { y - offset } else { y + offset };
        SiteTarget::new(KEEP, y, KEEP)
    })
}
