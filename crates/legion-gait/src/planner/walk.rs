//! Creep gait: one foot in the air at a time.
//!
//! A step moves the two legs of one diagonal group. The leading leg strides
//! two step lengths, the body shifts over the new support, then the trailing
//! leg strides back to `y_start`. Which group leads is read from the current
//! stance so consecutive steps alternate.

use legion_geometry::{LegId, Site};

use super::{Layout, PlanBuilder, legs};
use crate::phase::PhaseKind;

#[derive(Debug, Clone, Copy)]
enum Row {
    Start,
    Mid,
    Far,
}

#[derive(Debug, Clone, Copy)]
enum Side {
    Out,
    In,
}

struct WalkStep {
    lead: LegId,
    trail: LegId,
    /// Feet after the body shift, as front-left, front-right, rear-left, rear-right.
    shift: [(Side, Row); 4],
}

const FORWARD_LEFT_LEADS: WalkStep = WalkStep {
    lead: LegId::FrontLeft,
    trail: LegId::RearRight,
    shift: [
        (Side::In, Row::Mid),
        (Side::Out, Row::Start),
        (Side::In, Row::Mid),
        (Side::Out, Row::Far),
    ],
};

const FORWARD_RIGHT_LEADS: WalkStep = WalkStep {
    lead: LegId::FrontRight,
    trail: LegId::RearLeft,
    shift: [
        (Side::Out, Row::Start),
        (Side::In, Row::Mid),
        (Side::Out, Row::Far),
        (Side::In, Row::Mid),
    ],
};

const BACKWARD_LEFT_LEADS: WalkStep = WalkStep {
    lead: LegId::RearLeft,
    trail: LegId::FrontRight,
    shift: [
        (Side::In, Row::Mid),
        (Side::Out, Row::Far),
        (Side::In, Row::Mid),
        (Side::Out, Row::Start),
    ],
};

const BACKWARD_RIGHT_LEADS: WalkStep = WalkStep {
    lead: LegId::RearRight,
    trail: LegId::FrontLeft,
    shift: [
        (Side::Out, Row::Far),
        (Side::In, Row::Mid),
        (Side::Out, Row::Start),
        (Side::In, Row::Mid),
    ],
};

/// Queue one forward step.
pub(super) fn forward(b: &mut PlanBuilder<'_>) {
    let step = if b.at_start(LegId::FrontLeft) {
        &FORWARD_LEFT_LEADS
    } else {
        &FORWARD_RIGHT_LEADS
    };
    push_step(b, step);
}

/// Queue one backward step.
pub(super) fn backward(b: &mut PlanBuilder<'_>) {
    let step = if b.at_start(LegId::RearLeft) {
        &BACKWARD_LEFT_LEADS
    } else {
        &BACKWARD_RIGHT_LEADS
    };
    push_step(b, step);
}

fn push_step(b: &mut PlanBuilder<'_>, step: &WalkStep) {
    let layout = b.layout();
    let leg_speed = b.speeds().leg_move_speed;
    let body_speed = b.speeds().body_move_speed;

    stride(b, step.lead, layout.y_start, layout.y_far, leg_speed);

    let [fl, fr, rl, rr] = step.shift.map(|(side, row)| ground_site(&layout, side, row));
    b.all(PhaseKind::BodyShift, legs(fl, fr, rl, rr), body_speed, true);

    stride(b, step.trail, layout.y_far, layout.y_start, leg_speed);
}

/// Lift `leg`, carry it from `from_y` to `to_y`, and put it down.
fn stride(b: &mut PlanBuilder<'_>, leg: LegId, from_y: f32, to_y: f32, speed: f32) {
    let layout = b.layout();
    let x = layout.x_out;
    b.one(PhaseKind::Lift, leg, Site::new(x, from_y, layout.z_up), speed, false);
    b.one(PhaseKind::Swing, leg, Site::new(x, to_y, layout.z_up), speed, false);
    b.one(PhaseKind::Plant, leg, Site::new(x, to_y, layout.z_ground), speed, true);
}

fn ground_site(layout: &Layout, side: Side, row: Row) -> Site {
    let x = match side {
        Side::Out => layout.x_out,
        Side::In => layout.x_in,
    };
    let y = match row {
        Row::Start => layout.y_start,
        Row::Mid => layout.y_mid,
        Row::Far => layout.y_far,
    };
    Site::new(x, y, layout.z_ground)
}
