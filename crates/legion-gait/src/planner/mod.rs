//! Turns a command into the queue of phases that carries it out.
//!
//! Plans are built eagerly when a command starts, from the sites the feet
//! will occupy once the motion in flight completes. Each pattern writes
//! explicit coordinates taken from the movement constants, so a plan started
//! from a slightly displaced stance converges back onto the canonical
//! stances.

mod gesture;
mod pose;
mod turn;
mod walk;

use std::collections::VecDeque;

use legion_geometry::{
    ARRIVAL_EPSILON, GestureConfig, LegId, LegMap, MovementConfig, RobotConfig, Site, SiteTarget,
    SpeedConfig, TurnGeometry,
};

use crate::command::{CommandKind, MotionCommand};
use crate::phase::{Phase, PhaseKind};

/// Builds phase queues for a fixed robot configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Planner {
    movement: MovementConfig,
    speeds: SpeedConfig,
    gestures: GestureConfig,
    turn: TurnGeometry,
}

impl Planner {
    /// Planner for `config`.
    pub fn new(config: &RobotConfig) -> Self {
        Self {
            movement: config.movement.clone(),
            speeds: config.speeds.clone(),
            gestures: config.gestures.clone(),
            turn: TurnGeometry::derive(&config.geometry, &config.movement),
        }
    }

    /// Movement constants the patterns are built from.
    pub fn movement(&self) -> &MovementConfig {
        &self.movement
    }

    /// Turn constants the turning pattern is built from.
    pub fn turn_geometry(&self) -> &TurnGeometry {
        &self.turn
    }

    /// Whether every foot is at or above seated height.
    pub fn is_seated(&self, sites: &LegMap<Site>) -> bool {
        sites
            .iter()
            .all(|(_, s)| s.z >= self.movement.z_boot - ARRIVAL_EPSILON)
    }

    /// Plan `command` starting from `from`.
    pub fn plan(&self, command: &MotionCommand, from: LegMap<Site>) -> VecDeque<Phase> {
        let mut phases = VecDeque::new();
        self.plan_into(command, from, &mut phases);
        phases
    }

    /// Plan `command` into `phases`, replacing its contents.
    ///
    /// Reuses the buffer's capacity, so steady-state planning does not
    /// allocate once the buffer has grown to the longest plan.
    pub fn plan_into(&self, command: &MotionCommand, from: LegMap<Site>, phases: &mut VecDeque<Phase>) {
        phases.clear();
        let kind = command.kind;
        let steps = command.steps_or_default();
        let amount = command.amount.unwrap_or(self.gestures.body_shift);

        let mut b = PlanBuilder {
            planner: self,
            sites: from,
            phases,
        };

        let stands_first = !matches!(kind, CommandKind::Stand | CommandKind::Sit | CommandKind::Dance);
        if stands_first && self.is_seated(&from) {
            pose::stand(&mut b);
        }

        match kind {
            CommandKind::Forward => (0..steps).for_each(|_| walk::forward(&mut b)),
            CommandKind::Backward => (0..steps).for_each(|_| walk::backward(&mut b)),
            CommandKind::TurnLeft => (0..steps).for_each(|_| turn::left(&mut b)),
            CommandKind::TurnRight => (0..steps).for_each(|_| turn::right(&mut b)),
            CommandKind::Stand => pose::stand(&mut b),
            CommandKind::Sit => pose::sit(&mut b),
            CommandKind::BodyLeft => pose::body_shift(&mut b, -amount, self.speeds.body_move_speed),
            CommandKind::BodyRight => pose::body_shift(&mut b, amount, self.speeds.body_move_speed),
            CommandKind::HeadUp => pose::head_tilt(&mut b, amount, self.speeds.body_move_speed),
            CommandKind::HeadDown => pose::head_tilt(&mut b, -amount, self.speeds.body_move_speed),
            CommandKind::Wave => gesture::wave(&mut b, steps),
            CommandKind::Shake => gesture::shake(&mut b, steps),
            CommandKind::Dance => gesture::dance(&mut b, steps),
        }
    }

    fn layout(&self) -> Layout {
        let m = &self.movement;
        Layout {
            x_out: m.x_default + m.x_offset,
            x_in: m.x_default - m.x_offset,
            y_start: m.y_start,
            y_mid: m.y_start + m.y_step,
            y_far: m.y_start + 2.0 * m.y_step,
            z_ground: m.z_default,
            z_up: m.z_up,
        }
    }
}

/// Canonical coordinates shared by the walking and turning patterns.
#[derive(Debug, Clone, Copy)]
struct Layout {
    /// `x_default + x_offset`
    x_out: f32,
    /// `x_default - x_offset`
    x_in: f32,
    /// `y_start`
    y_start: f32,
    /// `y_start + y_step`
    y_mid: f32,
    /// `y_start + 2 * y_step`
    y_far: f32,
    z_ground: f32,
    z_up: f32,
}

/// Accumulates phases while tracking where each foot will be.
struct PlanBuilder<'a> {
    planner: &'a Planner,
    sites: LegMap<Site>,
    phases: &'a mut VecDeque<Phase>,
}

impl PlanBuilder<'_> {
    fn movement(&self) -> &MovementConfig {
        &self.planner.movement
    }

    fn speeds(&self) -> &SpeedConfig {
        &self.planner.speeds
    }

    fn gestures(&self) -> &GestureConfig {
        &self.planner.gestures
    }

    fn turn(&self) -> &TurnGeometry {
        &self.planner.turn
    }

    fn layout(&self) -> Layout {
        self.planner.layout()
    }

    /// Where `leg` will be once every queued phase completes.
    fn site(&self, leg: LegId) -> Site {
        self.sites[leg]
    }

    /// Whether `leg` sits at `y_start`, which tells the two stances apart.
    fn at_start(&self, leg: LegId) -> bool {
        (self.site(leg).y - self.movement().y_start).abs() <= ARRIVAL_EPSILON
    }

    fn push(&mut self, kind: PhaseKind, targets: LegMap<SiteTarget>, speed: f32, grounded: bool) {
        for (leg, target) in targets.iter() {
            self.sites[leg] = target.resolve(&self.sites[leg]);
        }
        self.phases.push_back(Phase {
            kind,
            targets,
            speed,
            grounded,
        });
    }

    /// Move one leg, holding the others.
    fn one(&mut self, kind: PhaseKind, leg: LegId, site: Site, speed: f32, grounded: bool) {
        let targets = LegMap::from_fn(|l| if l == leg { SiteTarget::to(site) } else { SiteTarget::HOLD });
        self.push(kind, targets, speed, grounded);
    }

    /// Move every leg to an explicit site.
    fn all(&mut self, kind: PhaseKind, sites: LegMap<Site>, speed: f32, grounded: bool) {
        self.push(kind, sites.map(|_, s| SiteTarget::to(s)), speed, grounded);
    }
}

/// Build a per-leg table from one value per leg.
fn legs<T: Copy>(front_left: T, front_right: T, rear_left: T, rear_right: T) -> LegMap<T> {
    LegMap::from_fn(|leg| match leg {
        LegId::FrontLeft => front_left,
        LegId::FrontRight => front_right,
        LegId::RearLeft => rear_left,
        LegId::RearRight => rear_right,
    })
}

/// Stance with the left feet at `y_start` and the right feet one step ahead,
/// or the mirror image when `right_back` is set.
fn stance(layout: &Layout, right_back: bool) -> LegMap<Site> {
    let back = |x| Site::new(x, layout.y_start, layout.z_ground);
    let ahead = Site::new(layout.x_in, layout.y_mid, layout.z_ground);
    LegMap::from_fn(|leg| {
        if leg.is_left() != right_back {
            back(layout.x_out)
        } else {
            ahead
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planner() -> Planner {
        Planner::new(&RobotConfig::default())
    }

    #[test]
    fn test_stance_matches_neutral() {
        let p = planner();
        assert_eq!(stance(&p.layout(), false), p.movement.neutral_stance());
    }

    #[test]
    fn test_seated_plan_stands_first() {
        let p = planner();
        let plan = p.plan(&MotionCommand::new(CommandKind::Forward), p.movement.boot_stance());
        assert_eq!(plan.front().map(|ph| ph.kind), Some(PhaseKind::Rise));

        let plan = p.plan(&MotionCommand::new(CommandKind::Forward), p.movement.neutral_stance());
        assert_eq!(plan.front().map(|ph| ph.kind), Some(PhaseKind::Lift));
    }

    #[test]
    fn test_plan_into_reuses_buffer() {
        let p = planner();
        let mut buf = VecDeque::new();
        p.plan_into(&MotionCommand::new(CommandKind::Stand), p.movement.neutral_stance(), &mut buf);
        assert_eq!(buf.len(), 1);
        p.plan_into(&MotionCommand::new(CommandKind::Sit), p.movement.neutral_stance(), &mut buf);
        assert_eq!(buf.len(), 1);
        assert_eq!(buf.front().map(|ph| ph.kind), Some(PhaseKind::Lower));
    }
}
