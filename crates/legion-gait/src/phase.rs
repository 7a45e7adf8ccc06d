//! Phases: the atomic sub-steps a command is broken into.

use core::fmt;

use legion_geometry::{LegId, LegMap, SiteTarget};

/// What a phase does to the feet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    /// Raise one foot off the ground
    Lift,
    /// Move a raised foot
    Swing,
    /// Lower a foot onto the ground
    Plant,
    /// Move all grounded feet together, carrying the body
    BodyShift,
    /// Raise the body to standing height
    Rise,
    /// Lower the body to seated height
    Lower,
    /// Body posture adjustment
    Pose,
}

impl PhaseKind {
    /// Stable lowercase name.
    pub const fn as_str(self) -> &'static str {
        match self {
            PhaseKind::Lift => "lift",
            PhaseKind::Swing => "swing",
            PhaseKind::Plant => "plant",
            PhaseKind::BodyShift => "body_shift",
            PhaseKind::Rise => "rise",
            PhaseKind::Lower => "lower",
            PhaseKind::Pose => "pose",
        }
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One atomic motion: per-leg targets reached together at one speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Phase {
    /// What the phase does
    pub kind: PhaseKind,
    /// Per-leg targets; [`SiteTarget::HOLD`] for legs that stay put
    pub targets: LegMap<SiteTarget>,
    /// Base rate in millimetres per tick
    pub speed: f32,
    /// Whether every foot is on the ground once the phase completes
    pub grounded: bool,
}

impl Phase {
    /// Legs the phase moves.
    pub fn moving_legs(&self) -> impl Iterator<Item = LegId> + '_ {
        self.targets
            .iter()
            .filter_map(|(leg, target)| (!target.is_hold()).then_some(leg))
    }
}
