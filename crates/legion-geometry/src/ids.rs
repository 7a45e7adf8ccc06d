//! Leg and joint identifiers.

use core::fmt;

use serde::{Deserialize, Serialize};

/// One of the four legs.
///
/// The discriminant is the index into every [`LegMap`](crate::LegMap).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum LegId {
    /// Front left leg
    FrontLeft = 0,
    /// Front right leg
    FrontRight = 1,
    /// Rear left leg
    RearLeft = 2,
    /// Rear right leg
    RearRight = 3,
}

impl LegId {
    /// All legs in index order.
    pub const ALL: [LegId; 4] = [
        LegId::FrontLeft,
        LegId::FrontRight,
        LegId::RearLeft,
        LegId::RearRight,
    ];

    /// Index into a leg-indexed array.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Look up a leg by index.
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(LegId::FrontLeft),
            1 => Some(LegId::FrontRight),
            2 => Some(LegId::RearLeft),
            3 => Some(LegId::RearRight),
            _ => None,
        }
    }

    /// The leg on the opposite corner of the body.
    ///
    /// Diagonal pairs move together in the creep gait.
    pub const fn diagonal(self) -> Self {
        match self {
            LegId::FrontLeft => LegId::RearRight,
            LegId::FrontRight => LegId::RearLeft,
            LegId::RearLeft => LegId::FrontRight,
            LegId::RearRight => LegId::FrontLeft,
        }
    }

    /// Whether the leg is mounted with mirrored actuators.
    ///
    /// FrontLeft and RearRight have their thigh and hip servos facing the
    /// opposite way to FrontRight and RearLeft.
    pub const fn is_mirrored(self) -> bool {
        matches!(self, LegId::FrontLeft | LegId::RearRight)
    }

    /// Whether the leg is on the left side of the body.
    pub const fn is_left(self) -> bool {
        matches!(self, LegId::FrontLeft | LegId::RearLeft)
    }

    /// Whether the leg is at the front of the body.
    pub const fn is_front(self) -> bool {
        matches!(self, LegId::FrontLeft | LegId::FrontRight)
    }

    /// Short name used as a structured log field.
    pub const fn as_str(self) -> &'static str {
        match self {
            LegId::FrontLeft => "front_left",
            LegId::FrontRight => "front_right",
            LegId::RearLeft => "rear_left",
            LegId::RearRight => "rear_right",
        }
    }
}

impl fmt::Display for LegId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the three joints of a leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum JointId {
    /// Rotation about the vertical axis
    Hip = 0,
    /// Upper link pitch
    Thigh = 1,
    /// Lower link pitch
    Knee = 2,
}

impl JointId {
    /// All joints in index order.
    pub const ALL: [JointId; 3] = [JointId::Hip, JointId::Thigh, JointId::Knee];

    /// Index into a joint-indexed array.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Short name used as a structured log field.
    pub const fn as_str(self) -> &'static str {
        match self {
            JointId::Hip => "hip",
            JointId::Thigh => "thigh",
            JointId::Knee => "knee",
        }
    }
}

impl fmt::Display for JointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
