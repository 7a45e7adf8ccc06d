//! Motion fault codes for the control tick.
//!
//! Faults are observations, not failures: every fault has a defined
//! recovery (clamp, hold, or ignore) and none of them stops the loop.

use core::fmt;

use crate::common::ErrorSeverity;

/// Fault codes reported by the motion core while ticking.
///
/// # RT Safety
///
/// - `Copy` semantics, no heap data
/// - Fixed `#[repr(u8)]` representation so faults can be logged as codes
///
/// # Examples
///
/// ```
/// use legion_errors::{ErrorSeverity, MotionFault};
///
/// let fault = MotionFault::Unreachable;
/// assert_eq!(fault.code(), 1);
/// assert_eq!(fault.severity(), ErrorSeverity::Warning);
/// assert!(fault.is_recoverable());
/// assert_eq!(MotionFault::from_code(fault.code()), Some(fault));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MotionFault {
    /// Requested site lies outside the leg workspace; clamped to the boundary
    Unreachable = 1,
    /// Computed joint angle left the actuator range; clamped to `[0, 180]`
    JointOutOfRange = 2,
    /// Command parameter out of range; command ignored
    InvalidCommand = 3,
    /// Site contained NaN or infinity; previous angles held
    NonFiniteSite = 4,
    /// Control tick started after its deadline
    DeadlineMissed = 5,
}

impl MotionFault {
    /// All fault variants in code order.
    pub const ALL: [MotionFault; 5] = [
        MotionFault::Unreachable,
        MotionFault::JointOutOfRange,
        MotionFault::InvalidCommand,
        MotionFault::NonFiniteSite,
        MotionFault::DeadlineMissed,
    ];

    /// Get the numeric fault code.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Get the fault severity.
    pub fn severity(self) -> ErrorSeverity {
        match self {
            MotionFault::Unreachable => ErrorSeverity::Warning,
            MotionFault::JointOutOfRange => ErrorSeverity::Warning,
            MotionFault::InvalidCommand => ErrorSeverity::Info,
            MotionFault::NonFiniteSite => ErrorSeverity::Error,
            MotionFault::DeadlineMissed => ErrorSeverity::Warning,
        }
    }

    /// Every motion fault has an in-place recovery; the robot keeps ticking.
    pub fn is_recoverable(self) -> bool {
        true
    }

    /// Short name used as a structured log field.
    pub const fn as_str(self) -> &'static str {
        match self {
            MotionFault::Unreachable => "unreachable",
            MotionFault::JointOutOfRange => "joint_out_of_range",
            MotionFault::InvalidCommand => "invalid_command",
            MotionFault::NonFiniteSite => "non_finite_site",
            MotionFault::DeadlineMissed => "deadline_missed",
        }
    }

    /// Create a fault from a code.
    ///
    /// Returns `None` if the code does not correspond to a known fault.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(MotionFault::Unreachable),
            2 => Some(MotionFault::JointOutOfRange),
            3 => Some(MotionFault::InvalidCommand),
            4 => Some(MotionFault::NonFiniteSite),
            5 => Some(MotionFault::DeadlineMissed),
            _ => None,
        }
    }
}

impl fmt::Display for MotionFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionFault::Unreachable => write!(f, "Site outside leg workspace"),
            MotionFault::JointOutOfRange => write!(f, "Joint angle outside actuator range"),
            MotionFault::InvalidCommand => write!(f, "Invalid motion command"),
            MotionFault::NonFiniteSite => write!(f, "Non-finite site coordinate"),
            MotionFault::DeadlineMissed => write!(f, "Control tick deadline missed"),
        }
    }
}

impl std::error::Error for MotionFault {}
