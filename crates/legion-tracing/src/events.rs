//! Trace event definitions for the control loop

use core::fmt;

use legion_errors::MotionFault;
use legion_geometry::{JointId, LegId};

/// Events emitted from the control tick.
///
/// # RT-Safety
///
/// Every variant is `Copy` and fixed-size. Phase and state names are
/// `&'static str` so emission never allocates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionTraceEvent {
    /// Control tick started
    TickStart {
        /// Monotonic tick counter
        tick: u64,
        /// Timestamp in nanoseconds since the loop started
        timestamp_ns: u64,
    },

    /// Control tick finished
    TickEnd {
        /// Monotonic tick counter
        tick: u64,
        /// Time spent inside the tick in nanoseconds
        processing_ns: u64,
    },

    /// The sequencer issued a new phase
    PhaseStarted {
        /// Monotonic tick counter
        tick: u64,
        /// Gait state the phase belongs to
        state: &'static str,
        /// Phase kind
        phase: &'static str,
        /// Position of the phase within its plan
        index: u16,
    },

    /// A site was pulled back into the leg workspace
    WorkspaceClamp {
        /// Monotonic tick counter
        tick: u64,
        /// Affected leg
        leg: LegId,
        /// Requested pivot-to-foot distance in millimetres
        requested_mm: f32,
        /// Distance actually solved for
        clamped_mm: f32,
    },

    /// A joint angle was clamped to the actuator range
    JointClamp {
        /// Monotonic tick counter
        tick: u64,
        /// Affected leg
        leg: LegId,
        /// Affected joint
        joint: JointId,
        /// Angle before clamping, in degrees
        requested_deg: f32,
    },

    /// A leg held its previous angles because its site was not finite
    SiteHeld {
        /// Monotonic tick counter
        tick: u64,
        /// Affected leg
        leg: LegId,
    },

    /// A command was refused and the current motion kept
    CommandRejected {
        /// Monotonic tick counter
        tick: u64,
        /// Reason code
        reason: MotionFault,
    },

    /// The robot parked after idling
    RestEngaged {
        /// Monotonic tick counter
        tick: u64,
        /// Idle ticks counted before parking
        idle_ticks: u32,
    },

    /// A tick started later than its deadline
    DeadlineMiss {
        /// Monotonic tick counter
        tick: u64,
        /// Lateness in nanoseconds
        jitter_ns: u64,
    },
}

impl MotionTraceEvent {
    /// Short name of the event type.
    #[inline]
    pub const fn event_type(&self) -> &'static str {
        match self {
            MotionTraceEvent::TickStart { .. } => "tick_start",
            MotionTraceEvent::TickEnd { .. } => "tick_end",
            MotionTraceEvent::PhaseStarted { .. } => "phase_started",
            MotionTraceEvent::WorkspaceClamp { .. } => "workspace_clamp",
            MotionTraceEvent::JointClamp { .. } => "joint_clamp",
            MotionTraceEvent::SiteHeld { .. } => "site_held",
            MotionTraceEvent::CommandRejected { .. } => "command_rejected",
            MotionTraceEvent::RestEngaged { .. } => "rest_engaged",
            MotionTraceEvent::DeadlineMiss { .. } => "deadline_miss",
        }
    }

    /// Category for filtering.
    #[inline]
    pub const fn category(&self) -> EventCategory {
        match self {
            MotionTraceEvent::TickStart { .. }
            | MotionTraceEvent::TickEnd { .. }
            | MotionTraceEvent::DeadlineMiss { .. } => EventCategory::Timing,
            MotionTraceEvent::PhaseStarted { .. } | MotionTraceEvent::RestEngaged { .. } => {
                EventCategory::Motion
            }
            MotionTraceEvent::WorkspaceClamp { .. }
            | MotionTraceEvent::JointClamp { .. }
            | MotionTraceEvent::SiteHeld { .. }
            | MotionTraceEvent::CommandRejected { .. } => EventCategory::Fault,
        }
    }

    /// Tick the event belongs to.
    #[inline]
    pub const fn tick(&self) -> u64 {
        match self {
            MotionTraceEvent::TickStart { tick, .. }
            | MotionTraceEvent::TickEnd { tick, .. }
            | MotionTraceEvent::PhaseStarted { tick, .. }
            | MotionTraceEvent::WorkspaceClamp { tick, .. }
            | MotionTraceEvent::JointClamp { tick, .. }
            | MotionTraceEvent::SiteHeld { tick, .. }
            | MotionTraceEvent::CommandRejected { tick, .. }
            | MotionTraceEvent::RestEngaged { tick, .. }
            | MotionTraceEvent::DeadlineMiss { tick, .. } => *tick,
        }
    }

    /// Fault code carried by the event, if it reports one.
    #[inline]
    pub const fn fault(&self) -> Option<MotionFault> {
        match self {
            MotionTraceEvent::WorkspaceClamp { .. } => Some(MotionFault::Unreachable),
            MotionTraceEvent::JointClamp { .. } => Some(MotionFault::JointOutOfRange),
            MotionTraceEvent::SiteHeld { .. } => Some(MotionFault::NonFiniteSite),
            MotionTraceEvent::CommandRejected { reason, .. } => Some(*reason),
            MotionTraceEvent::DeadlineMiss { .. } => Some(MotionFault::DeadlineMissed),
            MotionTraceEvent::TickStart { .. }
            | MotionTraceEvent::TickEnd { .. }
            | MotionTraceEvent::PhaseStarted { .. }
            | MotionTraceEvent::RestEngaged { .. } => None,
        }
    }

    /// Whether the event reports a fault.
    #[inline]
    pub const fn is_fault(&self) -> bool {
        self.fault().is_some()
    }

    /// Leg the event concerns, if any.
    pub const fn leg(&self) -> Option<LegId> {
        match self {
            MotionTraceEvent::WorkspaceClamp { leg, .. }
            | MotionTraceEvent::JointClamp { leg, .. }
            | MotionTraceEvent::SiteHeld { leg, .. } => Some(*leg),
            _ => None,
        }
    }
}

impl fmt::Display for MotionTraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionTraceEvent::TickStart { tick, timestamp_ns } => {
                write!(f, "[{tick}] tick start at {timestamp_ns} ns")
            }
            MotionTraceEvent::TickEnd {
                tick,
                processing_ns,
            } => write!(f, "[{tick}] tick end after {processing_ns} ns"),
            MotionTraceEvent::PhaseStarted {
                tick,
                state,
                phase,
                index,
            } => write!(f, "[{tick}] {state} phase {index}: {phase}"),
            MotionTraceEvent::WorkspaceClamp {
                tick,
                leg,
                requested_mm,
                clamped_mm,
            } => write!(
                f,
                "[{tick}] {leg} clamped from {requested_mm:.2} mm to {clamped_mm:.2} mm"
            ),
            MotionTraceEvent::JointClamp {
                tick,
                leg,
                joint,
                requested_deg,
            } => write!(f, "[{tick}] {leg} {joint} clamped from {requested_deg:.2} deg"),
            MotionTraceEvent::SiteHeld { tick, leg } => {
                write!(f, "[{tick}] {leg} held previous angles")
            }
            MotionTraceEvent::CommandRejected { tick, reason } => {
                write!(f, "[{tick}] command rejected: {reason}")
            }
            MotionTraceEvent::RestEngaged { tick, idle_ticks } => {
                write!(f, "[{tick}] parking after {idle_ticks} idle ticks")
            }
            MotionTraceEvent::DeadlineMiss { tick, jitter_ns } => {
                write!(f, "[{tick}] deadline missed by {jitter_ns} ns")
            }
        }
    }
}

/// Category of a [`MotionTraceEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventCategory {
    /// Tick boundaries and deadline misses
    Timing,
    /// Phase and rest transitions
    Motion,
    /// Corrections and rejections
    Fault,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fault_mapping() {
        let clamp = MotionTraceEvent::JointClamp {
            tick: 3,
            leg: LegId::RearRight,
            joint: JointId::Knee,
            requested_deg: 184.0,
        };
        assert_eq!(clamp.fault(), Some(MotionFault::JointOutOfRange));
        assert_eq!(clamp.category(), EventCategory::Fault);
        assert_eq!(clamp.leg(), Some(LegId::RearRight));
        assert_eq!(clamp.tick(), 3);

        let start = MotionTraceEvent::TickStart {
            tick: 1,
            timestamp_ns: 0,
        };
        assert!(!start.is_fault());
        assert_eq!(start.leg(), None);
    }

    #[test]
    fn test_deadline_miss_is_timing_fault() {
        let miss = MotionTraceEvent::DeadlineMiss {
            tick: 9,
            jitter_ns: 2_000_000,
        };
        assert_eq!(miss.category(), EventCategory::Timing);
        assert_eq!(miss.fault(), Some(MotionFault::DeadlineMissed));
    }
}
