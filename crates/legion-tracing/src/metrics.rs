//! Counters derived from the trace stream

use core::time::Duration;

use crate::events::MotionTraceEvent;

/// Counters collected by a sink.
///
/// All counters are monotonically increasing and saturate instead of
/// wrapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TracingMetrics {
    /// Total number of events seen
    pub events: u64,
    /// Completed ticks
    pub ticks: u64,
    /// Phases issued by the sequencer
    pub phases_started: u64,
    /// Sites pulled back into the workspace
    pub workspace_clamps: u64,
    /// Joint angles clamped to the actuator range
    pub joint_clamps: u64,
    /// Legs that held their previous angles
    pub sites_held: u64,
    /// Commands refused
    pub commands_rejected: u64,
    /// Times the robot parked after idling
    pub rests_engaged: u64,
    /// Late ticks
    pub deadline_misses: u64,
    /// Total tick processing time in nanoseconds
    pub total_processing_ns: u64,
}

impl TracingMetrics {
    /// Create metrics with zero values
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one event.
    #[inline]
    pub fn record(&mut self, event: &MotionTraceEvent) {
        self.events = self.events.saturating_add(1);
        let counter = match event {
            MotionTraceEvent::TickStart { .. } => return,
            MotionTraceEvent::TickEnd { processing_ns, .. } => {
                self.total_processing_ns = self.total_processing_ns.saturating_add(*processing_ns);
                &mut self.ticks
            }
            MotionTraceEvent::PhaseStarted { .. } => &mut self.phases_started,
            MotionTraceEvent::WorkspaceClamp { .. } => &mut self.workspace_clamps,
            MotionTraceEvent::JointClamp { .. } => &mut self.joint_clamps,
            MotionTraceEvent::SiteHeld { .. } => &mut self.sites_held,
            MotionTraceEvent::CommandRejected { .. } => &mut self.commands_rejected,
            MotionTraceEvent::RestEngaged { .. } => &mut self.rests_engaged,
            MotionTraceEvent::DeadlineMiss { .. } => &mut self.deadline_misses,
        };
        *counter = counter.saturating_add(1);
    }

    /// Total corrections and rejections.
    pub fn fault_count(&self) -> u64 {
        self.workspace_clamps
            .saturating_add(self.joint_clamps)
            .saturating_add(self.sites_held)
            .saturating_add(self.commands_rejected)
            .saturating_add(self.deadline_misses)
    }

    /// Mean time spent inside a tick.
    pub fn average_processing_time(&self) -> Duration {
        if self.ticks == 0 {
            return Duration::ZERO;
        }
        Duration::from_nanos(self.total_processing_ns / self.ticks)
    }

    /// Whether the loop kept its deadlines and every leg produced finite output.
    pub fn is_healthy(&self) -> bool {
        self.deadline_misses == 0 && self.sites_held == 0
    }

    /// Reset all counters to zero
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Add the counters of another instance.
    pub fn merge(&mut self, other: &TracingMetrics) {
        self.events = self.events.saturating_add(other.events);
        self.ticks = self.ticks.saturating_add(other.ticks);
        self.phases_started = self.phases_started.saturating_add(other.phases_started);
        self.workspace_clamps = self.workspace_clamps.saturating_add(other.workspace_clamps);
        self.joint_clamps = self.joint_clamps.saturating_add(other.joint_clamps);
        self.sites_held = self.sites_held.saturating_add(other.sites_held);
        self.commands_rejected = self.commands_rejected.saturating_add(other.commands_rejected);
        self.rests_engaged = self.rests_engaged.saturating_add(other.rests_engaged);
        self.deadline_misses = self.deadline_misses.saturating_add(other.deadline_misses);
        self.total_processing_ns = self
            .total_processing_ns
            .saturating_add(other.total_processing_ns);
    }
}

impl core::fmt::Display for TracingMetrics {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "TracingMetrics(ticks={}, phases={}, clamps={}/{}, held={}, rejected={}, rests={}, misses={})",
            self.ticks,
            self.phases_started,
            self.workspace_clamps,
            self.joint_clamps,
            self.sites_held,
            self.commands_rejected,
            self.rests_engaged,
            self.deadline_misses
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use legion_geometry::LegId;

    #[test]
    fn test_metrics_default() {
        let metrics = TracingMetrics::new();
        assert_eq!(metrics.events, 0);
        assert!(metrics.is_healthy());
        assert_eq!(metrics.average_processing_time(), Duration::ZERO);
    }

    #[test]
    fn test_record_counts_by_kind() {
        let mut metrics = TracingMetrics::new();
        metrics.record(&MotionTraceEvent::TickStart {
            tick: 1,
            timestamp_ns: 0,
        });
        metrics.record(&MotionTraceEvent::TickEnd {
            tick: 1,
            processing_ns: 4_000,
        });
        metrics.record(&MotionTraceEvent::TickEnd {
            tick: 2,
            processing_ns: 6_000,
        });
        metrics.record(&MotionTraceEvent::SiteHeld {
            tick: 2,
            leg: LegId::FrontLeft,
        });

        assert_eq!(metrics.events, 4);
        assert_eq!(metrics.ticks, 2);
        assert_eq!(metrics.sites_held, 1);
        assert_eq!(metrics.fault_count(), 1);
        assert_eq!(metrics.average_processing_time(), Duration::from_nanos(5_000));
        assert!(!metrics.is_healthy());
    }

    #[test]
    fn test_merge_and_reset() {
        let mut a = TracingMetrics {
            ticks: 10,
            joint_clamps: 2,
            ..TracingMetrics::default()
        };
        let b = TracingMetrics {
            ticks: u64::MAX,
            deadline_misses: 1,
            ..TracingMetrics::default()
        };
        a.merge(&b);
        assert_eq!(a.ticks, u64::MAX);
        assert_eq!(a.fault_count(), 3);
        a.reset();
        assert_eq!(a, TracingMetrics::default());
    }
}
