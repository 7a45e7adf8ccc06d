//! Destinations for motion trace events

use crate::events::MotionTraceEvent;
use crate::metrics::TracingMetrics;

/// Receives trace events from the control tick.
///
/// # RT-Safety Requirements
///
/// `emit` is called from inside the tick. Implementations must not block
/// and should avoid allocating.
pub trait TraceSink {
    /// Record one event.
    fn emit(&mut self, event: MotionTraceEvent);

    /// Whether the sink wants events at all.
    fn is_enabled(&self) -> bool {
        true
    }
}

impl<T: TraceSink + ?Sized> TraceSink for &mut T {
    #[inline]
    fn emit(&mut self, event: MotionTraceEvent) {
        (**self).emit(event);
    }

    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }
}

impl<T: TraceSink + ?Sized> TraceSink for Box<T> {
    #[inline]
    fn emit(&mut self, event: MotionTraceEvent) {
        (**self).emit(event);
    }

    fn is_enabled(&self) -> bool {
        (**self).is_enabled()
    }
}

/// Sink that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
    #[inline]
    fn emit(&mut self, _event: MotionTraceEvent) {}

    fn is_enabled(&self) -> bool {
        false
    }
}

/// Sink that forwards events to `tracing` and keeps [`TracingMetrics`].
///
/// Faults are logged at `warn`, phase and rest transitions at `debug`, and
/// tick boundaries at `trace`.
#[derive(Debug, Default)]
pub struct LogSink {
    metrics: TracingMetrics,
}

impl LogSink {
    /// Create a sink with zeroed metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters collected so far.
    pub fn metrics(&self) -> &TracingMetrics {
        &self.metrics
    }

    /// Take the counters and start over.
    pub fn take_metrics(&mut self) -> TracingMetrics {
        core::mem::take(&mut self.metrics)
    }
}

impl TraceSink for LogSink {
    fn emit(&mut self, event: MotionTraceEvent) {
        self.metrics.record(&event);
        match event {
            MotionTraceEvent::TickStart { tick, timestamp_ns } => {
                tracing::trace!(tick, timestamp_ns, "tick start");
            }
            MotionTraceEvent::TickEnd {
                tick,
                processing_ns,
            } => {
                tracing::trace!(tick, processing_ns, "tick end");
            }
            MotionTraceEvent::PhaseStarted {
                tick,
                state,
                phase,
                index,
            } => {
                tracing::debug!(tick, state, phase, index, "phase started");
            }
            MotionTraceEvent::WorkspaceClamp {
                tick,
                leg,
                requested_mm,
                clamped_mm,
            } => {
                tracing::warn!(
                    tick,
                    leg = leg.as_str(),
                    requested_mm,
                    clamped_mm,
                    "site outside workspace, clamped"
                );
            }
            MotionTraceEvent::JointClamp {
                tick,
                leg,
                joint,
                requested_deg,
            } => {
                tracing::warn!(
                    tick,
                    leg = leg.as_str(),
                    joint = joint.as_str(),
                    requested_deg,
                    "joint angle outside actuator range, clamped"
                );
            }
            MotionTraceEvent::SiteHeld { tick, leg } => {
                tracing::warn!(tick, leg = leg.as_str(), "non-finite site, holding previous angles");
            }
            MotionTraceEvent::CommandRejected { tick, reason } => {
                tracing::warn!(tick, code = reason.code(), %reason, "command rejected");
            }
            MotionTraceEvent::RestEngaged { tick, idle_ticks } => {
                tracing::info!(tick, idle_ticks, "idle timeout, parking");
            }
            MotionTraceEvent::DeadlineMiss { tick, jitter_ns } => {
                tracing::warn!(tick, jitter_ns, "tick deadline missed");
            }
        }
    }
}
