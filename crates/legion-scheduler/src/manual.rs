//! Virtual-time tick source.

use std::time::Duration;

use crate::error::{SchedulerError, SchedulerResult};
use crate::jitter::JitterMetrics;
use crate::scheduler::{TickInfo, TickSource, duration_ns};

/// Tick source that never sleeps.
///
/// Time advances by exactly one period per tick unless a delay is injected
/// with [`ManualTicks::delay_next`], which makes the next tick arrive late
/// the way an overrunning loop body would. Used by tests and by the
/// simulator when running faster than real time.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use legion_scheduler::{ManualTicks, TickSource};
///
/// # fn main() -> Result<(), legion_scheduler::SchedulerError> {
/// let mut ticks = ManualTicks::new(Duration::from_millis(20))?;
/// ticks.wait_for_tick();
/// ticks.delay_next(Duration::from_millis(3));
/// let late = ticks.wait_for_tick();
/// assert!(late.missed_deadline);
/// assert_eq!(late.jitter_ns, 3_000_000);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ManualTicks {
    period_ns: u64,
    next_deadline_ns: u64,
    now_ns: u64,
    pending_delay_ns: u64,
    tick_count: u64,
    metrics: JitterMetrics,
}

impl ManualTicks {
    /// Virtual clock with the given period.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::ZeroPeriod`] for a zero period.
    pub fn new(period: Duration) -> SchedulerResult<Self> {
        let period_ns = duration_ns(period);
        if period_ns == 0 {
            return Err(SchedulerError::ZeroPeriod);
        }
        Ok(Self {
            period_ns,
            next_deadline_ns: 0,
            now_ns: 0,
            pending_delay_ns: 0,
            tick_count: 0,
            metrics: JitterMetrics::new(),
        })
    }

    /// Virtual clock with a period in milliseconds.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::ZeroPeriod`] when `period_ms` is zero.
    pub fn from_millis(period_ms: u64) -> SchedulerResult<Self> {
        Self::new(Duration::from_millis(period_ms))
    }

    /// Make the next tick arrive `delay` after its deadline.
    pub fn delay_next(&mut self, delay: Duration) {
        self.pending_delay_ns = self.pending_delay_ns.saturating_add(duration_ns(delay));
    }

    /// Virtual time of the last tick, in nanoseconds.
    pub fn now_ns(&self) -> u64 {
        self.now_ns
    }

    /// Ticks issued so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}

impl TickSource for ManualTicks {
    fn wait_for_tick(&mut self) -> TickInfo {
        let deadline = self.next_deadline_ns;
        let jitter_ns = core::mem::take(&mut self.pending_delay_ns);
        let arrival = deadline.saturating_add(jitter_ns);
        let missed_deadline = jitter_ns > 0;

        let mut next = deadline.saturating_add(self.period_ns);
        let mut skipped = 0;
        if next <= arrival {
            skipped = (arrival - next) / self.period_ns + 1;
            next = next.saturating_add(skipped.saturating_mul(self.period_ns));
        }
        self.next_deadline_ns = next;
        self.now_ns = arrival;
        self.tick_count = self.tick_count.saturating_add(1);
        self.metrics.record_tick(jitter_ns, missed_deadline);
        self.metrics.record_skipped(skipped);

        TickInfo {
            tick: self.tick_count,
            timestamp_ns: arrival,
            jitter_ns,
            missed_deadline,
            skipped,
        }
    }

    fn period(&self) -> Duration {
        Duration::from_nanos(self.period_ns)
    }

    fn metrics(&self) -> &JitterMetrics {
        &self.metrics
    }

    fn metrics_mut(&mut self) -> &mut JitterMetrics {
        &mut self.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_on_time_ticks_are_one_period_apart() -> SchedulerResult {
        let mut ticks = ManualTicks::from_millis(20)?;
        let stamps: Vec<u64> = (0..4).map(|_| ticks.wait_for_tick().timestamp_ns).collect();
        assert_eq!(stamps, vec![0, 20_000_000, 40_000_000, 60_000_000]);
        assert_eq!(ticks.metrics().missed_ticks, 0);
        Ok(())
    }

    #[test]
    fn test_long_overrun_drops_periods() -> SchedulerResult {
        let mut ticks = ManualTicks::from_millis(20)?;
        ticks.wait_for_tick();
        ticks.delay_next(Duration::from_millis(45));
        let late = ticks.wait_for_tick();
        assert_eq!(late.skipped, 2);
        assert_eq!(late.timestamp_ns, 65_000_000);

        let next = ticks.wait_for_tick();
        assert!(!next.missed_deadline);
        assert_eq!(next.timestamp_ns, 80_000_000);
        assert_eq!(ticks.metrics().skipped_ticks, 2);
        Ok(())
    }
}
