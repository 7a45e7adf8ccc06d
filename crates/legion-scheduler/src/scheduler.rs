//! Absolute-deadline tick scheduling.
//!
//! Deadlines are computed from the previous deadline rather than from the
//! wake-up time, so lateness on one tick never accumulates into drift. A loop
//! that falls more than a whole period behind drops the ticks it missed
//! instead of bursting to catch up.

use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::error::{SchedulerError, SchedulerResult};
use crate::jitter::JitterMetrics;

/// Default control period.
pub const DEFAULT_PERIOD: Duration = Duration::from_millis(20);

/// Busy-wait window before each deadline.
pub const DEFAULT_SPIN: Duration = Duration::from_micros(200);

/// What one wake-up looked like.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickInfo {
    /// Tick number, starting at 1
    pub tick: u64,
    /// Wake-up time since the first tick, in nanoseconds
    pub timestamp_ns: u64,
    /// Wake-up lateness relative to the scheduled deadline
    pub jitter_ns: u64,
    /// The loop reached this tick after its deadline had passed
    pub missed_deadline: bool,
    /// Whole periods dropped to get back on schedule
    pub skipped: u64,
}

impl TickInfo {
    /// The miss as an error value, for callers that report faults.
    pub fn deadline_error(&self) -> Option<SchedulerError> {
        self.missed_deadline.then_some(SchedulerError::DeadlineMissed {
            tick: self.tick,
            late_ns: self.jitter_ns,
        })
    }
}

/// Something that paces the control loop.
pub trait TickSource {
    /// Block until the next tick is due and describe it.
    fn wait_for_tick(&mut self) -> TickInfo;

    /// Nominal tick period.
    fn period(&self) -> Duration;

    /// Timing statistics gathered so far.
    fn metrics(&self) -> &JitterMetrics;

    /// Mutable statistics, for percentile queries and resets.
    fn metrics_mut(&mut self) -> &mut JitterMetrics;
}

impl<T: TickSource + ?Sized> TickSource for &mut T {
    fn wait_for_tick(&mut self) -> TickInfo {
        (**self).wait_for_tick()
    }

    fn period(&self) -> Duration {
        (**self).period()
    }

    fn metrics(&self) -> &JitterMetrics {
        (**self).metrics()
    }

    fn metrics_mut(&mut self) -> &mut JitterMetrics {
        (**self).metrics_mut()
    }
}

/// Wall-clock scheduler sleeping to absolute deadlines.
///
/// The first call to [`TickSource::wait_for_tick`] returns immediately and
/// anchors the schedule.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use legion_scheduler::{AbsoluteScheduler, TickSource};
///
/// # fn main() -> Result<(), legion_scheduler::SchedulerError> {
/// let mut scheduler = AbsoluteScheduler::new(Duration::from_millis(1))?;
/// let first = scheduler.wait_for_tick();
/// let second = scheduler.wait_for_tick();
/// assert_eq!((first.tick, second.tick), (1, 2));
/// assert!(second.timestamp_ns >= first.timestamp_ns);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AbsoluteScheduler {
    period: Duration,
    spin: Duration,
    origin: Option<Instant>,
    next_deadline: Option<Instant>,
    tick_count: u64,
    metrics: JitterMetrics,
}

impl AbsoluteScheduler {
    /// Scheduler with the given period.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::ZeroPeriod`] for a zero period.
    pub fn new(period: Duration) -> SchedulerResult<Self> {
        if period.is_zero() {
            return Err(SchedulerError::ZeroPeriod);
        }
        Ok(Self {
            period,
            spin: DEFAULT_SPIN.min(period / 4),
            origin: None,
            next_deadline: None,
            tick_count: 0,
            metrics: JitterMetrics::new(),
        })
    }

    /// Scheduler with a period in milliseconds, as stored in configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerError::ZeroPeriod`] when `period_ms` is zero.
    pub fn from_millis(period_ms: u64) -> SchedulerResult<Self> {
        Self::new(Duration::from_millis(period_ms))
    }

    /// Replace the busy-wait window; zero sleeps all the way.
    #[must_use]
    pub fn with_spin(mut self, spin: Duration) -> Self {
        self.spin = spin.min(self.period);
        self
    }

    /// Ticks issued so far.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Drop the schedule; the next wait starts a fresh one.
    pub fn reset(&mut self) {
        self.origin = None;
        self.next_deadline = None;
        self.tick_count = 0;
        self.metrics.reset();
    }

    fn sleep_until(&self, deadline: Instant) {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let coarse = remaining.saturating_sub(self.spin);
        if !coarse.is_zero() {
            thread::sleep(coarse);
        }
        while Instant::now() < deadline {
            std::hint::spin_loop();
        }
    }

    fn advance_deadline(&mut self, deadline: Instant, woke: Instant) -> u64 {
        let mut next = deadline.checked_add(self.period).unwrap_or(woke);
        let mut skipped = 0;
        if next <= woke {
            let behind = woke.saturating_duration_since(next).as_nanos();
            let periods = behind / self.period.as_nanos() + 1;
            skipped = u64::try_from(periods).unwrap_or(u64::MAX);
            let catch_up = self.period.saturating_mul(u32::try_from(skipped).unwrap_or(u32::MAX));
            next = next.checked_add(catch_up).unwrap_or(woke);
            debug!(tick = self.tick_count, skipped, "scheduler fell behind, dropping ticks");
        }
        self.next_deadline = Some(next);
        skipped
    }
}

impl Default for AbsoluteScheduler {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            spin: DEFAULT_SPIN,
            origin: None,
            next_deadline: None,
            tick_count: 0,
            metrics: JitterMetrics::new(),
        }
    }
}

impl TickSource for AbsoluteScheduler {
    fn wait_for_tick(&mut self) -> TickInfo {
        let arrival = Instant::now();
        let origin = *self.origin.get_or_insert(arrival);
        let deadline = self.next_deadline.unwrap_or(arrival);

        let missed_deadline = arrival > deadline;
        if !missed_deadline {
            self.sleep_until(deadline);
        }
        let woke = Instant::now();
        let jitter_ns = duration_ns(woke.saturating_duration_since(deadline));

        self.tick_count = self.tick_count.saturating_add(1);
        let skipped = self.advance_deadline(deadline, woke);
        self.metrics.record_tick(jitter_ns, missed_deadline);
        self.metrics.record_skipped(skipped);

        TickInfo {
            tick: self.tick_count,
            timestamp_ns: duration_ns(woke.saturating_duration_since(origin)),
            jitter_ns,
            missed_deadline,
            skipped,
        }
    }

    fn period(&self) -> Duration {
        self.period
    }

    fn metrics(&self) -> &JitterMetrics {
        &self.metrics
    }

    fn metrics_mut(&mut self) -> &mut JitterMetrics {
        &mut self.metrics
    }
}

pub(crate) fn duration_ns(d: Duration) -> u64 {
    u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_period_rejected() {
        assert!(matches!(
            AbsoluteScheduler::new(Duration::ZERO),
            Err(SchedulerError::ZeroPeriod)
        ));
        assert!(matches!(
            AbsoluteScheduler::from_millis(0),
            Err(SchedulerError::ZeroPeriod)
        ));
    }

    #[test]
    fn test_default_period_is_twenty_ms() {
        let scheduler = AbsoluteScheduler::default();
        assert_eq!(scheduler.period(), Duration::from_millis(20));
        assert_eq!(scheduler.tick_count(), 0);
    }

    #[test]
    fn test_first_tick_is_immediate() -> Result<(), SchedulerError> {
        let mut scheduler = AbsoluteScheduler::from_millis(50)?;
        let start = Instant::now();
        let info = scheduler.wait_for_tick();
        assert_eq!(info.tick, 1);
        assert!(!info.missed_deadline);
        assert!(start.elapsed() < Duration::from_millis(50));
        Ok(())
    }

    #[test]
    fn test_overrun_is_reported_and_skipped() -> Result<(), SchedulerError> {
        let mut scheduler = AbsoluteScheduler::new(Duration::from_millis(2))?.with_spin(Duration::ZERO);
        scheduler.wait_for_tick();
        thread::sleep(Duration::from_millis(7));
        let late = scheduler.wait_for_tick();
        assert!(late.missed_deadline);
        assert!(late.jitter_ns >= 5_000_000);
        assert!(late.skipped >= 2);
        assert!(late.deadline_error().is_some());
        assert_eq!(scheduler.metrics().missed_ticks, 1);
        Ok(())
    }

    #[test]
    fn test_reset_restarts_numbering() -> Result<(), SchedulerError> {
        let mut scheduler = AbsoluteScheduler::new(Duration::from_millis(1))?;
        scheduler.wait_for_tick();
        scheduler.wait_for_tick();
        scheduler.reset();
        assert_eq!(scheduler.wait_for_tick().tick, 1);
        assert_eq!(scheduler.metrics().total_ticks, 1);
        Ok(())
    }
}
