//! Wake-up lateness statistics for the control loop.

/// Samples kept for percentiles: ten seconds of ticks at the 20 ms default.
pub const DEFAULT_SAMPLE_CAPACITY: usize = 500;

/// Lateness and deadline-miss statistics.
///
/// Every tick records how late the loop woke relative to its scheduled
/// instant and whether the previous tick overran. Percentiles come from a
/// bounded ring of the most recent samples.
///
/// # RT-Safety
///
/// - [`JitterMetrics::record_tick`] is O(1) and never allocates once built
/// - percentile queries reuse a scratch buffer sized at construction
#[derive(Debug, Clone)]
pub struct JitterMetrics {
    /// Ticks recorded
    pub total_ticks: u64,
    /// Ticks that started after their deadline
    pub missed_ticks: u64,
    /// Ticks dropped because the loop fell more than a period behind
    pub skipped_ticks: u64,
    /// Largest lateness seen, in nanoseconds
    pub max_jitter_ns: u64,
    /// Lateness of the most recent tick, in nanoseconds
    pub last_jitter_ns: u64,

    sum_ns: f64,
    sum_squared_ns: f64,
    samples: Vec<u64>,
    capacity: usize,
    cursor: usize,
    scratch: Vec<u64>,
}

impl Default for JitterMetrics {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_SAMPLE_CAPACITY)
    }
}

impl JitterMetrics {
    /// Metrics keeping [`DEFAULT_SAMPLE_CAPACITY`] samples.
    pub fn new() -> Self {
        Self::default()
    }

    /// Metrics keeping the last `capacity` samples; zero keeps only counters.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            total_ticks: 0,
            missed_ticks: 0,
            skipped_ticks: 0,
            max_jitter_ns: 0,
            last_jitter_ns: 0,
            sum_ns: 0.0,
            sum_squared_ns: 0.0,
            samples: Vec::with_capacity(capacity),
            capacity,
            cursor: 0,
            scratch: Vec::with_capacity(capacity),
        }
    }

    /// Record one tick.
    pub fn record_tick(&mut self, jitter_ns: u64, missed_deadline: bool) {
        self.total_ticks = self.total_ticks.saturating_add(1);
        if missed_deadline {
            self.missed_ticks = self.missed_ticks.saturating_add(1);
        }
        self.max_jitter_ns = self.max_jitter_ns.max(jitter_ns);
        self.last_jitter_ns = jitter_ns;

        let sample = jitter_ns as f64;
        self.sum_ns += sample;
        self.sum_squared_ns += sample * sample;

        if self.capacity == 0 {
            return;
        }
        if self.samples.len() < self.capacity {
            self.samples.push(jitter_ns);
        } else if let Some(slot) = self.samples.get_mut(self.cursor) {
            *slot = jitter_ns;
        }
        self.cursor = (self.cursor + 1) % self.capacity;
    }

    /// Count ticks dropped after an overrun.
    pub fn record_skipped(&mut self, ticks: u64) {
        self.skipped_ticks = self.skipped_ticks.saturating_add(ticks);
    }

    /// Lateness at `percentile` (0 to 100) over the retained samples.
    pub fn percentile_ns(&mut self, percentile: u8) -> u64 {
        if self.samples.is_empty() {
            return 0;
        }
        self.scratch.clear();
        self.scratch.extend_from_slice(&self.samples);
        let last = self.scratch.len() - 1;
        let rank = last * usize::from(percentile.min(100)) / 100;
        let (_, value, _) = self.scratch.select_nth_unstable(rank);
        *value
    }

    /// Median lateness.
    pub fn p50_jitter_ns(&mut self) -> u64 {
        self.percentile_ns(50)
    }

    /// 95th percentile lateness.
    pub fn p95_jitter_ns(&mut self) -> u64 {
        self.percentile_ns(95)
    }

    /// 99th percentile lateness.
    pub fn p99_jitter_ns(&mut self) -> u64 {
        self.percentile_ns(99)
    }

    /// Mean lateness over every recorded tick.
    pub fn mean_jitter_ns(&self) -> f64 {
        if self.total_ticks == 0 {
            return 0.0;
        }
        self.sum_ns / self.total_ticks as f64
    }

    /// Population standard deviation of lateness.
    pub fn jitter_std_dev_ns(&self) -> f64 {
        if self.total_ticks == 0 {
            return 0.0;
        }
        let mean = self.mean_jitter_ns();
        let variance = self.sum_squared_ns / self.total_ticks as f64 - mean * mean;
        variance.max(0.0).sqrt()
    }

    /// Fraction of ticks that missed their deadline.
    pub fn missed_tick_rate(&self) -> f64 {
        if self.total_ticks == 0 {
            0.0
        } else {
            self.missed_ticks as f64 / self.total_ticks as f64
        }
    }

    /// Whether the loop stays inside `budget`.
    pub fn within(&mut self, budget: &JitterBudget) -> bool {
        self.p99_jitter_ns() <= budget.max_p99_jitter_ns
            && self.missed_tick_rate() <= budget.max_missed_rate
    }

    /// Samples currently retained.
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// Point-in-time copy of the headline numbers.
    pub fn summary(&mut self) -> JitterSummary {
        JitterSummary {
            total_ticks: self.total_ticks,
            missed_ticks: self.missed_ticks,
            skipped_ticks: self.skipped_ticks,
            p50_ns: self.p50_jitter_ns(),
            p99_ns: self.p99_jitter_ns(),
            max_ns: self.max_jitter_ns,
        }
    }

    /// Clear every counter and sample, keeping capacity.
    pub fn reset(&mut self) {
        self.total_ticks = 0;
        self.missed_ticks = 0;
        self.skipped_ticks = 0;
        self.max_jitter_ns = 0;
        self.last_jitter_ns = 0;
        self.sum_ns = 0.0;
        self.sum_squared_ns = 0.0;
        self.samples.clear();
        self.cursor = 0;
        self.scratch.clear();
    }
}

/// Acceptable lateness for a loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JitterBudget {
    /// Largest acceptable 99th percentile lateness
    pub max_p99_jitter_ns: u64,
    /// Largest acceptable fraction of missed deadlines, `0.0..=1.0`
    pub max_missed_rate: f64,
}

impl JitterBudget {
    /// A tenth of the period at p99 and one missed deadline in a hundred.
    pub fn for_period_ns(period_ns: u64) -> Self {
        Self {
            max_p99_jitter_ns: period_ns / 10,
            max_missed_rate: 0.01,
        }
    }
}

/// Headline timing numbers, cheap to copy and log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JitterSummary {
    /// Ticks recorded
    pub total_ticks: u64,
    /// Ticks that started late
    pub missed_ticks: u64,
    /// Ticks dropped after overruns
    pub skipped_ticks: u64,
    /// Median lateness
    pub p50_ns: u64,
    /// 99th percentile lateness
    pub p99_ns: u64,
    /// Worst lateness
    pub max_ns: u64,
}

impl core::fmt::Display for JitterSummary {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{} ticks, {} late, {} skipped, p50 {} us, p99 {} us, max {} us",
            self.total_ticks,
            self.missed_ticks,
            self.skipped_ticks,
            self.p50_ns / 1_000,
            self.p99_ns / 1_000,
            self.max_ns / 1_000
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_and_extremes() {
        let mut metrics = JitterMetrics::new();
        metrics.record_tick(100_000, false);
        metrics.record_tick(300_000, true);
        metrics.record_tick(200_000, false);

        assert_eq!(metrics.total_ticks, 3);
        assert_eq!(metrics.missed_ticks, 1);
        assert_eq!(metrics.max_jitter_ns, 300_000);
        assert_eq!(metrics.last_jitter_ns, 200_000);
        assert!((metrics.mean_jitter_ns() - 200_000.0).abs() < 1e-6);
        assert!((metrics.missed_tick_rate() - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_percentiles_over_uniform_samples() {
        let mut metrics = JitterMetrics::with_capacity(100);
        for i in 0..100_u64 {
            metrics.record_tick(i * 1_000, false);
        }
        assert_eq!(metrics.p50_jitter_ns(), 49_000);
        assert_eq!(metrics.p99_jitter_ns(), 98_000);
        assert_eq!(metrics.percentile_ns(100), 99_000);
        assert_eq!(metrics.percentile_ns(0), 0);
    }

    #[test]
    fn test_ring_keeps_latest_samples() {
        let mut metrics = JitterMetrics::with_capacity(3);
        for i in 1..=5_u64 {
            metrics.record_tick(i * 1_000, false);
        }
        assert_eq!(metrics.sample_count(), 3);
        assert_eq!(metrics.percentile_ns(0), 3_000);
        assert_eq!(metrics.percentile_ns(100), 5_000);
        // counters still cover every tick
        assert_eq!(metrics.total_ticks, 5);
    }

    #[test]
    fn test_zero_capacity_keeps_counters_only() {
        let mut metrics = JitterMetrics::with_capacity(0);
        metrics.record_tick(5_000, true);
        assert_eq!(metrics.sample_count(), 0);
        assert_eq!(metrics.p99_jitter_ns(), 0);
        assert_eq!(metrics.missed_ticks, 1);
    }

    #[test]
    fn test_budget_for_twenty_millisecond_loop() {
        let budget = JitterBudget::for_period_ns(20_000_000);
        assert_eq!(budget.max_p99_jitter_ns, 2_000_000);

        let mut metrics = JitterMetrics::new();
        for _ in 0..200 {
            metrics.record_tick(150_000, false);
        }
        assert!(metrics.within(&budget));

        metrics.reset();
        for i in 0..200 {
            metrics.record_tick(150_000, i % 10 == 0);
        }
        assert!(!metrics.within(&budget));
    }

    #[test]
    fn test_summary_display() {
        let mut metrics = JitterMetrics::new();
        metrics.record_tick(40_000, false);
        metrics.record_tick(2_500_000, true);
        metrics.record_skipped(1);
        let summary = metrics.summary();
        assert_eq!(summary.skipped_ticks, 1);
        assert_eq!(
            summary.to_string(),
            "2 ticks, 1 late, 1 skipped, p50 40 us, p99 40 us, max 2500 us"
        );
    }

    #[test]
    fn test_std_dev_of_constant_samples_is_zero() {
        let mut metrics = JitterMetrics::new();
        for _ in 0..10 {
            metrics.record_tick(7_000, false);
        }
        assert!(metrics.jitter_std_dev_ns() < 1e-6);
    }
}
