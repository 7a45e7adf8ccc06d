//! Property tests for jitter statistics and virtual ticking.

use std::time::Duration;

use legion_scheduler::{JitterMetrics, ManualTicks, TickSource};
use quickcheck_macros::quickcheck;

#[quickcheck]
fn jitter_percentile_is_monotonic(samples: Vec<u32>) -> bool {
    let mut metrics = JitterMetrics::with_capacity(256);
    for sample in &samples {
        metrics.record_tick(u64::from(*sample), false);
    }
    let p50 = metrics.p50_jitter_ns();
    let p95 = metrics.p95_jitter_ns();
    let p99 = metrics.p99_jitter_ns();
    p50 <= p95 && p95 <= p99
}

#[quickcheck]
fn jitter_max_is_upper_bound(samples: Vec<u32>) -> bool {
    let mut metrics = JitterMetrics::with_capacity(64);
    for sample in &samples {
        metrics.record_tick(u64::from(*sample), false);
    }
    let max = metrics.max_jitter_ns;
    metrics.percentile_ns(100) <= max && metrics.mean_jitter_ns() <= max as f64
}

#[quickcheck]
fn missed_rate_matches_counts(total: u16, missed: u16) -> bool {
    let total = u64::from(total % 2_000);
    let missed = u64::from(missed).min(total);
    let mut metrics = JitterMetrics::with_capacity(16);
    for i in 0..total {
        metrics.record_tick(100, i < missed);
    }
    let rate = metrics.missed_tick_rate();
    if total == 0 {
        rate.abs() < f64::EPSILON
    } else {
        (rate - missed as f64 / total as f64).abs() < 1e-12
    }
}

#[quickcheck]
fn manual_ticks_never_go_back_in_time(delays_us: Vec<u16>) -> bool {
    let Ok(mut ticks) = ManualTicks::new(Duration::from_millis(20)) else {
        return false;
    };
    let mut last = None;
    for (i, delay) in delays_us.iter().enumerate() {
        ticks.delay_next(Duration::from_micros(u64::from(*delay)));
        let info = ticks.wait_for_tick();
        if info.tick != i as u64 + 1 {
            return false;
        }
        if last.is_some_and(|prev| info.timestamp_ns <= prev) {
            return false;
        }
        last = Some(info.timestamp_ns);
    }
    true
}

#[quickcheck]
fn manual_ticks_flag_every_delay(delays_us: Vec<u8>) -> bool {
    let Ok(mut ticks) = ManualTicks::from_millis(20) else {
        return false;
    };
    delays_us.iter().all(|delay| {
        ticks.delay_next(Duration::from_micros(u64::from(*delay)));
        let info = ticks.wait_for_tick();
        info.missed_deadline == (*delay > 0) && info.jitter_ns == u64::from(*delay) * 1_000
    })
}
