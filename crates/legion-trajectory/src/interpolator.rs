//! Synchronized per-tick interpolation.
//!
//! All legs move together: when targets change, the interpolator finds the
//! axis that needs the most ticks at the current rate and stretches every
//! other axis over the same number of ticks, so every foot arrives on the
//! same tick.

use legion_geometry::{ARRIVAL_EPSILON, Axis, LegId, LegMap, Site, SiteTarget};

use crate::state::RobotState;

/// Smallest rate used when the configured rate is not positive or not finite,
/// in millimetres per tick.
pub const MIN_RATE: f32 = 0.1;

/// Result of one interpolation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Feet are still moving
    Moving {
        /// Ticks left including the next one
        remaining: u32,
    },
    /// Every non-KEEP axis is at its target
    Arrived,
}

impl StepOutcome {
    /// Whether the motion is complete.
    #[inline]
    pub fn is_arrived(self) -> bool {
        matches!(self, StepOutcome::Arrived)
    }
}

#[derive(Debug, Clone, Copy)]
struct Plan {
    generation: u64,
    origin: LegMap<Site>,
    target: LegMap<SiteTarget>,
    total: u32,
    elapsed: u32,
}

/// Advances `site_now` toward `site_expect` once per tick.
///
/// # RT Safety
///
/// [`Interpolator::step`] is allocation-free and runs in constant time.
#[derive(Debug, Clone, Default)]
pub struct Interpolator {
    plan: Option<Plan>,
}

impl Interpolator {
    /// Create an interpolator with no plan.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move every foot one tick closer to its target.
    ///
    /// Re-plans first if the state's targets or rate changed since the last
    /// call. On the final tick every non-KEEP axis is set exactly to its
    /// target.
    pub fn step(&mut self, state: &mut RobotState) -> StepOutcome {
        let plan = match self.plan {
            Some(plan) if plan.generation == state.generation() => plan,
            _ => {
                let plan = Self::plan(state);
                tracing::trace!(
                    generation = plan.generation,
                    ticks = plan.total,
                    rate = effective_rate(state.rate()),
                    "interpolation planned"
                );
                plan
            }
        };
        let (plan, outcome) = Self::advance(plan, state.site_now_mut());
        self.plan = Some(plan);
        outcome
    }

    /// Ticks in the current plan, or zero when none is active.
    pub fn total_ticks(&self) -> u32 {
        self.plan.map_or(0, |p| p.total)
    }

    /// Ticks left in the current plan.
    pub fn remaining_ticks(&self) -> u32 {
        self.plan.map_or(0, |p| p.total.saturating_sub(p.elapsed))
    }

    /// Drop the current plan; the next step re-plans from the state.
    pub fn reset(&mut self) {
        self.plan = None;
    }

    /// Whether every non-KEEP axis of every leg is within
    /// [`ARRIVAL_EPSILON`] of its target.
    pub fn arrived(state: &RobotState) -> bool {
        LegId::ALL.iter().all(|&leg| {
            let now = state.site_now()[leg];
            let target = state.site_expect()[leg];
            Axis::ALL.iter().all(|&axis| {
                target
                    .axis(axis)
                    .value()
                    .is_none_or(|t| (t - now.axis(axis)).abs() <= ARRIVAL_EPSILON)
            })
        })
    }

    /// Ticks needed to reach the current targets at the current rate.
    ///
    /// The maximum of `ceil(|delta| / rate)` over every non-KEEP axis of
    /// every leg. Axes already within [`ARRIVAL_EPSILON`] count as zero.
    pub fn governing_ticks(state: &RobotState) -> u32 {
        let rate = effective_rate(state.rate());
        let mut ticks = 0u32;
        for leg in LegId::ALL {
            let now = state.site_now()[leg];
            let target = state.site_expect()[leg];
            for axis in Axis::ALL {
                if let Some(t) = target.axis(axis).value() {
                    let delta = (t - now.axis(axis)).abs();
                    if delta > ARRIVAL_EPSILON {
                        ticks = ticks.max(ticks_for(delta, rate));
                    }
                }
            }
        }
        ticks
    }

    fn plan(state: &RobotState) -> Plan {
        Plan {
            generation: state.generation(),
            origin: *state.site_now(),
            target: *state.site_expect(),
            total: Self::governing_ticks(state),
            elapsed: 0,
        }
    }

    fn advance(mut plan: Plan, now: &mut LegMap<Site>) -> (Plan, StepOutcome) {
        if plan.elapsed >= plan.total {
            snap(&plan.target, now);
            return (plan, StepOutcome::Arrived);
        }
        plan.elapsed += 1;
        if plan.elapsed == plan.total {
            snap(&plan.target, now);
            return (plan, StepOutcome::Arrived);
        }

        let fraction = plan.elapsed as f32 / plan.total as f32;
        for leg in LegId::ALL {
            let origin = plan.origin[leg];
            let target = plan.target[leg];
            let site = &mut now[leg];
            for axis in Axis::ALL {
                if let Some(t) = target.axis(axis).value() {
                    let o = origin.axis(axis);
                    let v = o + (t - o) * fraction;
                    *site.axis_mut(axis) = v.clamp(o.min(t), o.max(t));
                }
            }
        }
        (
            plan,
            StepOutcome::Moving {
                remaining: plan.total - plan.elapsed,
            },
        )
    }
}

fn snap(target: &LegMap<SiteTarget>, now: &mut LegMap<Site>) {
    for (leg, site) in now.iter_mut() {
        let target = target[leg];
        for axis in Axis::ALL {
            if let Some(t) = target.axis(axis).value() {
                *site.axis_mut(axis) = t;
            }
        }
    }
}

fn effective_rate(rate: f32) -> f32 {
    if rate.is_finite() && rate > 0.0 {
        rate.max(MIN_RATE)
    } else {
        MIN_RATE
    }
}

fn ticks_for(delta: f32, rate: f32) -> u32 {
    let ticks = (delta / rate).ceil();
    if ticks.is_finite() {
        // Saturating float-to-int conversion.
        ticks as u32
    } else {
        u32::MAX
    }
}
