/// Accrual mechanics: time-to-threshold and forward accrual under flat rates
/// and area breakpoints. Everything here is pure; callers own the state.
use serde::{Deserialize, Serialize};

/// Whole simulated seconds. Saturates instead of overflowing.
pub type Seconds = u128;

/// Sentinel for "never": larger than any real horizon.
pub const UNREACHABLE: Seconds = Seconds::MAX;

/// One simulated week times a large slack factor. Anything slower is not a
/// reasonable move.
pub const MAX_HORIZON: Seconds = 60 * 60 * 24 * 7 * 10_000_000_000;

/// Coins and gems are granted once per batch, never continuously.
pub const BATCH_SECONDS: Seconds = 60;

/// Relative slack when checking a threshold that was just solved for.
const AFFORD_EPS: f64 = 1e-9;

/// A power threshold above which gains are scaled by `multiplier`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Breakpoint {
    pub threshold: f64,
    pub multiplier: f64,
}

/// Ceil to whole seconds; saturates on overflow, NaN is unreachable.
#[inline]
pub fn ceil_secs(x: f64) -> Seconds {
    if x.is_nan() {
        UNREACHABLE
    } else if x <= 0.0 {
        0
    } else {
        x.ceil() as Seconds
    }
}

/// `have >= need`, tolerating float drift from the solve.
#[inline]
pub fn affordable(have: f64, need: f64) -> bool {
    have >= need - need.abs() * AFFORD_EPS
}

/// Seconds until `have` reaches `target` at `rate` per second when income
/// arrives in [`BATCH_SECONDS`] batches.
pub fn secs_until_batched(have: f64, target: f64, rate: f64) -> Seconds {
    if target <= have {
        return 0;
    }
    if !(rate > 0.0) {
        return UNREACHABLE;
    }
    let batches = ceil_secs((target - have) / (rate * BATCH_SECONDS as f64));
    batches.saturating_mul(BATCH_SECONDS)
}

/// Index of the area `power` currently sits in (last threshold <= power).
#[inline]
pub fn area_index(areas: &[Breakpoint], power: f64) -> usize {
    areas
        .partition_point(|a| a.threshold <= power)
        .saturating_sub(1)
}

#[inline]
fn area_multiplier(areas: &[Breakpoint], idx: usize) -> f64 {
    areas.get(idx).map_or(1.0, |a| a.multiplier)
}

/// Seconds until power reaches `target` from `have` with base `rate`,
/// walking every breakpoint below the target.
pub fn secs_until_power(areas: &[Breakpoint], have: f64, target: f64, rate: f64) -> Seconds {
    if target <= have {
        return 0;
    }
    if !(rate > 0.0) {
        return UNREACHABLE;
    }
    let mut idx = area_index(areas, have);
    let mut running = have;
    let mut total: Seconds = 0;
    while idx + 1 < areas.len() && areas[idx + 1].threshold < target {
        let next = areas[idx + 1].threshold;
        let seg_rate = area_multiplier(areas, idx) * rate;
        total = total.saturating_add(ceil_secs((next - running) / seg_rate));
        running = next;
        idx += 1;
    }
    let seg_rate = area_multiplier(areas, idx) * rate;
    total.saturating_add(ceil_secs((target - running) / seg_rate))
}

/// Power held after `secs` seconds of accrual from `have` at base `rate`.
pub fn power_after(areas: &[Breakpoint], have: f64, secs: Seconds, rate: f64) -> f64 {
    let mut remaining = secs as f64;
    let mut power = have;
    let mut idx = area_index(areas, have);
    while remaining > 0.0 {
        let seg_rate = area_multiplier(areas, idx) * rate;
        if let Some(next) = areas.get(idx + 1) {
            if seg_rate > 0.0 {
                let dt = (next.threshold - power).max(0.0) / seg_rate;
                if dt <= remaining {
                    power = power.max(next.threshold);
                    remaining -= dt;
                    idx += 1;
                    continue;
                }
            }
        }
        power += remaining * seg_rate;
        break;
    }
    power
}
