/// Stochastic mechanics: RNG helpers over `bevy_prng::WyRand`.
/// Note: every worker owns its generator outright; streams are derived from
/// the run seed so no generator is ever shared between threads.
use bevy_prng::WyRand;
use rand_core::{RngCore, SeedableRng};

/// Uniform in [0, 1).
#[inline]
pub fn unit(rng: &mut WyRand) -> f64 {
    ((rng.next_u64() >> 11) as f64) / ((1u64 << 53) as f64)
}

/// Uniform in [lo, hi).
#[inline]
pub fn uniform(rng: &mut WyRand, lo: f64, hi: f64) -> f64 {
    lo + (hi - lo) * unit(rng)
}

/// Bernoulli(p) with WyRand.
#[inline]
pub fn bernoulli(rng: &mut WyRand, p: f64) -> bool {
    unit(rng) < p.clamp(0.0, 1.0)
}

/// Uniform index in `0..n`. `n` must be non-zero.
#[inline]
pub fn below(rng: &mut WyRand, n: usize) -> usize {
    ((unit(rng) * n as f64) as usize).min(n.saturating_sub(1))
}

/// Roulette draw over `weights`, optionally with one index removed and the
/// rest renormalized. Degenerate weights fall back to a uniform draw.
pub fn weighted_pick(weights: &[f64], exclude: Option<usize>, rng: &mut WyRand) -> Option<usize> {
    let eligible = |i: usize| Some(i) != exclude;
    let usable = |w: f64| w.is_finite() && w > 0.0;

    let total: f64 = weights
        .iter()
        .enumerate()
        .filter(|&(i, &w)| eligible(i) && usable(w))
        .map(|(_, &w)| w)
        .sum();

    if !(total > 0.0) || !total.is_finite() {
        let pool: Vec<usize> = (0..weights.len()).filter(|&i| eligible(i)).collect();
        if pool.is_empty() {
            return None;
        }
        return Some(pool[below(rng, pool.len())]);
    }

    let target = unit(rng) * total;
    let mut acc = 0.0;
    let mut last = None;
    for (i, &w) in weights.iter().enumerate() {
        if !eligible(i) || !usable(w) {
            continue;
        }
        acc += w;
        last = Some(i);
        if target < acc {
            return Some(i);
        }
    }
    last
}

/// SplitMix64 finalizer.
#[inline]
pub fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Independent generator for one lane of a run, e.g. `[phase, generation, worker]`.
pub fn stream(seed: u64, lanes: &[u64]) -> WyRand {
    let s = lanes
        .iter()
        .fold(splitmix64(seed), |acc, &lane| splitmix64(acc ^ splitmix64(lane)));
    WyRand::from_seed(s.to_le_bytes())
}
