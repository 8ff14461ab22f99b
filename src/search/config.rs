// src/search/config.rs

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;

/// Knobs for one [`Evolver`](crate::search::population::Evolver) run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Paths alive per generation.
    pub pool_size: usize,
    pub generations: usize,
    /// Tail slots refilled with fresh or historical paths each generation.
    pub immigrants: usize,
    pub threads: usize,
    /// Chance a breeding pair is copied straight from history.
    pub elite_copy_chance: f64,
    /// Chance an immigrant slot takes a historical champion over a fresh path.
    pub immigrant_history_share: f64,
    /// Baseline selection-pressure exponent.
    pub competition: f64,
    /// Factor applied to the baseline when a generation does not improve.
    pub stagnation_boost: f64,
    /// Chance a stagnant generation inverts selection pressure instead.
    pub invert_chance: f64,
    pub mutation_rate: f64,
    pub max_mutation_edits: usize,
    pub history_cap: usize,
    /// Per-path random-policy exponents are drawn from `(lo, hi]`.
    pub exponent_range: (f64, f64),
    pub pack_resistance: f64,
    pub seed_greedy: bool,
    pub max_init_attempts: usize,
    pub splice_early_exit: f64,
    /// Progress is logged every this many generations; 0 disables it.
    pub log_every: usize,
    pub seed: u64,
    pub deadline: Option<Duration>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        let threads = std::thread::available_parallelism().map_or(1, |n| n.get());
        Self {
            pool_size: 150,
            generations: 500,
            immigrants: 30,
            threads,
            elite_copy_chance: 0.05,
            immigrant_history_share: 0.25,
            competition: 0.5,
            stagnation_boost: 4.0,
            invert_chance: 0.5,
            mutation_rate: 0.3,
            max_mutation_edits: 3,
            history_cap: 32,
            exponent_range: (0.0, 1.0),
            pack_resistance: 0.05,
            seed_greedy: true,
            max_init_attempts: 8,
            splice_early_exit: 0.1,
            log_every: 10,
            seed: 0x1D1E_5EED,
            deadline: None,
        }
    }
}

impl SearchConfig {
    pub fn with_seed(self, seed: u64) -> Self {
        Self { seed, ..self }
    }

    pub fn with_generations(self, generations: usize) -> Self {
        Self { generations, ..self }
    }

    pub fn with_pool(self, pool_size: usize, immigrants: usize) -> Self {
        Self { pool_size, immigrants, ..self }
    }

    pub fn with_threads(self, threads: usize) -> Self {
        Self { threads, ..self }
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        let bad = |msg: String| Err(SearchError::Config(msg));
        if self.pool_size < 2 {
            return bad(format!("pool_size must be at least 2, got {}", self.pool_size));
        }
        if self.immigrants >= self.pool_size {
            return bad(format!(
                "immigrants ({}) must be smaller than pool_size ({})",
                self.immigrants, self.pool_size
            ));
        }
        if self.threads == 0 {
            return bad("threads must be at least 1".into());
        }
        for (name, p) in [
            ("elite_copy_chance", self.elite_copy_chance),
            ("immigrant_history_share", self.immigrant_history_share),
            ("invert_chance", self.invert_chance),
            ("mutation_rate", self.mutation_rate),
            ("pack_resistance", self.pack_resistance),
            ("splice_early_exit", self.splice_early_exit),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return bad(format!("{name} must lie in [0, 1], got {p}"));
            }
        }
        if !(self.competition > 0.0) || !self.competition.is_finite() {
            return bad(format!("competition must be positive, got {}", self.competition));
        }
        if !(self.stagnation_boost > 0.0) {
            return bad(format!("stagnation_boost must be positive, got {}", self.stagnation_boost));
        }
        let (lo, hi) = self.exponent_range;
        if !(lo >= 0.0 && hi > lo && hi.is_finite()) {
            return bad(format!("exponent_range must satisfy 0 <= lo < hi, got ({lo}, {hi})"));
        }
        Ok(())
    }
}
