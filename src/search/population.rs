//! Generational search over paths.
//!
//! Each generation runs three phases, every one of them fanned out over
//! scoped worker threads that own disjoint slices of the next pool:
//!
//! * **breed**: pairs are either copied from the champion history or bred by
//!   fitness-weighted selection followed by [`splice`],
//! * **immigrate**: the tail of the pool is refilled with fresh random paths
//!   or historical champions,
//! * **mutate**: bred offspring are edited by [`mutate`] with some probability.
//!
//! Between phases the controlling thread scores the pool, updates the best
//! path and the history, and adapts the selection pressure. Every slot draws
//! from its own generator, derived from the run seed and its
//! `(phase, generation, slot)` coordinates, so a run is a pure function of
//! its inputs no matter how many threads execute it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use bevy_prng::WyRand;
use log::{debug, info, warn};

use crate::economy::{Catalog, EconomyState, Milestone};
use crate::error::{PathError, SearchError};
use crate::mechanics::accrual::Seconds;
use crate::mechanics::stoch;
use crate::search::config::SearchConfig;
use crate::search::mutate::mutate;
use crate::search::path::Path;
use crate::search::policy::Policy;
use crate::search::splice::splice;

const PHASE_INIT: u64 = 1;
const PHASE_BREED: u64 = 2;
const PHASE_IMMIGRATE: u64 = 3;
const PHASE_MUTATE: u64 = 4;
const PHASE_ADAPT: u64 = 5;

/// Shared stop flag. Checked once per generation.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of a run.
#[derive(Clone, Debug)]
pub struct Outcome {
    /// Fastest path seen in any generation.
    pub best: Path,
    /// The final pool.
    pub population: Vec<Path>,
    /// Distinct champions, fastest first.
    pub history: Vec<Path>,
    /// Generations actually completed.
    pub generations: usize,
    pub cancelled: bool,
    /// Best completion time after initialization and after each generation.
    pub trace: Vec<Seconds>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Origin {
    Offspring,
    Elite,
    Immigrant,
}

/// Top-K distinct paths by completion time.
#[derive(Clone, Debug)]
struct History {
    cap: usize,
    paths: Vec<Path>,
}

impl History {
    fn new(cap: usize) -> Self {
        Self { cap, paths: Vec::with_capacity(cap) }
    }

    fn offer(&mut self, path: &Path) {
        if self.cap == 0 || self.paths.iter().any(|p| p.actions() == path.actions()) {
            return;
        }
        let at = self.paths.partition_point(|p| p.completion_time() <= path.completion_time());
        if at < self.cap {
            self.paths.insert(at, path.clone());
            self.paths.truncate(self.cap);
        }
    }

    fn pick(&self, rng: &mut WyRand) -> Option<&Path> {
        if self.paths.is_empty() {
            return None;
        }
        self.paths.get(stoch::below(rng, self.paths.len()))
    }
}

/// Run `work(index, slot)` over `slots`, split into one contiguous chunk per
/// thread. Returns once every thread has joined.
fn in_parallel<T, F>(threads: usize, slots: &mut [T], work: F)
where
    T: Send,
    F: Fn(usize, &mut T) + Sync,
{
    if slots.is_empty() {
        return;
    }
    let chunk = slots.len().div_ceil(threads.max(1));
    std::thread::scope(|scope| {
        for (c, part) in slots.chunks_mut(chunk).enumerate() {
            let work = &work;
            scope.spawn(move || {
                for (k, slot) in part.iter_mut().enumerate() {
                    work(c * chunk + k, slot);
                }
            });
        }
    });
}

fn fastest(paths: &[Path]) -> Option<&Path> {
    paths.iter().min_by_key(|p| p.completion_time())
}

pub struct Evolver<'c> {
    catalog: &'c Catalog,
    initial: EconomyState,
    milestone: Milestone,
    config: SearchConfig,
    cancel: CancelToken,
}

impl<'c> Evolver<'c> {
    pub fn new(
        catalog: &'c Catalog,
        initial: EconomyState,
        milestone: Milestone,
        config: SearchConfig,
    ) -> Result<Self, SearchError> {
        config.validate()?;
        catalog.validate()?;
        Ok(Self { catalog, initial, milestone, config, cancel: CancelToken::new() })
    }

    pub fn with_cancel(self, cancel: CancelToken) -> Self {
        Self { cancel, ..self }
    }

    /// Handle that stops this run at the next generation boundary.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn rng(&self, phase: u64, generation: usize, slot: usize) -> WyRand {
        stoch::stream(self.config.seed, &[phase, generation as u64, slot as u64])
    }

    /// Random-walk policy with an exponent drawn from `exponent_range`.
    fn policy(&self, rng: &mut WyRand) -> Policy {
        let (lo, hi) = self.config.exponent_range;
        Policy {
            exponent: hi - (hi - lo) * stoch::unit(rng),
            pack_resistance: self.config.pack_resistance,
        }
    }

    fn random_path(&self, rng: &mut WyRand) -> Result<Path, PathError> {
        let mut last = None;
        for _ in 0..self.config.max_init_attempts.max(1) {
            let policy = self.policy(rng);
            match Path::random(self.catalog, self.initial.clone(), self.milestone, &policy, rng) {
                Ok(path) => return Ok(path),
                Err(e) => last = Some(e),
            }
        }
        Err(last.unwrap_or_else(|| PathError::Stuck {
            milestone: self.milestone.describe(self.catalog),
            actions: 0,
        }))
    }

    fn initialize(&self) -> Result<Vec<Path>, SearchError> {
        let mut slots: Vec<Option<Result<Path, PathError>>> = vec![None; self.config.pool_size];
        in_parallel(self.config.threads, &mut slots, |i, slot| {
            if i == 0 && self.config.seed_greedy {
                if let Ok(path) = Path::greedy(self.catalog, self.initial.clone(), self.milestone) {
                    *slot = Some(Ok(path));
                    return;
                }
            }
            let mut rng = self.rng(PHASE_INIT, 0, i);
            *slot = Some(self.random_path(&mut rng));
        });

        let mut paths = Vec::with_capacity(slots.len());
        let mut failed = 0;
        let mut last_error = None;
        for slot in slots.into_iter().flatten() {
            match slot {
                Ok(path) => paths.push(path),
                Err(e) => {
                    failed += 1;
                    last_error = Some(e);
                }
            }
        }
        if paths.is_empty() {
            let e = last_error.unwrap_or_else(|| PathError::Stuck {
                milestone: self.milestone.describe(self.catalog),
                actions: 0,
            });
            return Err(SearchError::NoFeasiblePath(e));
        }
        if failed > 0 {
            warn!("{failed} initial slot(s) could not reach the milestone; filled with copies");
            let found = paths.len();
            for k in 0..failed {
                let copy = paths[k % found].clone();
                paths.push(copy);
            }
        }
        Ok(paths)
    }

    fn breed(&self, generation: usize, pool: &[Path], history: &History, competition: f64) -> Vec<(Path, Origin)> {
        let offspring = self.config.pool_size - self.config.immigrants;
        let t_best = fastest(pool).map_or(1, |p| p.completion_time()) as f64;
        let weights: Vec<f64> = pool
            .iter()
            .map(|p| (t_best / p.completion_time() as f64).powf(competition))
            .collect();

        let mut pairs: Vec<Option<[(Path, Origin); 2]>> = vec![None; offspring.div_ceil(2)];
        in_parallel(self.config.threads, &mut pairs, |k, slot| {
            let mut rng = self.rng(PHASE_BREED, generation, k);
            if stoch::bernoulli(&mut rng, self.config.elite_copy_chance) {
                if let (Some(a), Some(b)) = (history.pick(&mut rng), history.pick(&mut rng)) {
                    *slot = Some([(a.clone(), Origin::Elite), (b.clone(), Origin::Elite)]);
                    return;
                }
            }
            let a = stoch::weighted_pick(&weights, None, &mut rng).unwrap_or(0);
            let b = stoch::weighted_pick(&weights, Some(a), &mut rng).unwrap_or(a);
            let policy = self.policy(&mut rng);
            let (c1, c2) = splice(
                self.catalog,
                &pool[a],
                &pool[b],
                &policy,
                self.config.splice_early_exit,
                &mut rng,
            );
            *slot = Some([(c1, Origin::Offspring), (c2, Origin::Offspring)]);
        });

        let mut next: Vec<(Path, Origin)> = pairs.into_iter().flatten().flatten().collect();
        next.truncate(offspring);

        let mut tail: Vec<Option<(Path, Origin)>> = vec![None; self.config.immigrants];
        in_parallel(self.config.threads, &mut tail, |k, slot| {
            let mut rng = self.rng(PHASE_IMMIGRATE, generation, k);
            let from_history = stoch::bernoulli(&mut rng, self.config.immigrant_history_share);
            let path = match history.pick(&mut rng) {
                Some(p) if from_history => p.clone(),
                _ => match self.random_path(&mut rng) {
                    Ok(p) => p,
                    Err(e) => {
                        debug!("immigrant {k} fell back to a pool copy: {e}");
                        pool[stoch::below(&mut rng, pool.len())].clone()
                    }
                },
            };
            *slot = Some((path, Origin::Immigrant));
        });
        next.extend(tail.into_iter().flatten());
        next
    }

    fn mutate_offspring(&self, generation: usize, next: &mut [(Path, Origin)]) {
        in_parallel(self.config.threads, next, |i, (path, origin)| {
            if *origin != Origin::Offspring {
                return;
            }
            let mut rng = self.rng(PHASE_MUTATE, generation, i);
            if !stoch::bernoulli(&mut rng, self.config.mutation_rate) {
                return;
            }
            let policy = self.policy(&mut rng);
            if let Some(m) = mutate(self.catalog, path, self.config.max_mutation_edits, &policy, &mut rng) {
                *path = m;
            }
        });
    }

    /// Selection pressure for the next generation.
    fn adapt(&self, generation: usize, improved: bool) -> f64 {
        let base = self.config.competition;
        if improved {
            return base;
        }
        let mut rng = self.rng(PHASE_ADAPT, generation, 0);
        if stoch::bernoulli(&mut rng, self.config.invert_chance) {
            -base
        } else {
            base * self.config.stagnation_boost
        }
    }

    fn should_stop(&self, started: Instant) -> bool {
        self.cancel.is_cancelled() || self.config.deadline.is_some_and(|d| started.elapsed() >= d)
    }

    pub fn run(&self) -> Result<Outcome, SearchError> {
        let started = Instant::now();
        info!(
            "search for {}: pool {}, immigrants {}, generations {}, threads {}, seed {:#x}",
            self.milestone.describe(self.catalog),
            self.config.pool_size,
            self.config.immigrants,
            self.config.generations,
            self.config.threads,
            self.config.seed
        );

        let mut pool = self.initialize()?;
        let Some(first) = fastest(&pool) else {
            return Err(SearchError::Config("empty initial pool".into()));
        };
        let mut best = first.clone();
        let mut history = History::new(self.config.history_cap);
        history.offer(&best);
        let mut trace = vec![best.completion_time()];
        info!("initial pool ready: best {}s", best.completion_time());

        let mut competition = self.config.competition;
        let mut generations = 0;
        let mut cancelled = false;
        for generation in 0..self.config.generations {
            if self.should_stop(started) {
                warn!("search stopped after {generation} generation(s)");
                cancelled = true;
                break;
            }

            let mut next = self.breed(generation, &pool, &history, competition);
            self.mutate_offspring(generation, &mut next);
            pool = next.into_iter().map(|(p, _)| p).collect();

            if let Some(champion) = fastest(&pool) {
                let improved = champion.completion_time() < best.completion_time();
                if improved {
                    best = champion.clone();
                }
                history.offer(champion);
                let adapted = self.adapt(generation, improved);
                if adapted != competition {
                    debug!("generation {generation}: competition {competition:.3} -> {adapted:.3}");
                }
                competition = adapted;
            }
            trace.push(best.completion_time());
            generations += 1;

            if self.config.log_every > 0 && generations % self.config.log_every == 0 {
                info!(
                    "generation {generations}: best {}s, {} champion(s) kept",
                    best.completion_time(),
                    history.paths.len()
                );
            }
        }

        info!(
            "search finished after {generations} generation(s) in {:.2?}: best {}s over {} action(s)",
            started.elapsed(),
            best.completion_time(),
            best.len()
        );
        Ok(Outcome {
            best,
            population: pool,
            history: history.paths,
            generations,
            cancelled,
            trace,
        })
    }
}
