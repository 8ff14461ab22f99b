//! Paths: validated, compressed, time-scored move sequences.
//!
//! Building a [`Path`] always goes through the same steps:
//! 1. run-length compress the moves ([`compress`]),
//! 2. replay them on a private copy of the initial state, stopping once the
//!    milestone holds (trailing moves are dropped),
//! 3. if the milestone still does not hold, extend the path with moves drawn
//!    by a [`Policy`] until it does.
//!
//! A step that fails to execute, or a repair that runs out of moves, makes the
//! path invalid. Once built, a path never changes.

use bevy_prng::WyRand;

use crate::economy::{Action, Catalog, EconomyState, Milestone};
use crate::error::PathError;
use crate::mechanics::accrual::Seconds;
use crate::search::policy::{self, Policy};

/// Upper bound on moves in any one path. Hitting it counts as stuck.
pub const MAX_PATH_STEPS: usize = 10_000;

/// Collapse runs of the same repeatable move into [`Action::Repeat`].
/// Compressing an already compressed sequence returns it unchanged.
pub fn compress<I>(actions: I) -> Vec<Action>
where
    I: IntoIterator<Item = Action>,
{
    let mut runs: Vec<(Action, u32)> = Vec::new();
    for action in actions {
        let times = action.times();
        if times == 0 {
            continue;
        }
        let base = action.base().clone();
        match runs.last_mut() {
            Some((prev, n)) if base.is_repeatable() && *prev == base => {
                *n = n.saturating_add(times);
            }
            _ if base.is_repeatable() => runs.push((base, times)),
            _ => runs.push((action, 1)),
        }
    }
    runs.into_iter()
        .map(|(a, n)| if n == 1 { a } else { Action::repeat(a, n) })
        .collect()
}

/// One row of a path report.
#[derive(Clone, Debug, PartialEq)]
pub struct StepReport {
    pub description: String,
    pub seconds: Seconds,
    pub summary: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Report {
    pub steps: Vec<StepReport>,
    pub total_seconds: Seconds,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Path {
    initial: EconomyState,
    milestone: Milestone,
    actions: Vec<Action>,
    completion_time: Seconds,
}

impl Path {
    /// Build a path, repairing it with `policy` if it stops short.
    pub fn new(
        catalog: &Catalog,
        initial: EconomyState,
        milestone: Milestone,
        actions: Vec<Action>,
        policy: &Policy,
        rng: &mut WyRand,
    ) -> Result<Self, PathError> {
        Self::build(catalog, initial, milestone, actions, Some((policy, rng)))
    }

    /// Build a path exactly as given; falling short is an error.
    pub fn exact(
        catalog: &Catalog,
        initial: EconomyState,
        milestone: Milestone,
        actions: Vec<Action>,
    ) -> Result<Self, PathError> {
        Self::build(catalog, initial, milestone, actions, None)
    }

    fn build(
        catalog: &Catalog,
        initial: EconomyState,
        milestone: Milestone,
        actions_in: Vec<Action>,
        repair: Option<(&Policy, &mut WyRand)>,
    ) -> Result<Self, PathError> {
        let mut state = initial.clone();

        let mut actions = Vec::new();
        for (index, action) in compress(actions_in).into_iter().enumerate() {
            if milestone.reached(&state, catalog) {
                break;
            }
            let invalid = || PathError::InvalidStep { index, action: action.describe(catalog) };
            if !matches!(action, Action::Repeat(..)) {
                if !action.execute(&mut state, catalog) {
                    return Err(invalid());
                }
                actions.push(action);
                continue;
            }
            // a run is cut short as soon as the milestone holds
            let base = action.base().clone();
            let mut done = 0;
            while done < action.times() && !milestone.reached(&state, catalog) {
                if !base.execute(&mut state, catalog) {
                    return Err(invalid());
                }
                done += 1;
            }
            actions.push(Action::repeat(base, done));
        }

        if !milestone.reached(&state, catalog) {
            let unrepairable = |n: usize| PathError::Unrepairable {
                milestone: milestone.describe(catalog),
                actions: n,
            };
            let Some((policy, rng)) = repair else {
                return Err(unrepairable(actions.len()));
            };
            while !milestone.reached(&state, catalog) {
                if actions.len() >= MAX_PATH_STEPS {
                    return Err(unrepairable(actions.len()));
                }
                let Some(next) = policy.choose(catalog, &state, rng) else {
                    return Err(unrepairable(actions.len()));
                };
                if !next.execute(&mut state, catalog) {
                    return Err(PathError::InvalidStep {
                        index: actions.len(),
                        action: next.describe(catalog),
                    });
                }
                actions.push(next);
            }
            actions = compress(actions);
        }

        Ok(Self {
            initial,
            milestone,
            actions,
            completion_time: state.elapsed.max(1),
        })
    }

    /// A path grown one weighted random move at a time. Stops short with
    /// [`PathError::Stuck`] if the player runs out of moves.
    pub fn random(
        catalog: &Catalog,
        initial: EconomyState,
        milestone: Milestone,
        policy: &Policy,
        rng: &mut WyRand,
    ) -> Result<Self, PathError> {
        Self::grow(catalog, initial, milestone, |state| policy.choose(catalog, state, rng))
    }

    /// A path that always takes the quickest legal move.
    pub fn greedy(catalog: &Catalog, initial: EconomyState, milestone: Milestone) -> Result<Self, PathError> {
        Self::grow(catalog, initial, milestone, |state| policy::fastest(catalog, state))
    }

    fn grow<F>(catalog: &Catalog, initial: EconomyState, milestone: Milestone, mut next: F) -> Result<Self, PathError>
    where
        F: FnMut(&EconomyState) -> Option<Action>,
    {
        let mut state = initial.clone();
        let mut actions = Vec::new();
        while !milestone.reached(&state, catalog) {
            let stuck = || PathError::Stuck {
                milestone: milestone.describe(catalog),
                actions: actions.len(),
            };
            if actions.len() >= MAX_PATH_STEPS {
                return Err(stuck());
            }
            let Some(action) = next(&state) else {
                return Err(stuck());
            };
            if !action.execute(&mut state, catalog) {
                return Err(PathError::InvalidStep {
                    index: actions.len(),
                    action: action.describe(catalog),
                });
            }
            actions.push(action);
        }
        Self::exact(catalog, initial, milestone, actions)
    }

    #[inline]
    pub fn completion_time(&self) -> Seconds {
        self.completion_time
    }

    #[inline]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    #[inline]
    pub fn initial(&self) -> &EconomyState {
        &self.initial
    }

    #[inline]
    pub fn milestone(&self) -> Milestone {
        self.milestone
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// States after each step, in order.
    pub fn trajectory(&self, catalog: &Catalog) -> Result<Vec<EconomyState>, PathError> {
        let mut state = self.initial.clone();
        let mut out = Vec::with_capacity(self.actions.len());
        for (index, action) in self.actions.iter().enumerate() {
            if !action.execute(&mut state, catalog) {
                return Err(PathError::InvalidStep { index, action: action.describe(catalog) });
            }
            out.push(state.clone());
        }
        Ok(out)
    }

    /// Final state of the path.
    pub fn replay(&self, catalog: &Catalog) -> Result<EconomyState, PathError> {
        let mut state = self.initial.clone();
        for (index, action) in self.actions.iter().enumerate() {
            if !action.execute(&mut state, catalog) {
                return Err(PathError::InvalidStep { index, action: action.describe(catalog) });
            }
        }
        Ok(state)
    }

    /// (description, seconds, summary) for every step, plus the total.
    pub fn report(&self, catalog: &Catalog) -> Result<Report, PathError> {
        let mut state = self.initial.clone();
        let mut steps = Vec::with_capacity(self.actions.len());
        for (index, action) in self.actions.iter().enumerate() {
            let seconds = action.time_to_execute(&state, catalog);
            if !action.execute(&mut state, catalog) {
                return Err(PathError::InvalidStep { index, action: action.describe(catalog) });
            }
            steps.push(StepReport {
                description: action.describe(catalog),
                seconds,
                summary: action.summary(&state, catalog),
            });
        }
        Ok(Report { steps, total_seconds: state.elapsed })
    }
}
