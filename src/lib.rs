/*!
`idle_path`: finds fast upgrade orders in an idle/incremental game economy.

What it does
- Simulates a player's economy deterministically: resources accrue while idle,
  moves (stat ups, rank ups, fusions, transformations, packs, items, luck,
  pack speed) are made as soon as they are affordable.
- Represents a strategy as a [`Path`]: an initial state, a [`Milestone`], and a
  run-length compressed list of moves, scored by its completion time.
- Searches for fast paths with a generational genetic engine ([`Evolver`]):
  fitness-weighted selection, state-aligned crossover ([`splice`]), point
  mutation, elitism, immigration, and adaptive selection pressure.

How to use (call surface only)
- Build or load a [`Catalog`] (see [`Catalog::standard`]).
- Pick a starting [`EconomyState`] and a [`Milestone`].
- Either call [`solve`], or create an [`Evolver`] with a [`SearchConfig`] and
  call [`Evolver::run`]; read [`Outcome::best`] and [`Path::report`].

What it does NOT do
- No real-time play, no persistence between runs, no optimality guarantee.
- No logger is installed; output goes through the `log` facade.
*/

pub mod economy;
pub mod error;
pub mod mechanics;
pub mod search;

pub use economy::{Action, Catalog, EconomyState, Milestone};
pub use error::{CatalogError, PathError, SearchError};
pub use mechanics::accrual::{MAX_HORIZON, Seconds, UNREACHABLE};
pub use search::{CancelToken, Evolver, Outcome, Path, Policy, SearchConfig, splice};

/// Search from a new player's state with `config`.
pub fn solve(catalog: &Catalog, milestone: Milestone, config: SearchConfig) -> Result<Outcome, SearchError> {
    let initial = EconomyState::new(catalog);
    Evolver::new(catalog, initial, milestone, config)?.run()
}
