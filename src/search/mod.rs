// src/search/mod.rs

// Heuristic search for fast paths to a milestone: move selection policies,
// the Path type, crossover, mutation, and the generational engine.

pub mod config;
pub mod mutate;
pub mod path;
pub mod policy;
pub mod population;
pub mod splice;

pub use config::SearchConfig;
pub use path::{Path, Report, StepReport, compress};
pub use policy::Policy;
pub use population::{CancelToken, Evolver, Outcome};
pub use splice::{splice, splice_points};
