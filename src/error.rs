use thiserror::Error;

use crate::economy::catalog::Rarity;

/// Why a path could not be built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PathError {
    #[error("path is invalid: step {index} ({action}) cannot execute")]
    InvalidStep { index: usize, action: String },
    #[error("path is invalid: no legal action reaches {milestone} after {actions} action(s)")]
    Unrepairable { milestone: String, actions: usize },
    #[error("cannot complete: player is stuck before {milestone} after {actions} action(s)")]
    Stuck { milestone: String, actions: usize },
}

impl PathError {
    /// `Stuck` is a "cannot complete" outcome; everything else means the path
    /// itself is broken.
    pub fn is_invalid(&self) -> bool {
        !matches!(self, PathError::Stuck { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("catalog has no ranks")]
    NoRanks,
    #[error("catalog has no fusion tiers")]
    NoFusions,
    #[error("area breakpoints must strictly increase (at index {0})")]
    AreasNotIncreasing(usize),
    #[error("{table} entry {index} references {what} {target}, which does not exist")]
    Dangling {
        table: &'static str,
        index: usize,
        what: &'static str,
        target: usize,
    },
    #[error("item {0} has a draw chance outside (0, 1]")]
    BadChance(usize),
    #[error("grade thresholds for {0:?} must be positive and strictly increase")]
    BadGrades(Rarity),
    #[error("expected {expected} grade threshold rows, found {found}")]
    GradeRows { expected: usize, found: usize },
    #[error("{0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid search config: {0}")]
    Config(String),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("no feasible path: {0}")]
    NoFeasiblePath(#[source] PathError),
}
