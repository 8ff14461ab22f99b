// src/economy/mod.rs

// The deterministic economy simulator: balance tables, character state,
// moves and milestones. Nothing in here is random.

pub mod action;
pub mod catalog;
pub mod milestone;
pub mod standard;
pub mod state;

pub use action::Action;
pub use catalog::*;
pub use milestone::Milestone;
pub use state::EconomyState;
