//! How random and greedy paths pick their next move.

use bevy_prng::WyRand;

use crate::economy::{Action, Catalog, EconomyState};
use crate::mechanics::accrual::{MAX_HORIZON, Seconds};
use crate::mechanics::stoch;

/// Weighted random choice over currently legal moves.
///
/// A move taking `t` seconds gets weight `(1/t)^exponent`. Exponent 0 is a
/// uniform pick; larger exponents lean harder toward quick moves. Opening
/// single packs is damped by how much the pack has already paid out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Policy {
    pub exponent: f64,
    pub pack_resistance: f64,
}

impl Default for Policy {
    fn default() -> Self {
        Self { exponent: 0.5, pack_resistance: 0.05 }
    }
}

impl Policy {
    pub fn with_exponent(self, exponent: f64) -> Self {
        Self { exponent, ..self }
    }

    fn damping(&self, action: &Action, state: &EconomyState, catalog: &Catalog) -> f64 {
        match action {
            Action::BuyPack(pack) => 1.0 + self.pack_resistance * state.owned_from(catalog, *pack),
            _ => 1.0,
        }
    }

    /// Draw the next move, or `None` if nothing is legal.
    pub fn choose(&self, catalog: &Catalog, state: &EconomyState, rng: &mut WyRand) -> Option<Action> {
        let mut candidates = Vec::new();
        let mut weights = Vec::new();
        for action in catalog.action_menu() {
            let t = action.time_to_execute(state, catalog);
            if t > MAX_HORIZON {
                continue;
            }
            // free moves are always taken
            if t == 0 {
                return Some(action);
            }
            let effective = t as f64 * self.damping(&action, state, catalog);
            weights.push((1.0 / effective).powf(self.exponent));
            candidates.push(action);
        }
        let pick = stoch::weighted_pick(&weights, None, rng)?;
        Some(candidates.swap_remove(pick))
    }
}

/// The legal move that completes soonest; ties go to the earlier menu entry.
pub fn fastest(catalog: &Catalog, state: &EconomyState) -> Option<Action> {
    let mut best: Option<(Seconds, Action)> = None;
    for action in catalog.action_menu() {
        let t = action.time_to_execute(state, catalog);
        if t > MAX_HORIZON {
            continue;
        }
        if best.as_ref().is_none_or(|(bt, _)| t < *bt) {
            best = Some((t, action));
        }
    }
    best.map(|(_, a)| a)
}
