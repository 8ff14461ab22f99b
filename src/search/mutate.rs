//! Point edits on a path's move list.

use bevy_prng::WyRand;
use log::debug;

use crate::economy::{Action, Catalog};
use crate::mechanics::stoch;
use crate::search::path::Path;
use crate::search::policy::Policy;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Edit {
    Delete,
    Move,
    Bump,
    Insert,
}

impl Edit {
    const ALL: [Edit; 4] = [Edit::Delete, Edit::Move, Edit::Bump, Edit::Insert];
}

fn apply(edit: Edit, actions: &mut Vec<Action>, menu: &[Action], rng: &mut WyRand) {
    let n = actions.len();
    match edit {
        Edit::Delete if n > 0 => {
            actions.remove(stoch::below(rng, n));
        }
        Edit::Move if n > 1 => {
            let a = actions.remove(stoch::below(rng, n));
            let at = stoch::below(rng, n);
            actions.insert(at, a);
        }
        Edit::Bump if n > 0 => {
            let at = stoch::below(rng, n);
            if actions[at].is_repeatable() {
                let bumped = Action::repeat(actions[at].base().clone(), actions[at].times().saturating_add(1));
                actions[at] = bumped;
            }
        }
        Edit::Insert if !menu.is_empty() => {
            let a = menu[stoch::below(rng, menu.len())].clone();
            actions.insert(stoch::below(rng, n + 1), a);
        }
        _ => {}
    }
}

/// Apply up to `edits` random edits and rebuild. `None` when the edited list
/// cannot be turned back into a valid path.
pub fn mutate(catalog: &Catalog, path: &Path, edits: usize, policy: &Policy, rng: &mut WyRand) -> Option<Path> {
    let menu = catalog.action_menu();
    let mut actions = path.actions().to_vec();
    let count = 1 + stoch::below(rng, edits.max(1));
    for _ in 0..count {
        let edit = Edit::ALL[stoch::below(rng, Edit::ALL.len())];
        apply(edit, &mut actions, &menu, rng);
    }
    match Path::new(catalog, path.initial().clone(), path.milestone(), actions, policy, rng) {
        Ok(p) => Some(p),
        Err(e) => {
            debug!("mutation discarded: {e}");
            None
        }
    }
}
