//! Discrete upgrade moves.
//!
//! [`Action`] is a closed set of state transitions. Every variant answers the
//! same two questions: how long until it can happen ([`Action::time_to_execute`])
//! and what happens when it does ([`Action::execute`]). [`Action::Repeat`]
//! wraps a repeatable move with a count.

use serde::{Deserialize, Serialize};

use crate::economy::catalog::*;
use crate::economy::state::EconomyState;
use crate::mechanics::accrual::{self, MAX_HORIZON, Seconds, UNREACHABLE};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    StatUp(Stat),
    RankUp,
    FuseUp,
    BuyTransformation(TransformId),
    BuyPack(PackId),
    AcquireItem(ItemId),
    LuckUp,
    PackSpeedUp,
    Repeat(Box<Action>, u32),
}

/// What a simple action waits for, and what it costs.
#[derive(Clone, Copy, Debug)]
struct Requirement {
    resource: Resource,
    amount: f64,
    /// Thresholds (power) are reset by the effect rather than paid.
    pays: bool,
    /// Time spent after the threshold is met (opening packs).
    extra: Seconds,
}

impl Requirement {
    fn pay(resource: Resource, amount: f64) -> Self {
        Self { resource, amount, pays: true, extra: 0 }
    }
    fn reach(resource: Resource, amount: f64) -> Self {
        Self { resource, amount, pays: false, extra: 0 }
    }
}

fn open_secs(catalog: &Catalog, state: &EconomyState, pack: PackId, count: f64) -> Option<Seconds> {
    let pack = catalog.pack(pack)?;
    Some(accrual::ceil_secs(count * pack.open_seconds / state.pack_speed.max(1.0)))
}

impl Action {
    /// `n` copies of `action` as one move.
    pub fn repeat(action: Action, n: u32) -> Action {
        match action {
            Action::Repeat(inner, m) => Action::repeat(*inner, m.saturating_mul(n)),
            a if n == 1 => a,
            a => Action::Repeat(Box::new(a), n),
        }
    }

    /// Only these collapse into [`Action::Repeat`] runs.
    pub fn is_repeatable(&self) -> bool {
        matches!(
            self.base(),
            Action::StatUp(_) | Action::RankUp | Action::LuckUp | Action::PackSpeedUp
        )
    }

    /// The move being repeated (or the move itself).
    pub fn base(&self) -> &Action {
        match self {
            Action::Repeat(inner, _) => inner.base(),
            a => a,
        }
    }

    /// How many times the base move runs.
    pub fn times(&self) -> u32 {
        match self {
            Action::Repeat(inner, n) => inner.times().saturating_mul(*n),
            _ => 1,
        }
    }

    fn requirement(&self, state: &EconomyState, catalog: &Catalog) -> Option<Requirement> {
        match self {
            Action::StatUp(stat) => {
                let cost = state.stat_cost(catalog, *stat)?;
                Some(Requirement::pay(Resource::Coins, cost))
            }
            Action::RankUp => {
                let next = catalog.ranks.get(state.rank + 1)?;
                Some(Requirement::reach(Resource::Power, next.required_power))
            }
            Action::FuseUp => {
                let next = state.next_fusion(catalog)?;
                Some(Requirement::reach(Resource::Power, next.required_power))
            }
            Action::BuyTransformation(id) => {
                if state.transformations.contains(id) {
                    return None;
                }
                let price = catalog.transformation(*id)?.price?;
                Some(Requirement::pay(price.resource, price.amount))
            }
            Action::BuyPack(pack) => {
                let cost = catalog.pack(*pack)?.gem_cost;
                let extra = open_secs(catalog, state, *pack, 1.0)?;
                Some(Requirement { extra, ..Requirement::pay(Resource::Gems, cost) })
            }
            Action::AcquireItem(id) => {
                let item = catalog.item(*id)?;
                let packs = state.packs_to_next_grade(catalog, *id)?;
                let cost = packs * catalog.pack(item.pack)?.gem_cost;
                let extra = open_secs(catalog, state, item.pack, packs)?;
                Some(Requirement { extra, ..Requirement::pay(Resource::Gems, cost) })
            }
            Action::LuckUp => {
                let u = catalog.luck_upgrades.get(state.luck_level)?;
                Some(Requirement::pay(Resource::Gems, u.gem_cost))
            }
            Action::PackSpeedUp => {
                let u = catalog.pack_speed_upgrades.get(state.pack_speed_level)?;
                Some(Requirement::pay(Resource::Gems, u.gem_cost))
            }
            Action::Repeat(..) => None,
        }
    }

    fn apply(&self, state: &mut EconomyState, catalog: &Catalog) -> bool {
        match self {
            Action::StatUp(stat) => state.raise_stat(*stat),
            Action::RankUp => state.advance_rank(),
            Action::FuseUp => state.advance_fusion(catalog),
            Action::BuyTransformation(id) => {
                state.transformations.insert(*id);
            }
            Action::BuyPack(pack) => state.open_packs(catalog, *pack, 1.0),
            Action::AcquireItem(id) => return state.raise_item_grade(catalog, *id),
            Action::LuckUp => state.raise_luck(catalog),
            Action::PackSpeedUp => state.raise_pack_speed(catalog),
            Action::Repeat(..) => return false,
        }
        true
    }

    /// Whole seconds of idling before this move can be made, or
    /// [`UNREACHABLE`]. Never mutates `state`.
    pub fn time_to_execute(&self, state: &EconomyState, catalog: &Catalog) -> Seconds {
        if let Action::Repeat(inner, n) = self {
            let mut scratch = state.clone();
            let mut total: Seconds = 0;
            for _ in 0..*n {
                let t = inner.time_to_execute(&scratch, catalog);
                if t > MAX_HORIZON {
                    return UNREACHABLE;
                }
                total = total.saturating_add(t);
                if !inner.execute(&mut scratch, catalog) {
                    return UNREACHABLE;
                }
            }
            return total;
        }
        let Some(req) = self.requirement(state, catalog) else {
            return UNREACHABLE;
        };
        let (wait, _) = state.secs_until(catalog, req.resource, req.amount);
        wait.saturating_add(req.extra)
    }

    #[inline]
    pub fn can_execute(&self, state: &EconomyState, catalog: &Catalog) -> bool {
        self.time_to_execute(state, catalog) <= MAX_HORIZON
    }

    /// Idle until affordable, pay, apply. On `false` the state is untouched.
    pub fn execute(&self, state: &mut EconomyState, catalog: &Catalog) -> bool {
        if let Action::Repeat(inner, n) = self {
            let mut scratch = state.clone();
            for _ in 0..*n {
                if !inner.execute(&mut scratch, catalog) {
                    return false;
                }
            }
            *state = scratch;
            return true;
        }
        let Some(req) = self.requirement(state, catalog) else {
            return false;
        };
        let (wait, equip) = state.secs_until(catalog, req.resource, req.amount);
        let total = wait.saturating_add(req.extra);
        if total > MAX_HORIZON {
            return false;
        }
        let mut next = state.clone();
        next.play(catalog, total, equip);
        if !accrual::affordable(next.amount(req.resource), req.amount) {
            return false;
        }
        if req.pays {
            next.spend(req.resource, req.amount);
        }
        if !self.apply(&mut next, catalog) {
            return false;
        }
        *state = next;
        true
    }

    pub fn describe(&self, catalog: &Catalog) -> String {
        match self {
            Action::StatUp(stat) => format!("Increase {}", stat.name()),
            Action::RankUp => "Rank up".into(),
            Action::FuseUp => "Next fusion".into(),
            Action::BuyTransformation(id) => {
                format!("Buy {} transformation", catalog.transformation_name(*id))
            }
            Action::BuyPack(pack) => {
                format!("Open one {} pack", catalog.pack(*pack).map_or("?", |p| p.name.as_str()))
            }
            Action::AcquireItem(id) => {
                format!("Collect {} to next grade", catalog.item(*id).map_or("?", |it| it.name.as_str()))
            }
            Action::LuckUp => "Upgrade luck".into(),
            Action::PackSpeedUp => "Upgrade pack speed".into(),
            Action::Repeat(inner, n) => format!("{} x{}", inner.describe(catalog), n),
        }
    }

    /// Human-readable view of what this move changed, read off `after`.
    pub fn summary(&self, after: &EconomyState, catalog: &Catalog) -> String {
        match self.base() {
            Action::StatUp(_) => after.stats_info(catalog),
            Action::RankUp => after.rank_info(catalog),
            Action::FuseUp => after.fusion_info(catalog),
            Action::BuyTransformation(id) => after.transformation_info(catalog, *id),
            Action::BuyPack(pack) => after.pack_info(catalog, *pack),
            Action::AcquireItem(id) => after.item_info(catalog, *id),
            Action::LuckUp => after.luck_info(),
            Action::PackSpeedUp => after.pack_speed_info(),
            Action::Repeat(..) => String::new(),
        }
    }
}

impl Catalog {
    /// Every simple move the catalog offers, legal or not right now.
    pub fn action_menu(&self) -> Vec<Action> {
        let mut menu: Vec<Action> = Stat::ALL.into_iter().map(Action::StatUp).collect();
        menu.push(Action::RankUp);
        menu.push(Action::FuseUp);
        menu.extend(
            self.transformations
                .iter()
                .enumerate()
                .filter(|(_, t)| t.price.is_some())
                .map(|(i, _)| Action::BuyTransformation(TransformId(i))),
        );
        menu.extend((0..self.packs.len()).map(|i| Action::BuyPack(PackId(i))));
        menu.extend((0..self.items.len()).map(|i| Action::AcquireItem(ItemId(i))));
        if !self.luck_upgrades.is_empty() {
            menu.push(Action::LuckUp);
        }
        if !self.pack_speed_upgrades.is_empty() {
            menu.push(Action::PackSpeedUp);
        }
        menu
    }
}
