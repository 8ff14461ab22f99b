//! A snapshot of one character's economy.
//!
//! States are plain values: every branch of a search clones the state it
//! explores, so nothing here is ever shared mutably. Stat levels live in a
//! fixed array indexed by [`Stat`], item quantities in a vector indexed by
//! [`ItemId`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::economy::catalog::*;
use crate::mechanics::accrual::{self, Seconds};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EconomyState {
    pub elapsed: Seconds,
    pub coins: f64,
    pub gems: f64,
    pub power: f64,
    pub stats: [u32; 3],
    pub rank: usize,
    pub fusion: usize,
    pub transformations: BTreeSet<TransformId>,
    /// Expected owned quantity per item; fractional by design.
    pub items: Vec<f64>,
    pub luck_level: usize,
    pub luck: f64,
    pub pack_speed_level: usize,
    pub pack_speed: f64,
}

impl EconomyState {
    /// A new player: starting resources plus one averaged chest cycle.
    pub fn new(catalog: &Catalog) -> Self {
        let mut st = Self::empty(catalog);
        st.coins = catalog.starting_coins;
        st.gems = catalog.starting_gems;
        st.coins += st.chest_coins_per_second(catalog, None) * catalog.chest_period_seconds;
        st.gems += st.chest_gems_per_second(catalog, None) * catalog.chest_period_seconds;
        st
    }

    /// No resources, no progress.
    pub fn empty(catalog: &Catalog) -> Self {
        Self {
            elapsed: 0,
            coins: 0.0,
            gems: 0.0,
            power: 0.0,
            stats: [0; 3],
            rank: 0,
            fusion: 0,
            transformations: BTreeSet::new(),
            items: vec![0.0; catalog.items.len()],
            luck_level: 0,
            luck: 1.0,
            pack_speed_level: 0,
            pack_speed: 1.0,
        }
    }

    pub fn with_rank(mut self, rank: usize) -> Self {
        self.rank = rank;
        self
    }

    pub fn with_fusion(mut self, fusion: usize) -> Self {
        self.fusion = fusion;
        self
    }

    pub fn with_stats(mut self, stats: [u32; 3]) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_transformations(mut self, ids: impl IntoIterator<Item = TransformId>) -> Self {
        self.transformations.extend(ids);
        self
    }

    /// Splice points need the same rank, fusion, transformations and stats.
    pub fn is_equivalent(&self, other: &Self) -> bool {
        self.rank == other.rank
            && self.fusion == other.fusion
            && self.stats == other.stats
            && self.transformations == other.transformations
    }

    #[inline]
    pub fn amount(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Coins => self.coins,
            Resource::Gems => self.gems,
            Resource::Power => self.power,
        }
    }

    pub fn spend(&mut self, resource: Resource, amount: f64) {
        let slot = match resource {
            Resource::Coins => &mut self.coins,
            Resource::Gems => &mut self.gems,
            Resource::Power => &mut self.power,
        };
        *slot = (*slot - amount).max(0.0);
    }

    /* --- multipliers --- */

    pub fn stat_multiplier(&self, catalog: &Catalog) -> f64 {
        let levels: u32 = self.stats.iter().sum();
        catalog.stat_step.powf(levels as f64)
    }

    /// Current grade (0..=GRADES) of an item.
    pub fn item_grade(&self, catalog: &Catalog, id: ItemId) -> usize {
        let (Some(item), Some(&qty)) = (catalog.item(id), self.items.get(id.0)) else {
            return 0;
        };
        catalog
            .thresholds(item.rarity)
            .map_or(0, |row| row.iter().take_while(|&&t| qty >= t).count())
    }

    /// Product of grade multipliers of every item boosting `resource`.
    pub fn item_bonus(&self, catalog: &Catalog, resource: Resource) -> f64 {
        catalog
            .items
            .iter()
            .enumerate()
            .filter(|(_, it)| it.stat == resource)
            .map(|(i, it)| match self.item_grade(catalog, ItemId(i)) {
                0 => 1.0,
                g => it.grade_multipliers[g - 1],
            })
            .product()
    }

    /// Expected yield of one pack for an item, luck included.
    pub fn draw_yield(&self, item: &Item) -> f64 {
        if item.rarity.is_lucky() { item.chance * self.luck } else { item.chance }
    }

    /// Total expected quantity already drawn from a pack.
    pub fn owned_from(&self, catalog: &Catalog, pack: PackId) -> f64 {
        catalog
            .items_in(pack)
            .map(|(id, _)| self.items.get(id.0).copied().unwrap_or(0.0))
            .sum()
    }

    /// The owned transformation that best boosts `resource`, if any beats none.
    pub fn best_transformation(&self, catalog: &Catalog, resource: Resource) -> Option<TransformId> {
        let mut best = None;
        let mut best_mult = 1.0;
        for &id in &self.transformations {
            if let Some(t) = catalog.transformation(id) {
                let m = t.multiplier(resource);
                if m > best_mult {
                    best = Some(id);
                    best_mult = m;
                }
            }
        }
        best
    }

    fn equipped<'c>(catalog: &'c Catalog, equip: Option<TransformId>) -> Option<&'c Transformation> {
        equip.and_then(|id| catalog.transformation(id))
    }

    fn chest_available(&self, chest: &Chest) -> bool {
        self.rank >= chest.required_rank && self.fusion >= chest.required_fusion
    }

    pub fn chest_coins_per_second(&self, catalog: &Catalog, equip: Option<TransformId>) -> f64 {
        let boost = Self::equipped(catalog, equip).map_or(1.0, |t| t.chest_multiplier);
        let total: f64 = catalog
            .chests
            .iter()
            .filter(|c| self.chest_available(c))
            .map(|c| c.coins + self.rank as f64 * c.rank_bonus)
            .sum();
        total / catalog.chest_period_seconds * boost
    }

    pub fn chest_gems_per_second(&self, catalog: &Catalog, equip: Option<TransformId>) -> f64 {
        let boost = Self::equipped(catalog, equip).map_or(1.0, |t| t.chest_multiplier);
        let total: f64 = catalog
            .chests
            .iter()
            .filter(|c| self.chest_available(c))
            .map(|c| c.gems)
            .sum();
        total / catalog.chest_period_seconds * boost
    }

    /// Base power per second before area breakpoints.
    pub fn power_rate(&self, catalog: &Catalog, equip: Option<TransformId>) -> f64 {
        let rank = catalog.ranks.get(self.rank).map_or(1.0, |r| r.power_multiplier);
        let fusion = catalog.fusions.get(self.fusion).map_or(1.0, |f| f.power_multiplier);
        let transf = Self::equipped(catalog, equip).map_or(1.0, |t| t.power_multiplier);
        catalog.base_power_per_second
            * self.stat_multiplier(catalog)
            * rank
            * fusion
            * transf
            * self.item_bonus(catalog, Resource::Power)
    }

    pub fn coin_rate(&self, catalog: &Catalog, equip: Option<TransformId>) -> f64 {
        let rank = catalog.ranks.get(self.rank).map_or(1.0, |r| r.coin_multiplier);
        let transf = Self::equipped(catalog, equip).map_or(1.0, |t| t.coin_multiplier);
        catalog.base_coins_per_second * rank * transf * self.item_bonus(catalog, Resource::Coins)
            + self.chest_coins_per_second(catalog, equip)
    }

    pub fn gem_rate(&self, catalog: &Catalog, equip: Option<TransformId>) -> f64 {
        let transf = Self::equipped(catalog, equip).map_or(1.0, |t| t.gem_multiplier);
        catalog.base_gems_per_second * transf * self.item_bonus(catalog, Resource::Gems)
            + self.chest_gems_per_second(catalog, equip)
    }

    /* --- time --- */

    /// Seconds of idling until `resource` reaches `amount`, equipping the
    /// best transformation for that resource. Returns the equip choice too.
    pub fn secs_until(&self, catalog: &Catalog, resource: Resource, amount: f64) -> (Seconds, Option<TransformId>) {
        let equip = self.best_transformation(catalog, resource);
        let secs = match resource {
            Resource::Coins => accrual::secs_until_batched(self.coins, amount, self.coin_rate(catalog, equip)),
            Resource::Gems => accrual::secs_until_batched(self.gems, amount, self.gem_rate(catalog, equip)),
            Resource::Power => accrual::secs_until_power(
                &catalog.areas,
                self.power,
                amount,
                self.power_rate(catalog, equip),
            ),
        };
        (secs, equip)
    }

    /// Idle for `secs` with `equip` on, crediting every resource.
    pub fn play(&mut self, catalog: &Catalog, secs: Seconds, equip: Option<TransformId>) {
        if secs == 0 {
            return;
        }
        let span = secs as f64;
        let coin_rate = self.coin_rate(catalog, equip);
        let gem_rate = self.gem_rate(catalog, equip);
        let power_rate = self.power_rate(catalog, equip);
        self.elapsed = self.elapsed.saturating_add(secs);
        self.coins += span * coin_rate;
        self.gems += span * gem_rate;
        self.power = accrual::power_after(&catalog.areas, self.power, secs, power_rate);
    }

    /* --- legality --- */

    /// Coin cost of the next level of `stat`, or `None` if maxed or if the
    /// raise would break stat balance.
    pub fn stat_cost(&self, catalog: &Catalog, stat: Stat) -> Option<f64> {
        let level = self.stats[stat.index()];
        let cost = *catalog.stat_costs.get(level as usize)?;
        let mut next = self.stats;
        next[stat.index()] += 1;
        let hi = next.iter().max().copied().unwrap_or(0);
        let lo = next.iter().min().copied().unwrap_or(0);
        (hi - lo <= catalog.balance_tolerance).then_some(cost)
    }

    /// Fusion tier reachable next, if the current rank allows it.
    pub fn next_fusion<'c>(&self, catalog: &'c Catalog) -> Option<&'c Fusion> {
        let next = catalog.fusions.get(self.fusion + 1)?;
        (self.rank >= next.required_rank).then_some(next)
    }

    /// Packs to open, in expectation, to lift `id` to its next grade.
    pub fn packs_to_next_grade(&self, catalog: &Catalog, id: ItemId) -> Option<f64> {
        let item = catalog.item(id)?;
        let grade = self.item_grade(catalog, id);
        let target = *catalog.thresholds(item.rarity)?.get(grade)?;
        let have = self.items.get(id.0).copied().unwrap_or(0.0);
        let per_pack = self.draw_yield(item);
        if !(per_pack > 0.0) {
            return None;
        }
        Some((target - have).max(0.0) / per_pack)
    }

    /* --- effects (precondition already paid for) --- */

    pub fn raise_stat(&mut self, stat: Stat) {
        self.stats[stat.index()] += 1;
    }

    /// Rank up: power is spent, stats and transformations stay.
    pub fn advance_rank(&mut self) {
        self.power = 0.0;
        self.rank += 1;
    }

    /// Fuse up: back to the lowest rank with the fusion's transformation.
    pub fn advance_fusion(&mut self, catalog: &Catalog) {
        self.power = 0.0;
        self.rank = 0;
        self.fusion += 1;
        if let Some(id) = catalog.fusions.get(self.fusion).and_then(|f| f.grants) {
            self.transformations.insert(id);
        }
    }

    /// Open `count` packs in expectation: every item in the pack moves by its
    /// own draw share.
    pub fn open_packs(&mut self, catalog: &Catalog, pack: PackId, count: f64) {
        if self.items.len() < catalog.items.len() {
            self.items.resize(catalog.items.len(), 0.0);
        }
        for (id, item) in catalog.items_in(pack) {
            self.items[id.0] += count * self.draw_yield(item);
        }
    }

    /// Open exactly enough packs to lift `id` one grade.
    pub fn raise_item_grade(&mut self, catalog: &Catalog, id: ItemId) -> bool {
        let Some(item) = catalog.item(id) else { return false };
        let grade = self.item_grade(catalog, id);
        let Some(target) = catalog.thresholds(item.rarity).and_then(|row| row.get(grade).copied()) else {
            return false;
        };
        let Some(packs) = self.packs_to_next_grade(catalog, id) else { return false };
        self.open_packs(catalog, item.pack, packs);
        // snap away float drift so the grade is actually reached
        self.items[id.0] = self.items[id.0].max(target);
        true
    }

    pub fn raise_luck(&mut self, catalog: &Catalog) {
        if let Some(u) = catalog.luck_upgrades.get(self.luck_level) {
            self.luck = self.luck.max(u.multiplier);
            self.luck_level += 1;
        }
    }

    pub fn raise_pack_speed(&mut self, catalog: &Catalog) {
        if let Some(u) = catalog.pack_speed_upgrades.get(self.pack_speed_level) {
            self.pack_speed = self.pack_speed.max(u.multiplier);
            self.pack_speed_level += 1;
        }
    }

    /* --- summaries --- */

    pub fn stats_info(&self, catalog: &Catalog) -> String {
        format!(
            "Stats {} {}, {} {}, {} {} (power x{:.3})",
            Stat::Strength.name(),
            self.stats[0],
            Stat::Durability.name(),
            self.stats[1],
            Stat::Psychic.name(),
            self.stats[2],
            self.stat_multiplier(catalog)
        )
    }

    pub fn rank_info(&self, catalog: &Catalog) -> String {
        format!("Player rank is {}", catalog.rank_name(self.rank))
    }

    pub fn fusion_info(&self, catalog: &Catalog) -> String {
        format!(
            "Player fusion is {} (rank reset to {})",
            catalog.fusion_name(self.fusion),
            catalog.rank_name(self.rank)
        )
    }

    pub fn transformation_info(&self, catalog: &Catalog, id: TransformId) -> String {
        let s = if self.transformations.contains(&id) { "including" } else { "not including" };
        format!(
            "Player has {} transformation(s) {} {}",
            self.transformations.len(),
            s,
            catalog.transformation_name(id)
        )
    }

    pub fn pack_info(&self, catalog: &Catalog, pack: PackId) -> String {
        let parts: Vec<String> = catalog
            .items_in(pack)
            .map(|(id, it)| {
                format!(
                    "{} {:.2} (grade {})",
                    it.name,
                    self.items.get(id.0).copied().unwrap_or(0.0),
                    self.item_grade(catalog, id)
                )
            })
            .collect();
        parts.join(", ")
    }

    pub fn item_info(&self, catalog: &Catalog, id: ItemId) -> String {
        let name = catalog.item(id).map_or("?", |it| it.name.as_str());
        format!(
            "{} is grade {} ({:.2} owned)",
            name,
            self.item_grade(catalog, id),
            self.items.get(id.0).copied().unwrap_or(0.0)
        )
    }

    pub fn luck_info(&self) -> String {
        format!("Luck multiplier is {:.2}", self.luck)
    }

    pub fn pack_speed_info(&self) -> String {
        format!("Pack speed multiplier is {:.2}", self.pack_speed)
    }
}
