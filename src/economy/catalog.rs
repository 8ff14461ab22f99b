//! Read-only game balance tables.
//!
//! A [`Catalog`] is handed to the simulator once at start-up and only ever
//! borrowed afterwards; worker threads share it by reference. Ranks and fusion
//! tiers are addressed by ordinal (index into their table), everything else by
//! a small typed id.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::mechanics::accrual::Breakpoint;

/// Number of grades an item can climb through.
pub const GRADES: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stat {
    Strength,
    Durability,
    Psychic,
}

impl Stat {
    pub const ALL: [Stat; 3] = [Stat::Strength, Stat::Durability, Stat::Psychic];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Stat::Strength => "strength",
            Stat::Durability => "durability",
            Stat::Psychic => "psychic",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Coins,
    Gems,
    Power,
}

impl Resource {
    pub fn name(self) -> &'static str {
        match self {
            Resource::Coins => "coins",
            Resource::Gems => "gems",
            Resource::Power => "power",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
    Mythic,
}

impl Rarity {
    pub const ALL: [Rarity; 6] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Epic,
        Rarity::Legendary,
        Rarity::Mythic,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Epic and above scale with the player's luck.
    #[inline]
    pub fn is_lucky(self) -> bool {
        self >= Rarity::Epic
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransformId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PackId(pub usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub usize);

/// What something costs, in which currency.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub resource: Resource,
    pub amount: f64,
}

impl Price {
    pub fn coins(amount: f64) -> Self {
        Self { resource: Resource::Coins, amount }
    }
    pub fn gems(amount: f64) -> Self {
        Self { resource: Resource::Gems, amount }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rank {
    pub name: String,
    /// Power needed to rank up *into* this rank.
    pub required_power: f64,
    pub power_multiplier: f64,
    pub coin_multiplier: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transformation {
    pub name: String,
    /// `None` for transformations only granted by fusing.
    pub price: Option<Price>,
    pub power_multiplier: f64,
    pub coin_multiplier: f64,
    pub gem_multiplier: f64,
    pub chest_multiplier: f64,
}

impl Transformation {
    pub fn multiplier(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Coins => self.coin_multiplier,
            Resource::Gems => self.gem_multiplier,
            Resource::Power => self.power_multiplier,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fusion {
    pub name: String,
    /// Rank ordinal needed before fusing into this tier.
    pub required_rank: usize,
    pub required_power: f64,
    pub power_multiplier: f64,
    pub grants: Option<TransformId>,
}

/// Periodic reward, averaged over its cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Chest {
    pub name: String,
    pub coins: f64,
    pub gems: f64,
    /// Extra coins per rank ordinal.
    pub rank_bonus: f64,
    pub required_rank: usize,
    pub required_fusion: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pack {
    pub name: String,
    pub gem_cost: f64,
    /// Seconds to open one pack at pack speed 1.
    pub open_seconds: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub pack: PackId,
    /// Which rate the item boosts.
    pub stat: Resource,
    /// Draw chance within its pack.
    pub chance: f64,
    pub rarity: Rarity,
    pub sell_value: f64,
    pub grade_multipliers: [f64; GRADES],
}

/// One purchasable level of luck or pack speed.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Upgrade {
    pub gem_cost: f64,
    pub multiplier: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub base_power_per_second: f64,
    pub base_coins_per_second: f64,
    pub base_gems_per_second: f64,
    pub starting_coins: f64,
    pub starting_gems: f64,
    /// Chests are averaged over this many seconds.
    pub chest_period_seconds: f64,

    /// Cost in coins of raising any stat from level `l` to `l + 1`.
    pub stat_costs: Vec<f64>,
    /// Power multiplier per stat level.
    pub stat_step: f64,
    /// Max pairwise difference between stat levels.
    pub balance_tolerance: u32,

    pub areas: Vec<Breakpoint>,
    pub ranks: Vec<Rank>,
    pub transformations: Vec<Transformation>,
    /// Index 0 is the unfused tier.
    pub fusions: Vec<Fusion>,
    pub chests: Vec<Chest>,
    pub packs: Vec<Pack>,
    pub items: Vec<Item>,
    /// Quantity needed per grade, one row per [`Rarity`].
    pub grade_thresholds: Vec<[f64; GRADES]>,
    pub luck_upgrades: Vec<Upgrade>,
    pub pack_speed_upgrades: Vec<Upgrade>,
}

impl Catalog {
    #[inline]
    pub fn transformation(&self, id: TransformId) -> Option<&Transformation> {
        self.transformations.get(id.0)
    }

    #[inline]
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.0)
    }

    #[inline]
    pub fn pack(&self, id: PackId) -> Option<&Pack> {
        self.packs.get(id.0)
    }

    pub fn items_in(&self, pack: PackId) -> impl Iterator<Item = (ItemId, &Item)> {
        self.items
            .iter()
            .enumerate()
            .filter(move |(_, it)| it.pack == pack)
            .map(|(i, it)| (ItemId(i), it))
    }

    pub fn thresholds(&self, rarity: Rarity) -> Option<&[f64; GRADES]> {
        self.grade_thresholds.get(rarity.index())
    }

    pub fn rank_name(&self, rank: usize) -> &str {
        self.ranks.get(rank).map_or("?", |r| r.name.as_str())
    }

    pub fn fusion_name(&self, fusion: usize) -> &str {
        self.fusions.get(fusion).map_or("?", |f| f.name.as_str())
    }

    pub fn transformation_name(&self, id: TransformId) -> &str {
        self.transformation(id).map_or("?", |t| t.name.as_str())
    }

    /// Structural checks the simulator relies on.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.ranks.is_empty() {
            return Err(CatalogError::NoRanks);
        }
        if self.fusions.is_empty() {
            return Err(CatalogError::NoFusions);
        }
        if !(self.stat_step >= 1.0) {
            return Err(CatalogError::Invalid(format!(
                "stat step must be at least 1, got {}",
                self.stat_step
            )));
        }
        if self.balance_tolerance < 1 {
            return Err(CatalogError::Invalid("balance tolerance must be at least 1".into()));
        }
        if !(self.chest_period_seconds > 0.0) {
            return Err(CatalogError::Invalid("chest period must be positive".into()));
        }
        if let Some(i) = self
            .areas
            .windows(2)
            .position(|w| !(w[1].threshold > w[0].threshold))
        {
            return Err(CatalogError::AreasNotIncreasing(i + 1));
        }

        for (index, t) in self.transformations.iter().enumerate() {
            if let Some(price) = t.price {
                if price.resource == Resource::Power {
                    return Err(CatalogError::Invalid(format!(
                        "transformation {index} cannot be priced in {}",
                        price.resource.name()
                    )));
                }
            }
        }
        for (index, f) in self.fusions.iter().enumerate() {
            if f.required_rank >= self.ranks.len() {
                return Err(CatalogError::Dangling {
                    table: "fusion",
                    index,
                    what: "rank",
                    target: f.required_rank,
                });
            }
            if let Some(t) = f.grants {
                if t.0 >= self.transformations.len() {
                    return Err(CatalogError::Dangling {
                        table: "fusion",
                        index,
                        what: "transformation",
                        target: t.0,
                    });
                }
            }
        }
        for (index, c) in self.chests.iter().enumerate() {
            if c.required_rank >= self.ranks.len() {
                return Err(CatalogError::Dangling {
                    table: "chest",
                    index,
                    what: "rank",
                    target: c.required_rank,
                });
            }
            if c.required_fusion >= self.fusions.len() {
                return Err(CatalogError::Dangling {
                    table: "chest",
                    index,
                    what: "fusion",
                    target: c.required_fusion,
                });
            }
        }

        if self.grade_thresholds.len() != Rarity::ALL.len() {
            return Err(CatalogError::GradeRows {
                expected: Rarity::ALL.len(),
                found: self.grade_thresholds.len(),
            });
        }
        for rarity in Rarity::ALL {
            let row = &self.grade_thresholds[rarity.index()];
            let increasing = row.windows(2).all(|w| w[1] > w[0]);
            if !(row[0] > 0.0) || !increasing {
                return Err(CatalogError::BadGrades(rarity));
            }
        }
        for (index, it) in self.items.iter().enumerate() {
            if it.pack.0 >= self.packs.len() {
                return Err(CatalogError::Dangling {
                    table: "item",
                    index,
                    what: "pack",
                    target: it.pack.0,
                });
            }
            if !(it.chance > 0.0 && it.chance <= 1.0) {
                return Err(CatalogError::BadChance(index));
            }
            if let Some(g) = it.grade_multipliers.iter().position(|&m| !(m >= 1.0)) {
                return Err(CatalogError::Invalid(format!(
                    "item {index} grade {} multiplier must be at least 1",
                    g + 1
                )));
            }
        }
        if let Some(level) = self.stat_costs.iter().position(|&c| !(c > 0.0 && c.is_finite())) {
            return Err(CatalogError::Invalid(format!("stat cost at level {level} must be positive")));
        }

        for (name, table) in [("luck", &self.luck_upgrades), ("pack speed", &self.pack_speed_upgrades)] {
            let mut prev = 1.0;
            for u in table.iter() {
                if !(u.multiplier >= prev) {
                    return Err(CatalogError::Invalid(format!(
                        "{name} upgrades must not lower the multiplier"
                    )));
                }
                prev = u.multiplier;
            }
        }
        Ok(())
    }
}
