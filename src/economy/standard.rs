// src/economy/standard.rs

//! Built-in balance tables for the stock game.
//!
//! These are the numbers the search is usually run against; callers with a
//! loader of their own can build a [`Catalog`] from scratch instead.

use crate::economy::catalog::*;
use crate::mechanics::accrual::Breakpoint;

fn rank(name: &str, required_power: f64, power_multiplier: f64, coin_multiplier: f64) -> Rank {
    Rank { name: name.into(), required_power, power_multiplier, coin_multiplier }
}

fn bought(name: &str, price: Price, power: f64, coin: f64, gem: f64) -> Transformation {
    Transformation {
        name: name.into(),
        price: Some(price),
        power_multiplier: power,
        coin_multiplier: coin,
        gem_multiplier: gem,
        chest_multiplier: 1.0,
    }
}

fn fused(name: &str, power: f64) -> Transformation {
    Transformation {
        name: name.into(),
        price: None,
        power_multiplier: power,
        coin_multiplier: 1.0,
        gem_multiplier: 1.0,
        chest_multiplier: 1.0,
    }
}

fn fusion(name: &str, required_rank: usize, required_power: f64, power_multiplier: f64, grants: usize) -> Fusion {
    Fusion {
        name: name.into(),
        required_rank,
        required_power,
        power_multiplier,
        grants: Some(TransformId(grants)),
    }
}

fn chest(name: &str, coins: f64, gems: f64, required_rank: usize, required_fusion: usize) -> Chest {
    Chest { name: name.into(), coins, gems, rank_bonus: 0.0, required_rank, required_fusion }
}

fn item(
    name: &str,
    pack: usize,
    stat: Resource,
    chance: f64,
    rarity: Rarity,
    sell_value: f64,
    grade_multipliers: [f64; GRADES],
) -> Item {
    Item { name: name.into(), pack: PackId(pack), stat, chance, rarity, sell_value, grade_multipliers }
}

// rank ordinals
const S: usize = 6;
const SS: usize = 7;
const SSS: usize = 8;
const X: usize = 9;
const Y: usize = 10;
const Z: usize = 11;
const XYZ: usize = 12;
const TIME_RULER: usize = 15;

// fusion ordinals
const GRYPHON: usize = 3;
const YETI: usize = 5;
const REAPER: usize = 7;

impl Catalog {
    pub fn standard() -> Self {
        let ranks = vec![
            rank("F", 0.0, 1.0, 1.0),
            rank("E", 1e6, 2.0, 2.0),
            rank("D", 5e7, 4.0, 3.0),
            rank("C", 1e10, 10.0, 4.0),
            rank("B", 5e12, 35.0, 5.0),
            rank("A", 1e15, 100.0, 6.0),
            rank("S", 1e18, 500.0, 7.0),
            rank("SS", 5e23, 2500.0, 8.0),
            rank("SSS", 4e29, 1e4, 9.0),
            rank("X", 4e33, 1e5, 10.0),
            rank("Y", 4e38, 7.5e5, 11.0),
            rank("Z", 3e42, 9e6, 12.0),
            rank("XYZ", 3e48, 1e8, 13.0),
            rank("Legend", 1.3e54, 2e9, 14.0),
            rank("Immortal", 9e55, 4e10, 15.0),
            rank("TimeRuler", 8e57, 1e12, 15.0),
            rank("UniRuler", 1.5e67, 1e14, 16.0),
            rank("MulRuler", 2.7e72, 1e17, 16.0),
            rank("Omni", 1e80, 1e21, 17.0),
        ];

        let mut guardian = bought("Guardian", Price::coins(250_000.0), 1.0, 1.1, 1.0);
        guardian.chest_multiplier = 1.25;
        let transformations = vec![
            bought("BuffNoob", Price::coins(25_000.0), 1.2, 1.0, 1.0),
            guardian,
            bought("Shadow", Price::coins(1e6), 3.0, 1.0, 1.0),
            bought("Void", Price::coins(1.5e6), 5.0, 1.0, 1.0),
            bought("FDragon", Price::coins(2e6), 4.0, 1.15, 1.0),
            bought("SciBorg", Price::coins(2e6), 5.5, 1.0, 1.0),
            bought("Ocean", Price::coins(2.5e6), 7.0, 1.0, 1.1),
            bought("Warrior", Price::coins(2.5e6), 7.0, 1.1, 1.0),
            bought("ELord", Price::coins(3e6), 10.0, 1.125, 1.0),
            bought("Thunder", Price::coins(4e6), 12.0, 1.075, 1.2),
            bought("MDragon", Price::coins(5e6), 13.5, 1.135, 1.0),
            bought("Celestial", Price::gems(2_500.0), 8.0, 1.0, 1.5),
            fused("Werewolf", 1.5),
            fused("Minotaur", 2.0),
            fused("Gryphon", 2.5),
            fused("Phoenix", 3.5),
            fused("Yeti", 4.5),
            fused("Hydra", 6.0),
            fused("Reaper", 12.0),
            fused("DragonRuler", 15.0),
        ];

        let fusions = vec![
            Fusion {
                name: "None".into(),
                required_rank: 0,
                required_power: 0.0,
                power_multiplier: 1.0,
                grants: None,
            },
            fusion("Werewolf", S, 5e21, 25.0, 12),
            fusion("Minotaur", SS, 2e27, 500.0, 13),
            fusion("Gryphon", SSS, 3e32, 1e4, 14),
            fusion("Phoenix", X, 7e36, 2.5e5, 15),
            fusion("Yeti", Y, 5e41, 5e6, 16),
            fusion("Hydra", Z, 2e46, 1e8, 17),
            fusion("Reaper", XYZ, 1.5e52, 2e9, 18),
            fusion("DragonRuler", TIME_RULER, 2.4e62, 2e11, 19),
        ];

        let mut sky = chest("Sky", 5_000.0, 5.0, 0, 0);
        sky.rank_bonus = 1_000.0;
        let chests = vec![
            chest("Golden", 1_000.0, 10.0, 0, 0),
            chest("Group", 2_500.0, 15.0, 0, 0),
            chest("Mirage", 5_000.0, 20.0, 3, 0),
            chest("Deep sea", 7_500.0, 25.0, 5, 0),
            chest("Robot", 10_000.0, 30.0, SS, 0),
            chest("Ninja", 15_000.0, 40.0, X, 0),
            sky,
            chest("Space", 2_500.0, 50.0, 0, GRYPHON),
            chest("Space group", 5_000.0, 50.0, 0, GRYPHON),
            chest("Corrupted forest", 6_250.0, 60.0, 0, GRYPHON),
            chest("Glacial", 8_750.0, 75.0, 0, YETI),
            chest("Volcanic", 15_000.0, 100.0, 0, REAPER),
        ];

        let areas = [
            (0.0, 1.0), (100.0, 2.0), (1e3, 5.0), (1e4, 20.0), (1e5, 100.0),
            (5e6, 750.0), (5e8, 1e4), (5e10, 1.2e5), (3e13, 3e6), (1e16, 1e8),
            (2.5e19, 3e9), (1e26, 9e10), (5e30, 2.5e12), (1e35, 7.5e13), (6e39, 2.25e15),
            (1.5e44, 7.5e16), (1.5e50, 3e18), (4e55, 3.3e18), (3e58, 3.6e18), (9e59, 3e20),
            (6.3e64, 3e22), (4e69, 7.5e24), (8.2e75, 1e27),
        ]
        .into_iter()
        .map(|(threshold, multiplier)| Breakpoint { threshold, multiplier })
        .collect();

        let stat_costs = vec![
            100.0, 200.0, 500.0, 750.0,
            1e3, 2e3, 3e3, 5e3, 7.5e3,
            1e4, 1.5e4, 2e4, 2.5e4, 3.5e4,
            5e4, 6.75e4, 1e5, 1.25e5, 1.65e5,
            2.2e5, 3e5, 4e5, 5.5e5, 8e5,
            1.1e6, 1.5e6, 2e6, 3e6, 5e6,
            7.5e6, 8e6, 8.5e6, 9e6, 1e7,
            1.025e7, 1.05e7, 1.075e7, 1.1e7, 1.125e7,
            1.15e7, 1.175e7, 1.2e7, 1.225e7, 1.25e7,
            1.275e7, 1.3e7, 1.35e7, 1.375e7, 1.5e7,
            1.65e7, 1.8e7,
        ];

        let packs = vec![
            Pack { name: "Starter".into(), gem_cost: 100.0, open_seconds: 5.0 },
            Pack { name: "Hero".into(), gem_cost: 400.0, open_seconds: 8.0 },
        ];

        use Rarity::*;
        use Resource::{Coins, Gems, Power};
        let items = vec![
            item("Bronze Gauntlet", 0, Power, 0.45, Common, 10.0, [1.05, 1.1, 1.2, 1.35, 1.5]),
            item("Lucky Coin", 0, Coins, 0.30, Uncommon, 25.0, [1.05, 1.1, 1.2, 1.3, 1.5]),
            item("Gem Pouch", 0, Gems, 0.15, Rare, 50.0, [1.1, 1.2, 1.3, 1.5, 1.75]),
            item("Power Core", 0, Power, 0.08, Epic, 150.0, [1.25, 1.5, 2.0, 2.5, 3.0]),
            item("Crown", 0, Coins, 0.02, Legendary, 500.0, [1.5, 2.0, 2.5, 3.0, 4.0]),
            item("Titan Belt", 1, Power, 0.40, Rare, 60.0, [1.15, 1.3, 1.5, 1.75, 2.0]),
            item("Midas Ring", 1, Coins, 0.30, Rare, 60.0, [1.1, 1.2, 1.35, 1.5, 1.75]),
            item("Prism", 1, Gems, 0.18, Epic, 200.0, [1.2, 1.4, 1.6, 1.8, 2.0]),
            item("Star Heart", 1, Power, 0.10, Legendary, 800.0, [2.0, 3.0, 4.0, 6.0, 8.0]),
            item("Void Shard", 1, Power, 0.02, Mythic, 3_000.0, [3.0, 5.0, 8.0, 12.0, 20.0]),
        ];

        let grade_thresholds = vec![
            [1.0, 5.0, 15.0, 40.0, 100.0],
            [1.0, 4.0, 12.0, 30.0, 75.0],
            [1.0, 3.0, 8.0, 20.0, 50.0],
            [1.0, 2.0, 5.0, 12.0, 30.0],
            [1.0, 2.0, 4.0, 8.0, 20.0],
            [1.0, 2.0, 3.0, 6.0, 12.0],
        ];

        let luck_upgrades = [(200.0, 1.25), (500.0, 1.5), (1_200.0, 2.0), (3_000.0, 2.5), (8_000.0, 3.0)]
            .into_iter()
            .map(|(gem_cost, multiplier)| Upgrade { gem_cost, multiplier })
            .collect();
        let pack_speed_upgrades = [(150.0, 1.5), (400.0, 2.0), (1_000.0, 3.0), (2_500.0, 4.0)]
            .into_iter()
            .map(|(gem_cost, multiplier)| Upgrade { gem_cost, multiplier })
            .collect();

        Catalog {
            base_power_per_second: 1.0,
            base_coins_per_second: 25.0 / 60.0,
            base_gems_per_second: 1.0 / 600.0,
            starting_coins: 100.0,
            starting_gems: 0.0,
            chest_period_seconds: 7.0 * 60.0 * 60.0,
            stat_costs,
            stat_step: 2f64.powf(1.0 / 3.0),
            balance_tolerance: 1,
            areas,
            ranks,
            transformations,
            fusions,
            chests,
            packs,
            items,
            grade_thresholds,
            luck_upgrades,
            pack_speed_upgrades,
        }
    }
}
