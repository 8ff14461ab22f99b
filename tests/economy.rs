// tests/economy.rs
use idle_path::economy::{Action, Catalog, EconomyState, ItemId, Milestone, PackId, Price, Resource, Stat, TransformId};
use idle_path::mechanics::accrual::{self, Breakpoint, MAX_HORIZON, UNREACHABLE};
use idle_path::CatalogError;

fn areas(pairs: &[(f64, f64)]) -> Vec<Breakpoint> {
    pairs.iter().map(|&(threshold, multiplier)| Breakpoint { threshold, multiplier }).collect()
}

/* ──────────────────────────────────────────────────────────────────────────
1) Accrual arithmetic
────────────────────────────────────────────────────────────────────────── */

#[test]
fn coins_arrive_in_whole_minute_batches() {
    assert_eq!(accrual::secs_until_batched(0.0, 100.0, 1.0), 120);
    assert_eq!(accrual::secs_until_batched(0.0, 60.0, 1.0), 60);
    assert_eq!(accrual::secs_until_batched(50.0, 40.0, 1.0), 0);
    assert_eq!(accrual::secs_until_batched(0.0, 1.0, 0.0), UNREACHABLE);
}

#[test]
fn area_index_is_last_threshold_at_or_below() {
    let a = areas(&[(0.0, 1.0), (100.0, 2.0), (1000.0, 5.0)]);
    assert_eq!(accrual::area_index(&a, 0.0), 0);
    assert_eq!(accrual::area_index(&a, 99.9), 0);
    assert_eq!(accrual::area_index(&a, 100.0), 1);
    assert_eq!(accrual::area_index(&a, 5e6), 2);
}

#[test]
fn power_walks_breakpoints() {
    let a = areas(&[(0.0, 1.0), (100.0, 2.0), (1000.0, 5.0)]);
    // 100s to the first breakpoint, then 200 power at 2/s
    assert_eq!(accrual::secs_until_power(&a, 0.0, 300.0, 1.0), 200);
    // 100 + 450 + 1000/5
    assert_eq!(accrual::secs_until_power(&a, 0.0, 2000.0, 1.0), 750);
    assert!((accrual::power_after(&a, 0.0, 200, 1.0) - 300.0).abs() < 1e-9);
    assert!((accrual::power_after(&a, 0.0, 750, 1.0) - 2000.0).abs() < 1e-9);
}

#[test]
fn power_after_meets_its_own_solve() {
    let cat = Catalog::standard();
    for &target in &[1e3, 1e6, 5e7, 1e10] {
        let t = accrual::secs_until_power(&cat.areas, 0.0, target, 3.0);
        let p = accrual::power_after(&cat.areas, 0.0, t, 3.0);
        assert!(accrual::affordable(p, target), "target {target}: reached {p}");
    }
}

/* ──────────────────────────────────────────────────────────────────────────
2) Fresh player ranks up
────────────────────────────────────────────────────────────────────────── */

#[test]
fn new_player_rank_up_scenario() {
    let cat = Catalog::standard();
    let st = EconomyState::new(&cat);
    assert!(st.transformations.is_empty());
    assert_eq!(st.rank, 0);

    let t0 = Action::RankUp.time_to_execute(&st, &cat);
    assert!(t0 > 0 && t0 <= MAX_HORIZON);

    let mut later = st.clone();
    later.play(&cat, 1_000, None);
    let t1 = Action::RankUp.time_to_execute(&later, &cat);
    assert!(t1 < t0);
    assert!(later.coins > st.coins);

    let mut done = later.clone();
    assert!(Action::RankUp.execute(&mut done, &cat));
    assert_eq!(done.rank, later.rank + 1);
    assert_eq!(done.power, 0.0);
    assert_eq!(done.elapsed, later.elapsed + t1);
    assert_eq!(done.stats, later.stats);
}

#[test]
fn new_player_gets_one_chest_cycle() {
    let cat = Catalog::standard();
    let st = EconomyState::new(&cat);
    // Golden, Group and Sky are open at rank F
    assert!((st.coins - (100.0 + 8_500.0)).abs() < 1e-6);
    assert!((st.gems - 30.0).abs() < 1e-6);
}

/* ──────────────────────────────────────────────────────────────────────────
3) Stat balance, fusion, items, luck
────────────────────────────────────────────────────────────────────────── */

#[test]
fn stat_imbalance_is_unreachable() {
    let cat = Catalog::standard();
    let st = EconomyState::new(&cat).with_stats([1, 0, 0]);
    assert_eq!(Action::StatUp(Stat::Strength).time_to_execute(&st, &cat), UNREACHABLE);
    assert!(Action::StatUp(Stat::Durability).can_execute(&st, &cat));

    let mut copy = st.clone();
    assert!(!Action::StatUp(Stat::Strength).execute(&mut copy, &cat));
    assert_eq!(copy, st);
}

#[test]
fn stat_levels_stay_balanced_through_any_legal_sequence() {
    let cat = Catalog::standard();
    let mut st = EconomyState::new(&cat);
    st.coins = 1e9;
    for k in 0..60 {
        let stat = Stat::ALL[k % 3];
        let _ = Action::StatUp(stat).execute(&mut st, &cat);
        let hi = *st.stats.iter().max().unwrap();
        let lo = *st.stats.iter().min().unwrap();
        assert!(hi - lo <= cat.balance_tolerance);
    }
}

#[test]
fn repeat_short_circuits_when_a_step_is_illegal() {
    let cat = Catalog::standard();
    let st = EconomyState::new(&cat);
    let twice = Action::repeat(Action::StatUp(Stat::Psychic), 2);
    assert_eq!(twice.time_to_execute(&st, &cat), UNREACHABLE);

    let round = Action::repeat(Action::RankUp, 2);
    let t = round.time_to_execute(&st, &cat);
    assert!(t <= MAX_HORIZON);
    let mut after = st.clone();
    assert!(round.execute(&mut after, &cat));
    assert_eq!(after.rank, 2);
    assert_eq!(after.elapsed, t);
}

#[test]
fn fusion_resets_rank_and_grants_transformation() {
    let cat = Catalog::standard();
    let mut st = EconomyState::new(&cat).with_rank(6);
    st.power = 6e21;
    assert_eq!(Action::FuseUp.time_to_execute(&st, &cat), 0);
    assert!(Action::FuseUp.execute(&mut st, &cat));
    assert_eq!(st.fusion, 1);
    assert_eq!(st.rank, 0);
    assert_eq!(st.power, 0.0);
    assert!(st.transformations.contains(&TransformId(12)));
}

#[test]
fn later_fusions_follow_the_chain() {
    let cat = Catalog::standard();
    let mut st = EconomyState::new(&cat).with_fusion(1).with_rank(7);
    st.power = 1e27;
    assert!(Action::FuseUp.time_to_execute(&st, &cat) > 0);
    st.power = 3e27;
    assert_eq!(Action::FuseUp.time_to_execute(&st, &cat), 0);
    assert!(Action::FuseUp.execute(&mut st, &cat));
    assert_eq!(st.fusion, 2);
    assert_eq!(st.rank, 0);
    assert!(st.transformations.contains(&TransformId(13)));
    assert!(Milestone::Fusion(2).reached(&st, &cat));
}

#[test]
fn fusion_needs_its_rank() {
    let cat = Catalog::standard();
    let st = EconomyState::new(&cat).with_rank(5);
    assert_eq!(Action::FuseUp.time_to_execute(&st, &cat), UNREACHABLE);
}

#[test]
fn best_transformation_is_chosen_per_resource() {
    let cat = Catalog::standard();
    let st = EconomyState::new(&cat).with_transformations([TransformId(8), TransformId(11)]);
    // ELord: power 10, coins 1.125; Celestial: power 8, gems 1.5
    assert_eq!(st.best_transformation(&cat, Resource::Power), Some(TransformId(8)));
    assert_eq!(st.best_transformation(&cat, Resource::Coins), Some(TransformId(8)));
    assert_eq!(st.best_transformation(&cat, Resource::Gems), Some(TransformId(11)));

    let bare = EconomyState::new(&cat);
    assert_eq!(bare.best_transformation(&cat, Resource::Power), None);
}

#[test]
fn buying_a_transformation_twice_is_unreachable() {
    let cat = Catalog::standard();
    let mut st = EconomyState::new(&cat);
    st.coins = 1e6;
    let buy = Action::BuyTransformation(TransformId(0));
    assert_eq!(buy.time_to_execute(&st, &cat), 0);
    assert!(buy.execute(&mut st, &cat));
    assert!((st.coins - (1e6 - 25_000.0)).abs() < 1e-6);
    assert_eq!(buy.time_to_execute(&st, &cat), UNREACHABLE);
}

#[test]
fn acquiring_an_item_draws_the_whole_pack() {
    let cat = Catalog::standard();
    let mut st = EconomyState::new(&cat);
    st.gems = 10_000.0;
    let before = st.clone();

    assert!(Action::AcquireItem(ItemId(0)).execute(&mut st, &cat));
    assert_eq!(st.item_grade(&cat, ItemId(0)), 1);

    // 1 / 0.45 packs, each 100 gems and 5 s to open
    let packs = 1.0 / 0.45;
    assert!(st.gems < before.gems - packs * 100.0 + 1.0);
    assert_eq!(st.elapsed, (packs * 5.0).ceil() as u128);
    assert!((st.items[1] - packs * 0.30).abs() < 1e-9);
    assert!((st.items[4] - packs * 0.02).abs() < 1e-9);
    // other pack untouched
    assert_eq!(st.items[5], 0.0);
    assert!(st.power_rate(&cat, None) > before.power_rate(&cat, None));
}

#[test]
fn maxed_item_is_unreachable() {
    let cat = Catalog::standard();
    let mut st = EconomyState::new(&cat);
    st.items[0] = 1_000.0;
    assert_eq!(st.item_grade(&cat, ItemId(0)), 5);
    assert_eq!(Action::AcquireItem(ItemId(0)).time_to_execute(&st, &cat), UNREACHABLE);
}

#[test]
fn luck_scales_only_rare_draws() {
    let cat = Catalog::standard();
    let mut st = EconomyState::new(&cat);
    st.gems = 1_000.0;
    assert!(Action::LuckUp.execute(&mut st, &cat));
    assert_eq!(st.luck_level, 1);
    assert!((st.luck - 1.25).abs() < 1e-12);

    let common = &cat.items[0];
    let epic = &cat.items[3];
    assert_eq!(st.draw_yield(common), common.chance);
    assert!((st.draw_yield(epic) - epic.chance * 1.25).abs() < 1e-12);
}

#[test]
fn pack_speed_shortens_opening() {
    let cat = Catalog::standard();
    let mut st = EconomyState::new(&cat);
    st.gems = 10_000.0;
    let slow = Action::BuyPack(PackId(1)).time_to_execute(&st, &cat);
    assert!(Action::PackSpeedUp.execute(&mut st, &cat));
    let fast = Action::BuyPack(PackId(1)).time_to_execute(&st, &cat);
    assert_eq!(slow, 8);
    assert_eq!(fast, 6);
}

/* ──────────────────────────────────────────────────────────────────────────
4) Catalog & milestones
────────────────────────────────────────────────────────────────────────── */

#[test]
fn standard_catalog_validates() {
    assert_eq!(Catalog::standard().validate(), Ok(()));
}

#[test]
fn broken_catalogs_are_rejected() {
    let mut cat = Catalog::standard();
    cat.areas.swap(1, 2);
    assert_eq!(cat.validate(), Err(CatalogError::AreasNotIncreasing(2)));

    let mut cat = Catalog::standard();
    cat.ranks.clear();
    assert_eq!(cat.validate(), Err(CatalogError::NoRanks));

    let mut cat = Catalog::standard();
    cat.items[3].chance = 0.0;
    assert_eq!(cat.validate(), Err(CatalogError::BadChance(3)));

    let mut cat = Catalog::standard();
    cat.grade_thresholds.pop();
    assert!(matches!(cat.validate(), Err(CatalogError::GradeRows { expected: 6, found: 5 })));

    let mut cat = Catalog::standard();
    cat.stat_costs[0] = -1.0;
    assert!(matches!(cat.validate(), Err(CatalogError::Invalid(_))));

    let mut cat = Catalog::standard();
    cat.items[0].grade_multipliers[0] = 0.5;
    assert!(matches!(cat.validate(), Err(CatalogError::Invalid(_))));

    let mut cat = Catalog::standard();
    cat.transformations[0].price = Some(Price { resource: Resource::Power, amount: 1.0 });
    match cat.validate() {
        Err(CatalogError::Invalid(msg)) => assert!(msg.ends_with("priced in power"), "{msg}"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn milestones_read_the_state() {
    let cat = Catalog::standard();
    let st = EconomyState::new(&cat).with_rank(3).with_transformations([TransformId(2)]);
    assert!(Milestone::Rank(2).reached(&st, &cat));
    assert!(Milestone::Rank(3).reached(&st, &cat));
    assert!(!Milestone::Rank(4).reached(&st, &cat));
    assert!(Milestone::Transformation(TransformId(2)).reached(&st, &cat));
    assert!(!Milestone::Fusion(1).reached(&st, &cat));
    assert!(Milestone::ItemGrade(ItemId(0), 0).reached(&st, &cat));
    assert_eq!(Milestone::Rank(2).describe(&cat), "rank D");
}

#[test]
fn menu_covers_every_move_kind() {
    let cat = Catalog::standard();
    let menu = cat.action_menu();
    // 3 stats, rank, fuse, 12 priced transformations, 2 packs, 10 items, luck, speed
    assert_eq!(menu.len(), 3 + 2 + 12 + 2 + 10 + 2);
    assert!(!menu.contains(&Action::BuyTransformation(TransformId(12))));
}
