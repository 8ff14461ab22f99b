// tests/search.rs
use std::time::Duration;

use bevy_prng::WyRand;
use idle_path::economy::{Action, Catalog, EconomyState, Milestone, Stat};
use idle_path::mechanics::accrual::MAX_HORIZON;
use idle_path::search::{
    CancelToken, Evolver, Path, Policy, SearchConfig, compress, policy, splice, splice_points,
};
use idle_path::{PathError, SearchError};
use rand_core::SeedableRng;

const GOAL: Milestone = Milestone::Rank(2);

fn rng(seed: u64) -> WyRand {
    WyRand::from_seed(seed.to_le_bytes())
}

fn small(seed: u64) -> SearchConfig {
    SearchConfig::default()
        .with_seed(seed)
        .with_pool(12, 3)
        .with_generations(4)
        .with_threads(3)
}

fn random_paths(cat: &Catalog, n: usize, seed: u64) -> Vec<Path> {
    let mut r = rng(seed);
    (0..n)
        .filter_map(|_| Path::random(cat, EconomyState::new(cat), GOAL, &Policy::default(), &mut r).ok())
        .collect()
}

/* ──────────────────────────────────────────────────────────────────────────
1) Compression
────────────────────────────────────────────────────────────────────────── */

#[test]
fn compress_merges_runs_and_is_idempotent() {
    let s = Action::StatUp(Stat::Strength);
    let raw = vec![
        s.clone(),
        s.clone(),
        s.clone(),
        Action::RankUp,
        Action::repeat(Action::RankUp, 2),
        Action::FuseUp,
        Action::FuseUp,
        Action::StatUp(Stat::Psychic),
    ];
    let once = compress(raw);
    assert_eq!(
        once,
        vec![
            Action::repeat(s, 3),
            Action::repeat(Action::RankUp, 3),
            Action::FuseUp,
            Action::FuseUp,
            Action::StatUp(Stat::Psychic),
        ]
    );
    assert_eq!(compress(once.clone()), once);
}

#[test]
fn compress_drops_empty_repeats() {
    let out = compress(vec![Action::Repeat(Box::new(Action::LuckUp), 0), Action::LuckUp]);
    assert_eq!(out, vec![Action::LuckUp]);
}

/* ──────────────────────────────────────────────────────────────────────────
2) Construction, replay and repair
────────────────────────────────────────────────────────────────────────── */

#[test]
fn exact_path_reports_invalid_step() {
    let cat = Catalog::standard();
    let err = Path::exact(&cat, EconomyState::new(&cat), GOAL, vec![Action::FuseUp]).unwrap_err();
    assert_eq!(err, PathError::InvalidStep { index: 0, action: "Next fusion".into() });
    assert!(err.is_invalid());

    // two strength levels in a row break balance; they compress into one step
    let twice = vec![Action::StatUp(Stat::Strength), Action::StatUp(Stat::Strength)];
    let err = Path::exact(&cat, EconomyState::new(&cat), GOAL, twice).unwrap_err();
    assert!(matches!(err, PathError::InvalidStep { index: 0, .. }));
}

#[test]
fn short_path_is_unrepairable_without_policy_but_repaired_with_one() {
    let cat = Catalog::standard();
    let start = vec![Action::StatUp(Stat::Strength)];
    let err = Path::exact(&cat, EconomyState::new(&cat), GOAL, start.clone()).unwrap_err();
    assert!(matches!(err, PathError::Unrepairable { actions: 1, .. }));

    let mut r = rng(3);
    let p = Path::new(&cat, EconomyState::new(&cat), GOAL, start, &Policy::default(), &mut r).unwrap();
    assert_eq!(p.actions()[0].base(), &Action::StatUp(Stat::Strength));
    let end = p.replay(&cat).unwrap();
    assert!(GOAL.reached(&end, &cat));
}

#[test]
fn moves_after_the_milestone_are_trimmed() {
    let cat = Catalog::standard();
    let moves = vec![Action::RankUp, Action::RankUp, Action::StatUp(Stat::Durability)];
    let p = Path::exact(&cat, EconomyState::new(&cat), GOAL, moves).unwrap();
    assert_eq!(p.actions(), &[Action::repeat(Action::RankUp, 2)]);
}

#[test]
fn repeat_runs_stop_at_the_milestone() {
    let cat = Catalog::standard();
    let goal = Milestone::Rank(1);
    let one = Path::exact(&cat, EconomyState::new(&cat), goal, vec![Action::RankUp]).unwrap();
    let two = Path::exact(&cat, EconomyState::new(&cat), goal, vec![Action::RankUp, Action::RankUp]).unwrap();
    assert_eq!(two.actions(), &[Action::RankUp]);
    assert_eq!(two.completion_time(), one.completion_time());
    assert_eq!(two.replay(&cat).unwrap().rank, 1);

    // a longer run is cut to the units actually needed
    let stats = vec![
        Action::StatUp(Stat::Strength),
        Action::StatUp(Stat::Durability),
        Action::StatUp(Stat::Psychic),
        Action::repeat(Action::RankUp, 5),
    ];
    let p = Path::exact(&cat, EconomyState::new(&cat), GOAL, stats).unwrap();
    assert_eq!(p.actions().last(), Some(&Action::repeat(Action::RankUp, 2)));
    assert_eq!(p.replay(&cat).unwrap().rank, 2);
}

#[test]
fn replay_is_deterministic_and_times_add_up() {
    let cat = Catalog::standard();
    for p in random_paths(&cat, 5, 11) {
        let a = p.replay(&cat).unwrap();
        let b = p.replay(&cat).unwrap();
        assert_eq!(a, b);
        assert_eq!(p.completion_time(), a.elapsed.max(1));

        let report = p.report(&cat).unwrap();
        let sum: u128 = report.steps.iter().map(|s| s.seconds).sum();
        assert_eq!(sum, report.total_seconds);
        assert_eq!(report.steps.len(), p.len());

        let traj = p.trajectory(&cat).unwrap();
        assert_eq!(traj.last(), Some(&a));
        assert!(traj.windows(2).all(|w| w[0].elapsed <= w[1].elapsed));
    }
}

#[test]
fn greedy_path_reaches_the_milestone() {
    let cat = Catalog::standard();
    let p = Path::greedy(&cat, EconomyState::new(&cat), GOAL).unwrap();
    assert!(GOAL.reached(&p.replay(&cat).unwrap(), &cat));
    assert_eq!(compress(p.actions().to_vec()), p.actions());
}

#[test]
fn stuck_player_is_distinct_from_invalid_path() {
    let mut cat = Catalog::standard();
    cat.base_power_per_second = 0.0;
    cat.luck_upgrades.clear();
    cat.pack_speed_upgrades.clear();
    cat.packs.clear();
    cat.items.clear();
    cat.transformations.clear();
    cat.fusions.truncate(1);
    cat.stat_costs.truncate(1);
    let mut r = rng(5);
    let err = Path::random(&cat, EconomyState::new(&cat), GOAL, &Policy::default(), &mut r).unwrap_err();
    assert!(matches!(err, PathError::Stuck { .. }));
    assert!(!err.is_invalid());
}

/* ──────────────────────────────────────────────────────────────────────────
3) Selection policy
────────────────────────────────────────────────────────────────────────── */

#[test]
fn selection_never_picks_an_unreachable_move() {
    let cat = Catalog::standard();
    let mut st = EconomyState::new(&cat).with_stats([1, 0, 0]);
    st.coins = 0.0;
    let mut r = rng(17);
    for e in [0.0, 0.3, 1.0, 3.0] {
        let pol = Policy::default().with_exponent(e);
        for _ in 0..200 {
            let a = pol.choose(&cat, &st, &mut r).unwrap();
            assert!(a.time_to_execute(&st, &cat) <= MAX_HORIZON, "{a:?}");
            assert_ne!(a, Action::StatUp(Stat::Strength));
        }
    }
}

#[test]
fn free_moves_are_taken_first() {
    let cat = Catalog::standard();
    let st = EconomyState::new(&cat);
    let mut r = rng(23);
    let a = Policy::default().choose(&cat, &st, &mut r).unwrap();
    assert_eq!(a.time_to_execute(&st, &cat), 0);
    assert_eq!(policy::fastest(&cat, &st), Some(Action::StatUp(Stat::Strength)));
}

/* ──────────────────────────────────────────────────────────────────────────
4) Splice
────────────────────────────────────────────────────────────────────────── */

#[test]
fn shared_prefix_yields_a_splice_point() {
    let cat = Catalog::standard();
    let prefix = [Stat::Strength, Stat::Durability, Stat::Psychic].map(Action::StatUp);

    let mut a_moves = prefix.to_vec();
    a_moves.extend([Action::RankUp, Action::RankUp]);
    let mut b_moves = prefix.to_vec();
    b_moves.extend([
        Action::StatUp(Stat::Strength),
        Action::StatUp(Stat::Durability),
        Action::RankUp,
        Action::RankUp,
    ]);
    let a = Path::exact(&cat, EconomyState::new(&cat), GOAL, a_moves).unwrap();
    let b = Path::exact(&cat, EconomyState::new(&cat), GOAL, b_moves).unwrap();

    let end = prefix.len() - 1;
    let points = splice_points(&cat, &a, &b).unwrap();
    assert!(points.contains(&(end, end)), "{points:?}");
    assert_eq!(a.trajectory(&cat).unwrap()[end], b.trajectory(&cat).unwrap()[end]);
    // first and last steps never qualify
    assert!(points.iter().all(|&(i, j)| i >= 1 && j >= 1 && i + 1 < a.len() && j + 1 < b.len()));

    let mut r = rng(29);
    let (c1, c2) = splice(&cat, &a, &b, &Policy::default(), 0.1, &mut r);
    assert!(GOAL.reached(&c1.replay(&cat).unwrap(), &cat));
    assert!(GOAL.reached(&c2.replay(&cat).unwrap(), &cat));
}

#[test]
fn splice_always_returns_valid_paths() {
    let cat = Catalog::standard();
    let pool = random_paths(&cat, 10, 31);
    assert!(pool.len() >= 2);
    let mut r = rng(37);
    for a in &pool {
        for b in &pool {
            let (c1, c2) = splice(&cat, a, b, &Policy::default(), 0.1, &mut r);
            for c in [c1, c2] {
                let end = c.replay(&cat).unwrap();
                assert!(c.milestone().reached(&end, &cat));
            }
        }
    }
}

#[test]
fn splice_returns_short_parents_unchanged() {
    let cat = Catalog::standard();
    let a = Path::exact(&cat, EconomyState::new(&cat), GOAL, vec![Action::repeat(Action::RankUp, 2)]).unwrap();
    let b = Path::greedy(&cat, EconomyState::new(&cat), GOAL).unwrap();
    let mut r = rng(41);
    let (c1, c2) = splice(&cat, &a, &b, &Policy::default(), 0.1, &mut r);
    assert_eq!(c1, a);
    assert_eq!(c2, b);
}

/* ──────────────────────────────────────────────────────────────────────────
5) Population engine
────────────────────────────────────────────────────────────────────────── */

#[test]
fn zero_generations_returns_best_of_initial_pool() {
    let cat = Catalog::standard();
    let cfg = small(43).with_generations(0);
    let out = Evolver::new(&cat, EconomyState::new(&cat), GOAL, cfg).unwrap().run().unwrap();
    let min = out.population.iter().map(|p| p.completion_time()).min().unwrap();
    assert_eq!(out.best.completion_time(), min);
    assert_eq!(out.population.len(), 12);
    assert_eq!(out.generations, 0);
    assert_eq!(out.trace, vec![min]);
}

#[test]
fn search_never_loses_to_greedy() {
    let cat = Catalog::standard();
    let greedy = Path::greedy(&cat, EconomyState::new(&cat), GOAL).unwrap();
    let out = Evolver::new(&cat, EconomyState::new(&cat), GOAL, small(47)).unwrap().run().unwrap();

    assert!(out.best.completion_time() <= greedy.completion_time());
    assert_eq!(out.generations, 4);
    assert_eq!(out.population.len(), 12);
    assert!(out.trace.windows(2).all(|w| w[1] <= w[0]));
    assert_eq!(out.history.first().map(|p| p.completion_time()), Some(out.best.completion_time()));
    for p in &out.population {
        assert!(GOAL.reached(&p.replay(&cat).unwrap(), &cat));
    }
}

#[test]
fn same_seed_same_result_regardless_of_threads() {
    let cat = Catalog::standard();
    let run = |threads| {
        let cfg = small(53).with_threads(threads);
        Evolver::new(&cat, EconomyState::new(&cat), GOAL, cfg).unwrap().run().unwrap()
    };
    let one = run(1);
    let four = run(4);
    assert_eq!(one.best, four.best);
    assert_eq!(one.trace, four.trace);
}

#[test]
fn cancelled_run_stops_at_the_first_boundary() {
    let cat = Catalog::standard();
    let token = CancelToken::new();
    let evolver = Evolver::new(&cat, EconomyState::new(&cat), GOAL, small(59))
        .unwrap()
        .with_cancel(token.clone());
    token.cancel();
    let out = evolver.run().unwrap();
    assert!(out.cancelled);
    assert_eq!(out.generations, 0);
    let min = out.population.iter().map(|p| p.completion_time()).min().unwrap();
    assert_eq!(out.best.completion_time(), min);
}

#[test]
fn expired_deadline_stops_before_the_first_generation() {
    let cat = Catalog::standard();
    let cfg = SearchConfig { deadline: Some(Duration::ZERO), ..small(67) };
    let out = Evolver::new(&cat, EconomyState::new(&cat), GOAL, cfg).unwrap().run().unwrap();
    assert!(out.cancelled);
    assert_eq!(out.generations, 0);
    assert_eq!(out.trace.len(), 1);
}

#[test]
fn longer_goal_has_splice_points_and_beats_greedy() {
    let cat = Catalog::standard();
    let goal = Milestone::Rank(4);
    let mut r = rng(71);
    let a = Path::random(&cat, EconomyState::new(&cat), goal, &Policy::default(), &mut r).unwrap();
    let b = Path::random(&cat, EconomyState::new(&cat), goal, &Policy::default(), &mut r).unwrap();
    assert!(!splice_points(&cat, &a, &b).unwrap().is_empty());

    let greedy = Path::greedy(&cat, EconomyState::new(&cat), goal).unwrap();
    let out = Evolver::new(&cat, EconomyState::new(&cat), goal, small(73)).unwrap().run().unwrap();
    assert_eq!(out.generations, 4);
    assert!(out.best.completion_time() <= greedy.completion_time());
    for p in &out.population {
        assert!(goal.reached(&p.replay(&cat).unwrap(), &cat));
    }
}

#[test]
fn config_validation() {
    assert!(SearchConfig::default().validate().is_ok());
    let bad = [
        SearchConfig::default().with_pool(1, 0),
        SearchConfig::default().with_pool(10, 10),
        SearchConfig::default().with_threads(0),
        SearchConfig { mutation_rate: 1.5, ..SearchConfig::default() },
        SearchConfig { competition: 0.0, ..SearchConfig::default() },
        SearchConfig { exponent_range: (1.0, 0.5), ..SearchConfig::default() },
    ];
    for cfg in bad {
        assert!(matches!(cfg.validate(), Err(SearchError::Config(_))), "{cfg:?}");
    }

    let cat = Catalog::standard();
    let err = Evolver::new(&cat, EconomyState::new(&cat), GOAL, SearchConfig::default().with_threads(0));
    assert!(err.is_err());
}

#[test]
fn unreachable_milestone_is_reported() {
    let mut cat = Catalog::standard();
    cat.base_power_per_second = 0.0;
    cat.packs.clear();
    cat.items.clear();
    cat.luck_upgrades.clear();
    cat.pack_speed_upgrades.clear();
    let cfg = small(61).with_generations(1);
    let err = Evolver::new(&cat, EconomyState::new(&cat), GOAL, cfg).unwrap().run().unwrap_err();
    assert!(matches!(err, SearchError::NoFeasiblePath(_)));
}
