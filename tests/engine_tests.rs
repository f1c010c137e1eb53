mod support;

use std::collections::HashSet;
use std::sync::Arc;

use rust_decimal_macros::dec;

use showdown::checker::Checker;
use showdown::domain::{Bonus, FlexKey, Lineup, Mode, PlayerPool, RuleConfig};
use showdown::engine::{
    binomial, CancelToken, Combinations, Engine, RankedLineup, SearchControl, SearchOptions,
    Silent, StopReason,
};

use support::pool::{random_pool, sample_players, sample_pool};

fn options(top_n: usize, threads: usize) -> SearchOptions {
    SearchOptions {
        top_n,
        threads,
        ..SearchOptions::default()
    }
}

fn assert_points(actual: &[f64], expected: &[f64]) {
    assert_eq!(actual.len(), expected.len(), "got {actual:?}");
    for (a, e) in actual.iter().zip(expected) {
        assert!((a - e).abs() < 1e-9, "expected {expected:?}, got {actual:?}");
    }
}

fn ranked(engine: &Engine) -> Vec<RankedLineup> {
    let generation = engine.generate().unwrap();
    RankedLineup::resolve(engine.pool(), &generation.lineups).unwrap()
}

#[test]
fn backtest_ranks_sample_slate() {
    let engine = Engine::new(sample_pool(), RuleConfig::default(), options(5, 2)).unwrap();
    let generation = engine.generate().unwrap();

    assert!(generation.completed());
    assert_eq!(generation.stats.captains, 7);
    assert_eq!(generation.stats.candidates, 42);
    // Only captain G without A falls under the cost floor (34,500).
    assert_eq!(generation.stats.valid, 41);

    let points: Vec<f64> = generation.lineups.iter().map(|r| r.points).collect();
    assert_points(&points, &[84.0, 81.5, 81.0, 80.0, 80.0]);

    let lineups = RankedLineup::resolve(engine.pool(), &generation.lineups).unwrap();
    assert_eq!(lineups[0].rank, 1);
    assert_eq!(lineups[0].captain, "A");
    assert_eq!(lineups[0].flex, ["B", "C", "D", "E", "F"].map(String::from));
    assert_eq!(lineups[0].total_cost, dec!(45000));
    // Equal points fall back to canonical order, which puts captain A first.
    assert_eq!(lineups[3].captain, "A");
    assert_eq!(lineups[4].captain, "C");
}

#[test]
fn forward_applies_position_rules_and_captain_bars() {
    let rules = RuleConfig::for_mode(Mode::Forward);
    let engine = Engine::new(sample_pool(), rules, options(10, 2)).unwrap();
    let lineups = ranked(&engine);

    // K and DST never captain, and E (TE) never plays without its team's QB.
    let captains: Vec<&str> = lineups.iter().map(|l| l.captain.as_str()).collect();
    assert_eq!(captains, vec!["A", "B", "C", "D"]);
    let points: Vec<f64> = lineups.iter().map(|l| l.total_points).collect();
    assert_points(&points, &[81.0, 78.5, 77.0, 76.0]);
    for lineup in &lineups {
        assert!(!lineup.flex.iter().any(|name| name == "E"));
    }
}

#[test]
fn forward_honors_excluded_captains() {
    let rules = RuleConfig::for_mode(Mode::Forward);
    let options = SearchOptions {
        excluded_captains: vec!["A".to_string()],
        ..options(10, 1)
    };
    let engine = Engine::new(sample_pool(), rules, options).unwrap();
    let lineups = ranked(&engine);

    let captains: Vec<&str> = lineups.iter().map(|l| l.captain.as_str()).collect();
    assert_eq!(captains, vec!["B", "C", "D"]);
}

#[test]
fn backtest_ignores_excluded_captains() {
    let options = SearchOptions {
        excluded_captains: vec!["A".to_string()],
        ..options(1, 1)
    };
    let engine = Engine::new(sample_pool(), RuleConfig::default(), options).unwrap();

    assert!(engine.bad_captains().is_empty());
    assert_eq!(ranked(&engine)[0].captain, "A");
}

#[test]
fn pool_of_six_yields_one_lineup_per_captain() {
    let players = sample_players().into_iter().take(6);
    let pool = Arc::new(PlayerPool::new(players).unwrap());
    let engine = Engine::new(pool, RuleConfig::default(), options(10, 2)).unwrap();
    let generation = engine.generate().unwrap();

    assert_eq!(engine.search_space(), 6);
    assert_eq!(generation.stats.candidates, 6);
    assert_eq!(generation.lineups.len(), 6);
}

#[test]
fn pool_below_roster_size_is_empty() {
    let players = sample_players().into_iter().take(5);
    let pool = Arc::new(PlayerPool::new(players).unwrap());
    let engine = Engine::new(pool, RuleConfig::default(), options(10, 1)).unwrap();
    let generation = engine.generate().unwrap();

    assert_eq!(engine.search_space(), 0);
    assert_eq!(generation.stats.candidates, 0);
    assert!(generation.lineups.is_empty());
    assert!(generation.completed());
}

#[test]
fn repeated_runs_agree() {
    let engine = Engine::new(random_pool(11, 12), RuleConfig::default(), options(10, 3)).unwrap();

    let first = engine.generate().unwrap();
    let second = engine.generate().unwrap();

    assert_eq!(first.lineups, second.lineups);
    assert_eq!(first.stats.valid, second.stats.valid);
}

#[test]
fn thread_count_does_not_change_results() {
    let pool = random_pool(7, 14);
    let single = Engine::new(Arc::clone(&pool), RuleConfig::default(), options(25, 1)).unwrap();
    let many = Engine::new(pool, RuleConfig::default(), options(25, 4)).unwrap();

    let single = single.generate().unwrap();
    let many = many.generate().unwrap();

    assert_eq!(single.lineups, many.lineups);
    assert_eq!(single.stats.candidates, many.stats.candidates);
}

#[test]
fn wider_cost_band_keeps_every_narrow_lineup() {
    let narrow_rules = RuleConfig {
        max_cost: 44_000,
        ..RuleConfig::default()
    };
    let narrow = Engine::new(sample_pool(), narrow_rules, options(100, 2)).unwrap();
    let wide = Engine::new(sample_pool(), RuleConfig::default(), options(100, 2)).unwrap();

    let narrow = narrow.generate().unwrap();
    let wide = wide.generate().unwrap();
    let wide_set: HashSet<Lineup> = wide.lineups.iter().map(|r| r.lineup).collect();

    assert!(narrow.lineups.len() < wide.lineups.len());
    for result in &narrow.lineups {
        assert!(wide_set.contains(&result.lineup));
        assert!(result.cost <= dec!(44000));
    }
}

#[test]
fn results_are_sorted_distinct_and_in_band() {
    let engine = Engine::new(random_pool(3, 13), RuleConfig::default(), options(50, 2)).unwrap();
    let generation = engine.generate().unwrap();
    let pool = engine.pool();

    for pair in generation.lineups.windows(2) {
        assert!(pair[0].points >= pair[1].points);
    }
    let mut seen = HashSet::new();
    for result in &generation.lineups {
        assert!(seen.insert(result.lineup));
        let names: HashSet<&str> = pool.names(&result.lineup).unwrap().into_iter().collect();
        assert_eq!(names.len(), 6);
        assert!(result.cost >= dec!(35000) && result.cost <= dec!(50000));
    }
}

#[test]
fn matches_brute_force_on_random_slate() {
    let pool = random_pool(42, 11);
    let rules = RuleConfig::default();
    let checker = Checker::new(Arc::clone(&pool), rules.clone()).unwrap();

    let ids: Vec<_> = pool.ids().collect();
    let mut valid = 0_u64;
    let mut best = f64::NEG_INFINITY;
    for &captain in &ids {
        let rest: Vec<_> = ids.iter().copied().filter(|id| *id != captain).collect();
        for flex in Combinations::<_, 5>::new(&rest) {
            let lineup = Lineup::new(captain, FlexKey::new(flex).unwrap()).unwrap();
            let players: Vec<_> = lineup
                .slots()
                .iter()
                .map(|id| pool.player(*id).unwrap())
                .collect();
            let teams: HashSet<&str> = players.iter().map(|p| p.team.as_str()).collect();
            let cost = checker.cost(&lineup, Bonus::Captain).unwrap();
            if teams.len() >= 2 && cost >= dec!(35000) && cost <= dec!(50000) {
                valid += 1;
                best = best.max(checker.points(&lineup, Bonus::Captain).unwrap());
            }
        }
    }

    let engine = Engine::new(pool, rules, options(1, 2)).unwrap();
    let generation = engine.generate().unwrap();

    assert_eq!(generation.stats.candidates, 11 * binomial(10, 5));
    assert_eq!(generation.stats.valid, valid);
    if valid > 0 {
        assert!((generation.lineups[0].points - best).abs() < 1e-9);
    }
}

#[test]
fn cancelled_search_returns_partial_result() {
    let engine = Engine::new(sample_pool(), RuleConfig::default(), options(10, 2)).unwrap();
    let cancel = CancelToken::new();
    let control = SearchControl::new().with_cancel(cancel.clone());
    cancel.cancel();

    let generation = engine.generate_with(&control, &Silent).unwrap();

    assert_eq!(generation.stopped, Some(StopReason::Cancelled));
    assert_eq!(generation.stats.skipped, 7);
    assert!(generation.lineups.is_empty());
    assert!(!generation.completed());
}

#[test]
fn unknown_excluded_captain_is_rejected() {
    let options = SearchOptions {
        excluded_captains: vec!["Nobody".to_string()],
        ..options(10, 1)
    };

    assert!(Engine::new(sample_pool(), RuleConfig::default(), options).is_err());
}
