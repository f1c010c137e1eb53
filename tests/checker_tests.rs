mod support;

use std::sync::Arc;

use rust_decimal_macros::dec;

use showdown::checker::{CheckCache, Checker, Composition, RosterRule, RuleSet};
use showdown::domain::error::DomainError;
use showdown::domain::{Bonus, Field, Mode, Player, PlayerPool, Position, RuleConfig};

use support::pool::sample_pool;

fn checker(mode: Mode) -> Checker {
    Checker::new(sample_pool(), RuleConfig::for_mode(mode)).unwrap()
}

#[test]
fn captain_bonus_scales_captain_only() {
    let checker = checker(Mode::Backtest);
    let lineup = checker.pool().lineup("A", &["B", "C", "D", "E", "F"]).unwrap();

    let base_cost = checker.cost(&lineup, Bonus::Flat).unwrap();
    let bonus_cost = checker.cost(&lineup, Bonus::Captain).unwrap();
    let base_points = checker.points(&lineup, Bonus::Flat).unwrap();
    let bonus_points = checker.points(&lineup, Bonus::Captain).unwrap();

    assert_eq!(base_cost, dec!(40000));
    assert_eq!(bonus_cost - base_cost, dec!(5000));
    assert!((base_points - 74.0).abs() < 1e-9);
    assert!((bonus_points - base_points - 10.0).abs() < 1e-9);
    assert_eq!(checker.sum_field(&lineup, Field::Salary).unwrap(), 40_000.0);
}

#[test]
fn sum_of_text_field_is_an_error() {
    let checker = checker(Mode::Backtest);
    let lineup = checker.pool().lineup("A", &["B", "C", "D", "E", "F"]).unwrap();

    assert!(matches!(
        checker.sum_field(&lineup, Field::Team),
        Err(DomainError::NonNumericField { .. })
    ));
}

#[test]
fn single_team_lineup_fails_team_check() {
    let mut players: Vec<Player> = (0..6)
        .map(|i| Player::new(format!("X{i}"), "X", Position::Wr, 7_000, 10.0))
        .collect();
    players.push(Player::new("Y0", "Y", Position::Qb, 7_000, 10.0));
    let pool = Arc::new(PlayerPool::new(players).unwrap());
    let checker = Checker::new(Arc::clone(&pool), RuleConfig::default()).unwrap();

    let mono = pool.lineup("X0", &["X1", "X2", "X3", "X4", "X5"]).unwrap();
    let mixed = pool.lineup("Y0", &["X1", "X2", "X3", "X4", "X5"]).unwrap();

    assert!(!checker.team_check(&mono).unwrap());
    assert!(!checker.check(&mono).unwrap());
    assert!(checker.team_check(&mixed).unwrap());
}

#[test]
fn cost_band_edges_are_inclusive() {
    let pool = sample_pool();
    // A captain with B-F flex costs exactly 45,000.
    let lineup = pool.lineup("A", &["B", "C", "D", "E", "F"]).unwrap();
    let at_floor = RuleConfig {
        min_cost: 45_000,
        max_cost: 45_000,
        ..RuleConfig::default()
    };
    let above = RuleConfig {
        min_cost: 45_001,
        max_cost: 50_000,
        ..RuleConfig::default()
    };

    assert!(Checker::new(Arc::clone(&pool), at_floor)
        .unwrap()
        .salary_check(&lineup)
        .unwrap());
    assert!(!Checker::new(pool, above).unwrap().salary_check(&lineup).unwrap());
}

#[test]
fn positions_only_checked_going_forward() {
    // Two K and two DST would break core_counts.
    let pool = Arc::new(
        PlayerPool::new(vec![
            Player::new("Q", "X", Position::Qb, 9_000, 18.0),
            Player::new("K1", "X", Position::K, 4_000, 6.0),
            Player::new("K2", "Y", Position::K, 4_000, 6.0),
            Player::new("D1", "X", Position::Dst, 4_000, 6.0),
            Player::new("D2", "Y", Position::Dst, 4_000, 6.0),
            Player::new("W", "Y", Position::Wr, 9_000, 15.0),
        ])
        .unwrap(),
    );
    let lineup = pool.lineup("Q", &["K1", "K2", "D1", "D2", "W"]).unwrap();

    let backtest = Checker::new(Arc::clone(&pool), RuleConfig::default()).unwrap();
    let forward = Checker::new(pool, RuleConfig::for_mode(Mode::Forward)).unwrap();

    assert!(backtest.check(&lineup).unwrap());
    assert!(!forward.position_check(&lineup).unwrap());
    assert!(!forward.check(&lineup).unwrap());
}

struct NoKickers;

impl RosterRule for NoKickers {
    fn name(&self) -> &'static str {
        "no_kickers"
    }

    fn allows(&self, composition: &Composition) -> bool {
        composition.count(Position::K) == 0
    }
}

#[test]
fn custom_rules_plug_into_the_rule_set() {
    let rules = RuleConfig::for_mode(Mode::Forward);
    let mut roster = RuleSet::from_config(&rules);
    roster.register(Box::new(NoKickers));
    let checker = Checker::new(sample_pool(), rules).unwrap().with_roster(roster);

    let with_kicker = checker.pool().lineup("A", &["B", "C", "D", "F", "G"]).unwrap();
    let report = checker.report(&with_kicker).unwrap();

    assert!(!report.valid);
    assert_eq!(report.violations, vec!["no_kickers"]);
    assert!(checker.roster().names().contains(&"no_kickers"));
}

#[test]
fn shared_cache_survives_across_checkers() {
    let cache = Arc::new(CheckCache::new());
    let first =
        Checker::with_cache(sample_pool(), RuleConfig::default(), Arc::clone(&cache)).unwrap();
    let lineup = first.pool().lineup("A", &["B", "C", "D", "E", "F"]).unwrap();

    assert!(first.check(&lineup).unwrap());
    let misses = cache.stats().misses;
    assert!(first.check(&lineup).unwrap());

    assert_eq!(cache.stats().misses, misses);
    assert!(cache.stats().hits > 0);
}

#[test]
fn checkers_with_different_rules_keep_their_own_verdicts() {
    let cache = Arc::new(CheckCache::new());
    let backtest =
        Checker::with_cache(sample_pool(), RuleConfig::default(), Arc::clone(&cache)).unwrap();
    let forward = Checker::with_cache(
        sample_pool(),
        RuleConfig::for_mode(Mode::Forward),
        Arc::clone(&cache),
    )
    .unwrap();
    let fresh = checker(Mode::Forward);
    // Team Y supplies a TE without its QB.
    let lineup = backtest.pool().lineup("A", &["B", "C", "E", "F", "G"]).unwrap();

    assert!(backtest.check(&lineup).unwrap());
    assert_eq!(forward.check(&lineup).unwrap(), fresh.check(&lineup).unwrap());
    assert!(!forward.check(&lineup).unwrap());
    assert!(backtest.check(&lineup).unwrap());

    let band = RuleConfig {
        min_cost: 50_000,
        ..RuleConfig::default()
    };
    let narrow = Checker::with_cache(sample_pool(), band, Arc::clone(&cache)).unwrap();
    assert!(backtest.salary_check(&lineup).unwrap());
    assert!(!narrow.salary_check(&lineup).unwrap());
    assert_eq!(
        narrow.cost(&lineup, Bonus::Captain).unwrap(),
        backtest.cost(&lineup, Bonus::Captain).unwrap()
    );
}

#[test]
fn replacing_roster_keeps_shared_totals() {
    let cache = Arc::new(CheckCache::new());
    let rules = RuleConfig::for_mode(Mode::Forward);
    let plain = Checker::with_cache(sample_pool(), rules.clone(), Arc::clone(&cache)).unwrap();
    let lineup = plain.pool().lineup("A", &["B", "C", "D", "F", "G"]).unwrap();
    assert!(plain.check(&lineup).unwrap());
    plain.cost(&lineup, Bonus::Captain).unwrap();
    let entries = cache.stats().lineup_entries;

    let mut roster = RuleSet::from_config(&rules);
    roster.register(Box::new(NoKickers));
    let strict = Checker::with_cache(sample_pool(), rules, Arc::clone(&cache))
        .unwrap()
        .with_roster(roster);

    assert!(cache.stats().lineup_entries >= entries);
    assert!(!strict.check(&lineup).unwrap());
    assert!(plain.check(&lineup).unwrap());
}
