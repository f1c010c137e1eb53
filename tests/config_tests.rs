mod support;

use std::time::Duration;

use showdown::config::Config;
use showdown::domain::{Mode, Position};
use showdown::error::{ConfigError, Error};

#[test]
fn config_loads_full_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = support::write_config(
        &dir,
        r#"
[logging]
level = "debug"
format = "json"

[rules]
mode = "live"
min_cost = 30000
max_cost = 49000
excluded_captains = ["A", "B"]

[rules.position_limits]
RB = 2
WR = 3

[rules.heuristics]
lone_receiver = false

[search]
top_n = 25
threads = 2
timeout_secs = 30

[cache]
max_entries = 1000
"#,
    );

    let config = Config::load(&path).unwrap();
    let rules = config.rule_config().unwrap();
    let options = config.search_options();

    assert_eq!(rules.mode, Mode::Forward);
    assert_eq!((rules.min_cost, rules.max_cost), (30_000, 49_000));
    assert_eq!(rules.limits.cap(Position::Rb), Some(2));
    assert_eq!(rules.limits.cap(Position::Wr), Some(3));
    assert_eq!(rules.limits.cap(Position::Te), Some(1));
    assert!(!rules.heuristics.lone_receiver);
    assert!(rules.heuristics.tight_end_stack);
    assert_eq!(options.top_n, 25);
    assert_eq!(options.threads, 2);
    assert_eq!(options.timeout, Some(Duration::from_secs(30)));
    assert_eq!(options.excluded_captains.len(), 2);
    assert_eq!(config.check_cache().max_entries(), 1000);
    assert_eq!(config.logging.format, "json");
}

#[test]
fn config_rejects_inverted_cost_band() {
    let dir = tempfile::tempdir().unwrap();
    let path = support::write_config(&dir, "[rules]\nmin_cost = 50000\nmax_cost = 40000\n");

    match Config::load(&path) {
        Err(Error::Config(ConfigError::InvalidValue {
            field: "max_cost", ..
        })) => {}
        Err(err) => panic!("Expected inverted band error, got {err}"),
        Ok(config) => panic!(
            "Expected inverted band to be rejected, got {}..{}",
            config.rules.min_cost, config.rules.max_cost
        ),
    }
}

#[test]
fn config_rejects_negative_cost() {
    let dir = tempfile::tempdir().unwrap();
    let path = support::write_config(&dir, "[rules]\nmin_cost = -1\n");

    assert!(matches!(
        Config::load(&path),
        Err(Error::Config(ConfigError::InvalidValue {
            field: "min_cost",
            ..
        }))
    ));
}

#[test]
fn config_rejects_unknown_position_limit() {
    let dir = tempfile::tempdir().unwrap();
    let path = support::write_config(&dir, "[rules.position_limits]\nLB = 1\n");

    assert!(matches!(Config::load(&path), Err(Error::Config(_))));
}

#[test]
fn config_rejects_unknown_log_format() {
    let dir = tempfile::tempdir().unwrap();
    let path = support::write_config(&dir, "[logging]\nformat = \"xml\"\n");

    assert!(matches!(
        Config::load(&path),
        Err(Error::Config(ConfigError::InvalidValue { field: "format", .. }))
    ));
}

#[test]
fn config_reports_missing_file() {
    let dir = tempfile::tempdir().unwrap();

    assert!(matches!(
        Config::load(dir.path().join("absent.toml")),
        Err(Error::Config(ConfigError::ReadFile(_)))
    ));
}
