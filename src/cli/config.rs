//! Handler for the `config` command group.

use std::fs;
use std::path::Path;

use serde_json::json;

use crate::cli::{output, ConfigPathArg};
use crate::config::Config;
use crate::domain::Mode;
use crate::error::{ConfigError, Result};

/// Documented configuration template.
const CONFIG_TEMPLATE: &str = include_str!("../../config.toml.example");

/// Execute `config init`.
pub fn execute_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::InvalidValue {
            field: "config",
            reason: "file already exists (use --force to overwrite)".to_string(),
        }
        .into());
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, CONFIG_TEMPLATE)?;
    output::section("Config Initialized");
    output::success("Created configuration file");
    output::field("Path", path.display());
    output::section("Next Steps");
    output::note(&format!("1. Edit {} with your rules", path.display()));
    output::note(&format!(
        "2. Run: showdown optimize players.csv -c {}",
        path.display()
    ));
    Ok(())
}

/// Execute `config show`.
pub fn execute_show(args: &ConfigPathArg) -> Result<()> {
    let config = args.load()?;

    if output::is_json() {
        output::json_output(json!({
            "command": "config.show",
            "config": serde_json::to_value(&config)?,
        }));
        return Ok(());
    }

    output::section("Effective Configuration");
    output::field(
        "Source",
        args.config
            .as_deref()
            .map_or_else(|| "(defaults)".to_string(), |path| path.display().to_string()),
    );

    let rules = &config.rules;
    output::section("Rules");
    output::field("Mode", rules.mode);
    output::field("Cost band", format!("{} - {}", rules.min_cost, rules.max_cost));
    output::field("Roster size", rules.roster_size);
    output::field("Zero points", if rules.require_points { "rejected" } else { "allowed" });
    let limits: Vec<String> = rules
        .position_limits
        .iter()
        .map(|(position, cap)| format!("{position}:{cap}"))
        .collect();
    output::field("Team caps", limits.join(" "));
    if rules.excluded_captains.is_empty() {
        output::field("Excluded", "(none)");
    } else {
        output::field("Excluded", rules.excluded_captains.join(", "));
    }

    output::section("Heuristics");
    let heuristics = &rules.heuristics;
    for (name, enabled) in [
        ("5-1 special teams", heuristics.five_one_special_teams),
        ("Lone receiver", heuristics.lone_receiver),
        ("TE stack", heuristics.tight_end_stack),
    ] {
        output::field(name, if enabled { "on" } else { "off" });
    }

    output::section("Search");
    output::field("Top N", config.search.top_n);
    output::field("Threads", config.search.threads);
    output::field(
        "Timeout",
        config
            .search
            .timeout_secs
            .map_or_else(|| "none".to_string(), |secs| format!("{secs}s")),
    );
    output::field("Cache entries", config.cache.max_entries);

    output::section("Logging");
    output::field("Level", &config.logging.level);
    output::field("Format", &config.logging.format);

    Ok(())
}

/// Execute `config validate`.
pub fn execute_validate(args: &ConfigPathArg) -> Result<()> {
    let config = args.load()?;
    let warnings = warnings(&config);

    if output::is_json() {
        output::json_output(json!({
            "command": "config.validate",
            "valid": true,
            "warnings": warnings,
        }));
        return Ok(());
    }

    output::section("Config Validation");
    if let Some(path) = &args.config {
        output::field("Path", path.display());
    }
    output::success("Config is valid");

    if !warnings.is_empty() {
        output::section("Warnings");
        for warning in &warnings {
            output::warning(warning);
        }
    }

    Ok(())
}

/// Settings that parse but have no effect.
fn warnings(config: &Config) -> Vec<String> {
    let mut warnings = Vec::new();
    if config.rules.mode == Mode::Backtest {
        if !config.rules.excluded_captains.is_empty() {
            warnings.push("excluded_captains only apply in forward mode".to_string());
        }
        if config.rules.heuristics != crate::domain::Heuristics::none() {
            warnings.push("position rules and heuristics only apply in forward mode".to_string());
        }
    }
    let cpus = num_cpus::get();
    if config.search.threads > cpus {
        warnings.push(format!(
            "threads ({}) exceeds available CPUs ({cpus})",
            config.search.threads
        ));
    }
    warnings
}
