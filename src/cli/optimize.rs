//! Handler for the `optimize` command.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tabled::{Table, Tabled};
use tracing::info;

use crate::adapter::csv;
use crate::checker::Checker;
use crate::cli::{output, OptimizeArgs};
use crate::config::Config;
use crate::domain::PlayerPool;
use crate::engine::{Engine, Generation, RankedLineup, SearchControl};
use crate::error::Result;

#[derive(Tabled)]
struct LineupRow<'a> {
    #[tabled(rename = "#")]
    rank: usize,
    #[tabled(rename = "Captain")]
    captain: &'a str,
    #[tabled(rename = "Flex")]
    flex: String,
    #[tabled(rename = "Salary")]
    salary: String,
    #[tabled(rename = "FPTS")]
    fpts: String,
}

impl<'a> From<&'a RankedLineup> for LineupRow<'a> {
    fn from(lineup: &'a RankedLineup) -> Self {
        Self {
            rank: lineup.rank,
            captain: &lineup.captain,
            flex: lineup.flex.join(", "),
            salary: lineup.total_cost.normalize().to_string(),
            fpts: format!("{:.2}", lineup.total_points),
        }
    }
}

/// Execute `optimize`.
pub fn execute(args: &OptimizeArgs) -> Result<()> {
    let config = resolve_config(args)?;
    config.init_logging();

    let pool = Arc::new(PlayerPool::new(csv::read_players(&args.players)?)?);
    info!(
        players = pool.len(),
        teams = pool.team_count(),
        below_floor = pool.below_floor().len(),
        "player pool built"
    );

    let checker = Checker::with_cache(
        Arc::clone(&pool),
        config.rule_config()?,
        Arc::new(config.check_cache()),
    )?;
    let engine = Engine::with_checker(checker, config.search_options())?;

    if !output::is_json() {
        output::header(env!("CARGO_PKG_VERSION"));
        output::field("Players", pool.len());
        output::field("Mode", config.rules.mode);
        output::field(
            "Cost band",
            format!("{} - {}", config.rules.min_cost, config.rules.max_cost),
        );
        output::field("Search space", engine.search_space());
    }

    let mut control = SearchControl::new();
    if let Some(timeout) = engine.options().timeout {
        control = control.with_timeout(timeout);
    }
    let progress = output::progress(
        engine.captains().len() as u64,
        config.search.progress && !args.no_progress,
    );
    let generation = engine.generate_with(&control, &progress)?;
    let ranked = RankedLineup::resolve(&pool, &generation.lineups)?;

    if let Some(path) = &args.output {
        csv::write_lineups(path, &ranked)?;
    }

    if output::is_json() {
        print_json(&generation, &ranked);
    } else {
        print_table(&generation, &ranked);
        if let Some(path) = &args.output {
            output::success(&format!("Wrote {} lineups to {}", ranked.len(), path.display()));
        }
    }
    Ok(())
}

/// Configuration file plus command-line overrides, validated.
fn resolve_config(args: &OptimizeArgs) -> Result<Config> {
    let mut config = args.config.load()?;
    args.rules.apply(&mut config);
    if let Some(top_n) = args.top_n {
        config.search.top_n = top_n;
    }
    if let Some(threads) = args.threads {
        config.search.threads = threads;
    }
    if let Some(timeout) = args.timeout {
        config.search.timeout_secs = Some(timeout);
    }
    config
        .rules
        .excluded_captains
        .extend(args.exclude.iter().cloned());
    if let Some(level) = &args.log_level {
        config.logging.level.clone_from(level);
    } else if output::verbosity() > 1 {
        config.logging.level = "debug".to_string();
    }
    if output::is_json() {
        config.logging.format = "json".to_string();
    }
    config.validate()?;
    Ok(config)
}

fn print_json(generation: &Generation, ranked: &[RankedLineup]) {
    let stats = &generation.stats;
    output::json_output(json!({
        "command": "optimize",
        "generated_at": Utc::now().to_rfc3339(),
        "completed": generation.completed(),
        "stopped": generation.stopped.map(|reason| reason.to_string()),
        "stats": {
            "captains": stats.captains,
            "skipped_captains": stats.skipped,
            "candidates": stats.candidates,
            "valid": stats.valid,
            "cache_hits": stats.cache.hits,
            "cache_misses": stats.cache.misses,
            "elapsed_ms": stats.elapsed.as_millis() as u64,
        },
        "lineups": ranked,
    }));
}

fn print_table(generation: &Generation, ranked: &[RankedLineup]) {
    let stats = &generation.stats;

    if let Some(reason) = generation.stopped {
        output::warning(&format!(
            "Search {reason} after {} of {} captains; results are partial",
            stats.captains - stats.skipped,
            stats.captains
        ));
    }

    output::section("Top Lineups");
    if ranked.is_empty() {
        output::note("No lineup satisfies the rules");
        output::hint("widen the cost band with --min-cost/--max-cost or try --mode backtest");
    } else {
        let rows: Vec<LineupRow<'_>> = ranked.iter().map(LineupRow::from).collect();
        output::lines(&Table::new(rows).to_string());
    }

    output::section("Search");
    output::field("Candidates", stats.candidates);
    output::field("Valid", stats.valid);
    output::field("Elapsed", format!("{:.2?}", stats.elapsed));
    if output::verbosity() > 0 {
        output::field("Captains", stats.captains);
        output::field("Cache hits", format!("{:.1}%", stats.cache.hit_rate() * 100.0));
        output::field("Evictions", stats.cache.evictions);
    }
}
