//! Handler for the `check` command.

use std::sync::Arc;

use serde_json::json;

use crate::adapter::csv;
use crate::checker::Checker;
use crate::cli::{output, CheckArgs};
use crate::domain::PlayerPool;
use crate::error::Result;

/// Execute `check`.
pub fn execute(args: &CheckArgs) -> Result<()> {
    let mut config = args.config.load()?;
    args.rules.apply(&mut config);
    config.validate()?;
    config.init_logging();

    let pool = Arc::new(PlayerPool::new(csv::read_players(&args.players)?)?);
    let flex: Vec<&str> = args.flex.iter().map(String::as_str).collect();
    let lineup = pool.lineup(&args.captain, &flex)?;
    let checker = Checker::with_cache(
        Arc::clone(&pool),
        config.rule_config()?,
        Arc::new(config.check_cache()),
    )?;
    let report = checker.report(&lineup)?;

    if output::is_json() {
        output::json_output(json!({
            "command": "check",
            "captain": args.captain,
            "flex": args.flex,
            "mode": config.rules.mode,
            "report": report,
        }));
        return Ok(());
    }

    output::section("Lineup");
    output::field("Captain", output::highlight(&args.captain));
    output::field("Flex", args.flex.join(", "));
    output::field("Cost", report.cost.normalize());
    output::field("Points", format!("{:.2}", report.fpts));

    output::section(&format!("Checks ({} mode)", config.rules.mode));
    verdict("teams", report.team, true);
    verdict("salary", report.salary, true);
    verdict("points", report.points, report.points_enforced);
    verdict("positions", report.position, report.positions_enforced);
    for rule in &report.violations {
        output::note(&format!("breaks {rule}"));
    }

    output::section("Result");
    if report.valid {
        output::success("Lineup is valid");
    } else {
        output::failure("Lineup is rejected");
    }
    Ok(())
}

fn verdict(name: &str, passed: bool, enforced: bool) {
    let label = if enforced {
        name.to_string()
    } else {
        format!("{name} {}", output::muted("(not enforced)"))
    };
    if passed {
        output::success(&label);
    } else if enforced {
        output::failure(&label);
    } else {
        output::note(&format!("- {label}"));
    }
}
