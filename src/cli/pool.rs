//! Handler for the `pool` command.

use serde_json::json;
use tabled::{Table, Tabled};

use crate::adapter::csv;
use crate::cli::{output, PoolArgs};
use crate::domain::{Field, PlayerPool};
use crate::error::Result;

#[derive(Tabled)]
struct PlayerRow<'a> {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "Name")]
    name: &'a str,
    #[tabled(rename = "Team")]
    team: &'a str,
    #[tabled(rename = "Pos")]
    position: &'static str,
    #[tabled(rename = "Salary")]
    salary: u32,
    #[tabled(rename = "FPTS")]
    fpts: String,
}

/// Execute `pool`.
pub fn execute(args: &PoolArgs) -> Result<()> {
    let field: Field = args.sort.parse()?;
    let pool = PlayerPool::new(csv::read_players(&args.players)?)?;
    let order = pool.ordered_by(field);

    if output::is_json() {
        let players = order
            .iter()
            .map(|id| pool.player(*id))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        output::json_output(json!({
            "command": "pool",
            "players": players,
            "below_floor": pool.below_floor(),
            "teams": pool.team_count(),
        }));
        return Ok(());
    }

    if output::is_quiet() {
        return Ok(());
    }

    output::header(env!("CARGO_PKG_VERSION"));
    output::section("Eligible Players");
    let rows = order
        .iter()
        .enumerate()
        .map(|(index, id)| {
            pool.player(*id).map(|player| PlayerRow {
                index: index + 1,
                name: &player.name,
                team: &player.team,
                position: player.position.as_str(),
                salary: player.salary,
                fpts: format!("{:.2}", player.fpts),
            })
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;
    output::lines(&Table::new(rows).to_string());

    output::field("Players", pool.len());
    output::field("Teams", pool.team_count());
    if !pool.below_floor().is_empty() {
        output::note(&format!(
            "{} players at or below the projection floor were dropped",
            pool.below_floor().len()
        ));
        if output::verbosity() > 0 {
            for name in pool.below_floor() {
                output::note(&format!("- {name}"));
            }
        }
    }
    Ok(())
}
