//! CSV player tables in, ranked lineups out.
//!
//! Player tables need `name`, `team`, `position` (or `pos`), `salary` and
//! `fpts` columns; anything else is ignored. Lineups are written as
//! `CPT, FLEX1..FLEX5, fpts, salary`.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::domain::Player;
use crate::engine::RankedLineup;
use crate::error::Result;

/// Read a player table from a file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or a row does not parse.
pub fn read_players(path: &Path) -> Result<Vec<Player>> {
    let players = read_players_from(File::open(path)?)?;
    debug!(path = %path.display(), rows = players.len(), "player table loaded");
    Ok(players)
}

/// Read a player table from any reader.
///
/// # Errors
///
/// Returns an error if a row is missing a required column or holds an
/// unparseable value.
pub fn read_players_from<R: Read>(reader: R) -> Result<Vec<Player>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut players = Vec::new();
    for row in reader.deserialize() {
        players.push(row?);
    }
    Ok(players)
}

#[derive(Serialize)]
struct LineupRow<'a> {
    #[serde(rename = "CPT")]
    captain: &'a str,
    #[serde(rename = "FLEX1")]
    flex1: &'a str,
    #[serde(rename = "FLEX2")]
    flex2: &'a str,
    #[serde(rename = "FLEX3")]
    flex3: &'a str,
    #[serde(rename = "FLEX4")]
    flex4: &'a str,
    #[serde(rename = "FLEX5")]
    flex5: &'a str,
    fpts: f64,
    salary: String,
}

impl<'a> From<&'a RankedLineup> for LineupRow<'a> {
    fn from(lineup: &'a RankedLineup) -> Self {
        let [flex1, flex2, flex3, flex4, flex5] = &lineup.flex;
        Self {
            captain: &lineup.captain,
            flex1,
            flex2,
            flex3,
            flex4,
            flex5,
            fpts: lineup.total_points,
            salary: lineup.total_cost.normalize().to_string(),
        }
    }
}

/// Write ranked lineups to a file, replacing it.
///
/// # Errors
///
/// Returns an error if the file cannot be created or written.
pub fn write_lineups(path: &Path, lineups: &[RankedLineup]) -> Result<()> {
    write_lineups_to(File::create(path)?, lineups)?;
    debug!(path = %path.display(), rows = lineups.len(), "lineups written");
    Ok(())
}

/// Write ranked lineups to any writer. A header is written even when there
/// are no lineups.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_lineups_to<W: Write>(writer: W, lineups: &[RankedLineup]) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    writer.write_record(["CPT", "FLEX1", "FLEX2", "FLEX3", "FLEX4", "FLEX5", "fpts", "salary"])?;
    for lineup in lineups {
        writer.serialize(LineupRow::from(lineup))?;
    }
    writer.flush()?;
    Ok(())
}
