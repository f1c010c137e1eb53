#![allow(dead_code)]

pub mod pool;

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Column header every player fixture is written with.
pub const PLAYER_HEADER: &str = "name,team,position,salary,fpts";

/// Write `rows` under the standard header and return the file path.
pub fn write_players(dir: &TempDir, rows: &[&str]) -> PathBuf {
    let path = dir.path().join("players.csv");
    let mut content = String::from(PLAYER_HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    content.push('\n');
    fs::write(&path, content).expect("write player table");
    path
}

/// Write a config file next to the player table.
pub fn write_config(dir: &TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("showdown.toml");
    fs::write(&path, contents).expect("write config");
    path
}

pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}
