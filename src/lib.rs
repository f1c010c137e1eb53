//! Showdown - exhaustive single-game fantasy lineup optimizer.
//!
//! A showdown lineup is one captain, whose salary and points are scaled by
//! 1.5, plus five flex players. This crate enumerates every such lineup in a
//! player table, filters them through a set of roster rules, and reports the
//! highest-scoring ones.
//!
//! # Modules
//!
//! - [`domain`] - Players, the eligible pool, lineups and rule configuration
//! - [`checker`] - Memoized rule evaluation and pluggable roster rules
//! - [`engine`] - Parallel captain × flex enumeration and top-N ranking
//! - [`adapter`] - CSV input and output
//! - [`config`] - TOML configuration with defaults and validation
//! - [`cli`] - Command-line handlers and terminal output
//! - [`error`] - Error types for the crate
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use showdown::adapter::csv;
//! use showdown::domain::{PlayerPool, RuleConfig};
//! use showdown::engine::{Engine, SearchOptions};
//!
//! # fn main() -> showdown::error::Result<()> {
//! let players = csv::read_players("players.csv".as_ref())?;
//! let pool = Arc::new(PlayerPool::new(players)?);
//! let engine = Engine::new(pool, RuleConfig::default(), SearchOptions::default())?;
//! let generation = engine.generate()?;
//! println!("{} lineups", generation.lineups.len());
//! # Ok(())
//! # }
//! ```

pub mod adapter;
pub mod checker;
pub mod cli;
pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
