//! File adapters for the player table and ranked lineups.

pub mod csv;
