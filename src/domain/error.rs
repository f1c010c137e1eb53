//! Domain validation errors for players, pools and lineups.
//!
//! These errors signal data-integrity defects: a lookup that names a player
//! or field the pool does not know, or a lineup that cannot exist. They are
//! distinct from a lineup failing a roster rule, which is an ordinary
//! `false` verdict from the checker.
//!
//! # Examples
//!
//! ```
//! use showdown::domain::error::DomainError;
//! use showdown::domain::{Player, PlayerPool, Position};
//!
//! let pool = PlayerPool::new(vec![
//!     Player::new("Josh Allen", "BUF", Position::Qb, 12_000, 24.5),
//! ])
//! .unwrap();
//!
//! assert!(matches!(
//!     pool.value("Patrick Mahomes", "salary"),
//!     Err(DomainError::UnknownPlayer { .. })
//! ));
//! assert!(matches!(
//!     pool.value("Josh Allen", "snap_share"),
//!     Err(DomainError::UnknownField { .. })
//! ));
//! ```

use thiserror::Error;

/// Errors that occur when domain invariants are violated.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// A lookup named a player that is not in the pool.
    #[error("player not found: {name}")]
    UnknownPlayer {
        /// The identifier that was looked up.
        name: String,
    },

    /// A lookup named a field that players do not carry.
    #[error("field not found: {field}")]
    UnknownField {
        /// The field name that was requested.
        field: String,
    },

    /// A numeric aggregation was requested over a text field.
    #[error("field {field} is not numeric")]
    NonNumericField {
        /// The field name that was requested.
        field: String,
    },

    /// A position label could not be parsed.
    #[error("unknown position: {label}")]
    InvalidPosition {
        /// The label as it appeared in the input.
        label: String,
    },

    /// The same player identifier appears twice in the input table.
    #[error("duplicate player in pool: {name}")]
    DuplicatePlayer {
        /// The repeated identifier.
        name: String,
    },

    /// The pool holds more players than a lineup key can address.
    #[error("pool of {size} players exceeds the supported maximum of {max}")]
    PoolTooLarge {
        /// Number of eligible players.
        size: usize,
        /// Largest supported pool.
        max: usize,
    },

    /// A lineup could not be formed from the given slots.
    #[error("invalid lineup: {reason}")]
    InvalidLineup {
        /// What is wrong with the lineup.
        reason: String,
    },
}
