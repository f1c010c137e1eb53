//! Roster rules resolved once per run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::DomainError;
use super::lineup::ROSTER_SIZE;
use super::player::Position;
use crate::error::ConfigError;

/// Which rule set applies to a run.
///
/// | Mode       | Position checks | Disallowed captains                    |
/// |------------|-----------------|----------------------------------------|
/// | `Backtest` | no              | none                                   |
/// | `Forward`  | yes             | caller exclusions plus every K and DST |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Evaluate historical slates against contest rules only.
    #[default]
    #[serde(alias = "past")]
    Backtest,
    /// Generate picks for an upcoming slate.
    #[serde(alias = "live")]
    Forward,
}

impl Mode {
    /// Whether the position-composition check joins the aggregate check.
    #[must_use]
    pub const fn checks_positions(self) -> bool {
        matches!(self, Mode::Forward)
    }

    /// Whether kickers and defenses are barred from the captain slot.
    #[must_use]
    pub const fn bars_special_teams_captains(self) -> bool {
        matches!(self, Mode::Forward)
    }

    /// Whether caller-supplied captain exclusions are honored.
    #[must_use]
    pub const fn honors_captain_exclusions(self) -> bool {
        matches!(self, Mode::Forward)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Backtest => f.write_str("backtest"),
            Mode::Forward => f.write_str("forward"),
        }
    }
}

impl FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "backtest" | "past" => Ok(Mode::Backtest),
            "forward" | "live" => Ok(Mode::Forward),
            other => Err(ConfigError::InvalidValue {
                field: "mode",
                reason: format!("expected backtest or forward, got {other}"),
            }),
        }
    }
}

/// Per-team cap on how many players of one position a lineup may hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionLimits {
    caps: [Option<u8>; Position::COUNT],
}

impl PositionLimits {
    /// No caps at all.
    #[must_use]
    pub const fn unlimited() -> Self {
        Self {
            caps: [None; Position::COUNT],
        }
    }

    /// Replace the cap for one position.
    #[must_use]
    pub fn with_cap(mut self, position: Position, cap: u8) -> Self {
        self.caps[position.index()] = Some(cap);
        self
    }

    /// Build caps from raw `(label, value)` pairs, as read from a config.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unknown position label or
    /// a cap outside `0..=6`.
    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, i64)>,
    ) -> Result<Self, ConfigError> {
        Self::unlimited().overlay(pairs)
    }

    /// Replace the caps named in `pairs`, keeping every other cap.
    ///
    /// # Errors
    ///
    /// Same as [`PositionLimits::from_pairs`].
    pub fn overlay<'a>(
        self,
        pairs: impl IntoIterator<Item = (&'a str, i64)>,
    ) -> Result<Self, ConfigError> {
        let mut limits = self;
        for (label, cap) in pairs {
            let position: Position =
                label
                    .parse()
                    .map_err(|err: DomainError| ConfigError::InvalidValue {
                        field: "position_limits",
                        reason: err.to_string(),
                    })?;
            if cap < 0 {
                return Err(ConfigError::InvalidValue {
                    field: "position_limits",
                    reason: format!("cap for {position} must not be negative, got {cap}"),
                });
            }
            let cap = u8::try_from(cap)
                .ok()
                .filter(|cap| usize::from(*cap) <= ROSTER_SIZE)
                .ok_or_else(|| ConfigError::InvalidValue {
                    field: "position_limits",
                    reason: format!("cap for {position} must be at most {ROSTER_SIZE}, got {cap}"),
                })?;
            limits = limits.with_cap(position, cap);
        }
        Ok(limits)
    }

    #[must_use]
    pub fn cap(&self, position: Position) -> Option<u8> {
        self.caps[position.index()]
    }

    /// Configured caps in position order.
    pub fn iter(&self) -> impl Iterator<Item = (Position, u8)> + '_ {
        Position::ALL
            .iter()
            .filter_map(|position| self.cap(*position).map(|cap| (*position, cap)))
    }
}

impl Default for PositionLimits {
    fn default() -> Self {
        Self::unlimited()
            .with_cap(Position::Rb, 1)
            .with_cap(Position::Wr, 2)
            .with_cap(Position::Te, 1)
    }
}

/// Stacking conventions layered on top of the contest rules.
///
/// These were inferred from winning lineups rather than taken from any
/// contest rulebook, so each can be switched off on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heuristics {
    /// A team filling five slots must include a K or DST.
    #[serde(default = "enabled")]
    pub five_one_special_teams: bool,
    /// A team filling a single slot must fill it with a WR.
    #[serde(default = "enabled")]
    pub lone_receiver: bool,
    /// A team contributing a TE must also contribute its QB.
    #[serde(default = "enabled")]
    pub tight_end_stack: bool,
}

const fn enabled() -> bool {
    true
}

impl Heuristics {
    /// Every heuristic switched off.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            five_one_special_teams: false,
            lone_receiver: false,
            tight_end_stack: false,
        }
    }
}

impl Default for Heuristics {
    fn default() -> Self {
        Self {
            five_one_special_teams: true,
            lone_receiver: true,
            tight_end_stack: true,
        }
    }
}

/// Immutable rule set consumed by the checker and the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleConfig {
    pub limits: PositionLimits,
    /// Lowest accepted bonus-inclusive cost.
    pub min_cost: u32,
    /// Highest accepted bonus-inclusive cost.
    pub max_cost: u32,
    pub roster_size: usize,
    pub mode: Mode,
    pub heuristics: Heuristics,
    /// Reject lineups holding a player projected for zero points.
    pub require_points: bool,
}

impl RuleConfig {
    pub const DEFAULT_MIN_COST: u32 = 35_000;
    pub const DEFAULT_MAX_COST: u32 = 50_000;

    /// Default rules for `mode`.
    #[must_use]
    pub fn for_mode(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Check the rule set is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when `max_cost < min_cost` or the
    /// roster size is anything other than six.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_cost < self.min_cost {
            return Err(ConfigError::InvalidValue {
                field: "max_cost",
                reason: format!(
                    "must be >= min_cost ({}), got {}",
                    self.min_cost, self.max_cost
                ),
            });
        }
        if self.roster_size != ROSTER_SIZE {
            return Err(ConfigError::InvalidValue {
                field: "roster_size",
                reason: format!("showdown rosters hold {ROSTER_SIZE} players, got {}", self.roster_size),
            });
        }
        Ok(())
    }
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            limits: PositionLimits::default(),
            min_cost: Self::DEFAULT_MIN_COST,
            max_cost: Self::DEFAULT_MAX_COST,
            roster_size: ROSTER_SIZE,
            mode: Mode::default(),
            heuristics: Heuristics::default(),
            require_points: false,
        }
    }
}
