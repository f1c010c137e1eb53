//! `[rules]` section: contest rules and captain exclusions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Heuristics, Mode, PositionLimits, RuleConfig, ROSTER_SIZE};
use crate::error::ConfigError;

/// Raw roster rules as written in the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RulesConfig {
    /// `backtest` (alias `past`) or `forward` (alias `live`).
    #[serde(default)]
    pub mode: Mode,
    #[serde(default = "default_min_cost")]
    pub min_cost: i64,
    #[serde(default = "default_max_cost")]
    pub max_cost: i64,
    #[serde(default = "default_roster_size")]
    pub roster_size: usize,
    /// Per-team cap by position label, e.g. `RB = 1`. Entries replace the
    /// matching default cap; unnamed positions keep theirs.
    #[serde(default = "default_position_limits")]
    pub position_limits: BTreeMap<String, i64>,
    #[serde(default)]
    pub heuristics: Heuristics,
    /// Add the zero-projection check to the aggregate check.
    #[serde(default)]
    pub require_points: bool,
    /// Players never allowed at captain in forward mode.
    #[serde(default)]
    pub excluded_captains: Vec<String>,
}

fn default_min_cost() -> i64 {
    i64::from(RuleConfig::DEFAULT_MIN_COST)
}

fn default_max_cost() -> i64 {
    i64::from(RuleConfig::DEFAULT_MAX_COST)
}

const fn default_roster_size() -> usize {
    ROSTER_SIZE
}

fn default_position_limits() -> BTreeMap<String, i64> {
    PositionLimits::default()
        .iter()
        .map(|(position, cap)| (position.to_string(), i64::from(cap)))
        .collect()
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            min_cost: default_min_cost(),
            max_cost: default_max_cost(),
            roster_size: default_roster_size(),
            position_limits: default_position_limits(),
            heuristics: Heuristics::default(),
            require_points: false,
            excluded_captains: Vec::new(),
        }
    }
}

impl RulesConfig {
    /// Resolve into the typed rule set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a negative cost, bad
    /// position limits, an inverted cost band or a roster size other than
    /// six.
    pub fn resolve(&self) -> Result<RuleConfig, ConfigError> {
        let rules = RuleConfig {
            limits: PositionLimits::default().overlay(
                self.position_limits
                    .iter()
                    .map(|(label, cap)| (label.as_str(), *cap)),
            )?,
            min_cost: cost("min_cost", self.min_cost)?,
            max_cost: cost("max_cost", self.max_cost)?,
            roster_size: self.roster_size,
            mode: self.mode,
            heuristics: self.heuristics,
            require_points: self.require_points,
        };
        rules.validate()?;
        Ok(rules)
    }
}

fn cost(field: &'static str, value: i64) -> Result<u32, ConfigError> {
    u32::try_from(value).map_err(|_| ConfigError::InvalidValue {
        field,
        reason: format!("must be between 0 and {}, got {value}", u32::MAX),
    })
}
