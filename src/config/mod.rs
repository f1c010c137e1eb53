//! Configuration loading and validation.
//!
//! A TOML file with four optional sections:
//!
//! ```toml
//! [logging]
//! level = "info"
//! format = "pretty"
//!
//! [rules]
//! mode = "forward"
//! min_cost = 35000
//! max_cost = 50000
//! excluded_captains = ["Josh Allen"]
//!
//! [search]
//! top_n = 10
//!
//! [cache]
//! max_entries = 2000000
//! ```
//!
//! Every field has a default, so an empty file is a valid configuration.

mod logging;
mod rules;
mod search;

pub use logging::LoggingConfig;
pub use rules::RulesConfig;
pub use search::{CacheConfig, SearchConfig};

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::checker::CheckCache;
use crate::domain::RuleConfig;
use crate::engine::SearchOptions;
use crate::error::{ConfigError, Result};

/// Main application configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    /// Parse and validate configuration from TOML content.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is malformed, or
    /// validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Check every value is in range and the rules resolve.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        self.rules.resolve()?;
        self.search_options().validate()?;
        if self.search.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "timeout_secs",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        if self.cache.max_entries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "max_entries",
                reason: "must be greater than 0".to_string(),
            }
            .into());
        }
        match self.logging.format.as_str() {
            "pretty" | "json" => Ok(()),
            other => Err(ConfigError::InvalidValue {
                field: "format",
                reason: format!("expected pretty or json, got {other}"),
            }
            .into()),
        }
    }

    /// Typed rule set for the checker.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] if the rules do not resolve.
    pub fn rule_config(&self) -> Result<RuleConfig> {
        Ok(self.rules.resolve()?)
    }

    /// Engine options from `[search]` and `rules.excluded_captains`.
    #[must_use]
    pub fn search_options(&self) -> SearchOptions {
        SearchOptions {
            top_n: self.search.top_n,
            threads: self.search.threads,
            timeout: self.search.timeout_secs.map(Duration::from_secs),
            excluded_captains: self.rules.excluded_captains.clone(),
        }
    }

    /// Empty checker cache sized by `[cache]`.
    #[must_use]
    pub fn check_cache(&self) -> CheckCache {
        CheckCache::with_max_entries(self.cache.max_entries)
    }

    /// Initialize logging based on configuration.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}
