//! `[search]` and `[cache]` sections.

use serde::{Deserialize, Serialize};

use crate::checker::CheckCache;
use crate::engine::SearchOptions;

/// Search run settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Lineups to report.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Worker threads (default: logical CPUs).
    #[serde(default = "default_threads")]
    pub threads: usize,
    /// Give up after this many seconds and report what was found.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Draw a progress bar while searching.
    #[serde(default = "default_progress")]
    pub progress: bool,
}

const fn default_top_n() -> usize {
    SearchOptions::DEFAULT_TOP_N
}

fn default_threads() -> usize {
    num_cpus::get()
}

const fn default_progress() -> bool {
    true
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            threads: default_threads(),
            timeout_secs: None,
            progress: default_progress(),
        }
    }
}

/// Checker memoization limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entries per cache tier before it is cleared.
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
}

const fn default_max_entries() -> usize {
    CheckCache::DEFAULT_MAX_ENTRIES
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
        }
    }
}
