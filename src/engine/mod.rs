//! Exhaustive lineup search.
//!
//! For every eligible captain the engine enumerates each five-player flex
//! set from the rest of the pool, validates the lineup through the
//! [`Checker`], and keeps the best `top_n` by bonus-inclusive points.
//!
//! Captains are independent, so they are spread over a `rayon` pool. Workers
//! share the checker's cache and merge their local selections into one
//! [`TopN`]. Because ranking is a total order the output does not depend on
//! thread count or scheduling.

mod combinations;
mod control;
mod ranking;

pub use combinations::{binomial, Combinations};
pub use control::{CancelToken, SearchControl, StopReason};
pub use ranking::{RankedLineup, TopN};

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::checker::{CacheStats, Checker};
use crate::domain::error::DomainError;
use crate::domain::{
    FlexKey, Lineup, LineupResult, PlayerId, PlayerPool, RuleConfig, FLEX_SLOTS, ROSTER_SIZE,
};
use crate::error::{ConfigError, Result, SearchError};

/// Run parameters that are not roster rules.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    /// Lineups to keep.
    pub top_n: usize,
    /// Worker threads.
    pub threads: usize,
    /// Stop after this long and return what was found.
    pub timeout: Option<Duration>,
    /// Captains to skip in forward mode.
    pub excluded_captains: Vec<String>,
}

impl SearchOptions {
    pub const DEFAULT_TOP_N: usize = 10;

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for a zero `top_n` or `threads`.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.top_n == 0 {
            return Err(ConfigError::InvalidValue {
                field: "top_n",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.threads == 0 {
            return Err(ConfigError::InvalidValue {
                field: "threads",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            top_n: Self::DEFAULT_TOP_N,
            threads: num_cpus::get(),
            timeout: None,
            excluded_captains: Vec::new(),
        }
    }
}

/// Receives progress as captains finish.
pub trait SearchObserver: Sync {
    /// Called once before the first captain with the number of captains.
    fn started(&self, _captains: usize) {}

    /// Called after each captain's subtree is exhausted.
    fn captain_done(&self) {}

    /// Called once when the search returns.
    fn finished(&self) {}
}

/// Observer that ignores everything.
pub struct Silent;

impl SearchObserver for Silent {}

/// Counters from one search.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SearchStats {
    /// Eligible captains.
    pub captains: usize,
    /// Captains not visited because the search stopped early.
    pub skipped: usize,
    /// Lineups checked.
    pub candidates: u64,
    /// Lineups that passed every check.
    pub valid: u64,
    pub cache: CacheStats,
    pub elapsed: Duration,
}

/// Result of one search.
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// Best lineups, best first.
    pub lineups: Vec<LineupResult>,
    pub stats: SearchStats,
    /// Set when the search stopped before visiting every captain.
    pub stopped: Option<StopReason>,
}

impl Generation {
    /// Whether every captain was searched.
    #[must_use]
    pub fn completed(&self) -> bool {
        self.stopped.is_none()
    }
}

/// Search driver bound to one pool and rule set.
pub struct Engine {
    pool: Arc<PlayerPool>,
    checker: Checker,
    bad_captains: BTreeSet<PlayerId>,
    options: SearchOptions,
}

impl Engine {
    /// Build an engine with a fresh checker.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid rules or options, and
    /// [`DomainError::UnknownPlayer`] for an excluded captain that was never
    /// in the player table.
    pub fn new(pool: Arc<PlayerPool>, rules: RuleConfig, options: SearchOptions) -> Result<Self> {
        let checker = Checker::new(pool, rules)?;
        Self::with_checker(checker, options)
    }

    /// Build an engine around an existing checker.
    ///
    /// # Errors
    ///
    /// Same as [`Engine::new`].
    pub fn with_checker(checker: Checker, options: SearchOptions) -> Result<Self> {
        options.validate()?;
        let pool = Arc::clone(checker.pool());
        let bad_captains = bad_captains(&pool, checker.rules(), &options.excluded_captains)?;
        Ok(Self {
            pool,
            checker,
            bad_captains,
            options,
        })
    }

    #[must_use]
    pub fn pool(&self) -> &Arc<PlayerPool> {
        &self.pool
    }

    #[must_use]
    pub fn checker(&self) -> &Checker {
        &self.checker
    }

    #[must_use]
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Players barred from the captain slot.
    #[must_use]
    pub fn bad_captains(&self) -> &BTreeSet<PlayerId> {
        &self.bad_captains
    }

    /// Eligible captains in canonical order.
    #[must_use]
    pub fn captains(&self) -> Vec<PlayerId> {
        self.pool
            .ids()
            .filter(|id| !self.bad_captains.contains(id))
            .collect()
    }

    /// Lineups a complete search will check.
    #[must_use]
    pub fn search_space(&self) -> u64 {
        if self.pool.len() < ROSTER_SIZE {
            return 0;
        }
        let per_captain = binomial(self.pool.len() - 1, FLEX_SLOTS);
        per_captain.saturating_mul(self.captains().len() as u64)
    }

    /// Run a complete search.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker pool cannot start or a lookup fails.
    pub fn generate(&self) -> Result<Generation> {
        let mut control = SearchControl::new();
        if let Some(timeout) = self.options.timeout {
            control = control.with_timeout(timeout);
        }
        self.generate_with(&control, &Silent)
    }

    /// Run a search that polls `control` between captains and reports to
    /// `observer`.
    ///
    /// A stopped search still returns the best lineups among the captains
    /// it finished.
    ///
    /// # Errors
    ///
    /// Returns an error if the worker pool cannot start or a lookup fails.
    pub fn generate_with(
        &self,
        control: &SearchControl,
        observer: &dyn SearchObserver,
    ) -> Result<Generation> {
        let started = Instant::now();
        self.checker.cache().clear();

        let captains = if self.pool.len() < ROSTER_SIZE {
            Vec::new()
        } else {
            self.captains()
        };
        info!(
            pool = self.pool.len(),
            captains = captains.len(),
            bad_captains = self.bad_captains.len(),
            search_space = self.search_space(),
            mode = %self.checker.rules().mode,
            "search started"
        );
        observer.started(captains.len());

        let workers = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.threads)
            .build()
            .map_err(SearchError::from)?;

        let ids: Vec<PlayerId> = self.pool.ids().collect();
        let top = Mutex::new(TopN::new(self.options.top_n));
        let candidates = AtomicU64::new(0);
        let valid = AtomicU64::new(0);
        let skipped = AtomicUsize::new(0);

        workers.install(|| {
            captains
                .par_iter()
                .try_for_each(|&captain| -> std::result::Result<(), DomainError> {
                    if control.should_stop().is_some() {
                        skipped.fetch_add(1, Ordering::Relaxed);
                        return Ok(());
                    }
                    let subtree = self.search_captain(captain, &ids)?;
                    candidates.fetch_add(subtree.candidates, Ordering::Relaxed);
                    valid.fetch_add(subtree.valid, Ordering::Relaxed);
                    top.lock().merge(subtree.top);
                    observer.captain_done();
                    Ok(())
                })
        })?;
        observer.finished();

        let skipped = skipped.into_inner();
        let stopped = if skipped > 0 {
            control.should_stop()
        } else {
            None
        };
        let stats = SearchStats {
            captains: captains.len(),
            skipped,
            candidates: candidates.into_inner(),
            valid: valid.into_inner(),
            cache: self.checker.cache().stats(),
            elapsed: started.elapsed(),
        };

        if let Some(reason) = stopped {
            warn!(
                %reason,
                skipped = stats.skipped,
                captains = stats.captains,
                "search stopped early, returning partial results"
            );
        }
        info!(
            candidates = stats.candidates,
            valid = stats.valid,
            cache_hit_rate = stats.cache.hit_rate(),
            cache_evictions = stats.cache.evictions,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "search finished"
        );

        Ok(Generation {
            lineups: top.into_inner().into_sorted(),
            stats,
            stopped,
        })
    }

    fn search_captain(
        &self,
        captain: PlayerId,
        ids: &[PlayerId],
    ) -> std::result::Result<Subtree, DomainError> {
        let rest: Vec<PlayerId> = ids.iter().copied().filter(|id| *id != captain).collect();
        let mut subtree = Subtree {
            top: TopN::new(self.options.top_n),
            candidates: 0,
            valid: 0,
        };

        for flex in Combinations::<_, FLEX_SLOTS>::new(&rest) {
            let lineup = Lineup::new(captain, FlexKey::new(flex)?)?;
            subtree.candidates += 1;
            if let Some(result) = self.checker.screen(&lineup)? {
                subtree.valid += 1;
                subtree.top.push(result);
            }
        }

        debug!(
            captain = %captain,
            candidates = subtree.candidates,
            valid = subtree.valid,
            "captain searched"
        );
        Ok(subtree)
    }
}

struct Subtree {
    top: TopN,
    candidates: u64,
    valid: u64,
}

/// Captains barred under `rules.mode`.
///
/// Every exclusion is resolved first so that a misspelled name fails in any
/// mode. Names that were in the table but fell under the projection floor
/// are already out of the pool and are skipped.
fn bad_captains(
    pool: &PlayerPool,
    rules: &RuleConfig,
    excluded: &[String],
) -> std::result::Result<BTreeSet<PlayerId>, DomainError> {
    let mut resolved = BTreeSet::new();
    for name in excluded {
        if pool.is_below_floor(name) {
            debug!(player = %name, "excluded captain is below the projection floor");
            continue;
        }
        resolved.insert(pool.id_of(name)?);
    }

    let mut bad = BTreeSet::new();
    if rules.mode.honors_captain_exclusions() {
        bad.extend(resolved);
    }
    if rules.mode.bars_special_teams_captains() {
        bad.extend(
            pool.iter()
                .filter(|(_, player)| player.position.is_special_teams())
                .map(|(id, _)| id),
        );
    }
    Ok(bad)
}
