//! Lineup rule engine.
//!
//! The [`Checker`] answers cost, points and validity questions about a
//! single [`Lineup`]. Every answer is a pure function of its arguments and is
//! memoized in a run-scoped [`CheckCache`].

mod cache;
mod roster;

pub use cache::{CacheStats, CheckCache, CheckKind, Composition, TeamShare};
pub use roster::{
    CoreCounts, FiveOneSpecialTeams, LoneReceiver, RosterRule, RuleSet, TeamCaps, TightEndStack,
};

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::{Bonus, Field, Lineup, LineupResult, PlayerPool, RuleConfig};

/// Memoized predicates and totals over lineups drawn from one pool.
pub struct Checker {
    pool: Arc<PlayerPool>,
    rules: RuleConfig,
    roster: RuleSet,
    cache: Arc<CheckCache>,
    scope: u64,
}

impl Checker {
    /// Create a checker with a fresh cache.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `rules` fails validation.
    pub fn new(pool: Arc<PlayerPool>, rules: RuleConfig) -> crate::error::Result<Self> {
        Self::with_cache(pool, rules, Arc::new(CheckCache::new()))
    }

    /// Create a checker that memoizes into `cache`.
    ///
    /// Totals and flex compositions are shared with every other checker on
    /// the same cache. Verdicts are kept apart per checker, since they depend
    /// on the rules.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `rules` fails validation.
    pub fn with_cache(
        pool: Arc<PlayerPool>,
        rules: RuleConfig,
        cache: Arc<CheckCache>,
    ) -> crate::error::Result<Self> {
        rules.validate()?;
        let roster = RuleSet::from_config(&rules);
        let scope = cache.next_scope();
        Ok(Self {
            pool,
            rules,
            roster,
            cache,
            scope,
        })
    }

    /// Replace the position rules. Verdicts stored under the old rules are
    /// no longer visible to this checker.
    #[must_use]
    pub fn with_roster(mut self, roster: RuleSet) -> Self {
        self.roster = roster;
        self.scope = self.cache.next_scope();
        self
    }

    #[must_use]
    pub fn pool(&self) -> &Arc<PlayerPool> {
        &self.pool
    }

    #[must_use]
    pub fn rules(&self) -> &RuleConfig {
        &self.rules
    }

    #[must_use]
    pub fn roster(&self) -> &RuleSet {
        &self.roster
    }

    #[must_use]
    pub fn cache(&self) -> &Arc<CheckCache> {
        &self.cache
    }

    /// Total salary. With [`Bonus::Captain`] slot 0 counts 1.5×.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownPlayer`] if the lineup names an id
    /// outside the pool.
    pub fn cost(&self, lineup: &Lineup, bonus: Bonus) -> Result<Decimal, DomainError> {
        self.cache.cost((*lineup, bonus), || self.compute_cost(lineup, bonus))
    }

    /// Total projected points. With [`Bonus::Captain`] slot 0 counts 1.5×.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownPlayer`] for a foreign id.
    pub fn points(&self, lineup: &Lineup, bonus: Bonus) -> Result<f64, DomainError> {
        self.cache
            .points((*lineup, bonus), || self.compute_points(lineup, bonus))
    }

    /// Unweighted sum of a numeric field over all six players.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::NonNumericField`] for a text field and
    /// [`DomainError::UnknownPlayer`] for a foreign id.
    pub fn sum_field(&self, lineup: &Lineup, field: Field) -> Result<f64, DomainError> {
        if !field.is_numeric() {
            return Err(DomainError::NonNumericField {
                field: field.to_string(),
            });
        }
        self.cache.sum((*lineup, field), || {
            lineup.slots().iter().try_fold(0.0, |total, id| {
                let value = self.pool.player(*id)?.field(field).as_f64();
                value
                    .map(|value| total + value)
                    .ok_or_else(|| DomainError::NonNumericField {
                        field: field.to_string(),
                    })
            })
        })
    }

    /// At least two distinct teams.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownPlayer`] for a foreign id.
    pub fn team_check(&self, lineup: &Lineup) -> Result<bool, DomainError> {
        self.cache
            .verdict(self.scope, (*lineup, CheckKind::Team), || self.evaluate_team(lineup))
    }

    /// Bonus-inclusive cost within `[min_cost, max_cost]`.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownPlayer`] for a foreign id.
    pub fn salary_check(&self, lineup: &Lineup) -> Result<bool, DomainError> {
        self.cache.verdict(self.scope, (*lineup, CheckKind::Salary), || {
            self.evaluate_salary(lineup)
        })
    }

    /// No player projected for zero points.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownPlayer`] for a foreign id.
    pub fn points_check(&self, lineup: &Lineup) -> Result<bool, DomainError> {
        self.cache.verdict(self.scope, (*lineup, CheckKind::Points), || {
            self.evaluate_points(lineup)
        })
    }

    /// Every registered roster rule allows the lineup's composition.
    ///
    /// This answers the question regardless of mode; [`Checker::check`]
    /// decides whether it counts.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownPlayer`] for a foreign id.
    pub fn position_check(&self, lineup: &Lineup) -> Result<bool, DomainError> {
        self.cache.verdict(self.scope, (*lineup, CheckKind::Position), || {
            self.evaluate_position(lineup)
        })
    }

    /// Aggregate validity under the configured rules.
    ///
    /// Runs team, salary, then (if enabled) points, then (outside backtest
    /// mode) position checks, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownPlayer`] for a foreign id.
    pub fn check(&self, lineup: &Lineup) -> Result<bool, DomainError> {
        self.cache.verdict(self.scope, (*lineup, CheckKind::All), || {
            if !self.evaluate_team(lineup)? || !self.evaluate_salary(lineup)? {
                return Ok(false);
            }
            if self.rules.require_points && !self.evaluate_points(lineup)? {
                return Ok(false);
            }
            if self.rules.mode.checks_positions() {
                return self.evaluate_position(lineup);
            }
            Ok(true)
        })
    }

    /// Same verdict as [`Checker::check`], returning the ranked totals of a
    /// passing lineup.
    ///
    /// Used by the search, which visits each lineup once: only the flex
    /// composition tier is memoized on this path.
    pub(crate) fn screen(&self, lineup: &Lineup) -> Result<Option<LineupResult>, DomainError> {
        if !self.evaluate_team(lineup)? {
            return Ok(None);
        }
        let cost = self.compute_cost(lineup, Bonus::Captain)?;
        if !self.in_band(cost) {
            return Ok(None);
        }
        if self.rules.require_points && !self.evaluate_points(lineup)? {
            return Ok(None);
        }
        if self.rules.mode.checks_positions() && !self.evaluate_position(lineup)? {
            return Ok(None);
        }
        Ok(Some(LineupResult {
            lineup: *lineup,
            cost,
            points: self.compute_points(lineup, Bonus::Captain)?,
        }))
    }

    /// Every verdict and total for one lineup, without short-circuiting.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownPlayer`] for a foreign id.
    pub fn report(&self, lineup: &Lineup) -> Result<CheckReport, DomainError> {
        let composition = self.composition(lineup)?;
        Ok(CheckReport {
            team: self.team_check(lineup)?,
            salary: self.salary_check(lineup)?,
            points: self.points_check(lineup)?,
            position: self.position_check(lineup)?,
            points_enforced: self.rules.require_points,
            positions_enforced: self.rules.mode.checks_positions(),
            violations: self.roster.violations(&composition),
            cost: self.cost(lineup, Bonus::Captain)?,
            fpts: self.points(lineup, Bonus::Captain)?,
            valid: self.check(lineup)?,
        })
    }

    fn compute_cost(&self, lineup: &Lineup, bonus: Bonus) -> Result<Decimal, DomainError> {
        let captain = self.pool.player(lineup.captain())?;
        let flex = self.flex_composition(lineup)?;
        Ok(bonus.captain_salary(captain.salary) + Decimal::from(flex.salary()))
    }

    fn compute_points(&self, lineup: &Lineup, bonus: Bonus) -> Result<f64, DomainError> {
        let captain = self.pool.player(lineup.captain())?;
        let flex = self.flex_composition(lineup)?;
        Ok(bonus.captain_points(captain.fpts) + flex.points())
    }

    fn evaluate_team(&self, lineup: &Lineup) -> Result<bool, DomainError> {
        let flex = self.flex_composition(lineup)?;
        if flex.team_count() >= 2 {
            return Ok(true);
        }
        let captain_team = self.pool.team_id(lineup.captain())?;
        Ok(flex.teams().iter().any(|share| share.team() != captain_team))
    }

    fn evaluate_salary(&self, lineup: &Lineup) -> Result<bool, DomainError> {
        Ok(self.in_band(self.compute_cost(lineup, Bonus::Captain)?))
    }

    fn in_band(&self, cost: Decimal) -> bool {
        Decimal::from(self.rules.min_cost) <= cost && cost <= Decimal::from(self.rules.max_cost)
    }

    fn evaluate_points(&self, lineup: &Lineup) -> Result<bool, DomainError> {
        let captain = self.pool.player(lineup.captain())?;
        let flex = self.flex_composition(lineup)?;
        Ok(captain.fpts != 0.0 && !flex.has_zero_points())
    }

    fn evaluate_position(&self, lineup: &Lineup) -> Result<bool, DomainError> {
        Ok(self.roster.allows(&self.composition(lineup)?))
    }

    /// Composition of all six players.
    fn composition(&self, lineup: &Lineup) -> Result<Composition, DomainError> {
        let captain = lineup.captain();
        let flex = self.flex_composition(lineup)?;
        Ok(flex.with(self.pool.team_id(captain)?, self.pool.player(captain)?))
    }

    fn flex_composition(&self, lineup: &Lineup) -> Result<Arc<Composition>, DomainError> {
        let key = lineup.flex();
        self.cache
            .flex(key, || Composition::of(&self.pool, key.ids()))
    }
}

/// Full verdict breakdown for one lineup.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub team: bool,
    pub salary: bool,
    pub points: bool,
    pub position: bool,
    /// Whether `points` counts toward `valid`.
    pub points_enforced: bool,
    /// Whether `position` counts toward `valid`.
    pub positions_enforced: bool,
    /// Roster rules the lineup breaks.
    pub violations: Vec<&'static str>,
    /// Bonus-inclusive salary.
    pub cost: Decimal,
    /// Bonus-inclusive projected points.
    pub fpts: f64,
    pub valid: bool,
}
