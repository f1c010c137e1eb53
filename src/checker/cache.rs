//! Run-scoped memoization for checker results.
//!
//! Two tiers are kept:
//!
//! - **flex compositions**, keyed by canonical [`FlexKey`]. The engine reaches
//!   every flex set once per eligible captain, so this tier is where reuse
//!   happens.
//! - **lineup results** (costs, points, field sums, verdicts), keyed by the
//!   exact argument tuple of the checker call.
//!
//! Totals and compositions depend only on the pool, so every checker sharing
//! a cache reads them. Verdicts depend on the rules as well and carry the
//! scope of the checker that computed them.
//!
//! Both tiers are concurrent maps shared by all search workers. Each tier is
//! bounded by `max_entries`; when a tier overflows it is cleared, which only
//! costs recomputation since every entry is a pure function of its key.

use std::hash::Hash;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::error::DomainError;
use crate::domain::{Bonus, Field, FlexKey, Lineup, Player, PlayerId, PlayerPool, Position, TeamId};

/// Identifies one memoized predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    Team,
    Salary,
    Points,
    Position,
    All,
}

/// Positions one team contributes to a player set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamShare {
    team: TeamId,
    positions: [u8; Position::COUNT],
}

impl TeamShare {
    #[must_use]
    pub fn team(&self) -> TeamId {
        self.team
    }

    /// Slots filled by this team.
    #[must_use]
    pub fn total(&self) -> u8 {
        self.positions.iter().sum()
    }

    #[must_use]
    pub fn count(&self, position: Position) -> u8 {
        self.positions[position.index()]
    }

    #[must_use]
    pub fn has(&self, position: Position) -> bool {
        self.count(position) > 0
    }
}

/// Aggregate of a set of players: salary, points and roster shape.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Composition {
    salary: u64,
    points: f64,
    zero_points: bool,
    positions: [u8; Position::COUNT],
    teams: Vec<TeamShare>,
}

impl Composition {
    /// Fold the given players in order.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownPlayer`] for an id outside `pool`.
    pub fn of(pool: &PlayerPool, ids: &[PlayerId]) -> Result<Self, DomainError> {
        ids.iter().try_fold(Self::default(), |mut acc, id| {
            acc.push(pool.team_id(*id)?, pool.player(*id)?);
            Ok(acc)
        })
    }

    /// A copy of this composition with one more player.
    #[must_use]
    pub fn with(&self, team: TeamId, player: &Player) -> Self {
        let mut next = self.clone();
        next.push(team, player);
        next
    }

    fn push(&mut self, team: TeamId, player: &Player) {
        self.salary += u64::from(player.salary);
        self.points += player.fpts;
        self.zero_points |= player.fpts == 0.0;
        self.positions[player.position.index()] += 1;

        let slot = player.position.index();
        match self.teams.binary_search_by_key(&team, |share| share.team) {
            Ok(found) => self.teams[found].positions[slot] += 1,
            Err(insert_at) => {
                let mut positions = [0; Position::COUNT];
                positions[slot] = 1;
                self.teams.insert(insert_at, TeamShare { team, positions });
            }
        }
    }

    /// Summed salary, no multiplier.
    #[must_use]
    pub fn salary(&self) -> u64 {
        self.salary
    }

    /// Summed projected points, no multiplier.
    #[must_use]
    pub fn points(&self) -> f64 {
        self.points
    }

    #[must_use]
    pub fn has_zero_points(&self) -> bool {
        self.zero_points
    }

    /// Players at `position` across all teams.
    #[must_use]
    pub fn count(&self, position: Position) -> u8 {
        self.positions[position.index()]
    }

    /// Number of players in the set.
    #[must_use]
    pub fn size(&self) -> u8 {
        self.positions.iter().sum()
    }

    /// Per-team shares, ordered by team id.
    #[must_use]
    pub fn teams(&self) -> &[TeamShare] {
        &self.teams
    }

    #[must_use]
    pub fn team_count(&self) -> usize {
        self.teams.len()
    }
}

/// Counters describing cache effectiveness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub flex_entries: usize,
    pub lineup_entries: usize,
    pub evictions: u64,
}

impl CacheStats {
    /// Fraction of lookups answered from the cache.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Concurrent memo tables for one checker run.
pub struct CheckCache {
    flex: DashMap<FlexKey, Arc<Composition>>,
    costs: DashMap<(Lineup, Bonus), Decimal>,
    points: DashMap<(Lineup, Bonus), f64>,
    sums: DashMap<(Lineup, Field), f64>,
    verdicts: DashMap<(u64, Lineup, CheckKind), bool>,
    next_scope: AtomicU64,
    flex_entries: AtomicUsize,
    lineup_entries: AtomicUsize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    max_entries: usize,
}

impl CheckCache {
    pub const DEFAULT_MAX_ENTRIES: usize = 2_000_000;

    #[must_use]
    pub fn new() -> Self {
        Self::with_max_entries(Self::DEFAULT_MAX_ENTRIES)
    }

    /// Create a cache whose tiers each hold at most `max_entries` entries.
    #[must_use]
    pub fn with_max_entries(max_entries: usize) -> Self {
        Self {
            flex: DashMap::new(),
            costs: DashMap::new(),
            points: DashMap::new(),
            sums: DashMap::new(),
            verdicts: DashMap::new(),
            next_scope: AtomicU64::new(0),
            flex_entries: AtomicUsize::new(0),
            lineup_entries: AtomicUsize::new(0),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            max_entries: max_entries.max(1),
        }
    }

    #[must_use]
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// A verdict scope not handed out before by this cache.
    pub(crate) fn next_scope(&self) -> u64 {
        self.next_scope.fetch_add(1, Ordering::Relaxed)
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&self) {
        self.flex.clear();
        self.clear_lineups();
        self.flex_entries.store(0, Ordering::Relaxed);
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
    }

    fn clear_lineups(&self) {
        self.costs.clear();
        self.points.clear();
        self.sums.clear();
        self.verdicts.clear();
        self.lineup_entries.store(0, Ordering::Relaxed);
    }

    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            flex_entries: self.flex_entries.load(Ordering::Relaxed),
            lineup_entries: self.lineup_entries.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn flex(
        &self,
        key: FlexKey,
        compute: impl FnOnce() -> Result<Composition, DomainError>,
    ) -> Result<Arc<Composition>, DomainError> {
        if let Some(hit) = self.flex.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(hit.value()));
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = Arc::new(compute()?);
        if self.flex_entries.fetch_add(1, Ordering::Relaxed) >= self.max_entries {
            self.flex.clear();
            self.flex_entries.store(1, Ordering::Relaxed);
            self.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(max_entries = self.max_entries, "flex composition cache evicted");
        }
        self.flex.insert(key, Arc::clone(&value));
        Ok(value)
    }

    pub(crate) fn cost(
        &self,
        key: (Lineup, Bonus),
        compute: impl FnOnce() -> Result<Decimal, DomainError>,
    ) -> Result<Decimal, DomainError> {
        self.memoize(&self.costs, key, compute)
    }

    pub(crate) fn points(
        &self,
        key: (Lineup, Bonus),
        compute: impl FnOnce() -> Result<f64, DomainError>,
    ) -> Result<f64, DomainError> {
        self.memoize(&self.points, key, compute)
    }

    pub(crate) fn sum(
        &self,
        key: (Lineup, Field),
        compute: impl FnOnce() -> Result<f64, DomainError>,
    ) -> Result<f64, DomainError> {
        self.memoize(&self.sums, key, compute)
    }

    pub(crate) fn verdict(
        &self,
        scope: u64,
        (lineup, kind): (Lineup, CheckKind),
        compute: impl FnOnce() -> Result<bool, DomainError>,
    ) -> Result<bool, DomainError> {
        self.memoize(&self.verdicts, (scope, lineup, kind), compute)
    }

    fn memoize<K, V>(
        &self,
        map: &DashMap<K, V>,
        key: K,
        compute: impl FnOnce() -> Result<V, DomainError>,
    ) -> Result<V, DomainError>
    where
        K: Eq + Hash,
        V: Copy,
    {
        if let Some(hit) = map.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(*hit.value());
        }
        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = compute()?;
        if self.lineup_entries.fetch_add(1, Ordering::Relaxed) >= self.max_entries {
            self.clear_lineups();
            self.lineup_entries.store(1, Ordering::Relaxed);
            self.evictions.fetch_add(1, Ordering::Relaxed);
            debug!(max_entries = self.max_entries, "lineup result cache evicted");
        }
        map.insert(key, value);
        Ok(value)
    }
}

impl Default for CheckCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> PlayerPool {
        PlayerPool::new(vec![
            Player::new("A", "X", Position::Qb, 10_000, 20.0),
            Player::new("B", "X", Position::Wr, 8_000, 15.0),
            Player::new("C", "Y", Position::Rb, 7_000, 12.0),
            Player::new("D", "Y", Position::Wr, 6_000, 10.0),
            Player::new("E", "Y", Position::Te, 5_000, 8.0),
            Player::new("F", "X", Position::Dst, 4_000, 9.0),
        ])
        .unwrap()
    }

    fn flex_key(pool: &PlayerPool) -> FlexKey {
        let ids: Vec<PlayerId> = pool.ids().skip(1).collect();
        FlexKey::new([ids[0], ids[1], ids[2], ids[3], ids[4]]).unwrap()
    }

    #[test]
    fn test_composition_counts_positions_per_team() {
        let pool = pool();
        let ids: Vec<PlayerId> = pool.ids().collect();
        let composition = Composition::of(&pool, &ids).unwrap();

        assert_eq!(composition.size(), 6);
        assert_eq!(composition.salary(), 40_000);
        assert_eq!(composition.team_count(), 2);
        assert_eq!(composition.count(Position::Wr), 2);

        let x = pool.team_id(pool.id_of("A").unwrap()).unwrap();
        let share = composition
            .teams()
            .iter()
            .find(|share| share.team() == x)
            .unwrap();
        assert_eq!(share.total(), 3);
        assert!(share.has(Position::Qb));
        assert!(share.has(Position::Dst));
        assert!(!share.has(Position::Te));
    }

    #[test]
    fn test_with_extends_without_mutating() {
        let pool = pool();
        let flex: Vec<PlayerId> = pool.ids().skip(1).collect();
        let base = Composition::of(&pool, &flex).unwrap();
        let captain = pool.id_of("A").unwrap();
        let full = base.with(pool.team_id(captain).unwrap(), pool.player(captain).unwrap());

        assert_eq!(base.size(), 5);
        assert_eq!(full.size(), 6);
        assert_eq!(full.salary(), base.salary() + 10_000);
    }

    #[test]
    fn test_flex_tier_computes_once() {
        let pool = pool();
        let cache = CheckCache::new();
        let key = flex_key(&pool);
        let mut calls = 0;

        for _ in 0..3 {
            cache
                .flex(key, || {
                    calls += 1;
                    Composition::of(&pool, key.ids())
                })
                .unwrap();
        }

        assert_eq!(calls, 1);
        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.flex_entries, 1);
    }

    #[test]
    fn test_errors_are_not_cached() {
        let pool = pool();
        let cache = CheckCache::new();
        let lineup = Lineup::new(pool.id_of("A").unwrap(), flex_key(&pool)).unwrap();

        let failed = cache.verdict(0, (lineup, CheckKind::Team), || {
            Err(DomainError::UnknownField {
                field: "x".to_string(),
            })
        });
        assert!(failed.is_err());

        let ok = cache.verdict(0, (lineup, CheckKind::Team), || Ok(true));
        assert!(ok.unwrap());
        assert_eq!(cache.stats().lineup_entries, 1);
    }

    #[test]
    fn test_overflow_evicts_and_keeps_answering() {
        let pool = pool();
        let cache = CheckCache::with_max_entries(1);
        let captain = pool.id_of("A").unwrap();
        let lineup = Lineup::new(captain, flex_key(&pool)).unwrap();

        assert!(cache.verdict(0, (lineup, CheckKind::Team), || Ok(true)).unwrap());
        assert!(!cache.verdict(0, (lineup, CheckKind::Salary), || Ok(false)).unwrap());
        assert!(cache.stats().evictions >= 1);
        assert!(cache.verdict(0, (lineup, CheckKind::Team), || Ok(true)).unwrap());
    }

    #[test]
    fn test_verdicts_are_kept_apart_per_scope() {
        let pool = pool();
        let cache = CheckCache::new();
        let lineup = Lineup::new(pool.id_of("A").unwrap(), flex_key(&pool)).unwrap();
        let (first, second) = (cache.next_scope(), cache.next_scope());

        assert_ne!(first, second);
        assert!(cache.verdict(first, (lineup, CheckKind::All), || Ok(true)).unwrap());
        assert!(!cache.verdict(second, (lineup, CheckKind::All), || Ok(false)).unwrap());
        assert!(cache.verdict(first, (lineup, CheckKind::All), || Ok(false)).unwrap());
        assert_eq!(cache.stats().lineup_entries, 2);
    }

    #[test]
    fn test_clear_resets_everything() {
        let pool = pool();
        let cache = CheckCache::new();
        let key = flex_key(&pool);
        cache.flex(key, || Composition::of(&pool, key.ids())).unwrap();

        cache.clear();

        assert_eq!(cache.stats(), CacheStats::default());
    }

    #[test]
    fn test_hit_rate() {
        let stats = CacheStats {
            hits: 3,
            misses: 1,
            ..CacheStats::default()
        };
        assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
        assert_eq!(CacheStats::default().hit_rate(), 0.0);
    }
}
