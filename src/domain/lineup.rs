//! Lineups, canonical flex keys and the captain bonus.

use std::cmp::Ordering;

use rust_decimal::Decimal;

use super::error::DomainError;
use super::player::PlayerId;

/// Players in a showdown lineup.
pub const ROSTER_SIZE: usize = 6;

/// Non-captain slots.
pub const FLEX_SLOTS: usize = ROSTER_SIZE - 1;

/// Captain multiplier applied to projected points.
pub const CAPTAIN_MULTIPLIER: f64 = 1.5;

/// Captain multiplier applied to salary, kept exact.
#[must_use]
pub fn captain_salary_multiplier() -> Decimal {
    Decimal::new(15, 1)
}

/// Whether the captain multiplier applies to a cost or points total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Bonus {
    /// Slot 0 counts 1.5×.
    #[default]
    Captain,
    /// All six slots count once.
    Flat,
}

impl Bonus {
    /// Salary contribution of the captain slot.
    #[must_use]
    pub fn captain_salary(self, salary: u32) -> Decimal {
        match self {
            Bonus::Captain => Decimal::from(salary) * captain_salary_multiplier(),
            Bonus::Flat => Decimal::from(salary),
        }
    }

    /// Points contribution of the captain slot.
    #[must_use]
    pub fn captain_points(self, points: f64) -> f64 {
        match self {
            Bonus::Captain => points * CAPTAIN_MULTIPLIER,
            Bonus::Flat => points,
        }
    }
}

/// The five flex slots in canonical order.
///
/// Canonical order is ascending [`PlayerId`], which the pool assigns in
/// salary-descending order. Two enumerations that reach the same flex set
/// by different paths therefore produce the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlexKey([PlayerId; FLEX_SLOTS]);

impl FlexKey {
    /// Canonicalize five flex players.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidLineup`] if a player repeats.
    pub fn new(mut ids: [PlayerId; FLEX_SLOTS]) -> Result<Self, DomainError> {
        ids.sort_unstable();
        if ids.windows(2).any(|pair| pair[0] == pair[1]) {
            return Err(DomainError::InvalidLineup {
                reason: "flex slots repeat a player".to_string(),
            });
        }
        Ok(Self(ids))
    }

    /// Players in canonical order.
    #[must_use]
    pub fn ids(&self) -> &[PlayerId; FLEX_SLOTS] {
        &self.0
    }

    #[must_use]
    pub fn contains(&self, id: PlayerId) -> bool {
        self.0.binary_search(&id).is_ok()
    }
}

/// Six distinct players: slot 0 is the captain, slots 1–5 are flex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Lineup {
    slots: [PlayerId; ROSTER_SIZE],
}

impl Lineup {
    /// Combine a captain with a canonical flex set.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidLineup`] if the captain also sits in a
    /// flex slot.
    pub fn new(captain: PlayerId, flex: FlexKey) -> Result<Self, DomainError> {
        if flex.contains(captain) {
            return Err(DomainError::InvalidLineup {
                reason: "captain also appears in a flex slot".to_string(),
            });
        }
        let [f1, f2, f3, f4, f5] = flex.0;
        Ok(Self {
            slots: [captain, f1, f2, f3, f4, f5],
        })
    }

    #[must_use]
    pub fn captain(&self) -> PlayerId {
        self.slots[0]
    }

    /// The flex slots as a cache key.
    #[must_use]
    pub fn flex(&self) -> FlexKey {
        let [_, f1, f2, f3, f4, f5] = self.slots;
        FlexKey([f1, f2, f3, f4, f5])
    }

    /// All six slots, captain first.
    #[must_use]
    pub fn slots(&self) -> &[PlayerId; ROSTER_SIZE] {
        &self.slots
    }

    #[must_use]
    pub fn contains(&self, id: PlayerId) -> bool {
        self.slots.contains(&id)
    }
}

/// A lineup that passed every check, with its totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineupResult {
    pub lineup: Lineup,
    /// Bonus-inclusive salary.
    pub cost: Decimal,
    /// Bonus-inclusive projected points.
    pub points: f64,
}

impl LineupResult {
    /// Ranking order: more points first, then canonical lineup order.
    ///
    /// `Ordering::Less` means `self` ranks ahead of `other`.
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        other
            .points
            .total_cmp(&self.points)
            .then_with(|| self.lineup.cmp(&other.lineup))
    }
}
