//! Bounded top-N selection and ranked output rows.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::error::DomainError;
use crate::domain::{LineupResult, PlayerPool, FLEX_SLOTS};

/// Heap entry ordered so the worst-ranked result sits at the top.
#[derive(Debug, Clone, Copy)]
struct Ranked(LineupResult);

impl PartialEq for Ranked {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Ranked {}

impl PartialOrd for Ranked {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Ranked {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.rank_cmp(&other.0)
    }
}

/// Keeps the best `capacity` results seen so far.
///
/// Ranking is a total order, so the retained set does not depend on the
/// order results arrive in.
#[derive(Debug, Clone)]
pub struct TopN {
    heap: BinaryHeap<Ranked>,
    capacity: usize,
}

impl TopN {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity.saturating_add(1)),
            capacity,
        }
    }

    pub fn push(&mut self, result: LineupResult) {
        if self.capacity == 0 {
            return;
        }
        if self.heap.len() < self.capacity {
            self.heap.push(Ranked(result));
            return;
        }
        if let Some(mut worst) = self.heap.peek_mut() {
            if result.rank_cmp(&worst.0) == Ordering::Less {
                *worst = Ranked(result);
            }
        }
    }

    /// Fold another selection into this one.
    pub fn merge(&mut self, other: TopN) {
        for Ranked(result) in other.heap {
            self.push(result);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Retained results, best first.
    #[must_use]
    pub fn into_sorted(self) -> Vec<LineupResult> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|Ranked(result)| result)
            .collect()
    }
}

/// One output row: a ranked lineup resolved to player names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedLineup {
    pub rank: usize,
    pub captain: String,
    pub flex: [String; FLEX_SLOTS],
    pub total_cost: Decimal,
    pub total_points: f64,
}

impl RankedLineup {
    /// Resolve ranked results against the pool they came from.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownPlayer`] if a result names an id
    /// outside `pool`.
    pub fn resolve(pool: &PlayerPool, results: &[LineupResult]) -> Result<Vec<Self>, DomainError> {
        results
            .iter()
            .enumerate()
            .map(|(index, result)| -> Result<Self, DomainError> {
                let name = |id| pool.player(id).map(|player| player.name.clone());
                let flex = result.lineup.flex();
                let [a, b, c, d, e] = *flex.ids();
                Ok(Self {
                    rank: index + 1,
                    captain: name(result.lineup.captain())?,
                    flex: [name(a)?, name(b)?, name(c)?, name(d)?, name(e)?],
                    total_cost: result.cost,
                    total_points: result.points,
                })
            })
            .collect()
    }
}
