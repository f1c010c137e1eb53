//! Position-composition rules.
//!
//! Each rule implements [`RosterRule`] and judges the [`Composition`] of a
//! complete six-player lineup. The [`RuleSet`] holds the enabled rules and
//! runs them in registration order, stopping at the first rejection.
//!
//! Two rules always apply outside backtest mode:
//!
//! - **core_counts**: no lineup with exactly two K, exactly two DST, or no QB
//! - **team_caps**: no team above its per-position cap
//!
//! Three stacking heuristics can be toggled through [`Heuristics`]:
//!
//! - **five_one_special_teams**: a team filling five slots includes a K or DST
//! - **lone_receiver**: a team filling one slot fills it with a WR
//! - **tight_end_stack**: a team contributing a TE also contributes a QB

use super::cache::Composition;
use crate::domain::{Heuristics, Position, PositionLimits, RuleConfig};

/// A single accept/reject rule over a lineup's composition.
pub trait RosterRule: Send + Sync {
    /// Unique identifier used in reports and logs.
    fn name(&self) -> &'static str;

    /// Whether the lineup satisfies this rule.
    fn allows(&self, composition: &Composition) -> bool;
}

/// Rejects exactly two kickers, exactly two defenses, or no quarterback.
pub struct CoreCounts;

impl RosterRule for CoreCounts {
    fn name(&self) -> &'static str {
        "core_counts"
    }

    fn allows(&self, composition: &Composition) -> bool {
        composition.count(Position::K) != 2
            && composition.count(Position::Dst) != 2
            && composition.count(Position::Qb) != 0
    }
}

/// Rejects any team holding more of a position than its cap.
pub struct TeamCaps {
    limits: PositionLimits,
}

impl TeamCaps {
    #[must_use]
    pub fn new(limits: PositionLimits) -> Self {
        Self { limits }
    }
}

impl RosterRule for TeamCaps {
    fn name(&self) -> &'static str {
        "team_caps"
    }

    fn allows(&self, composition: &Composition) -> bool {
        composition.teams().iter().all(|share| {
            self.limits
                .iter()
                .all(|(position, cap)| share.count(position) <= cap)
        })
    }
}

/// A team supplying five of six slots must supply a K or DST among them.
pub struct FiveOneSpecialTeams;

impl RosterRule for FiveOneSpecialTeams {
    fn name(&self) -> &'static str {
        "five_one_special_teams"
    }

    fn allows(&self, composition: &Composition) -> bool {
        composition
            .teams()
            .iter()
            .filter(|share| share.total() == 5)
            .all(|share| share.has(Position::K) || share.has(Position::Dst))
    }
}

/// A team supplying a single slot must supply a WR.
pub struct LoneReceiver;

impl RosterRule for LoneReceiver {
    fn name(&self) -> &'static str {
        "lone_receiver"
    }

    fn allows(&self, composition: &Composition) -> bool {
        composition
            .teams()
            .iter()
            .filter(|share| share.total() == 1)
            .all(|share| share.has(Position::Wr))
    }
}

/// A team contributing a TE must also contribute a QB.
pub struct TightEndStack;

impl RosterRule for TightEndStack {
    fn name(&self) -> &'static str {
        "tight_end_stack"
    }

    fn allows(&self, composition: &Composition) -> bool {
        composition
            .teams()
            .iter()
            .filter(|share| share.has(Position::Te))
            .all(|share| share.has(Position::Qb))
    }
}

/// Ordered collection of enabled roster rules.
#[derive(Default)]
pub struct RuleSet {
    rules: Vec<Box<dyn RosterRule>>,
}

impl RuleSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the rule set for `config`: core rules first, then the enabled
    /// heuristics.
    #[must_use]
    pub fn from_config(config: &RuleConfig) -> Self {
        let mut set = Self::new();
        set.register(Box::new(CoreCounts));
        set.register(Box::new(TeamCaps::new(config.limits)));
        set.register_heuristics(config.heuristics);
        set
    }

    fn register_heuristics(&mut self, heuristics: Heuristics) {
        if heuristics.five_one_special_teams {
            self.register(Box::new(FiveOneSpecialTeams));
        }
        if heuristics.lone_receiver {
            self.register(Box::new(LoneReceiver));
        }
        if heuristics.tight_end_stack {
            self.register(Box::new(TightEndStack));
        }
    }

    /// Register a rule. Rules run in registration order.
    pub fn register(&mut self, rule: Box<dyn RosterRule>) {
        self.rules.push(rule);
    }

    #[must_use]
    pub fn rules(&self) -> &[Box<dyn RosterRule>] {
        &self.rules
    }

    /// Names of the registered rules.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether every rule allows the composition.
    #[must_use]
    pub fn allows(&self, composition: &Composition) -> bool {
        self.rules.iter().all(|rule| rule.allows(composition))
    }

    /// Names of every rule the composition breaks.
    #[must_use]
    pub fn violations(&self, composition: &Composition) -> Vec<&'static str> {
        self.rules
            .iter()
            .filter(|rule| !rule.allows(composition))
            .map(|rule| rule.name())
            .collect()
    }
}
