//! Players, pools, lineups and the rule set they are judged by.

pub mod error;
mod lineup;
mod player;
mod pool;
mod rules;

pub use lineup::{
    captain_salary_multiplier, Bonus, FlexKey, Lineup, LineupResult, CAPTAIN_MULTIPLIER,
    FLEX_SLOTS, ROSTER_SIZE,
};
pub use player::{Field, FieldValue, Player, PlayerId, Position};
pub use pool::{PlayerPool, TeamId, FPTS_FLOOR};
pub use rules::{Heuristics, Mode, PositionLimits, RuleConfig};
