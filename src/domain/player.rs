//! Player records and field access.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::error::DomainError;

/// Roster position of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Position {
    #[serde(rename = "QB")]
    Qb,
    #[serde(rename = "RB")]
    Rb,
    #[serde(rename = "WR")]
    Wr,
    #[serde(rename = "TE")]
    Te,
    #[serde(rename = "K")]
    K,
    #[serde(rename = "DST")]
    Dst,
}

impl Position {
    /// Number of distinct positions.
    pub const COUNT: usize = 6;

    /// Every position, in index order.
    pub const ALL: [Position; Self::COUNT] = [
        Position::Qb,
        Position::Rb,
        Position::Wr,
        Position::Te,
        Position::K,
        Position::Dst,
    ];

    /// Dense index used for per-position count arrays.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Position::Qb => 0,
            Position::Rb => 1,
            Position::Wr => 2,
            Position::Te => 3,
            Position::K => 4,
            Position::Dst => 5,
        }
    }

    /// Kickers and defenses.
    #[must_use]
    pub const fn is_special_teams(self) -> bool {
        matches!(self, Position::K | Position::Dst)
    }

    /// Canonical uppercase label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Position::Qb => "QB",
            Position::Rb => "RB",
            Position::Wr => "WR",
            Position::Te => "TE",
            Position::K => "K",
            Position::Dst => "DST",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "QB" => Ok(Position::Qb),
            "RB" => Ok(Position::Rb),
            "WR" => Ok(Position::Wr),
            "TE" => Ok(Position::Te),
            "K" => Ok(Position::K),
            "DST" | "DEF" | "D/ST" => Ok(Position::Dst),
            _ => Err(DomainError::InvalidPosition {
                label: s.to_string(),
            }),
        }
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        label.parse().map_err(serde::de::Error::custom)
    }
}

/// Dense identifier of a player inside one [`PlayerPool`](super::PlayerPool).
///
/// Identifiers are assigned in canonical pool order (salary descending,
/// ties by name), so comparing two ids compares their canonical positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(u16);

impl PlayerId {
    pub(crate) const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Position of this player in the pool's canonical order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One row of the weekly player table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(alias = "player", alias = "Name")]
    pub name: String,
    #[serde(alias = "Team")]
    pub team: String,
    #[serde(alias = "pos", alias = "Position", alias = "Pos")]
    pub position: Position,
    #[serde(alias = "Salary")]
    pub salary: u32,
    #[serde(alias = "points", alias = "FPTS", alias = "proj")]
    pub fpts: f64,
}

impl Player {
    pub fn new(
        name: impl Into<String>,
        team: impl Into<String>,
        position: Position,
        salary: u32,
        fpts: f64,
    ) -> Self {
        Self {
            name: name.into(),
            team: team.into(),
            position,
            salary,
            fpts,
        }
    }

    /// Read one attribute of this player.
    #[must_use]
    pub fn field(&self, field: Field) -> FieldValue<'_> {
        match field {
            Field::Name => FieldValue::Text(&self.name),
            Field::Team => FieldValue::Text(&self.team),
            Field::Position => FieldValue::Position(self.position),
            Field::Salary => FieldValue::Salary(self.salary),
            Field::Fpts => FieldValue::Points(self.fpts),
        }
    }
}

/// Attribute of a [`Player`] addressable by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Team,
    Position,
    Salary,
    Fpts,
}

impl Field {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Team => "team",
            Field::Position => "pos",
            Field::Salary => "salary",
            Field::Fpts => "fpts",
        }
    }

    /// Whether values of this field can be summed.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Field::Salary | Field::Fpts)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" | "player" => Ok(Field::Name),
            "team" => Ok(Field::Team),
            "pos" | "position" => Ok(Field::Position),
            "salary" => Ok(Field::Salary),
            "fpts" | "points" => Ok(Field::Fpts),
            _ => Err(DomainError::UnknownField {
                field: s.to_string(),
            }),
        }
    }
}

/// Borrowed value of a single player field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Position(Position),
    Salary(u32),
    Points(f64),
}

impl FieldValue<'_> {
    /// Numeric view of the value, `None` for text and positions.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Salary(salary) => Some(f64::from(*salary)),
            FieldValue::Points(points) => Some(*points),
            FieldValue::Text(_) | FieldValue::Position(_) => None,
        }
    }
}

impl fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(text) => f.write_str(text),
            FieldValue::Position(position) => write!(f, "{position}"),
            FieldValue::Salary(salary) => write!(f, "{salary}"),
            FieldValue::Points(points) => write!(f, "{points:.2}"),
        }
    }
}
