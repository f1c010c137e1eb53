//! Read-only weekly player pool.

use std::collections::{BTreeSet, HashMap};

use super::error::DomainError;
use super::lineup::{FlexKey, Lineup, FLEX_SLOTS};
use super::player::{Field, FieldValue, Player, PlayerId};

/// Players projected at or below this many points never enter the pool.
pub const FPTS_FLOOR: f64 = 2.0;

/// Dense identifier of a team inside one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TeamId(u8);

impl TeamId {
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Read-only table of eligible players.
///
/// Construction applies the [`FPTS_FLOOR`] once and assigns every surviving
/// player a [`PlayerId`] in canonical order: salary descending, ties broken
/// by name. That order is the pool's stable enumeration order and the order
/// flex slots are canonicalized into.
#[derive(Debug, Clone, Default)]
pub struct PlayerPool {
    players: Vec<Player>,
    teams: Vec<String>,
    team_of: Vec<TeamId>,
    by_name: HashMap<String, PlayerId>,
    below_floor: BTreeSet<String>,
}

impl PlayerPool {
    /// Largest pool a lineup key can address.
    pub const MAX_PLAYERS: usize = u16::MAX as usize;

    /// Largest number of distinct teams a pool may hold.
    pub const MAX_TEAMS: usize = u8::MAX as usize;

    /// Build a pool from raw player rows.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::DuplicatePlayer`] when two rows share a name,
    /// and [`DomainError::PoolTooLarge`] when the eligible players (or their
    /// teams) exceed what a lineup key can address.
    pub fn new(players: impl IntoIterator<Item = Player>) -> Result<Self, DomainError> {
        let mut seen = BTreeSet::new();
        let mut eligible = Vec::new();
        let mut below_floor = BTreeSet::new();

        for player in players {
            if !seen.insert(player.name.clone()) {
                return Err(DomainError::DuplicatePlayer { name: player.name });
            }
            if player.fpts > FPTS_FLOOR {
                eligible.push(player);
            } else {
                below_floor.insert(player.name);
            }
        }

        if eligible.len() > Self::MAX_PLAYERS {
            return Err(DomainError::PoolTooLarge {
                size: eligible.len(),
                max: Self::MAX_PLAYERS,
            });
        }

        eligible.sort_by(|a, b| b.salary.cmp(&a.salary).then_with(|| a.name.cmp(&b.name)));

        let mut teams: Vec<String> = Vec::new();
        let mut team_of = Vec::with_capacity(eligible.len());
        for player in &eligible {
            let index = match teams.iter().position(|team| *team == player.team) {
                Some(index) => index,
                None => {
                    teams.push(player.team.clone());
                    teams.len() - 1
                }
            };
            let index = u8::try_from(index).map_err(|_| DomainError::PoolTooLarge {
                size: teams.len(),
                max: Self::MAX_TEAMS,
            })?;
            team_of.push(TeamId(index));
        }

        let by_name = eligible
            .iter()
            .enumerate()
            .map(|(index, player)| (player.name.clone(), PlayerId::new(index as u16)))
            .collect();

        Ok(Self {
            players: eligible,
            teams,
            team_of,
            by_name,
            below_floor,
        })
    }

    /// Number of eligible players.
    #[must_use]
    pub fn len(&self) -> usize {
        self.players.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Number of distinct teams among eligible players.
    #[must_use]
    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    /// Names dropped by the projection floor.
    #[must_use]
    pub fn below_floor(&self) -> &BTreeSet<String> {
        &self.below_floor
    }

    /// Whether `name` was in the input table but fell under the floor.
    #[must_use]
    pub fn is_below_floor(&self, name: &str) -> bool {
        self.below_floor.contains(name)
    }

    /// All player ids in canonical order.
    pub fn ids(&self) -> impl ExactSizeIterator<Item = PlayerId> + '_ {
        (0..self.players.len()).map(|index| PlayerId::new(index as u16))
    }

    /// All players with their ids, in canonical order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (PlayerId, &Player)> + '_ {
        self.players
            .iter()
            .enumerate()
            .map(|(index, player)| (PlayerId::new(index as u16), player))
    }

    /// Look up a player by id.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownPlayer`] if the id does not belong to
    /// this pool.
    pub fn player(&self, id: PlayerId) -> Result<&Player, DomainError> {
        self.players
            .get(id.index())
            .ok_or_else(|| DomainError::UnknownPlayer {
                name: id.to_string(),
            })
    }

    /// Team of a player as a dense id.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownPlayer`] for a foreign id.
    pub fn team_id(&self, id: PlayerId) -> Result<TeamId, DomainError> {
        self.team_of
            .get(id.index())
            .copied()
            .ok_or_else(|| DomainError::UnknownPlayer {
                name: id.to_string(),
            })
    }

    /// Team name for a dense team id.
    #[must_use]
    pub fn team_name(&self, team: TeamId) -> Option<&str> {
        self.teams.get(team.index()).map(String::as_str)
    }

    /// Resolve a player name to its id.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownPlayer`] if no eligible player has
    /// this name.
    pub fn id_of(&self, name: &str) -> Result<PlayerId, DomainError> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| DomainError::UnknownPlayer {
                name: name.to_string(),
            })
    }

    /// Look up a player by name.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownPlayer`] for an unknown name.
    pub fn get(&self, name: &str) -> Result<&Player, DomainError> {
        self.id_of(name).and_then(|id| self.player(id))
    }

    /// Look up one field of one player, both given by name.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownPlayer`] or [`DomainError::UnknownField`].
    /// Neither case falls back to a default.
    pub fn value(&self, name: &str, field: &str) -> Result<FieldValue<'_>, DomainError> {
        let field: Field = field.parse()?;
        Ok(self.get(name)?.field(field))
    }

    /// Player ids ordered by `field`.
    ///
    /// Numeric fields sort descending, text fields ascending, positions in
    /// roster order. Ties keep canonical order, so `ordered_by(Field::Salary)`
    /// is exactly the canonical order.
    #[must_use]
    pub fn ordered_by(&self, field: Field) -> Vec<PlayerId> {
        let mut ids: Vec<PlayerId> = self.ids().collect();
        ids.sort_by(|a, b| {
            let (pa, pb) = (&self.players[a.index()], &self.players[b.index()]);
            match field {
                Field::Name => pa.name.cmp(&pb.name),
                Field::Team => pa.team.cmp(&pb.team),
                Field::Position => pa.position.cmp(&pb.position),
                Field::Salary => pb.salary.cmp(&pa.salary),
                Field::Fpts => pb.fpts.total_cmp(&pa.fpts),
            }
        });
        ids
    }

    /// Build a lineup from player names.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownPlayer`] for any unknown name and
    /// [`DomainError::InvalidLineup`] for a wrong flex count or a repeated
    /// player.
    pub fn lineup(&self, captain: &str, flex: &[&str]) -> Result<Lineup, DomainError> {
        if flex.len() != FLEX_SLOTS {
            return Err(DomainError::InvalidLineup {
                reason: format!("expected {FLEX_SLOTS} flex players, got {}", flex.len()),
            });
        }
        let captain = self.id_of(captain)?;
        let mut ids = [captain; FLEX_SLOTS];
        for (slot, name) in ids.iter_mut().zip(flex) {
            *slot = self.id_of(name)?;
        }
        Lineup::new(captain, FlexKey::new(ids)?)
    }

    /// Player names of a lineup, captain first.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::UnknownPlayer`] if the lineup was built
    /// against another pool.
    pub fn names(&self, lineup: &Lineup) -> Result<Vec<&str>, DomainError> {
        lineup
            .slots()
            .iter()
            .map(|id| self.player(*id).map(|player| player.name.as_str()))
            .collect()
    }
}
