use std::fmt;

use strum::{Display, EnumIter, FromRepr};

use super::{PlayerAddress, Settlement};
use crate::error::LifecycleError;

/// Numeric arena identifier, assigned by the registry from a monotonic counter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ArenaId(pub u64);

impl fmt::Display for ArenaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The four supported game kinds. The discriminant is the wire code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, EnumIter, FromRepr)]
#[strum(serialize_all = "lowercase")]
#[repr(u8)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GameKind {
    Prediction = 0,
    Trivia = 1,
    Trading = 2,
    Strategy = 3,
}

impl GameKind {
    pub fn from_code(code: u8) -> Option<Self> {
        Self::from_repr(code)
    }

    pub const fn code(self) -> u8 {
        self as u8
    }
}

/// Arena lifecycle status. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ArenaStatus {
    Open,
    InProgress,
    Completed,
}

/// Stake amount in base units (wei for EVM chains).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Amount(pub u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub const fn base_units(self) -> u128 {
        self.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameters for creating an arena.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArenaSpec {
    pub title: String,
    pub kind: GameKind,
    pub bet_amount: Amount,
    pub min_players: u32,
    pub max_players: u32,
    pub start_time: i64,
    pub end_time: i64,
}

impl ArenaSpec {
    /// Smallest roster that makes a competitive arena.
    pub const MIN_PLAYERS_FLOOR: u32 = 2;
    /// Upper bound on roster size.
    pub const MAX_PLAYERS_CEILING: u32 = 64;

    pub fn validate(&self) -> Result<(), LifecycleError> {
        if self.title.trim().is_empty() {
            return Err(LifecycleError::InvalidConfig("title must not be empty".into()));
        }
        if self.min_players < Self::MIN_PLAYERS_FLOOR {
            return Err(LifecycleError::InvalidConfig(format!(
                "min_players must be at least {}",
                Self::MIN_PLAYERS_FLOOR
            )));
        }
        if self.max_players < self.min_players {
            return Err(LifecycleError::InvalidConfig(format!(
                "max_players ({}) must be >= min_players ({})",
                self.max_players, self.min_players
            )));
        }
        if self.max_players > Self::MAX_PLAYERS_CEILING {
            return Err(LifecycleError::InvalidConfig(format!(
                "max_players must be at most {}",
                Self::MAX_PLAYERS_CEILING
            )));
        }
        if self.end_time <= self.start_time {
            return Err(LifecycleError::InvalidConfig(format!(
                "end_time ({}) must be after start_time ({})",
                self.end_time, self.start_time
            )));
        }
        Ok(())
    }
}

/// A joined player, in arrival order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RosterEntry {
    pub address: PlayerAddress,
    /// Zero-based arrival position.
    pub join_order: u32,
    pub joined_at: i64,
}

/// Authoritative arena record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Arena {
    pub id: ArenaId,
    pub title: String,
    pub kind: GameKind,
    pub status: ArenaStatus,
    pub bet_amount: Amount,
    pub min_players: u32,
    pub max_players: u32,
    pub start_time: i64,
    pub end_time: i64,
    pub created_at: i64,
    pub started_at: Option<i64>,
    pub roster: Vec<RosterEntry>,
    pub settlement: Option<Settlement>,
}

impl Arena {
    /// Validates `spec` and builds an open arena with an empty roster.
    pub fn open(id: ArenaId, spec: ArenaSpec, now: i64) -> Result<Self, LifecycleError> {
        spec.validate()?;

        Ok(Self {
            id,
            title: spec.title,
            kind: spec.kind,
            status: ArenaStatus::Open,
            bet_amount: spec.bet_amount,
            min_players: spec.min_players,
            max_players: spec.max_players,
            start_time: spec.start_time,
            end_time: spec.end_time,
            created_at: now,
            started_at: None,
            roster: Vec::new(),
            settlement: None,
        })
    }

    /// Roster addresses in join order.
    pub fn players(&self) -> Vec<PlayerAddress> {
        self.roster.iter().map(|entry| entry.address.clone()).collect()
    }

    pub fn player_count(&self) -> u32 {
        self.roster.len() as u32
    }

    pub fn is_player(&self, address: &PlayerAddress) -> bool {
        self.roster.iter().any(|entry| &entry.address == address)
    }

    pub fn is_active(&self) -> bool {
        self.status != ArenaStatus::Completed
    }

    /// True once the wall clock has reached `end_time`.
    pub fn is_expired(&self, now: i64) -> bool {
        now >= self.end_time
    }

    /// Appends `address` to the roster.
    pub fn admit(&mut self, address: PlayerAddress, now: i64) -> Result<&RosterEntry, LifecycleError> {
        if self.status != ArenaStatus::Open {
            return Err(LifecycleError::NotOpen {
                status: self.status,
            });
        }
        if self.is_player(&address) {
            return Err(LifecycleError::AlreadyJoined(address));
        }
        if self.player_count() >= self.max_players {
            return Err(LifecycleError::ArenaFull {
                max_players: self.max_players,
            });
        }

        let join_order = self.player_count();
        self.roster.push(RosterEntry {
            address,
            join_order,
            joined_at: now,
        });
        Ok(&self.roster[self.roster.len() - 1])
    }

    /// Checks whether [`Arena::begin`] would succeed, without mutating.
    pub fn ensure_startable(&self) -> Result<(), LifecycleError> {
        if self.status != ArenaStatus::Open {
            return Err(LifecycleError::NotOpen {
                status: self.status,
            });
        }
        if self.player_count() < self.min_players {
            return Err(LifecycleError::InsufficientPlayers {
                joined: self.player_count(),
                required: self.min_players,
            });
        }
        Ok(())
    }

    /// Open → InProgress.
    pub fn begin(&mut self, now: i64) -> Result<(), LifecycleError> {
        self.ensure_startable()?;
        self.status = ArenaStatus::InProgress;
        self.started_at = Some(now);
        Ok(())
    }

    /// Gate for player submissions.
    pub fn ensure_accepting(&self, player: &PlayerAddress, now: i64) -> Result<(), LifecycleError> {
        if self.status != ArenaStatus::InProgress {
            return Err(LifecycleError::NotInProgress {
                status: self.status,
            });
        }
        if !self.is_player(player) {
            return Err(LifecycleError::NotAPlayer(player.clone()));
        }
        if self.is_expired(now) {
            return Err(LifecycleError::SubmissionWindowClosed {
                end_time: self.end_time,
            });
        }
        Ok(())
    }

    /// Open | InProgress → Completed, recording the settlement.
    pub fn complete(&mut self, settlement: Settlement) -> Result<(), LifecycleError> {
        if self.status == ArenaStatus::Completed {
            return Err(LifecycleError::NotInProgress {
                status: self.status,
            });
        }
        self.status = ArenaStatus::Completed;
        self.settlement = Some(settlement);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(min: u32, max: u32) -> ArenaSpec {
        ArenaSpec {
            title: "Blockchain Trivia Challenge".into(),
            kind: GameKind::Trivia,
            bet_amount: Amount(50_000_000_000_000_000),
            min_players: min,
            max_players: max,
            start_time: 1_000,
            end_time: 1_600,
        }
    }

    fn player(n: u8) -> PlayerAddress {
        PlayerAddress::parse(&format!("0x{:040x}", n)).unwrap()
    }

    #[test]
    fn opens_with_empty_roster() {
        let arena = Arena::open(ArenaId(1), spec(2, 4), 1_000).unwrap();
        assert_eq!(arena.status, ArenaStatus::Open);
        assert!(arena.roster.is_empty());
        assert!(arena.settlement.is_none());
    }

    #[test]
    fn rejects_bad_configuration() {
        let mut bad = spec(3, 2);
        assert!(matches!(
            Arena::open(ArenaId(1), bad.clone(), 0),
            Err(LifecycleError::InvalidConfig(_))
        ));

        bad = spec(1, 2);
        assert!(Arena::open(ArenaId(1), bad, 0).is_err());

        let mut reversed = spec(2, 4);
        reversed.end_time = reversed.start_time;
        assert!(Arena::open(ArenaId(1), reversed, 0).is_err());
    }

    #[test]
    fn roster_keeps_arrival_order_and_rejects_duplicates() {
        let mut arena = Arena::open(ArenaId(7), spec(2, 3), 0).unwrap();
        arena.admit(player(2), 10).unwrap();
        arena.admit(player(1), 11).unwrap();

        assert_eq!(arena.players(), vec![player(2), player(1)]);
        assert_eq!(arena.roster[1].join_order, 1);
        assert_eq!(
            arena.admit(player(2), 12),
            Err(LifecycleError::AlreadyJoined(player(2)))
        );

        arena.admit(player(3), 13).unwrap();
        assert_eq!(
            arena.admit(player(4), 14),
            Err(LifecycleError::ArenaFull { max_players: 3 })
        );
    }

    #[test]
    fn begin_requires_min_players_and_blocks_late_joins() {
        let mut arena = Arena::open(ArenaId(1), spec(2, 4), 0).unwrap();
        arena.admit(player(1), 0).unwrap();
        assert_eq!(
            arena.begin(5),
            Err(LifecycleError::InsufficientPlayers {
                joined: 1,
                required: 2
            })
        );

        arena.admit(player(2), 1).unwrap();
        arena.begin(5).unwrap();
        assert_eq!(arena.status, ArenaStatus::InProgress);
        assert_eq!(arena.started_at, Some(5));

        assert!(matches!(
            arena.admit(player(3), 6),
            Err(LifecycleError::NotOpen { .. })
        ));
        assert!(matches!(arena.begin(7), Err(LifecycleError::NotOpen { .. })));
    }

    #[test]
    fn submissions_need_membership_and_an_open_window() {
        let mut arena = Arena::open(ArenaId(1), spec(2, 4), 0).unwrap();
        arena.admit(player(1), 0).unwrap();
        arena.admit(player(2), 0).unwrap();
        assert!(matches!(
            arena.ensure_accepting(&player(1), 1_100),
            Err(LifecycleError::NotInProgress { .. })
        ));

        arena.begin(1_000).unwrap();
        arena.ensure_accepting(&player(1), 1_100).unwrap();
        assert_eq!(
            arena.ensure_accepting(&player(9), 1_100),
            Err(LifecycleError::NotAPlayer(player(9)))
        );
        assert_eq!(
            arena.ensure_accepting(&player(1), 1_600),
            Err(LifecycleError::SubmissionWindowClosed { end_time: 1_600 })
        );
    }

    #[test]
    fn game_kind_wire_codes() {
        assert_eq!(GameKind::from_code(2), Some(GameKind::Trading));
        assert_eq!(GameKind::Strategy.code(), 3);
        assert_eq!(GameKind::from_code(4), None);
        assert_eq!(ArenaStatus::InProgress.to_string(), "in-progress");
    }
}
