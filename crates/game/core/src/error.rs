//! Error taxonomy shared by every arena operation.
//!
//! Domain errors are split by phase: [`LifecycleError`] covers create, join,
//! start, and settlement gating; [`SubmissionError`] covers per-kind move
//! validation; [`PayloadError`] covers structural checks on generated content.
//! Each error maps onto a stable [`ErrorKind`] so a transport layer can
//! translate failures to status codes without parsing messages.

use strum::{Display, IntoStaticStr};
use thiserror::Error;

use crate::state::{ArenaStatus, GameKind, PlayerAddress};

/// Stable, machine-readable classification of a rejected operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ErrorKind {
    InvalidConfig,
    InvalidAddress,
    NotFound,
    NotOpen,
    AlreadyJoined,
    ArenaFull,
    InsufficientPlayers,
    NotInProgress,
    SubmissionWindowClosed,
    NotAPlayer,
    InvalidSubmission,
    InvalidAnswer,
    InvalidRound,
    AlreadyAnswered,
    InvalidCard,
    UnknownAsset,
    InvalidQuantity,
    InsufficientCash,
    InsufficientHoldings,
    OutcomeAlreadyResolved,
    NotTradingArena,
    NotStarted,
    NotCompleted,
    NotEvictable,
    Internal,
}

impl ErrorKind {
    /// Returns the snake_case code for this kind.
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// True when the caller sent a request that can never succeed as-is.
    pub const fn is_client_error(&self) -> bool {
        !matches!(self, Self::Internal)
    }
}

/// Violations of the arena lifecycle (configuration, roster, status gating).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LifecycleError {
    #[error("invalid arena configuration: {0}")]
    InvalidConfig(String),

    #[error("invalid player address {0:?}: expected 0x followed by 40 hex digits")]
    InvalidAddress(String),

    #[error("arena is not open for joining (status: {status})")]
    NotOpen { status: ArenaStatus },

    #[error("player {0} already joined this arena")]
    AlreadyJoined(PlayerAddress),

    #[error("arena is full ({max_players} players)")]
    ArenaFull { max_players: u32 },

    #[error("arena needs {required} players to start, only {joined} joined")]
    InsufficientPlayers { joined: u32, required: u32 },

    #[error("arena is not in progress (status: {status})")]
    NotInProgress { status: ArenaStatus },

    #[error("submission window closed at {end_time}")]
    SubmissionWindowClosed { end_time: i64 },

    #[error("{0} is not a player in this arena")]
    NotAPlayer(PlayerAddress),

    #[error("arena has not started yet")]
    NotStarted,

    #[error("arena has not completed yet")]
    NotCompleted,
}

impl LifecycleError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidConfig(_) => ErrorKind::InvalidConfig,
            Self::InvalidAddress(_) => ErrorKind::InvalidAddress,
            Self::NotOpen { .. } => ErrorKind::NotOpen,
            Self::AlreadyJoined(_) => ErrorKind::AlreadyJoined,
            Self::ArenaFull { .. } => ErrorKind::ArenaFull,
            Self::InsufficientPlayers { .. } => ErrorKind::InsufficientPlayers,
            Self::NotInProgress { .. } => ErrorKind::NotInProgress,
            Self::SubmissionWindowClosed { .. } => ErrorKind::SubmissionWindowClosed,
            Self::NotAPlayer(_) => ErrorKind::NotAPlayer,
            Self::NotStarted => ErrorKind::NotStarted,
            Self::NotCompleted => ErrorKind::NotCompleted,
        }
    }
}

/// Rejections produced while validating a player submission.
///
/// Validation always runs before any mutation, so a returned error means the
/// game state is exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error("{found} submission sent to a {expected} arena")]
    WrongKind { expected: GameKind, found: GameKind },

    #[error("{0} has no game state in this arena")]
    NotAPlayer(PlayerAddress),

    #[error("{choice:?} is not one of the offered options")]
    InvalidAnswer { choice: String },

    #[error("round {round} does not exist ({rounds} rounds)")]
    InvalidRound { round: usize, rounds: usize },

    #[error("round {round} was already answered")]
    AlreadyAnswered { round: usize },

    #[error("card {index} is not in the hand")]
    InvalidCard { index: usize },

    #[error("card {index} was already played")]
    CardAlreadyPlayed { index: usize },

    #[error("unknown asset {0:?}")]
    UnknownAsset(String),

    #[error("trade quantity must be positive")]
    InvalidQuantity,

    #[error("insufficient cash: order costs {required} micros, {available} available")]
    InsufficientCash { required: u64, available: u64 },

    #[error("insufficient holdings: selling {requested}, holding {held}")]
    InsufficientHoldings { requested: u64, held: u64 },

    #[error("prediction outcome was already resolved")]
    OutcomeAlreadyResolved,
}

impl SubmissionError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::WrongKind { .. } => ErrorKind::InvalidSubmission,
            Self::NotAPlayer(_) => ErrorKind::NotAPlayer,
            Self::InvalidAnswer { .. } => ErrorKind::InvalidAnswer,
            Self::InvalidRound { .. } => ErrorKind::InvalidRound,
            Self::AlreadyAnswered { .. } => ErrorKind::AlreadyAnswered,
            Self::InvalidCard { .. } | Self::CardAlreadyPlayed { .. } => ErrorKind::InvalidCard,
            Self::UnknownAsset(_) => ErrorKind::UnknownAsset,
            Self::InvalidQuantity => ErrorKind::InvalidQuantity,
            Self::InsufficientCash { .. } => ErrorKind::InsufficientCash,
            Self::InsufficientHoldings { .. } => ErrorKind::InsufficientHoldings,
            Self::OutcomeAlreadyResolved => ErrorKind::OutcomeAlreadyResolved,
        }
    }
}

/// Structural problems in a generated payload.
///
/// Any of these makes the payload unusable; callers fall back to built-in
/// content instead of surfacing the error.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("expected a {expected} payload, got {found}")]
    KindMismatch { expected: GameKind, found: GameKind },

    #[error("trivia payload has no questions")]
    NoQuestions,

    #[error("question {index} needs at least two options")]
    TooFewOptions { index: usize },

    #[error("question {index} answer index {answer_index} is out of range")]
    AnswerOutOfRange { index: usize, answer_index: usize },

    #[error("prediction scenario needs at least two distinct, trimmed options")]
    InvalidOptions,

    #[error("card payload has no decks")]
    NoDecks,

    #[error("deck {deck} has {found} cards, expected {expected}")]
    WrongHandSize {
        deck: usize,
        expected: usize,
        found: usize,
    },

    #[error("market payload lists no assets")]
    NoAssets,

    #[error("asset {0:?} is listed twice")]
    DuplicateAsset(String),

    #[error("asset {symbol:?} has an invalid price")]
    InvalidPrice { symbol: String },
}
