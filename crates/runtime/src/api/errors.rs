//! Unified error types surfaced by the runtime API.
//!
//! Wraps domain rejections from `arena-core` together with worker
//! coordination and repository failures, so a transport can map every
//! failure to a stable [`ErrorKind`] without parsing messages.

use arena_core::{ArenaId, ErrorKind, LifecycleError, PayloadError, SubmissionError};
use thiserror::Error;
use tokio::sync::oneshot;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, ArenaError>;

#[derive(Debug, Error)]
pub enum ArenaError {
    #[error("arena {0} not found")]
    NotFound(ArenaId),

    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error("arena {0} is not a trading arena")]
    NotTradingArena(ArenaId),

    #[error("arena {0} can only be evicted after settlement and payout")]
    NotEvictable(ArenaId),

    #[error("no usable payload for arena: {0}")]
    Payload(#[from] PayloadError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("arena worker command channel closed")]
    CommandChannelClosed,

    #[error("arena worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("background worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

impl ArenaError {
    /// Stable classification for transports.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Lifecycle(e) => e.kind(),
            Self::Submission(e) => e.kind(),
            Self::NotTradingArena(_) => ErrorKind::NotTradingArena,
            Self::NotEvictable(_) => ErrorKind::NotEvictable,
            Self::Payload(_)
            | Self::Repository(_)
            | Self::CommandChannelClosed
            | Self::ReplyChannelClosed(_)
            | Self::WorkerJoin(_) => ErrorKind::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_pass_through_domain_errors() {
        let err = ArenaError::from(LifecycleError::ArenaFull { max_players: 4 });
        assert_eq!(err.kind(), ErrorKind::ArenaFull);
        assert_eq!(err.kind().as_str(), "arena_full");

        let err = ArenaError::from(SubmissionError::InsufficientCash {
            required: 10,
            available: 5,
        });
        assert_eq!(err.kind(), ErrorKind::InsufficientCash);
        assert_eq!(ArenaError::NotFound(ArenaId(3)).kind(), ErrorKind::NotFound);
        assert_eq!(ArenaError::CommandChannelClosed.kind(), ErrorKind::Internal);
    }
}
