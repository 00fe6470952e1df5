//! Boundary to the external payout mechanism.
//!
//! Settlement hands a [`Payout`] to the sink and records whether the sink
//! accepted it. Accepting is not a confirmation that funds moved.

use async_trait::async_trait;
use thiserror::Error;

use arena_core::{Amount, ArenaId, PlayerAddress, Settlement};

/// What the payout mechanism needs to distribute a prize.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Payout {
    pub arena_id: ArenaId,
    pub winners: Vec<PlayerAddress>,
    pub prize_per_winner: Amount,
}

impl Payout {
    pub fn from_settlement(arena_id: ArenaId, settlement: &Settlement) -> Self {
        Self {
            arena_id,
            winners: settlement.winners.clone(),
            prize_per_winner: settlement.prize_per_winner,
        }
    }
}

#[derive(Debug, Error)]
pub enum PayoutError {
    #[error("payout rejected: {0}")]
    Rejected(String),

    #[error("payout backend unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait PayoutSink: Send + Sync {
    async fn dispatch(&self, payout: &Payout) -> Result<(), PayoutError>;
}

/// Logs payouts and accepts them; for deployments without an on-chain hook.
#[derive(Clone, Debug, Default)]
pub struct LogPayoutSink;

#[async_trait]
impl PayoutSink for LogPayoutSink {
    async fn dispatch(&self, payout: &Payout) -> Result<(), PayoutError> {
        tracing::info!(
            arena = %payout.arena_id,
            winners = payout.winners.len(),
            prize_per_winner = %payout.prize_per_winner,
            "payout dispatched"
        );
        Ok(())
    }
}
