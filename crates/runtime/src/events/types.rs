//! Event types for different topics.

use std::collections::BTreeMap;

use arena_core::{
    Amount, ArenaId, ErrorKind, GameKind, PlayerAddress, SettleTrigger, SubmissionReceipt,
};
use serde::{Deserialize, Serialize};

/// Arena lifecycle transitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LifecycleEvent {
    Created {
        arena_id: ArenaId,
        kind: GameKind,
        title: String,
    },
    PlayerJoined {
        arena_id: ArenaId,
        player: PlayerAddress,
        join_order: u32,
    },
    Started {
        arena_id: ArenaId,
        players: u32,
        /// True when the generator failed and built-in content is in play.
        fallback_payload: bool,
    },
    OutcomeResolved {
        arena_id: ArenaId,
        outcome: String,
    },
    Evicted {
        arena_id: ArenaId,
    },
}

/// Player submissions, accepted or not
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SubmissionEvent {
    Accepted {
        arena_id: ArenaId,
        player: PlayerAddress,
        nonce: u64,
        receipt: SubmissionReceipt,
    },
    Rejected {
        arena_id: ArenaId,
        player: PlayerAddress,
        kind: ErrorKind,
        reason: String,
    },
}

/// Shared market movements in trading arenas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MarketEvent {
    PricesTicked {
        arena_id: ArenaId,
        /// Unit prices in micros.
        prices: BTreeMap<String, u64>,
    },
}

/// Settlement outcome and payout hand-off
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SettlementEvent {
    Settled {
        arena_id: ArenaId,
        trigger: SettleTrigger,
        winners: Vec<PlayerAddress>,
        prize_per_winner: Amount,
        refunded: bool,
    },
    PayoutDelivered {
        arena_id: ArenaId,
    },
    PayoutFailed {
        arena_id: ArenaId,
        error: String,
    },
}
