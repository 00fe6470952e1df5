use arena_core::{Arena, ArenaId, GameState};
use serde::{Deserialize, Serialize};

/// Everything needed to resume an arena after a restart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaRecord {
    pub arena: Arena,
    /// Present once the arena has started.
    pub game: Option<GameState>,
    /// Per-arena RNG seed for settlement draws and price ticks.
    pub seed: u64,
    /// Set once the payout sink accepted the settlement.
    #[serde(default)]
    pub payout_delivered: bool,
}

impl ArenaRecord {
    pub fn new(arena: Arena, seed: u64) -> Self {
        Self {
            arena,
            game: None,
            seed,
            payout_delivered: false,
        }
    }

    pub fn id(&self) -> ArenaId {
        self.arena.id
    }
}
