use super::{Amount, PlayerAddress};

/// What caused an arena to settle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SettleTrigger {
    /// The periodic sweep found the arena past `end_time`.
    Expired,
    /// An explicit settle call.
    Explicit,
}

/// Per-kind breakdown behind a player's metric.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ResultDetail {
    Prediction {
        choice: Option<String>,
        outcome: String,
    },
    Trivia {
        score: u32,
        correct: u32,
        answered: u32,
    },
    Trading {
        cash: u64,
        portfolio_value: u64,
        pnl: i64,
    },
    Strategy {
        round_score: u32,
        cards_played: u32,
    },
    /// The arena never produced game state; stakes are returned.
    Refund,
}

/// A player's standing at settlement.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerResult {
    pub player: PlayerAddress,
    /// The value winners are selected on (higher is better).
    pub metric: i64,
    pub winner: bool,
    pub detail: ResultDetail,
}

/// Immutable outcome of a settled arena.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Settlement {
    /// Winners in roster order.
    pub winners: Vec<PlayerAddress>,
    pub results: Vec<PlayerResult>,
    pub prize_pool: Amount,
    pub prize_per_winner: Amount,
    pub trigger: SettleTrigger,
    pub settled_at: i64,
    /// True when every player won because no game state existed or nobody matched.
    pub refunded: bool,
}
