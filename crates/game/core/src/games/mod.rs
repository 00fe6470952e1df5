//! Per-kind game rules behind a shared contract.
//!
//! Each game kind implements [`GameRules`]: build state from a payload and a
//! roster, validate a submission against the current state, apply it, and
//! rank the roster at settlement. [`GameState`] tags the per-kind state so the
//! engine can dispatch without a growing conditional.

mod prediction;
mod strategy;
mod trading;
mod trivia;
mod view;

pub use prediction::{PredictionReceipt, PredictionState};
pub use strategy::{Hand, PlayReceipt, PlayRecord, StrategyState};
pub use trading::{Portfolio, TradeOrder, TradeReceipt, TradeRecord, TradeSide, TradingState};
pub use trivia::{AnswerRecord, TriviaAnswer, TriviaReceipt, TriviaState};
pub use view::{GameView, QuestionView};

use crate::config::GameConfig;
use crate::error::SubmissionError;
use crate::rng::RngOracle;
use crate::state::{GameKind, PlayerAddress, PlayerResult};

/// Inputs available while validating and applying a submission.
#[derive(Clone, Copy, Debug)]
pub struct SubmitContext<'a> {
    pub config: &'a GameConfig,
    /// Wall clock at submission time (epoch seconds).
    pub now: i64,
}

/// Inputs available while ranking players at settlement.
#[derive(Clone, Copy)]
pub struct JudgeContext<'a> {
    pub rng: &'a dyn RngOracle,
    /// Seed for any draw settlement needs (e.g. an unresolved prediction).
    pub seed: u64,
}

/// Winners chosen from a set of standings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub winners: Vec<PlayerAddress>,
    /// Every player won because nobody could be ranked above anyone else
    /// in a way that forfeits stakes.
    pub refunded: bool,
}

/// Contract shared by the four game kinds.
///
/// `validate` must be side-effect free and run before `apply`; `apply` may
/// assume validation passed.
pub trait GameRules {
    type Payload;
    type Submission;
    type Receipt;

    /// Builds the initial state for `roster` (join order).
    fn init(payload: Self::Payload, roster: &[PlayerAddress], config: &GameConfig) -> Self
    where
        Self: Sized;

    /// Checks `submission` against the current state.
    fn validate(
        &self,
        player: &PlayerAddress,
        submission: &Self::Submission,
        ctx: &SubmitContext<'_>,
    ) -> Result<(), SubmissionError>;

    /// Applies a validated submission.
    fn apply(
        &mut self,
        player: &PlayerAddress,
        submission: Self::Submission,
        ctx: &SubmitContext<'_>,
    ) -> Self::Receipt;

    /// Ranks every roster player. Results keep roster order and have
    /// `winner` unset.
    fn standings(&mut self, roster: &[PlayerAddress], ctx: &JudgeContext<'_>) -> Vec<PlayerResult>;

    /// Highest metric wins; ties share the win.
    fn verdict(&self, standings: &[PlayerResult]) -> Verdict {
        Verdict {
            winners: top_scorers(standings),
            refunded: false,
        }
    }
}

/// Validates then applies, so callers never skip the pre-check.
pub(crate) fn run_submission<R: GameRules>(
    rules: &mut R,
    player: &PlayerAddress,
    submission: R::Submission,
    ctx: &SubmitContext<'_>,
) -> Result<R::Receipt, SubmissionError> {
    rules.validate(player, &submission, ctx)?;
    Ok(rules.apply(player, submission, ctx))
}

/// Players sharing the maximum metric, in standings order.
pub fn top_scorers(standings: &[PlayerResult]) -> Vec<PlayerAddress> {
    let Some(best) = standings.iter().map(|r| r.metric).max() else {
        return Vec::new();
    };
    standings
        .iter()
        .filter(|r| r.metric == best)
        .map(|r| r.player.clone())
        .collect()
}

/// Per-kind mutable state.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "state", rename_all = "lowercase"))]
pub enum KindState {
    Prediction(PredictionState),
    Trivia(TriviaState),
    Trading(TradingState),
    Strategy(StrategyState),
}

impl KindState {
    pub fn kind(&self) -> GameKind {
        match self {
            Self::Prediction(_) => GameKind::Prediction,
            Self::Trivia(_) => GameKind::Trivia,
            Self::Trading(_) => GameKind::Trading,
            Self::Strategy(_) => GameKind::Strategy,
        }
    }
}

/// Game state owned by exactly one arena.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameState {
    pub created_at: i64,
    /// Count of applied mutations (submissions and price ticks).
    pub nonce: u64,
    /// True when the payload came from the built-in fallback pack.
    pub fallback_payload: bool,
    pub board: KindState,
}

impl GameState {
    pub fn kind(&self) -> GameKind {
        self.board.kind()
    }
}

/// A player move, tagged by the kind it targets.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "lowercase"))]
pub enum Submission {
    Prediction { choice: String },
    Trivia(TriviaAnswer),
    Trading(TradeOrder),
    Strategy { card: usize },
}

impl Submission {
    pub fn kind(&self) -> GameKind {
        match self {
            Self::Prediction { .. } => GameKind::Prediction,
            Self::Trivia(_) => GameKind::Trivia,
            Self::Trading(_) => GameKind::Trading,
            Self::Strategy { .. } => GameKind::Strategy,
        }
    }
}

/// What an accepted submission changed.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "lowercase"))]
pub enum SubmissionReceipt {
    Prediction(PredictionReceipt),
    Trivia(TriviaReceipt),
    Trading(TradeReceipt),
    Strategy(PlayReceipt),
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::state::PlayerAddress;

    pub fn player(n: u8) -> PlayerAddress {
        PlayerAddress::parse(&format!("0x{:040x}", n)).unwrap()
    }

    pub fn roster(n: u8) -> Vec<PlayerAddress> {
        (1..=n).map(player).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::testing::player;
    use super::*;
    use crate::state::ResultDetail;

    fn result(n: u8, metric: i64) -> PlayerResult {
        PlayerResult {
            player: player(n),
            metric,
            winner: false,
            detail: ResultDetail::Refund,
        }
    }

    #[test]
    fn ties_share_the_win_in_roster_order() {
        let standings = vec![result(3, 10), result(1, 4), result(2, 10)];
        assert_eq!(top_scorers(&standings), vec![player(3), player(2)]);
    }

    #[test]
    fn negative_metrics_still_pick_the_best() {
        let standings = vec![result(1, -50), result(2, -10)];
        assert_eq!(top_scorers(&standings), vec![player(2)]);
        assert!(top_scorers(&[]).is_empty());
    }
}
