//! Per-player projections of game state.
//!
//! Views never carry data a player could use to cheat: trivia answers stay
//! hidden, other players' hands are omitted, and a prediction outcome only
//! appears once it has been resolved.

use std::collections::BTreeMap;

use super::{AnswerRecord, GameState, Hand, KindState, PlayRecord, Portfolio, TradeRecord};
use crate::state::{GameKind, PlayerAddress};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuestionView {
    pub question: String,
    pub options: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "lowercase"))]
pub enum GameView {
    Prediction {
        scenario: String,
        question: String,
        options: Vec<String>,
        choice: Option<String>,
        outcome: Option<String>,
    },
    Trivia {
        questions: Vec<QuestionView>,
        score: u32,
        answers: Vec<AnswerRecord>,
    },
    Trading {
        prices: BTreeMap<String, u64>,
        portfolio: Portfolio,
        trades: Vec<TradeRecord>,
    },
    Strategy {
        rules: String,
        hand: Hand,
        plays: Vec<PlayRecord>,
        round_score: u32,
    },
}

impl GameView {
    pub fn kind(&self) -> GameKind {
        match self {
            Self::Prediction { .. } => GameKind::Prediction,
            Self::Trivia { .. } => GameKind::Trivia,
            Self::Trading { .. } => GameKind::Trading,
            Self::Strategy { .. } => GameKind::Strategy,
        }
    }
}

impl GameState {
    /// What `player` is allowed to see.
    pub fn view_for(&self, player: &PlayerAddress) -> GameView {
        match &self.board {
            KindState::Prediction(state) => GameView::Prediction {
                scenario: state.scenario.scenario.clone(),
                question: state.scenario.question.clone(),
                options: state.scenario.options.clone(),
                choice: state.choices.get(player).cloned(),
                outcome: state.outcome.clone(),
            },
            KindState::Trivia(state) => GameView::Trivia {
                questions: state
                    .questions
                    .iter()
                    .map(|q| QuestionView {
                        question: q.question.clone(),
                        options: q.options.clone(),
                    })
                    .collect(),
                score: state.score(player),
                answers: state.answers.get(player).cloned().unwrap_or_default(),
            },
            KindState::Trading(state) => GameView::Trading {
                prices: state.prices.clone(),
                portfolio: state.portfolios.get(player).cloned().unwrap_or_default(),
                trades: state
                    .trades
                    .iter()
                    .filter(|t| &t.player == player)
                    .cloned()
                    .collect(),
            },
            KindState::Strategy(state) => GameView::Strategy {
                rules: state.rules.clone(),
                hand: state.hands.get(player).cloned().unwrap_or_default(),
                plays: state.plays.get(player).cloned().unwrap_or_default(),
                round_score: state.round_score(player),
            },
        }
    }
}
