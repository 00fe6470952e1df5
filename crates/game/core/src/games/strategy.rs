use std::collections::HashMap;

use arrayvec::ArrayVec;

use super::{GameRules, JudgeContext, SubmitContext};
use crate::config::GameConfig;
use crate::error::SubmissionError;
use crate::payload::{Card, CardDeckSet};
use crate::state::{PlayerAddress, PlayerResult, ResultDetail};

/// A dealt hand. Fixed for the lifetime of the arena.
pub type Hand = ArrayVec<Card, { GameConfig::HAND_SIZE }>;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayRecord {
    /// One-based turn number for the player.
    pub round: u32,
    pub card_index: usize,
    pub card: Card,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayReceipt {
    pub card_index: usize,
    pub card: Card,
    pub round: u32,
    pub round_score: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StrategyState {
    pub rules: String,
    pub hands: HashMap<PlayerAddress, Hand>,
    pub plays: HashMap<PlayerAddress, Vec<PlayRecord>>,
    pub round_scores: HashMap<PlayerAddress, u32>,
}

impl StrategyState {
    pub fn round_score(&self, player: &PlayerAddress) -> u32 {
        self.round_scores.get(player).copied().unwrap_or_default()
    }

    fn already_played(&self, player: &PlayerAddress, index: usize) -> bool {
        self.plays
            .get(player)
            .is_some_and(|log| log.iter().any(|p| p.card_index == index))
    }
}

fn deal(deck: &[Card]) -> Hand {
    deck.iter().take(GameConfig::HAND_SIZE).cloned().collect()
}

impl GameRules for StrategyState {
    type Payload = CardDeckSet;
    type Submission = usize;
    type Receipt = PlayReceipt;

    fn init(set: CardDeckSet, roster: &[PlayerAddress], _config: &GameConfig) -> Self {
        let mut hands = HashMap::with_capacity(roster.len());
        if !set.decks.is_empty() {
            for (seat, player) in roster.iter().enumerate() {
                hands.insert(player.clone(), deal(&set.decks[seat % set.decks.len()]));
            }
        }

        Self {
            rules: set.rules,
            hands,
            plays: roster.iter().map(|p| (p.clone(), Vec::new())).collect(),
            round_scores: roster.iter().map(|p| (p.clone(), 0)).collect(),
        }
    }

    fn validate(
        &self,
        player: &PlayerAddress,
        index: &usize,
        _ctx: &SubmitContext<'_>,
    ) -> Result<(), SubmissionError> {
        let hand = self
            .hands
            .get(player)
            .ok_or_else(|| SubmissionError::NotAPlayer(player.clone()))?;
        if *index >= hand.len() {
            return Err(SubmissionError::InvalidCard { index: *index });
        }
        if self.already_played(player, *index) {
            return Err(SubmissionError::CardAlreadyPlayed { index: *index });
        }
        Ok(())
    }

    fn apply(&mut self, player: &PlayerAddress, index: usize, _ctx: &SubmitContext<'_>) -> PlayReceipt {
        let card = self.hands[player][index].clone();

        let score = self.round_scores.entry(player.clone()).or_default();
        *score = score.saturating_add(card.attack);
        let round_score = *score;

        let log = self.plays.entry(player.clone()).or_default();
        let round = log.len() as u32 + 1;
        log.push(PlayRecord {
            round,
            card_index: index,
            card: card.clone(),
        });

        PlayReceipt {
            card_index: index,
            card,
            round,
            round_score,
        }
    }

    fn standings(&mut self, roster: &[PlayerAddress], _ctx: &JudgeContext<'_>) -> Vec<PlayerResult> {
        roster
            .iter()
            .map(|player| {
                let round_score = self.round_score(player);
                PlayerResult {
                    player: player.clone(),
                    metric: i64::from(round_score),
                    winner: false,
                    detail: ResultDetail::Strategy {
                        round_score,
                        cards_played: self.plays.get(player).map_or(0, |l| l.len() as u32),
                    },
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::{player, roster};
    use crate::games::{run_submission, top_scorers};
    use crate::rng::PcgRng;

    fn decks() -> CardDeckSet {
        CardDeckSet {
            decks: vec![
                vec![
                    Card::new("Dragon", 9, 4, ""),
                    Card::new("Knight", 5, 7, ""),
                    Card::new("Wizard", 7, 3, ""),
                    Card::new("Goblin", 2, 1, ""),
                    Card::new("Golem", 4, 9, ""),
                ],
                vec![
                    Card::new("Phoenix", 8, 5, ""),
                    Card::new("Paladin", 6, 8, ""),
                    Card::new("Archer", 6, 2, ""),
                    Card::new("Troll", 5, 6, ""),
                    Card::new("Sprite", 3, 3, ""),
                ],
            ],
            rules: "Highest attack wins".into(),
        }
    }

    fn play(state: &mut StrategyState, n: u8, index: usize) -> Result<PlayReceipt, SubmissionError> {
        let config = GameConfig::default();
        let ctx = SubmitContext { config: &config, now: 0 };
        run_submission(state, &player(n), index, &ctx)
    }

    #[test]
    fn seats_are_dealt_round_robin() {
        let state = StrategyState::init(decks(), &roster(3), &GameConfig::default());
        assert_eq!(state.hands[&player(1)][0].name, "Dragon");
        assert_eq!(state.hands[&player(2)][0].name, "Phoenix");
        assert_eq!(state.hands[&player(3)][0].name, "Dragon");
        assert!(state.hands.values().all(|h| h.len() == GameConfig::HAND_SIZE));
    }

    #[test]
    fn playing_adds_attack_to_round_score() {
        let mut state = StrategyState::init(decks(), &roster(2), &GameConfig::default());
        let first = play(&mut state, 1, 0).unwrap();
        assert_eq!(first.round_score, 9);
        assert_eq!(first.round, 1);

        let second = play(&mut state, 1, 2).unwrap();
        assert_eq!(second.round_score, 16);
        assert_eq!(second.round, 2);
    }

    #[test]
    fn replaying_or_out_of_range_cards_are_rejected() {
        let mut state = StrategyState::init(decks(), &roster(2), &GameConfig::default());
        play(&mut state, 1, 0).unwrap();

        assert_eq!(play(&mut state, 1, 0), Err(SubmissionError::CardAlreadyPlayed { index: 0 }));
        assert_eq!(play(&mut state, 1, 5), Err(SubmissionError::InvalidCard { index: 5 }));
        assert_eq!(state.round_score(&player(1)), 9);
        assert_eq!(state.plays[&player(1)].len(), 1);
    }

    #[test]
    fn higher_attack_wins_and_ties_share() {
        let ctx = JudgeContext { rng: &PcgRng, seed: 0 };

        let mut state = StrategyState::init(decks(), &roster(2), &GameConfig::default());
        play(&mut state, 1, 0).unwrap();
        play(&mut state, 2, 0).unwrap();
        assert_eq!(top_scorers(&state.standings(&roster(2), &ctx)), vec![player(1)]);

        let mut tied = StrategyState::init(decks(), &roster(2), &GameConfig::default());
        play(&mut tied, 1, 1).unwrap();
        play(&mut tied, 2, 3).unwrap();
        assert_eq!(top_scorers(&tied.standings(&roster(2), &ctx)), roster(2));
    }
}
