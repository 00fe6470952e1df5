use std::collections::HashMap;

use super::{GameRules, JudgeContext, SubmitContext};
use crate::config::GameConfig;
use crate::error::SubmissionError;
use crate::payload::TriviaQuestion;
use crate::state::{PlayerAddress, PlayerResult, ResultDetail};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriviaAnswer {
    pub round: usize,
    /// Index into the round's options.
    pub choice: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnswerRecord {
    pub round: usize,
    pub choice: usize,
    pub correct: bool,
    pub points: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriviaReceipt {
    pub round: usize,
    pub correct: bool,
    pub points: u32,
    pub total_score: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TriviaState {
    pub questions: Vec<TriviaQuestion>,
    pub points_per_answer: u32,
    /// Cumulative score; never decreases.
    pub scores: HashMap<PlayerAddress, u32>,
    /// Append-only answer log per player.
    pub answers: HashMap<PlayerAddress, Vec<AnswerRecord>>,
}

impl TriviaState {
    pub fn score(&self, player: &PlayerAddress) -> u32 {
        self.scores.get(player).copied().unwrap_or_default()
    }

    fn has_answered(&self, player: &PlayerAddress, round: usize) -> bool {
        self.answers
            .get(player)
            .is_some_and(|log| log.iter().any(|a| a.round == round))
    }
}

impl GameRules for TriviaState {
    type Payload = Vec<TriviaQuestion>;
    type Submission = TriviaAnswer;
    type Receipt = TriviaReceipt;

    fn init(questions: Vec<TriviaQuestion>, roster: &[PlayerAddress], config: &GameConfig) -> Self {
        Self {
            questions,
            points_per_answer: config.trivia_points,
            scores: roster.iter().map(|p| (p.clone(), 0)).collect(),
            answers: roster.iter().map(|p| (p.clone(), Vec::new())).collect(),
        }
    }

    fn validate(
        &self,
        player: &PlayerAddress,
        answer: &TriviaAnswer,
        _ctx: &SubmitContext<'_>,
    ) -> Result<(), SubmissionError> {
        if !self.scores.contains_key(player) {
            return Err(SubmissionError::NotAPlayer(player.clone()));
        }
        if answer.round >= self.questions.len() {
            return Err(SubmissionError::InvalidRound {
                round: answer.round,
                rounds: self.questions.len(),
            });
        }
        // Re-answering a round would count its points twice.
        if self.has_answered(player, answer.round) {
            return Err(SubmissionError::AlreadyAnswered {
                round: answer.round,
            });
        }
        Ok(())
    }

    fn apply(
        &mut self,
        player: &PlayerAddress,
        answer: TriviaAnswer,
        _ctx: &SubmitContext<'_>,
    ) -> TriviaReceipt {
        let correct = self.questions[answer.round].answer_index == answer.choice;
        let points = if correct { self.points_per_answer } else { 0 };

        let score = self.scores.entry(player.clone()).or_default();
        *score = score.saturating_add(points);
        let total_score = *score;

        self.answers
            .entry(player.clone())
            .or_default()
            .push(AnswerRecord {
                round: answer.round,
                choice: answer.choice,
                correct,
                points,
            });

        TriviaReceipt {
            round: answer.round,
            correct,
            points,
            total_score,
        }
    }

    fn standings(&mut self, roster: &[PlayerAddress], _ctx: &JudgeContext<'_>) -> Vec<PlayerResult> {
        roster
            .iter()
            .map(|player| {
                let log = self.answers.get(player);
                let score = self.score(player);
                PlayerResult {
                    player: player.clone(),
                    metric: i64::from(score),
                    winner: false,
                    detail: ResultDetail::Trivia {
                        score,
                        correct: log.map_or(0, |l| l.iter().filter(|a| a.correct).count() as u32),
                        answered: log.map_or(0, |l| l.len() as u32),
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

    fn questions() -> Vec<TriviaQuestion> {
        (0..3)
            .map(|i| TriviaQuestion {
                question: format!("Question {i}"),
                answer: "B".into(),
                options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
                answer_index: 1,
            })
            .collect()
    }

    fn answer(state: &mut TriviaState, n: u8, round: usize, choice: usize) -> Result<TriviaReceipt, SubmissionError> {
        let config = GameConfig::default();
        let ctx = SubmitContext { config: &config, now: 0 };
        run_submission(state, &player(n), TriviaAnswer { round, choice }, &ctx)
    }

    #[test]
    fn correct_answers_score_fixed_points() {
        let mut state = TriviaState::init(questions(), &roster(2), &GameConfig::default());

        let hit = answer(&mut state, 1, 0, 1).unwrap();
        assert!(hit.correct);
        assert_eq!(hit.points, 100);

        let miss = answer(&mut state, 1, 1, 3).unwrap();
        assert!(!miss.correct);
        assert_eq!(miss.total_score, 100);
        assert_eq!(state.answers[&player(1)].len(), 2);
    }

    #[test]
    fn score_is_order_independent() {
        let mut forward = TriviaState::init(questions(), &roster(2), &GameConfig::default());
        let mut interleaved = forward.clone();

        for round in 0..3 {
            answer(&mut forward, 1, round, 1).unwrap();
        }
        for round in 0..3 {
            answer(&mut forward, 2, round, 1).unwrap();
        }

        for round in [2, 0, 1] {
            answer(&mut interleaved, 2, round, 1).unwrap();
            answer(&mut interleaved, 1, round, 1).unwrap();
        }

        assert_eq!(forward.score(&player(1)), 300);
        assert_eq!(forward.scores, interleaved.scores);
    }

    #[test]
    fn unknown_round_is_rejected() {
        let mut state = TriviaState::init(questions(), &roster(2), &GameConfig::default());
        assert_eq!(
            answer(&mut state, 1, 3, 1),
            Err(SubmissionError::InvalidRound { round: 3, rounds: 3 })
        );
        assert!(state.answers[&player(1)].is_empty());
    }

    #[test]
    fn resubmitting_a_round_is_rejected_and_does_not_double_count() {
        let mut state = TriviaState::init(questions(), &roster(2), &GameConfig::default());
        answer(&mut state, 1, 0, 1).unwrap();

        assert_eq!(
            answer(&mut state, 1, 0, 1),
            Err(SubmissionError::AlreadyAnswered { round: 0 })
        );
        assert_eq!(state.score(&player(1)), 100);
        assert_eq!(state.answers[&player(1)].len(), 1);
    }

    #[test]
    fn highest_score_wins() {
        let mut state = TriviaState::init(questions(), &roster(2), &GameConfig::default());
        for round in 0..3 {
            answer(&mut state, 1, round, 1).unwrap();
        }
        answer(&mut state, 2, 0, 1).unwrap();
        answer(&mut state, 2, 1, 0).unwrap();

        let ctx = JudgeContext { rng: &PcgRng, seed: 0 };
        let standings = state.standings(&roster(2), &ctx);
        assert_eq!(top_scorers(&standings), vec![player(1)]);
        assert_eq!(
            standings[1].detail,
            ResultDetail::Trivia {
                score: 100,
                correct: 1,
                answered: 2
            }
        );
    }

    #[test]
    fn outsiders_cannot_answer() {
        let mut state = TriviaState::init(questions(), &roster(2), &GameConfig::default());
        assert_eq!(
            answer(&mut state, 9, 0, 1),
            Err(SubmissionError::NotAPlayer(player(9)))
        );
    }
}
