use std::collections::HashMap;

use super::{GameRules, JudgeContext, SubmitContext, Verdict, top_scorers};
use crate::config::GameConfig;
use crate::error::SubmissionError;
use crate::payload::PredictionScenario;
use crate::state::{PlayerAddress, PlayerResult, ResultDetail};

/// Locked choices for a prediction scenario.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PredictionState {
    pub scenario: PredictionScenario,
    /// Latest choice per player; resubmitting overwrites.
    pub choices: HashMap<PlayerAddress, String>,
    /// Set once, either injected or drawn at settlement.
    pub outcome: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PredictionReceipt {
    pub choice: String,
    /// The choice this submission overwrote, if any.
    pub replaced: Option<String>,
}

impl PredictionState {
    /// Maps a raw choice onto the canonical option text (case-insensitive).
    fn canonical_option(&self, choice: &str) -> Option<&String> {
        let choice = choice.trim();
        self.scenario
            .options
            .iter()
            .find(|option| option.eq_ignore_ascii_case(choice))
    }

    /// Injects the real-world outcome. Only allowed once.
    pub fn resolve(&mut self, outcome: &str) -> Result<(), SubmissionError> {
        if self.outcome.is_some() {
            return Err(SubmissionError::OutcomeAlreadyResolved);
        }
        let option = self
            .canonical_option(outcome)
            .cloned()
            .ok_or_else(|| SubmissionError::InvalidAnswer {
                choice: outcome.to_string(),
            })?;
        self.outcome = Some(option);
        Ok(())
    }

    fn resolve_or_draw(&mut self, ctx: &JudgeContext<'_>) -> String {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }
        // Not a real-world resolution; a uniform draw over the options.
        let index = ctx.rng.pick(ctx.seed, self.scenario.options.len());
        let outcome = self.scenario.options.get(index).cloned().unwrap_or_default();
        self.outcome = Some(outcome.clone());
        outcome
    }
}

impl GameRules for PredictionState {
    type Payload = PredictionScenario;
    type Submission = String;
    type Receipt = PredictionReceipt;

    fn init(scenario: PredictionScenario, _roster: &[PlayerAddress], _config: &GameConfig) -> Self {
        Self {
            scenario,
            choices: HashMap::new(),
            outcome: None,
        }
    }

    fn validate(
        &self,
        _player: &PlayerAddress,
        choice: &String,
        _ctx: &SubmitContext<'_>,
    ) -> Result<(), SubmissionError> {
        if self.outcome.is_some() {
            return Err(SubmissionError::OutcomeAlreadyResolved);
        }
        if self.canonical_option(choice).is_none() {
            return Err(SubmissionError::InvalidAnswer {
                choice: choice.clone(),
            });
        }
        Ok(())
    }

    fn apply(
        &mut self,
        player: &PlayerAddress,
        choice: String,
        _ctx: &SubmitContext<'_>,
    ) -> PredictionReceipt {
        let choice = self.canonical_option(&choice).cloned().unwrap_or(choice);
        let replaced = self.choices.insert(player.clone(), choice.clone());
        PredictionReceipt { choice, replaced }
    }

    fn standings(&mut self, roster: &[PlayerAddress], ctx: &JudgeContext<'_>) -> Vec<PlayerResult> {
        let outcome = self.resolve_or_draw(ctx);
        roster
            .iter()
            .map(|player| {
                let choice = self.choices.get(player).cloned();
                let matched = choice.as_deref() == Some(outcome.as_str());
                PlayerResult {
                    player: player.clone(),
                    metric: i64::from(matched),
                    winner: false,
                    detail: ResultDetail::Prediction {
                        choice,
                        outcome: outcome.clone(),
                    },
                }
            })
            .collect()
    }

    fn verdict(&self, standings: &[PlayerResult]) -> Verdict {
        // Nobody matched: every metric is 0, so the whole roster ties and
        // stakes are effectively returned.
        let anyone_matched = standings.iter().any(|r| r.metric > 0);
        Verdict {
            winners: top_scorers(standings),
            refunded: !anyone_matched,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::{player, roster};
    use crate::games::run_submission;
    use crate::rng::PcgRng;

    fn state() -> PredictionState {
        let scenario = PredictionScenario {
            scenario: "MON hits $5 within 24 hours".into(),
            question: "Will MON price exceed $5 in the next 24 hours?".into(),
            options: vec!["Yes".into(), "No".into()],
            resolve_hint: "Check CoinGecko at end time".into(),
        };
        PredictionState::init(scenario, &roster(3), &GameConfig::default())
    }

    fn submit(state: &mut PredictionState, n: u8, choice: &str) -> Result<PredictionReceipt, SubmissionError> {
        let config = GameConfig::default();
        let ctx = SubmitContext { config: &config, now: 0 };
        run_submission(state, &player(n), choice.to_string(), &ctx)
    }

    #[test]
    fn last_submission_wins() {
        let mut state = state();
        submit(&mut state, 1, "Yes").unwrap();
        let receipt = submit(&mut state, 1, "no").unwrap();

        assert_eq!(receipt.choice, "No");
        assert_eq!(receipt.replaced.as_deref(), Some("Yes"));
        assert_eq!(state.choices.len(), 1);
        assert_eq!(state.choices[&player(1)], "No");
    }

    #[test]
    fn unknown_option_is_rejected_without_mutation() {
        let mut state = state();
        assert_eq!(
            submit(&mut state, 1, "Maybe"),
            Err(SubmissionError::InvalidAnswer {
                choice: "Maybe".into()
            })
        );
        assert!(state.choices.is_empty());
    }

    #[test]
    fn matching_players_win_an_injected_outcome() {
        let mut state = state();
        submit(&mut state, 1, "Yes").unwrap();
        submit(&mut state, 2, "No").unwrap();
        state.resolve("yes").unwrap();
        assert_eq!(state.resolve("No"), Err(SubmissionError::OutcomeAlreadyResolved));
        assert_eq!(submit(&mut state, 3, "Yes"), Err(SubmissionError::OutcomeAlreadyResolved));

        let ctx = JudgeContext { rng: &PcgRng, seed: 1 };
        let standings = state.standings(&roster(3), &ctx);
        let verdict = state.verdict(&standings);
        assert_eq!(verdict.winners, vec![player(1)]);
        assert!(!verdict.refunded);
    }

    #[test]
    fn nobody_matching_refunds_everyone() {
        let mut state = state();
        submit(&mut state, 1, "No").unwrap();
        state.resolve("Yes").unwrap();

        let ctx = JudgeContext { rng: &PcgRng, seed: 1 };
        let standings = state.standings(&roster(2), &ctx);
        let verdict = state.verdict(&standings);
        assert_eq!(verdict.winners, roster(2));
        assert!(verdict.refunded);
    }

    #[test]
    fn drawn_outcome_is_one_of_the_options_and_sticks() {
        let mut state = state();
        let ctx = JudgeContext { rng: &PcgRng, seed: 99 };
        state.standings(&roster(2), &ctx);
        let drawn = state.outcome.clone().unwrap();
        assert!(state.scenario.options.contains(&drawn));

        let other = JudgeContext { rng: &PcgRng, seed: 100 };
        state.standings(&roster(2), &other);
        assert_eq!(state.outcome, Some(drawn));
    }
}
