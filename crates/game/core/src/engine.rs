//! Submission pipeline and settlement judging.
//!
//! The [`GameEngine`] is the authoritative reducer for [`GameState`]. It
//! routes a tagged [`Submission`] to the matching [`GameRules`]
//! implementation, bumps the nonce on every accepted mutation, and ranks the
//! roster when the arena settles.

use std::collections::BTreeMap;

use crate::config::GameConfig;
use crate::error::{PayloadError, SubmissionError};
use crate::games::{
    GameRules, GameState, JudgeContext, KindState, PredictionState, StrategyState, Submission,
    SubmissionReceipt, SubmitContext, TradingState, TriviaState, Verdict, run_submission,
};
use crate::payload::GamePayload;
use crate::rng::{RngOracle, compute_seed};
use crate::state::{GameKind, PlayerAddress, PlayerResult, ResultDetail};

/// Seed context for settlement draws.
const JUDGE_CONTEXT: u32 = 1;
/// Seed context for price ticks.
const TICK_CONTEXT: u32 = 2;

/// Ranked roster with winner flags applied.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Judgement {
    /// Winners in roster order; never empty for a non-empty roster.
    pub winners: Vec<PlayerAddress>,
    pub results: Vec<PlayerResult>,
    pub refunded: bool,
}

impl Judgement {
    /// Every roster player wins; used when no game state was ever built.
    pub fn refund(roster: &[PlayerAddress]) -> Self {
        Self {
            winners: roster.to_vec(),
            results: roster
                .iter()
                .map(|player| PlayerResult {
                    player: player.clone(),
                    metric: 0,
                    winner: true,
                    detail: ResultDetail::Refund,
                })
                .collect(),
            refunded: true,
        }
    }
}

/// Game engine that applies submissions and judges a single arena's state.
pub struct GameEngine<'a> {
    state: &'a mut GameState,
    config: &'a GameConfig,
}

impl<'a> GameEngine<'a> {
    /// Builds fresh game state from a payload for `roster` (join order).
    ///
    /// The payload is validated structurally first; nothing is built from a
    /// payload that fails validation.
    pub fn initialize(
        payload: GamePayload,
        roster: &[PlayerAddress],
        config: &GameConfig,
        now: i64,
        fallback_payload: bool,
    ) -> Result<GameState, PayloadError> {
        payload.validate()?;

        let board = match payload {
            GamePayload::Prediction(scenario) => {
                KindState::Prediction(PredictionState::init(scenario, roster, config))
            }
            GamePayload::Trivia(questions) => {
                KindState::Trivia(TriviaState::init(questions, roster, config))
            }
            GamePayload::Trading(market) => {
                KindState::Trading(TradingState::init(market, roster, config))
            }
            GamePayload::Strategy(decks) => {
                KindState::Strategy(StrategyState::init(decks, roster, config))
            }
        };

        Ok(GameState {
            created_at: now,
            nonce: 0,
            fallback_payload,
            board,
        })
    }

    pub fn new(state: &'a mut GameState, config: &'a GameConfig) -> Self {
        Self { state, config }
    }

    /// Validates and applies one submission. On error the state is untouched.
    pub fn submit(
        &mut self,
        player: &PlayerAddress,
        submission: Submission,
        now: i64,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let ctx = SubmitContext {
            config: self.config,
            now,
        };

        let receipt = match (&mut self.state.board, submission) {
            (KindState::Prediction(state), Submission::Prediction { choice }) => {
                SubmissionReceipt::Prediction(run_submission(state, player, choice, &ctx)?)
            }
            (KindState::Trivia(state), Submission::Trivia(answer)) => {
                SubmissionReceipt::Trivia(run_submission(state, player, answer, &ctx)?)
            }
            (KindState::Trading(state), Submission::Trading(order)) => {
                SubmissionReceipt::Trading(run_submission(state, player, order, &ctx)?)
            }
            (KindState::Strategy(state), Submission::Strategy { card }) => {
                SubmissionReceipt::Strategy(run_submission(state, player, card, &ctx)?)
            }
            (board, submission) => {
                return Err(SubmissionError::WrongKind {
                    expected: board.kind(),
                    found: submission.kind(),
                });
            }
        };

        self.state.nonce += 1;
        Ok(receipt)
    }

    /// Injects the real-world outcome of a prediction arena.
    pub fn resolve_outcome(&mut self, outcome: &str) -> Result<String, SubmissionError> {
        let kind = self.state.kind();
        let KindState::Prediction(state) = &mut self.state.board else {
            return Err(SubmissionError::WrongKind {
                expected: kind,
                found: GameKind::Prediction,
            });
        };
        state.resolve(outcome)?;
        self.state.nonce += 1;
        Ok(state.outcome.clone().unwrap_or_default())
    }

    /// Moves every price of a trading arena one tick. Returns `None` for other kinds.
    pub fn tick_prices(&mut self, rng: &dyn RngOracle, arena_seed: u64) -> Option<BTreeMap<String, u64>> {
        let nonce = self.state.nonce;
        let KindState::Trading(state) = &mut self.state.board else {
            return None;
        };
        state.tick(
            rng,
            compute_seed(arena_seed, nonce, TICK_CONTEXT),
            self.config.price_volatility_bps,
        );
        let prices = state.prices.clone();
        self.state.nonce += 1;
        Some(prices)
    }

    /// Ranks `roster` and picks winners: highest metric, ties share.
    pub fn judge(&mut self, roster: &[PlayerAddress], rng: &dyn RngOracle, arena_seed: u64) -> Judgement {
        let ctx = JudgeContext {
            rng,
            seed: compute_seed(arena_seed, self.state.nonce, JUDGE_CONTEXT),
        };

        let (mut results, verdict) = match &mut self.state.board {
            KindState::Prediction(state) => judge_with(state, roster, &ctx),
            KindState::Trivia(state) => judge_with(state, roster, &ctx),
            KindState::Trading(state) => judge_with(state, roster, &ctx),
            KindState::Strategy(state) => judge_with(state, roster, &ctx),
        };

        if verdict.winners.is_empty() {
            return Judgement::refund(roster);
        }
        for result in &mut results {
            result.winner = verdict.winners.contains(&result.player);
        }

        Judgement {
            winners: verdict.winners,
            results,
            refunded: verdict.refunded,
        }
    }
}

fn judge_with<R: GameRules>(
    rules: &mut R,
    roster: &[PlayerAddress],
    ctx: &JudgeContext<'_>,
) -> (Vec<PlayerResult>, Verdict) {
    let standings = rules.standings(roster, ctx);
    let verdict = rules.verdict(&standings);
    (standings, verdict)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{TradeOrder, TradeSide, TriviaAnswer};
    use crate::payload::{AssetQuote, MarketPayload, PredictionScenario, TriviaQuestion};
    use crate::rng::PcgRng;

    fn player(n: u8) -> PlayerAddress {
        PlayerAddress::parse(&format!("0x{:040x}", n)).unwrap()
    }

    fn trivia_payload() -> GamePayload {
        GamePayload::Trivia(vec![TriviaQuestion {
            question: "What consensus does Monad use?".into(),
            answer: "MonadBFT".into(),
            options: vec!["PoW".into(), "MonadBFT".into(), "PoA".into()],
            answer_index: 1,
        }])
    }

    #[test]
    fn rejects_malformed_payloads() {
        let roster = vec![player(1), player(2)];
        let result = GameEngine::initialize(GamePayload::Trivia(vec![]), &roster, &GameConfig::default(), 0, false);
        assert_eq!(result, Err(PayloadError::NoQuestions));
    }

    #[test]
    fn unmatchable_prediction_options_are_rejected_at_init() {
        let roster = vec![player(1), player(2)];
        for options in [[" Yes", "No"], ["Yes", "yes"]] {
            let payload = GamePayload::Prediction(PredictionScenario {
                scenario: "MON hits $5 within 24 hours".into(),
                question: "Will MON price exceed $5?".into(),
                options: options.iter().map(|o| o.to_string()).collect(),
                resolve_hint: String::new(),
            });
            let result = GameEngine::initialize(payload, &roster, &GameConfig::default(), 0, false);
            assert_eq!(result, Err(PayloadError::InvalidOptions));
        }
    }

    #[test]
    fn submissions_bump_the_nonce_only_when_accepted() {
        let roster = vec![player(1), player(2)];
        let config = GameConfig::default();
        let mut state = GameEngine::initialize(trivia_payload(), &roster, &config, 10, false).unwrap();
        let mut engine = GameEngine::new(&mut state, &config);

        engine
            .submit(&player(1), Submission::Trivia(TriviaAnswer { round: 0, choice: 1 }), 11)
            .unwrap();
        let wrong_kind = engine.submit(&player(1), Submission::Strategy { card: 0 }, 12);
        assert_eq!(
            wrong_kind,
            Err(SubmissionError::WrongKind {
                expected: GameKind::Trivia,
                found: GameKind::Strategy
            })
        );
        assert_eq!(state.nonce, 1);
    }

    #[test]
    fn judge_flags_winners() {
        let roster = vec![player(1), player(2)];
        let config = GameConfig::default();
        let mut state = GameEngine::initialize(trivia_payload(), &roster, &config, 0, false).unwrap();
        let mut engine = GameEngine::new(&mut state, &config);
        engine
            .submit(&player(2), Submission::Trivia(TriviaAnswer { round: 0, choice: 1 }), 1)
            .unwrap();

        let judgement = engine.judge(&roster, &PcgRng, 7);
        assert_eq!(judgement.winners, vec![player(2)]);
        assert!(!judgement.results[0].winner);
        assert!(judgement.results[1].winner);
        assert!(!judgement.refunded);
    }

    #[test]
    fn judging_twice_is_stable_for_prediction_draws() {
        let roster = vec![player(1), player(2)];
        let config = GameConfig::default();
        let payload = GamePayload::Prediction(PredictionScenario {
            scenario: "MON hits $5".into(),
            question: "Will MON exceed $5?".into(),
            options: vec!["Yes".into(), "No".into()],
            resolve_hint: String::new(),
        });
        let mut state = GameEngine::initialize(payload, &roster, &config, 0, true).unwrap();
        let mut engine = GameEngine::new(&mut state, &config);
        engine
            .submit(&player(1), Submission::Prediction { choice: "Yes".into() }, 1)
            .unwrap();

        let first = engine.judge(&roster, &PcgRng, 3);
        let second = engine.judge(&roster, &PcgRng, 3);
        assert_eq!(first, second);
    }

    #[test]
    fn ticks_only_apply_to_trading() {
        let roster = vec![player(1), player(2)];
        let config = GameConfig::default();
        let mut trivia = GameEngine::initialize(trivia_payload(), &roster, &config, 0, false).unwrap();
        assert!(GameEngine::new(&mut trivia, &config).tick_prices(&PcgRng, 1).is_none());

        let market = GamePayload::Trading(MarketPayload {
            assets: vec![AssetQuote::new("ETH", 100.0)],
        });
        let mut state = GameEngine::initialize(market, &roster, &config, 0, false).unwrap();
        let mut engine = GameEngine::new(&mut state, &config);
        engine
            .submit(
                &player(1),
                Submission::Trading(TradeOrder {
                    asset: "ETH".into(),
                    side: TradeSide::Buy,
                    quantity: 1,
                }),
                1,
            )
            .unwrap();
        let prices = engine.tick_prices(&PcgRng, 1).unwrap();
        assert!(prices.contains_key("ETH"));
        assert_eq!(state.nonce, 2);
    }

    #[test]
    fn refund_makes_everyone_a_winner() {
        let roster = vec![player(1), player(2), player(3)];
        let judgement = Judgement::refund(&roster);
        assert_eq!(judgement.winners, roster);
        assert!(judgement.results.iter().all(|r| r.winner));
        assert!(judgement.refunded);
    }
}
