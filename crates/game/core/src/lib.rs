//! Deterministic arena rules shared by the runtime and offline tools.
//!
//! `arena-core` defines the canonical data model (arenas, rosters,
//! settlements), the four game kinds behind [`games::GameRules`], and the
//! [`engine::GameEngine`] reducer that applies submissions and judges
//! winners. Everything here is synchronous and clock-free: callers pass the
//! current time and an RNG oracle in.
pub mod config;
pub mod engine;
pub mod error;
pub mod games;
pub mod payload;
pub mod rng;
pub mod state;

pub use config::GameConfig;
pub use engine::{GameEngine, Judgement};
pub use error::{ErrorKind, LifecycleError, PayloadError, SubmissionError};
pub use games::{
    GameState, GameView, KindState, Portfolio, QuestionView, Submission, SubmissionReceipt,
    TradeOrder, TradeSide, TriviaAnswer,
};
pub use payload::{
    AssetQuote, Card, CardDeckSet, GamePayload, MarketPayload, PredictionScenario, TriviaQuestion,
};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use state::{
    Amount, Arena, ArenaId, ArenaSpec, ArenaStatus, GameKind, PlayerAddress, PlayerResult,
    ResultDetail, RosterEntry, SettleTrigger, Settlement,
};
