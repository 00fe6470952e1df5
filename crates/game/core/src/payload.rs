//! Kind-specific content an arena is played on.
//!
//! Payloads come from an external generator (or the built-in fallback pack)
//! and are validated structurally before any game state is built from them.
//! Field names follow the generator's camelCase JSON.

use std::collections::HashSet;

use crate::config::GameConfig;
use crate::error::PayloadError;
use crate::state::GameKind;

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TriviaQuestion {
    pub question: String,
    pub answer: String,
    pub options: Vec<String>,
    pub answer_index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct PredictionScenario {
    pub scenario: String,
    pub question: String,
    pub options: Vec<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub resolve_hint: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Card {
    pub name: String,
    pub attack: u32,
    pub defense: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flavor: String,
}

impl Card {
    pub fn new(name: &str, attack: u32, defense: u32, flavor: &str) -> Self {
        Self {
            name: name.to_string(),
            attack,
            defense,
            flavor: flavor.to_string(),
        }
    }
}

/// Decks for a strategy duel; player `i` is dealt `decks[i % decks.len()]`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardDeckSet {
    pub decks: Vec<Vec<Card>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub rules: String,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AssetQuote {
    pub symbol: String,
    /// Price per unit in whole currency units.
    pub price: f64,
}

impl AssetQuote {
    pub fn new(symbol: &str, price: f64) -> Self {
        Self {
            symbol: symbol.to_string(),
            price,
        }
    }

    /// Price converted to fixed-point micros, or `None` if it cannot be represented.
    pub fn price_micros(&self) -> Option<u64> {
        if !self.price.is_finite() || self.price <= 0.0 {
            return None;
        }
        let micros = (self.price * GameConfig::MICROS_PER_UNIT as f64).round();
        if micros < 1.0 || micros >= u64::MAX as f64 {
            return None;
        }
        Some(micros as u64)
    }
}

/// Tradable assets and their opening prices.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarketPayload {
    pub assets: Vec<AssetQuote>,
}

/// A validated-or-not payload tagged with its game kind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", content = "data", rename_all = "lowercase"))]
pub enum GamePayload {
    Prediction(PredictionScenario),
    Trivia(Vec<TriviaQuestion>),
    Trading(MarketPayload),
    Strategy(CardDeckSet),
}

impl GamePayload {
    pub fn kind(&self) -> GameKind {
        match self {
            Self::Prediction(_) => GameKind::Prediction,
            Self::Trivia(_) => GameKind::Trivia,
            Self::Trading(_) => GameKind::Trading,
            Self::Strategy(_) => GameKind::Strategy,
        }
    }

    /// Validates the payload is usable for an arena of `expected` kind.
    pub fn validate_for(&self, expected: GameKind) -> Result<(), PayloadError> {
        if self.kind() != expected {
            return Err(PayloadError::KindMismatch {
                expected,
                found: self.kind(),
            });
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), PayloadError> {
        match self {
            Self::Prediction(scenario) => validate_prediction(scenario),
            Self::Trivia(questions) => validate_trivia(questions),
            Self::Trading(market) => validate_market(market),
            Self::Strategy(decks) => validate_decks(decks),
        }
    }
}

/// Options are matched case-insensitively against trimmed choices, so each
/// must already be trimmed and distinct ignoring ASCII case.
fn validate_prediction(scenario: &PredictionScenario) -> Result<(), PayloadError> {
    let mut seen = HashSet::new();
    for option in &scenario.options {
        if option.is_empty() || option.trim() != option {
            return Err(PayloadError::InvalidOptions);
        }
        if !seen.insert(option.to_ascii_lowercase()) {
            return Err(PayloadError::InvalidOptions);
        }
    }
    if seen.len() < 2 {
        return Err(PayloadError::InvalidOptions);
    }
    Ok(())
}

fn validate_trivia(questions: &[TriviaQuestion]) -> Result<(), PayloadError> {
    if questions.is_empty() {
        return Err(PayloadError::NoQuestions);
    }
    for (index, q) in questions.iter().enumerate() {
        if q.options.len() < 2 {
            return Err(PayloadError::TooFewOptions { index });
        }
        if q.answer_index >= q.options.len() {
            return Err(PayloadError::AnswerOutOfRange {
                index,
                answer_index: q.answer_index,
            });
        }
    }
    Ok(())
}

fn validate_market(market: &MarketPayload) -> Result<(), PayloadError> {
    if market.assets.is_empty() {
        return Err(PayloadError::NoAssets);
    }
    let mut seen = HashSet::new();
    for asset in &market.assets {
        if !seen.insert(asset.symbol.as_str()) {
            return Err(PayloadError::DuplicateAsset(asset.symbol.clone()));
        }
        if asset.symbol.trim().is_empty() || asset.price_micros().is_none() {
            return Err(PayloadError::InvalidPrice {
                symbol: asset.symbol.clone(),
            });
        }
    }
    Ok(())
}

fn validate_decks(set: &CardDeckSet) -> Result<(), PayloadError> {
    if set.decks.is_empty() {
        return Err(PayloadError::NoDecks);
    }
    for (deck, cards) in set.decks.iter().enumerate() {
        if cards.len() != GameConfig::HAND_SIZE {
            return Err(PayloadError::WrongHandSize {
                deck,
                expected: GameConfig::HAND_SIZE,
                found: cards.len(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(options: &[&str], answer_index: usize) -> TriviaQuestion {
        TriviaQuestion {
            question: "What does DeFi stand for?".into(),
            answer: "Decentralized Finance".into(),
            options: options.iter().map(|s| s.to_string()).collect(),
            answer_index,
        }
    }

    #[test]
    fn trivia_answer_index_must_point_at_an_option() {
        let payload = GamePayload::Trivia(vec![question(&["A", "B"], 2)]);
        assert_eq!(
            payload.validate(),
            Err(PayloadError::AnswerOutOfRange {
                index: 0,
                answer_index: 2
            })
        );
        assert_eq!(
            GamePayload::Trivia(vec![]).validate(),
            Err(PayloadError::NoQuestions)
        );
    }

    #[test]
    fn kind_mismatch_is_rejected() {
        let payload = GamePayload::Trivia(vec![question(&["A", "B"], 0)]);
        assert_eq!(
            payload.validate_for(GameKind::Strategy),
            Err(PayloadError::KindMismatch {
                expected: GameKind::Strategy,
                found: GameKind::Trivia
            })
        );
    }

    #[test]
    fn market_prices_must_be_positive_and_unique() {
        let dup = MarketPayload {
            assets: vec![AssetQuote::new("ETH", 1800.0), AssetQuote::new("ETH", 1.0)],
        };
        assert_eq!(
            GamePayload::Trading(dup).validate(),
            Err(PayloadError::DuplicateAsset("ETH".into()))
        );

        let negative = MarketPayload {
            assets: vec![AssetQuote::new("MON", -1.0)],
        };
        assert!(GamePayload::Trading(negative).validate().is_err());
        assert_eq!(AssetQuote::new("MON", 1.2).price_micros(), Some(1_200_000));
        assert_eq!(AssetQuote::new("NAN", f64::NAN).price_micros(), None);
    }

    #[test]
    fn decks_need_full_hands() {
        let set = CardDeckSet {
            decks: vec![vec![Card::new("Dragon", 9, 4, "")]],
            rules: String::new(),
        };
        assert!(matches!(
            GamePayload::Strategy(set).validate(),
            Err(PayloadError::WrongHandSize { found: 1, .. })
        ));
    }

    #[test]
    fn prediction_options_must_be_distinct() {
        let scenario = PredictionScenario {
            scenario: "MON hits $5".into(),
            question: "Will it?".into(),
            options: vec!["Yes".into(), "Yes".into()],
            resolve_hint: String::new(),
        };
        assert_eq!(
            GamePayload::Prediction(scenario).validate(),
            Err(PayloadError::InvalidOptions)
        );
    }

    #[test]
    fn prediction_options_must_be_matchable() {
        let with_options = |options: &[&str]| {
            GamePayload::Prediction(PredictionScenario {
                scenario: "MON hits $5".into(),
                question: "Will it?".into(),
                options: options.iter().map(|s| s.to_string()).collect(),
                resolve_hint: String::new(),
            })
        };

        assert_eq!(with_options(&[" Yes", "No"]).validate(), Err(PayloadError::InvalidOptions));
        assert_eq!(with_options(&["Yes", "yes"]).validate(), Err(PayloadError::InvalidOptions));
        assert_eq!(with_options(&["Yes", ""]).validate(), Err(PayloadError::InvalidOptions));
        assert_eq!(with_options(&["Yes", "No"]).validate(), Ok(()));
    }
}
