//! Built-in payloads that keep arenas playable when the generator is down.

use arena_core::{
    AssetQuote, Card, CardDeckSet, GameKind, GamePayload, MarketPayload, PayloadError,
    PredictionScenario, TriviaQuestion,
};

/// One fallback payload per game kind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FallbackPack {
    pub trivia: Vec<TriviaQuestion>,
    pub prediction: PredictionScenario,
    pub strategy: CardDeckSet,
    pub market: MarketPayload,
}

impl FallbackPack {
    /// The pack compiled into the binary.
    pub fn builtin() -> Self {
        Self {
            trivia: builtin_trivia(),
            prediction: PredictionScenario {
                scenario: "MON hits $5 within 24 hours".into(),
                question: "Will MON price exceed $5 in the next 24 hours?".into(),
                options: vec!["Yes".into(), "No".into()],
                resolve_hint: "Check CoinGecko at end time".into(),
            },
            strategy: builtin_decks(),
            market: MarketPayload {
                assets: vec![
                    AssetQuote::new("MON", 1.20),
                    AssetQuote::new("ETH", 1800.0),
                    AssetQuote::new("BTC", 45000.0),
                ],
            },
        }
    }

    /// Payload for an arena of `kind`.
    pub fn payload_for(&self, kind: GameKind) -> GamePayload {
        match kind {
            GameKind::Prediction => GamePayload::Prediction(self.prediction.clone()),
            GameKind::Trivia => GamePayload::Trivia(self.trivia.clone()),
            GameKind::Trading => GamePayload::Trading(self.market.clone()),
            GameKind::Strategy => GamePayload::Strategy(self.strategy.clone()),
        }
    }

    /// Every payload in the pack must pass structural validation, or the
    /// fallback would fail exactly when it is needed.
    pub fn validate(&self) -> Result<(), PayloadError> {
        for kind in [
            GameKind::Prediction,
            GameKind::Trivia,
            GameKind::Trading,
            GameKind::Strategy,
        ] {
            self.payload_for(kind).validate()?;
        }
        Ok(())
    }
}

impl Default for FallbackPack {
    fn default() -> Self {
        Self::builtin()
    }
}

fn question(question: &str, answer_index: usize, options: [&str; 4]) -> TriviaQuestion {
    TriviaQuestion {
        question: question.into(),
        answer: options[answer_index].into(),
        options: options.iter().map(|o| o.to_string()).collect(),
        answer_index,
    }
}

fn builtin_trivia() -> Vec<TriviaQuestion> {
    vec![
        question(
            "What consensus mechanism does Monad use?",
            1,
            ["Proof of Work", "Proof of Stake", "Proof of Authority", "DAG"],
        ),
        question(
            "What does DeFi stand for?",
            1,
            [
                "Digital Finance",
                "Decentralized Finance",
                "Distributed Funds",
                "Digital Futures",
            ],
        ),
        question(
            "Which token standard defines fungible tokens on EVM chains?",
            2,
            ["ERC-721", "ERC-1155", "ERC-20", "BEP-20"],
        ),
    ]
}

fn builtin_decks() -> CardDeckSet {
    CardDeckSet {
        decks: vec![
            vec![
                Card::new("Dragon", 9, 4, "Ancient fire wyrm"),
                Card::new("Shield", 2, 9, "Unbreakable barrier"),
                Card::new("Hacker", 7, 5, "Exploits every weakness"),
                Card::new("Oracle", 4, 7, "Sees all futures"),
                Card::new("Bomb", 10, 1, "High risk, high reward"),
            ],
            vec![
                Card::new("Phoenix", 8, 6, "Rises from the ashes"),
                Card::new("Wall", 1, 10, "Nothing gets through"),
                Card::new("Thief", 6, 5, "Steals the show"),
                Card::new("Wizard", 5, 8, "Commands the elements"),
                Card::new("Cannon", 10, 2, "One shot, one kill"),
            ],
        ],
        rules: "Each round both players play one card. Highest attack wins the round.".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_pack_is_valid_for_every_kind() {
        let pack = FallbackPack::builtin();
        assert_eq!(pack.validate(), Ok(()));
        assert_eq!(pack.payload_for(GameKind::Strategy).kind(), GameKind::Strategy);
    }

    #[test]
    fn trivia_answers_match_their_index() {
        for q in FallbackPack::builtin().trivia {
            assert_eq!(q.options[q.answer_index], q.answer);
        }
    }
}
