//! Generator access with timeout, validation, and fallback.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use arena_content::FallbackPack;
use arena_core::{
    CardDeckSet, GameKind, GamePayload, MarketPayload, PredictionScenario, TriviaQuestion,
};

use crate::api::{GenerateRequest, GeneratorError, PayloadGenerator};
use crate::workers::EngineMetrics;

/// A payload ready to initialize game state.
#[derive(Clone, Debug, PartialEq)]
pub struct SourcedPayload {
    pub payload: GamePayload,
    /// True when the generator failed and the fallback pack was used.
    pub fallback: bool,
}

/// Resolves arena payloads from the generator, falling back to static content.
///
/// Never fails: any generator error, timeout, or structurally invalid
/// response yields the fallback payload for the arena's kind.
pub struct PayloadOracle {
    generator: Option<Arc<dyn PayloadGenerator>>,
    fallback: FallbackPack,
    timeout: Duration,
    metrics: Arc<EngineMetrics>,
}

impl PayloadOracle {
    pub fn new(
        generator: Option<Arc<dyn PayloadGenerator>>,
        fallback: FallbackPack,
        timeout: Duration,
        metrics: Arc<EngineMetrics>,
    ) -> Self {
        Self {
            generator,
            fallback,
            timeout,
            metrics,
        }
    }

    pub async fn payload_for(&self, request: &GenerateRequest) -> SourcedPayload {
        match self.generate(request).await {
            Ok(payload) => {
                debug!(kind = %request.kind, "using generated payload");
                SourcedPayload {
                    payload,
                    fallback: false,
                }
            }
            Err(e) => {
                warn!(kind = %request.kind, error = %e, "generator failed, using fallback payload");
                self.metrics.record_fallback();
                self.fallback_for(request.kind)
            }
        }
    }

    pub fn fallback_for(&self, kind: GameKind) -> SourcedPayload {
        SourcedPayload {
            payload: self.fallback.payload_for(kind),
            fallback: true,
        }
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GamePayload, GeneratorError> {
        let generator = self
            .generator
            .as_ref()
            .ok_or_else(|| GeneratorError::Unavailable("no generator configured".into()))?;

        let value = tokio::time::timeout(self.timeout, generator.generate(request))
            .await
            .map_err(|_| GeneratorError::Timeout(self.timeout.as_millis() as u64))??;

        let payload = decode(request.kind, value)?;
        payload
            .validate_for(request.kind)
            .map_err(|e| GeneratorError::Malformed(e.to_string()))?;
        Ok(payload)
    }
}

/// Decodes the generator's kind-specific JSON shape.
fn decode(kind: GameKind, value: Value) -> Result<GamePayload, GeneratorError> {
    let malformed = |e: serde_json::Error| GeneratorError::Malformed(e.to_string());
    let payload = match kind {
        GameKind::Trivia => {
            GamePayload::Trivia(serde_json::from_value::<Vec<TriviaQuestion>>(value).map_err(malformed)?)
        }
        GameKind::Prediction => GamePayload::Prediction(
            serde_json::from_value::<PredictionScenario>(value).map_err(malformed)?,
        ),
        GameKind::Strategy => {
            GamePayload::Strategy(serde_json::from_value::<CardDeckSet>(value).map_err(malformed)?)
        }
        GameKind::Trading => {
            GamePayload::Trading(serde_json::from_value::<MarketPayload>(value).map_err(malformed)?)
        }
    };
    Ok(payload)
}
