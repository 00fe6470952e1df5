//! Boundary to the external content generator.
//!
//! The generator is an unreliable dependency (an LLM service in practice).
//! It returns loosely-typed JSON; the runtime bounds every call with a
//! timeout and validates the shape before anything is built from it.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use arena_core::GameKind;

/// Parameters for a single generation call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateRequest {
    pub kind: GameKind,
    pub player_count: u32,
    /// Trivia only; ignored by other kinds.
    pub question_count: u32,
    pub topic: Option<String>,
}

impl GenerateRequest {
    pub const DEFAULT_QUESTION_COUNT: u32 = 3;

    pub fn new(kind: GameKind, player_count: u32) -> Self {
        Self {
            kind,
            player_count,
            question_count: Self::DEFAULT_QUESTION_COUNT,
            topic: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("generator unavailable: {0}")]
    Unavailable(String),

    #[error("generator timed out after {0} ms")]
    Timeout(u64),

    #[error("malformed generator payload: {0}")]
    Malformed(String),
}

/// Produces kind-specific payload JSON.
#[async_trait]
pub trait PayloadGenerator: Send + Sync {
    async fn generate(&self, request: &GenerateRequest) -> Result<Value, GeneratorError>;
}

/// Returns a fixed JSON value for every request.
#[derive(Clone, Debug)]
pub struct StaticGenerator {
    value: Value,
}

impl StaticGenerator {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

#[async_trait]
impl PayloadGenerator for StaticGenerator {
    async fn generate(&self, _request: &GenerateRequest) -> Result<Value, GeneratorError> {
        Ok(self.value.clone())
    }
}

/// Always fails; stands in for a missing API key.
#[derive(Clone, Debug, Default)]
pub struct UnavailableGenerator;

#[async_trait]
impl PayloadGenerator for UnavailableGenerator {
    async fn generate(&self, request: &GenerateRequest) -> Result<Value, GeneratorError> {
        Err(GeneratorError::Unavailable(format!(
            "no generator configured for {}",
            request.kind
        )))
    }
}
