//! DialogueGenerator port - interface to the text generation endpoint.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Port for the black-box dialogue generator.
///
/// Implementations connect to an external model endpoint and return the raw
/// generated text; reply extraction happens in the engine.
#[async_trait]
pub trait DialogueGenerator: Send + Sync {
    /// Generates text for a prompt with bounded sampling parameters.
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError>;
}

/// A bounded generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Fully assembled prompt.
    pub prompt: String,
    /// Token/length cap for the completion.
    pub max_new_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Nucleus-sampling threshold.
    pub top_p: f32,
    /// Sequences that terminate generation.
    pub stop: Vec<String>,
}

impl GenerationRequest {
    /// Creates a request with the given prompt and default sampling bounds.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_new_tokens: 100,
            temperature: 0.7,
            top_p: 0.9,
            stop: Vec::new(),
        }
    }

    /// Sets the token cap.
    pub fn with_max_new_tokens(mut self, max: u32) -> Self {
        self.max_new_tokens = max;
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the nucleus-sampling threshold.
    pub fn with_top_p(mut self, top_p: f32) -> Self {
        self.top_p = top_p;
        self
    }

    /// Sets the stop sequences.
    pub fn with_stop(mut self, stop: Vec<String>) -> Self {
        self.stop = stop;
        self
    }
}

/// Generator call failures.
#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("generation endpoint unavailable: {0}")]
    Unavailable(String),

    #[error("generation request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to parse generator response: {0}")]
    Parse(String),

    #[error("invalid generation request: {0}")]
    InvalidRequest(String),
}

impl GenerationError {
    /// Returns true if retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GenerationError::Unavailable(_)
                | GenerationError::Timeout { .. }
                | GenerationError::Network(_)
        )
    }
}

impl From<GenerationError> for DomainError {
    fn from(err: GenerationError) -> Self {
        DomainError::new(ErrorCode::GenerationFailed, err.to_string())
    }
}
