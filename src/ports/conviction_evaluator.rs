//! ConvictionEvaluator port - interface to the sentiment/conviction classifier.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::domain::training::ConvictionResult;

/// Port for the black-box conviction evaluator.
///
/// Maps one persona reply to a conviction score, mood label, and the
/// convinced flag that drives level progression.
#[async_trait]
pub trait ConvictionEvaluator: Send + Sync {
    /// Evaluates a persona reply.
    async fn evaluate(&self, reply: &str) -> Result<ConvictionResult, EvaluationError>;
}

/// Evaluator call failures.
#[derive(Debug, Clone, Error)]
pub enum EvaluationError {
    #[error("evaluation endpoint unavailable: {0}")]
    Unavailable(String),

    #[error("evaluation request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to parse evaluator response: {0}")]
    Parse(String),
}

impl EvaluationError {
    /// Returns true if retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            EvaluationError::Unavailable(_)
                | EvaluationError::Timeout { .. }
                | EvaluationError::Network(_)
        )
    }
}

impl From<EvaluationError> for DomainError {
    fn from(err: EvaluationError) -> Self {
        DomainError::new(ErrorCode::EvaluationFailed, err.to_string())
    }
}
