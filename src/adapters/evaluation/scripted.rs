//! Scripted evaluator for local development and tests.

use async_trait::async_trait;

use crate::domain::foundation::Percentage;
use crate::domain::training::ConvictionResult;
use crate::ports::{ConvictionEvaluator, EvaluationError};

/// Returns a fixed conviction verdict for every reply.
pub struct ScriptedConvictionEvaluator {
    result: ConvictionResult,
}

impl ScriptedConvictionEvaluator {
    /// Creates an evaluator that always returns `result`.
    pub fn returning(result: ConvictionResult) -> Self {
        Self { result }
    }

    /// An evaluator stuck at mild interest; handy default for local runs.
    pub fn lukewarm() -> Self {
        Self::returning(ConvictionResult::new(
            Percentage::new(35),
            "noncommittal",
            false,
        ))
    }
}

#[async_trait]
impl ConvictionEvaluator for ScriptedConvictionEvaluator {
    async fn evaluate(&self, _reply: &str) -> Result<ConvictionResult, EvaluationError> {
        Ok(self.result.clone())
    }
}
