//! Conviction evaluation results.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Percentage;

/// Outcome of evaluating one persona reply.
///
/// Transient: produced per turn and folded into Progress, never stored on
/// its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvictionResult {
    /// How persuaded the persona is, 0-100.
    pub conviction_score: Percentage,
    /// Free-form mood label from the evaluator.
    pub mood: String,
    /// True once the persona crosses the evaluator's threshold.
    pub convinced: bool,
}

impl ConvictionResult {
    /// Creates a new conviction result.
    pub fn new(conviction_score: Percentage, mood: impl Into<String>, convinced: bool) -> Self {
        Self {
            conviction_score,
            mood: mood.into(),
            convinced,
        }
    }
}
