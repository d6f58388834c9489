//! HTTP conviction-evaluation endpoint adapter.
//!
//! Posts the persona reply and reads back the classifier verdict:
//! `{conviction_score, mood, convinced}`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::domain::foundation::Percentage;
use crate::domain::training::ConvictionResult;
use crate::ports::{ConvictionEvaluator, EvaluationError};

/// Configuration for the evaluation endpoint.
#[derive(Debug, Clone)]
pub struct EvaluationEndpointConfig {
    /// Full URL of the evaluation endpoint.
    pub url: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl EvaluationEndpointConfig {
    /// Creates a configuration for the given endpoint URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(15),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// ConvictionEvaluator backed by an HTTP endpoint.
pub struct HttpConvictionEvaluator {
    config: EvaluationEndpointConfig,
    client: Client,
}

impl HttpConvictionEvaluator {
    /// Creates a new endpoint client.
    pub fn new(config: EvaluationEndpointConfig) -> Result<Self, EvaluationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| EvaluationError::Network(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn timeout_secs(&self) -> u32 {
        self.config.timeout.as_secs() as u32
    }
}

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    ai_response: &'a str,
}

#[derive(Debug, Deserialize)]
struct WireVerdict {
    conviction_score: f64,
    mood: String,
    convinced: bool,
}

#[async_trait]
impl ConvictionEvaluator for HttpConvictionEvaluator {
    async fn evaluate(&self, reply: &str) -> Result<ConvictionResult, EvaluationError> {
        let response = self
            .client
            .post(&self.config.url)
            .json(&WireRequest { ai_response: reply })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    EvaluationError::Timeout {
                        timeout_secs: self.timeout_secs(),
                    }
                } else {
                    EvaluationError::Network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(EvaluationError::Unavailable(format!(
                "endpoint returned {}",
                status
            )));
        }

        let verdict: WireVerdict = response
            .json()
            .await
            .map_err(|e| EvaluationError::Parse(e.to_string()))?;

        // scores may arrive as floats; normalize to the 0-100 integer scale
        let score = verdict.conviction_score.clamp(0.0, 100.0).round() as u8;
        debug!(score, convinced = verdict.convinced, "conviction verdict");

        Ok(ConvictionResult::new(
            Percentage::new(score),
            verdict.mood,
            verdict.convinced,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_request_carries_reply_text() {
        let json = serde_json::to_value(WireRequest {
            ai_response: "I need more details.",
        })
        .unwrap();
        assert_eq!(json["ai_response"], "I need more details.");
    }

    #[test]
    fn wire_verdict_parses_float_scores() {
        let verdict: WireVerdict = serde_json::from_str(
            r#"{"conviction_score": 72.4, "mood": "interested", "convinced": false}"#,
        )
        .unwrap();
        assert_eq!(verdict.conviction_score, 72.4);
        assert_eq!(verdict.mood, "interested");
        assert!(!verdict.convinced);
    }
}
