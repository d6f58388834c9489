//! Conviction evaluation endpoint configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Conviction evaluation endpoint configuration.
///
/// When `endpoint_url` is unset the server falls back to a scripted
/// evaluator, which is only useful for local development.
#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationConfig {
    /// Evaluation endpoint URL
    pub endpoint_url: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl EvaluationConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if a live endpoint is configured
    pub fn has_endpoint(&self) -> bool {
        self.endpoint_url.as_ref().is_some_and(|u| !u.is_empty())
    }

    /// Validate evaluation configuration
    ///
    /// Production deployments must point at a live evaluation endpoint; the
    /// scripted fallback is a development convenience only.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if *environment == Environment::Production && !self.has_endpoint() {
            return Err(ValidationError::MissingRequired(
                "SALES_TRAINER__EVALUATION__ENDPOINT_URL",
            ));
        }
        if let Some(url) = &self.endpoint_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidEndpointUrl("evaluation"));
            }
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    15
}
