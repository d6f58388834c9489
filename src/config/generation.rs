//! Dialogue generation endpoint configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use super::server::Environment;

/// Dialogue generation endpoint configuration.
///
/// When `endpoint_url` is unset the server falls back to a scripted
/// generator, which is only useful for local development.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    /// Inference endpoint URL
    pub endpoint_url: Option<String>,

    /// Bearer token for the inference endpoint. Held as a `Secret` so a
    /// debug-print of the config never reveals it.
    pub api_key: Option<Secret<String>>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Token budget for the persona's opening line
    #[serde(default = "default_opening_tokens")]
    pub opening_max_new_tokens: u32,

    /// Token budget for each continuation reply
    #[serde(default = "default_continuation_tokens")]
    pub continuation_max_new_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Nucleus sampling cutoff
    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

impl GenerationConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if a live endpoint is configured
    pub fn has_endpoint(&self) -> bool {
        self.endpoint_url.as_ref().is_some_and(|u| !u.is_empty())
    }

    /// Validate generation configuration
    ///
    /// Production deployments must point at a live inference endpoint; the
    /// scripted fallback is a development convenience only.
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if *environment == Environment::Production && !self.has_endpoint() {
            return Err(ValidationError::MissingRequired(
                "SALES_TRAINER__GENERATION__ENDPOINT_URL",
            ));
        }
        if let Some(url) = &self.endpoint_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidEndpointUrl("generation"));
            }
        }
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.opening_max_new_tokens == 0 || self.continuation_max_new_tokens == 0 {
            return Err(ValidationError::InvalidTokenBudget);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::InvalidSamplingParameter("temperature"));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(ValidationError::InvalidSamplingParameter("top_p"));
        }
        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            api_key: None,
            timeout_secs: default_timeout(),
            opening_max_new_tokens: default_opening_tokens(),
            continuation_max_new_tokens: default_continuation_tokens(),
            temperature: default_temperature(),
            top_p: default_top_p(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_opening_tokens() -> u32 {
    100
}

fn default_continuation_tokens() -> u32 {
    150
}

fn default_temperature() -> f32 {
    0.7
}

fn default_top_p() -> f32 {
    0.9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generation_config_defaults() {
        let config = GenerationConfig::default();
        assert_eq!(config.opening_max_new_tokens, 100);
        assert_eq!(config.continuation_max_new_tokens, 150);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.top_p, 0.9);
        assert!(!config.has_endpoint());
    }

    #[test]
    fn test_timeout_duration() {
        let config = GenerationConfig {
            timeout_secs: 45,
            ..Default::default()
        };
        assert_eq!(config.timeout(), Duration::from_secs(45));
    }

    #[test]
    fn test_validation_rejects_bad_url() {
        let config = GenerationConfig {
            endpoint_url: Some("ftp://model.internal".to_string()),
            ..Default::default()
        };
        assert!(config.validate(&Environment::Development).is_err());
    }

    #[test]
    fn test_validation_rejects_zero_token_budget() {
        let config = GenerationConfig {
            opening_max_new_tokens: 0,
            ..Default::default()
        };
        assert!(config.validate(&Environment::Development).is_err());
    }

    #[test]
    fn test_validation_rejects_out_of_range_sampling() {
        let config = GenerationConfig {
            top_p: 1.5,
            ..Default::default()
        };
        assert!(config.validate(&Environment::Development).is_err());

        let config = GenerationConfig {
            temperature: -0.1,
            ..Default::default()
        };
        assert!(config.validate(&Environment::Development).is_err());
    }

    #[test]
    fn test_production_requires_endpoint() {
        let config = GenerationConfig::default();
        assert!(matches!(
            config.validate(&Environment::Production),
            Err(ValidationError::MissingRequired(_))
        ));

        let config = GenerationConfig {
            endpoint_url: Some("https://model.internal/generate".to_string()),
            ..Default::default()
        };
        assert!(config.validate(&Environment::Production).is_ok());
    }

    #[test]
    fn test_debug_output_redacts_api_key() {
        let config = GenerationConfig {
            api_key: Some(Secret::new("sk-very-secret".to_string())),
            ..Default::default()
        };
        let printed = format!("{:?}", config);
        assert!(!printed.contains("sk-very-secret"));
    }

    #[test]
    fn test_validation_accepts_https_endpoint() {
        let config = GenerationConfig {
            endpoint_url: Some("https://model.internal/generate".to_string()),
            ..Default::default()
        };
        assert!(config.validate(&Environment::Development).is_ok());
        assert!(config.has_endpoint());
    }
}
