//! HTTP text-generation endpoint adapter.
//!
//! Speaks the hosted-LLM endpoint wire format: a JSON body with `inputs`
//! plus sampling `parameters`, answered by one or more `generated_text`
//! objects.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

use crate::ports::{DialogueGenerator, GenerationError, GenerationRequest};

/// Configuration for the generation endpoint.
#[derive(Debug, Clone)]
pub struct GenerationEndpointConfig {
    /// Full URL of the generation endpoint.
    pub url: String,
    /// Optional bearer token.
    api_key: Option<Secret<String>>,
    /// Request timeout.
    pub timeout: Duration,
}

impl GenerationEndpointConfig {
    /// Creates a configuration for the given endpoint URL.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
            timeout: Duration::from_secs(30),
        }
    }

    /// Sets the bearer token.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(Secret::new(api_key.into()));
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// DialogueGenerator backed by an HTTP endpoint.
pub struct HttpDialogueGenerator {
    config: GenerationEndpointConfig,
    client: Client,
}

impl HttpDialogueGenerator {
    /// Creates a new endpoint client.
    pub fn new(config: GenerationEndpointConfig) -> Result<Self, GenerationError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GenerationError::InvalidRequest(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn timeout_secs(&self) -> u32 {
        self.config.timeout.as_secs() as u32
    }
}

#[derive(Debug, Serialize)]
struct WireRequest<'a> {
    inputs: &'a str,
    parameters: WireParameters<'a>,
}

#[derive(Debug, Serialize)]
struct WireParameters<'a> {
    max_new_tokens: u32,
    temperature: f32,
    top_p: f32,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    stop: &'a [String],
}

#[derive(Debug, Deserialize)]
struct WireGenerated {
    generated_text: String,
}

// The endpoint returns a single object or a one-element array depending on
// the serving stack in front of the model.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireResponse {
    Many(Vec<WireGenerated>),
    One(WireGenerated),
}

#[async_trait]
impl DialogueGenerator for HttpDialogueGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GenerationError> {
        let body = WireRequest {
            inputs: &request.prompt,
            parameters: WireParameters {
                max_new_tokens: request.max_new_tokens,
                temperature: request.temperature,
                top_p: request.top_p,
                stop: &request.stop,
            },
        };

        let mut http_request = self.client.post(&self.config.url).json(&body);
        if let Some(key) = &self.config.api_key {
            http_request = http_request.bearer_auth(key.expose_secret());
        }

        let response = http_request.send().await.map_err(|e| {
            if e.is_timeout() {
                GenerationError::Timeout {
                    timeout_secs: self.timeout_secs(),
                }
            } else {
                GenerationError::Network(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_server_error() {
            return Err(GenerationError::Unavailable(format!(
                "endpoint returned {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(GenerationError::InvalidRequest(format!(
                "endpoint returned {}",
                status
            )));
        }

        let parsed: WireResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Parse(e.to_string()))?;

        let text = match parsed {
            WireResponse::Many(items) => items
                .into_iter()
                .next()
                .map(|g| g.generated_text)
                .ok_or_else(|| GenerationError::Parse("empty response array".to_string()))?,
            WireResponse::One(item) => item.generated_text,
        };

        debug!(chars = text.len(), "generation endpoint replied");
        Ok(text)
    }
}
