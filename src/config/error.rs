//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Invalid endpoint URL: {0}")]
    InvalidEndpointUrl(&'static str),

    #[error("History window must be at least 1")]
    InvalidHistoryWindow,

    #[error("Sampling parameter out of range: {0}")]
    InvalidSamplingParameter(&'static str),

    #[error("Token budget must be at least 1")]
    InvalidTokenBudget,

    #[error("Tracked actor must not be empty")]
    EmptyTrackedActor,
}
