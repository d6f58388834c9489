//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment
//! variables using the `config` and `dotenvy` crates. Configuration is loaded
//! with the `SALES_TRAINER` prefix and nested values use double underscores
//! as separators.
//!
//! # Example
//!
//! ```no_run
//! use sales_trainer::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod database;
mod error;
mod evaluation;
mod generation;
mod server;
mod training;

pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use evaluation::EvaluationConfig;
pub use generation::GenerationConfig;
pub use server::{Environment, ServerConfig};
pub use training::TrainingConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Every section has working defaults, so a bare environment yields a
/// development server with in-memory storage and scripted model backends.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Database configuration (PostgreSQL connection)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Dialogue generation endpoint configuration
    #[serde(default)]
    pub generation: GenerationConfig,

    /// Conviction evaluation endpoint configuration
    #[serde(default)]
    pub evaluation: EvaluationConfig,

    /// Training flow configuration
    #[serde(default)]
    pub training: TrainingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with the `SALES_TRAINER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `SALES_TRAINER__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `SALES_TRAINER__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SALES_TRAINER")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Generation and evaluation validation is environment-aware: production
    /// refuses to start without live model endpoints.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.database.validate()?;
        self.generation.validate(&self.server.environment)?;
        self.evaluation.validate(&self.server.environment)?;
        self.training.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("SALES_TRAINER__SERVER__PORT");
        env::remove_var("SALES_TRAINER__SERVER__ENVIRONMENT");
        env::remove_var("SALES_TRAINER__DATABASE__URL");
        env::remove_var("SALES_TRAINER__GENERATION__ENDPOINT_URL");
        env::remove_var("SALES_TRAINER__TRAINING__HISTORY_WINDOW");
    }

    #[test]
    fn test_load_with_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert!(config.validate().is_ok());
        assert!(!config.database.has_postgres());
        assert!(!config.generation.has_endpoint());
    }

    #[test]
    fn test_custom_server_port() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SALES_TRAINER__SERVER__PORT", "3000");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_nested_sections_load() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var(
            "SALES_TRAINER__GENERATION__ENDPOINT_URL",
            "https://model.internal/generate",
        );
        env::set_var("SALES_TRAINER__TRAINING__HISTORY_WINDOW", "6");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.generation.has_endpoint());
        assert_eq!(config.training.history_window, 6);
    }

    #[test]
    fn test_is_production() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SALES_TRAINER__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.is_production());
    }

    #[test]
    fn test_production_requires_model_endpoints() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SALES_TRAINER__SERVER__ENVIRONMENT", "production");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired(_))
        ));
    }
}
