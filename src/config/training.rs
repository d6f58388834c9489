//! Training flow configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Training flow configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    /// User ID under which cross-turn progress is stored
    #[serde(default = "default_tracked_actor")]
    pub tracked_actor: String,

    /// Number of transcript lines kept in the continuation prompt
    #[serde(default = "default_history_window")]
    pub history_window: usize,

    /// Path to the YAML persona/product catalog
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,
}

impl TrainingConfig {
    /// Validate training configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.tracked_actor.trim().is_empty() {
            return Err(ValidationError::EmptyTrackedActor);
        }
        if self.history_window == 0 {
            return Err(ValidationError::InvalidHistoryWindow);
        }
        Ok(())
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            tracked_actor: default_tracked_actor(),
            history_window: default_history_window(),
            catalog_path: default_catalog_path(),
        }
    }
}

fn default_tracked_actor() -> String {
    "ai-customer".to_string()
}

fn default_history_window() -> usize {
    10
}

fn default_catalog_path() -> String {
    "config/catalog.yaml".to_string()
}
