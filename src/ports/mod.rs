//! Ports - interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between the
//! orchestration core and the outside world. Adapters implement these ports.
//!
//! - `ProgressStore` / `ConversationStore` - persistence contracts
//! - `LevelCatalog` - read-only product/persona lookup
//! - `DialogueGenerator` - black-box text generation endpoint
//! - `ConvictionEvaluator` - black-box conviction classifier

mod conversation_store;
mod conviction_evaluator;
mod dialogue_generator;
mod level_catalog;
mod progress_store;

pub use conversation_store::ConversationStore;
pub use conviction_evaluator::{ConvictionEvaluator, EvaluationError};
pub use dialogue_generator::{DialogueGenerator, GenerationError, GenerationRequest};
pub use level_catalog::{CatalogError, LevelCatalog};
pub use progress_store::{ProgressStore, StoreError};
