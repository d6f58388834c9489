//! In-memory adapters: stores for tests and single-process deployments,
//! plus the static YAML-backed catalog.

mod catalog;
mod conversation_store;
mod progress_store;

pub use catalog::{PersonaEntry, ProductEntry, StaticLevelCatalog};
pub use conversation_store::InMemoryConversationStore;
pub use progress_store::InMemoryProgressStore;
