//! PostgreSQL store adapters.

mod conversation_store;
mod progress_store;

pub use conversation_store::PostgresConversationStore;
pub use progress_store::PostgresProgressStore;
