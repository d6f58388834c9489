//! Application layer: orchestration over the domain and ports.

pub mod engine;
pub mod progress;
pub mod router;

pub use engine::{ConversationEngine, EngineSettings, StartedConversation, TurnOutcome};
pub use progress::ProgressService;
pub use router::{RouteCommand, RouteOutcome, SessionRouter};
