//! Dialogue generation adapters.

mod http_endpoint;
mod scripted;

pub use http_endpoint::{GenerationEndpointConfig, HttpDialogueGenerator};
pub use scripted::ScriptedDialogueGenerator;
