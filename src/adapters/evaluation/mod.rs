//! Conviction evaluation adapters.

mod http_endpoint;
mod scripted;

pub use http_endpoint::{EvaluationEndpointConfig, HttpConvictionEvaluator};
pub use scripted::ScriptedConvictionEvaluator;
