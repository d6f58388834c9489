//! HTTP DTOs for the training endpoints.
//!
//! These types decouple the HTTP API from domain types. All progress-typed
//! numbers cross the boundary as plain integers/floats.

use serde::{Deserialize, Serialize};

use crate::application::{RouteOutcome, StartedConversation, TurnOutcome};
use crate::domain::training::{Progress, TurnRecord};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Request to route into a session (start, resume, or reset).
#[derive(Debug, Clone, Deserialize)]
pub struct RouteSessionRequest {
    pub user_id: String,
    pub product_id: String,
    #[serde(default)]
    pub levels_passed: u32,
    #[serde(default)]
    pub progress_percentage: f64,
    #[serde(default)]
    pub reset: bool,
}

/// Request to start a session at an explicit level.
#[derive(Debug, Clone, Deserialize)]
pub struct StartSessionRequest {
    pub user_id: String,
    pub product_id: String,
    #[serde(default = "default_level")]
    pub level: u32,
}

fn default_level() -> u32 {
    1
}

/// Request to apply one trainee turn.
#[derive(Debug, Clone, Deserialize)]
pub struct ContinueTurnRequest {
    pub user_input: String,
}

/// Query parameters identifying a progress record.
#[derive(Debug, Clone, Deserialize)]
pub struct ProgressQuery {
    pub user_id: String,
    pub product_id: String,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

/// A previously recorded exchange, returned on resume.
#[derive(Debug, Clone, Serialize)]
pub struct PreviousMessage {
    pub user_input: String,
    pub ai_response: String,
    pub timestamp: u64,
}

impl From<TurnRecord> for PreviousMessage {
    fn from(record: TurnRecord) -> Self {
        Self {
            user_input: record.trainee_input,
            ai_response: record.persona_reply,
            timestamp: record.recorded_at.as_unix_secs(),
        }
    }
}

/// Response for a freshly started session.
#[derive(Debug, Clone, Serialize)]
pub struct StartedResponse {
    pub session_id: String,
    pub ai_response: String,
    pub level: u32,
}

impl From<StartedConversation> for StartedResponse {
    fn from(started: StartedConversation) -> Self {
        Self {
            session_id: started.session_id.to_string(),
            ai_response: started.ai_response,
            level: started.level.value(),
        }
    }
}

/// Response for a resumed session: history only, no new turn.
#[derive(Debug, Clone, Serialize)]
pub struct ResumedResponse {
    pub session_id: String,
    pub previous_messages: Vec<PreviousMessage>,
}

/// Routing yields either a fresh opening or a replayed history.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum RouteSessionResponse {
    Started(StartedResponse),
    Resumed(ResumedResponse),
}

impl From<RouteOutcome> for RouteSessionResponse {
    fn from(outcome: RouteOutcome) -> Self {
        match outcome {
            RouteOutcome::Started(started) => Self::Started(started.into()),
            RouteOutcome::Resumed {
                session_id,
                previous_messages,
            } => Self::Resumed(ResumedResponse {
                session_id: session_id.to_string(),
                previous_messages: previous_messages.into_iter().map(Into::into).collect(),
            }),
        }
    }
}

/// Full result bundle for one applied turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnResponse {
    pub session_id: String,
    pub ai_response: String,
    pub conviction_score: u8,
    pub mood: String,
    pub convinced: bool,
    pub levels_passed: Vec<u32>,
    pub current_level: u32,
    pub progress_percentage: u8,
}

impl From<TurnOutcome> for TurnResponse {
    fn from(outcome: TurnOutcome) -> Self {
        Self {
            session_id: outcome.session_id.to_string(),
            ai_response: outcome.ai_response,
            conviction_score: outcome.conviction_score.value(),
            mood: outcome.mood,
            convinced: outcome.convinced,
            levels_passed: outcome.levels_passed.iter().map(|l| l.value()).collect(),
            current_level: outcome.current_level.value(),
            progress_percentage: outcome.progress_percentage.value(),
        }
    }
}

/// Stored progress snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct ProgressResponse {
    pub levels_passed: Vec<u32>,
    pub progress_percentage: u8,
}

impl From<Progress> for ProgressResponse {
    fn from(progress: Progress) -> Self {
        Self {
            levels_passed: progress.levels_passed.iter().map(|l| l.value()).collect(),
            progress_percentage: progress.progress_percentage.value(),
        }
    }
}

/// Confirmation for a progress reset.
#[derive(Debug, Clone, Serialize)]
pub struct ResetResponse {
    pub message: String,
}

/// Standard error response.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    /// Creates a bad-request error body.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "VALIDATION_FAILED".to_string(),
            message: message.into(),
        }
    }

    /// Creates a not-found error body.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            code: "NOT_FOUND".to_string(),
            message: message.into(),
        }
    }

    /// Creates an error body for a failed upstream dependency.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self {
            code: "UPSTREAM_FAILED".to_string(),
            message: message.into(),
        }
    }

    /// Creates an internal error body.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            code: "INTERNAL_ERROR".to_string(),
            message: message.into(),
        }
    }
}
