//! HTTP handlers for the training endpoints.
//!
//! These handlers connect Axum routes to application layer operations.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tracing::error;

use crate::application::{ConversationEngine, ProgressService, RouteCommand, SessionRouter};
use crate::domain::foundation::{DomainError, Percentage, ProductId, SessionId, UserId};
use crate::domain::training::Level;

use super::dto::{
    ContinueTurnRequest, ErrorResponse, ProgressQuery, ProgressResponse, ResetResponse,
    RouteSessionRequest, RouteSessionResponse, StartSessionRequest, StartedResponse, TurnResponse,
};

// ════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════

/// Shared application state for training handlers.
#[derive(Clone)]
pub struct TrainingAppState {
    pub router: Arc<SessionRouter>,
    pub engine: Arc<ConversationEngine>,
    pub progress: Arc<ProgressService>,
}

impl TrainingAppState {
    /// Creates a new TrainingAppState.
    pub fn new(
        router: Arc<SessionRouter>,
        engine: Arc<ConversationEngine>,
        progress: Arc<ProgressService>,
    ) -> Self {
        Self {
            router,
            engine,
            progress,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// POST /api/conversations
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/conversations - Route into a session.
///
/// Applies the routing policy: reset, resume, or start fresh, based on the
/// caller's recorded progress.
///
/// # Errors
/// - 400 Bad Request: malformed IDs or out-of-range progress
/// - 404 Not Found: unknown product or level
/// - 502 Bad Gateway: generation backend failed
pub async fn route_session(
    State(state): State<TrainingAppState>,
    Json(request): Json<RouteSessionRequest>,
) -> Result<impl IntoResponse, TrainingApiError> {
    let cmd = RouteCommand {
        user_id: parse_user_id(&request.user_id)?,
        product_id: parse_product_id(&request.product_id)?,
        levels_passed: request.levels_passed,
        progress_percentage: parse_percentage(request.progress_percentage)?,
        reset: request.reset,
    };

    let outcome = state.router.route(cmd).await.map_err(map_domain_error)?;
    Ok((StatusCode::OK, Json(RouteSessionResponse::from(outcome))))
}

// ════════════════════════════════════════════════════════════════════════════
// POST /api/conversations/start
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/conversations/start - Open a session at an explicit level.
///
/// The persona speaks first; the opening line comes back with the new
/// session ID.
pub async fn start_session(
    State(state): State<TrainingAppState>,
    Json(request): Json<StartSessionRequest>,
) -> Result<impl IntoResponse, TrainingApiError> {
    let user_id = parse_user_id(&request.user_id)?;
    let product_id = parse_product_id(&request.product_id)?;
    let level = Level::new(request.level)
        .map_err(|_| TrainingApiError::BadRequest("'level' must be at least 1".to_string()))?;

    let started = state
        .engine
        .start(&user_id, product_id, level)
        .await
        .map_err(map_domain_error)?;
    Ok((StatusCode::OK, Json(StartedResponse::from(started))))
}

// ════════════════════════════════════════════════════════════════════════════
// POST /api/conversations/{session_id}/turns
// ════════════════════════════════════════════════════════════════════════════

/// POST /api/conversations/{session_id}/turns - Apply one trainee turn.
///
/// Generates the persona's reply, evaluates conviction, applies the level
/// progression rules, and persists the exchange.
///
/// # Errors
/// - 400 Bad Request: empty input or malformed session ID
/// - 404 Not Found: no conversation under that session ID
/// - 502 Bad Gateway: generation or evaluation backend failed
pub async fn continue_session(
    State(state): State<TrainingAppState>,
    Path(session_id): Path<String>,
    Json(request): Json<ContinueTurnRequest>,
) -> Result<impl IntoResponse, TrainingApiError> {
    let session_id: SessionId = session_id
        .parse()
        .map_err(|_| TrainingApiError::BadRequest("Invalid session ID format".to_string()))?;

    let outcome = state
        .engine
        .continue_turn(session_id, &request.user_input)
        .await
        .map_err(map_domain_error)?;
    Ok((StatusCode::OK, Json(TurnResponse::from(outcome))))
}

// ════════════════════════════════════════════════════════════════════════════
// GET /api/progress
// ════════════════════════════════════════════════════════════════════════════

/// GET /api/progress - Read stored progress for a user and product.
///
/// A user with no record gets the empty snapshot, never a 404.
pub async fn check_progress(
    State(state): State<TrainingAppState>,
    Query(query): Query<ProgressQuery>,
) -> Result<impl IntoResponse, TrainingApiError> {
    let user_id = parse_user_id(&query.user_id)?;
    let product_id = parse_product_id(&query.product_id)?;

    let progress = state
        .progress
        .check(&user_id, &product_id)
        .await
        .map_err(map_domain_error)?;
    Ok((StatusCode::OK, Json(ProgressResponse::from(progress))))
}

// ════════════════════════════════════════════════════════════════════════════
// DELETE /api/progress
// ════════════════════════════════════════════════════════════════════════════

/// DELETE /api/progress - Discard stored progress for a user and product.
///
/// Deleting an absent record succeeds.
pub async fn reset_progress(
    State(state): State<TrainingAppState>,
    Query(query): Query<ProgressQuery>,
) -> Result<impl IntoResponse, TrainingApiError> {
    let user_id = parse_user_id(&query.user_id)?;
    let product_id = parse_product_id(&query.product_id)?;

    state
        .progress
        .reset(&user_id, &product_id)
        .await
        .map_err(map_domain_error)?;
    Ok((
        StatusCode::OK,
        Json(ResetResponse {
            message: "Progress reset".to_string(),
        }),
    ))
}

// ════════════════════════════════════════════════════════════════════════════
// Helper Functions
// ════════════════════════════════════════════════════════════════════════════

fn parse_user_id(raw: &str) -> Result<UserId, TrainingApiError> {
    UserId::new(raw).map_err(|_| TrainingApiError::BadRequest("'user_id' is required".to_string()))
}

fn parse_product_id(raw: &str) -> Result<ProductId, TrainingApiError> {
    ProductId::new(raw)
        .map_err(|_| TrainingApiError::BadRequest("'product_id' is required".to_string()))
}

fn parse_percentage(raw: f64) -> Result<Percentage, TrainingApiError> {
    if !raw.is_finite() || raw < 0.0 || raw > 100.0 {
        return Err(TrainingApiError::BadRequest(
            "'progress_percentage' must be between 0 and 100".to_string(),
        ));
    }
    Ok(Percentage::new(raw.round() as u8))
}

// ════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════

/// API error type that converts domain errors to HTTP responses.
#[derive(Debug)]
pub enum TrainingApiError {
    BadRequest(String),
    NotFound(String),
    Upstream(String),
    Internal(String),
}

/// Classifies a domain error into its HTTP shape.
fn map_domain_error(error: DomainError) -> TrainingApiError {
    if error.code.is_validation() {
        TrainingApiError::BadRequest(error.message)
    } else if error.code.is_not_found() {
        TrainingApiError::NotFound(error.message)
    } else if error.code.is_retryable() {
        TrainingApiError::Upstream(error.message)
    } else {
        TrainingApiError::Internal(error.to_string())
    }
}

impl IntoResponse for TrainingApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            TrainingApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::bad_request(msg))
            }
            TrainingApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse::not_found(msg)),
            TrainingApiError::Upstream(msg) => {
                error!("upstream dependency failed: {}", msg);
                (StatusCode::BAD_GATEWAY, ErrorResponse::upstream(msg))
            }
            TrainingApiError::Internal(msg) => {
                error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::internal("An internal error occurred"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
