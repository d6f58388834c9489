//! Axum routes for the training endpoints.

use axum::routing::{get, post};
use axum::Router;

use super::handlers::{
    check_progress, continue_session, reset_progress, route_session, start_session,
    TrainingAppState,
};

/// Creates routes for training endpoints.
///
/// Endpoints:
/// - POST /conversations - Route into a session (start, resume, or reset)
/// - POST /conversations/start - Open a session at an explicit level
/// - POST /conversations/{session_id}/turns - Apply one trainee turn
/// - GET /progress - Read stored progress
/// - DELETE /progress - Discard stored progress
pub fn training_routes() -> Router<TrainingAppState> {
    Router::new()
        .route("/conversations", post(route_session))
        .route("/conversations/start", post(start_session))
        .route("/conversations/:session_id/turns", post(continue_session))
        .route("/progress", get(check_progress).delete(reset_progress))
}

/// Combined router with all training routes under /api.
pub fn training_router() -> Router<TrainingAppState> {
    Router::new().nest("/api", training_routes())
}
