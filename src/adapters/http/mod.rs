//! HTTP adapter: Axum routes, handlers, and DTOs for the training API.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::TrainingAppState;
pub use routes::{training_router, training_routes};
