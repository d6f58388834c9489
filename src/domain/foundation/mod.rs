//! Foundation value objects shared across the domain.

mod errors;
mod ids;
mod percentage;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ProductId, SessionId, UserId};
pub use percentage::Percentage;
pub use timestamp::Timestamp;
