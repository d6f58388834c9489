//! ProgressStore port - persistence for per-(user, product) progress.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, ProductId, UserId};
use crate::domain::training::Progress;

/// Port for the single-snapshot progress store.
///
/// One record per (user, product); `put` overwrites the whole snapshot.
#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Fetches the snapshot for a key.
    ///
    /// A missing key yields `Progress::empty()`, never an error: callers
    /// cannot tell "never started" apart from a storage miss and must not
    /// need to.
    async fn get(&self, user_id: &UserId, product_id: &ProductId)
        -> Result<Progress, StoreError>;

    /// Overwrites the snapshot for a key.
    async fn put(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        progress: &Progress,
    ) -> Result<(), StoreError>;

    /// Removes the snapshot for a key. Deleting a missing key is not an error.
    async fn delete(&self, user_id: &UserId, product_id: &ProductId) -> Result<(), StoreError>;
}

/// Storage backend failures.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("storage backend failed: {0}")]
    Backend(String),

    #[error("storage request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl StoreError {
    /// Creates a backend failure error.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        DomainError::new(ErrorCode::StorageFailed, err.to_string())
    }
}
