//! Progress check/reset service.

use std::sync::Arc;

use tracing::info;

use crate::domain::foundation::{DomainError, ProductId, UserId};
use crate::domain::training::Progress;
use crate::ports::ProgressStore;

/// Read/clear access to the progress ledger.
pub struct ProgressService {
    store: Arc<dyn ProgressStore>,
}

impl ProgressService {
    pub fn new(store: Arc<dyn ProgressStore>) -> Self {
        Self { store }
    }

    /// Returns the stored snapshot, or the empty default for a pair never
    /// seen. Idempotent: repeated calls without an intervening turn return
    /// identical results.
    pub async fn check(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<Progress, DomainError> {
        Ok(self.store.get(user_id, product_id).await?)
    }

    /// Deletes the snapshot for a pair, returning the trainee to level 1.
    pub async fn reset(&self, user_id: &UserId, product_id: &ProductId) -> Result<(), DomainError> {
        self.store.delete(user_id, product_id).await?;
        info!(%user_id, %product_id, "progress reset to level 1");
        Ok(())
    }
}
