//! In-memory ProgressStore adapter.
//!
//! Useful for testing and single-process deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{ProductId, UserId};
use crate::domain::training::Progress;
use crate::ports::{ProgressStore, StoreError};

/// In-memory progress snapshots keyed by (user, product).
#[derive(Debug, Clone, Default)]
pub struct InMemoryProgressStore {
    records: Arc<RwLock<HashMap<(UserId, ProductId), Progress>>>,
}

impl InMemoryProgressStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored snapshots.
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    /// True if nothing is stored.
    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl ProgressStore for InMemoryProgressStore {
    async fn get(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<Progress, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .get(&(user_id.clone(), product_id.clone()))
            .cloned()
            .unwrap_or_else(Progress::empty))
    }

    async fn put(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        progress: &Progress,
    ) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.insert((user_id.clone(), product_id.clone()), progress.clone());
        Ok(())
    }

    async fn delete(&self, user_id: &UserId, product_id: &ProductId) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.remove(&(user_id.clone(), product_id.clone()));
        Ok(())
    }
}
