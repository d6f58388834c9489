//! PostgreSQL implementation of ProgressStore.

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::domain::foundation::{Percentage, ProductId, UserId};
use crate::domain::training::{Level, Progress};
use crate::ports::{ProgressStore, StoreError};

/// Progress snapshots in the `progress` table.
#[derive(Clone)]
pub struct PostgresProgressStore {
    pool: PgPool,
}

impl PostgresProgressStore {
    /// Creates a new PostgresProgressStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProgressStore for PostgresProgressStore {
    async fn get(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
    ) -> Result<Progress, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT levels_passed, progress_percentage
            FROM progress
            WHERE user_id = $1 AND product_id = $2
            "#,
        )
        .bind(user_id.as_str())
        .bind(product_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::backend(format!("Failed to fetch progress: {}", e)))?;

        let Some(row) = row else {
            return Ok(Progress::empty());
        };

        let raw_levels: Vec<i32> = row
            .try_get("levels_passed")
            .map_err(|e| StoreError::backend(format!("Bad levels_passed column: {}", e)))?;
        let mut levels_passed = Vec::with_capacity(raw_levels.len());
        for raw in raw_levels {
            let level = Level::new(raw.max(0) as u32)
                .map_err(|e| StoreError::backend(format!("Bad stored level {}: {}", raw, e)))?;
            levels_passed.push(level);
        }

        let raw_pct: i16 = row
            .try_get("progress_percentage")
            .map_err(|e| StoreError::backend(format!("Bad progress_percentage column: {}", e)))?;

        Ok(Progress {
            levels_passed,
            progress_percentage: Percentage::new(raw_pct.clamp(0, 100) as u8),
        })
    }

    async fn put(
        &self,
        user_id: &UserId,
        product_id: &ProductId,
        progress: &Progress,
    ) -> Result<(), StoreError> {
        let levels: Vec<i32> = progress
            .levels_passed
            .iter()
            .map(|l| l.value() as i32)
            .collect();

        sqlx::query(
            r#"
            INSERT INTO progress (user_id, product_id, levels_passed, progress_percentage)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id, product_id) DO UPDATE SET
                levels_passed = EXCLUDED.levels_passed,
                progress_percentage = EXCLUDED.progress_percentage
            "#,
        )
        .bind(user_id.as_str())
        .bind(product_id.as_str())
        .bind(&levels)
        .bind(progress.progress_percentage.value() as i16)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::backend(format!("Failed to upsert progress: {}", e)))?;

        Ok(())
    }

    async fn delete(&self, user_id: &UserId, product_id: &ProductId) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM progress WHERE user_id = $1 AND product_id = $2")
            .bind(user_id.as_str())
            .bind(product_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::backend(format!("Failed to delete progress: {}", e)))?;

        Ok(())
    }
}
