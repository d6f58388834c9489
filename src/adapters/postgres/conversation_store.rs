//! PostgreSQL implementation of ConversationStore.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::domain::foundation::{ProductId, SessionId, Timestamp};
use crate::domain::training::{Level, NewTurn, TurnPosition, TurnRecord};
use crate::ports::{ConversationStore, StoreError};

/// Turn history in the `turns` table.
///
/// The latest-session lookup rides the `(product_id, level, position DESC)`
/// index created by the migration.
#[derive(Clone)]
pub struct PostgresConversationStore {
    pool: PgPool,
}

impl PostgresConversationStore {
    /// Creates a new PostgresConversationStore.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn record_from_row(row: &sqlx::postgres::PgRow) -> Result<TurnRecord, StoreError> {
    let session_id: Uuid = row
        .try_get("session_id")
        .map_err(|e| StoreError::backend(format!("Bad session_id column: {}", e)))?;
    let position: i64 = row
        .try_get("position")
        .map_err(|e| StoreError::backend(format!("Bad position column: {}", e)))?;
    let recorded_at: DateTime<Utc> = row
        .try_get("recorded_at")
        .map_err(|e| StoreError::backend(format!("Bad recorded_at column: {}", e)))?;
    let product_id: String = row
        .try_get("product_id")
        .map_err(|e| StoreError::backend(format!("Bad product_id column: {}", e)))?;
    let level: i32 = row
        .try_get("level")
        .map_err(|e| StoreError::backend(format!("Bad level column: {}", e)))?;
    let trainee_input: String = row
        .try_get("trainee_input")
        .map_err(|e| StoreError::backend(format!("Bad trainee_input column: {}", e)))?;
    let persona_reply: String = row
        .try_get("persona_reply")
        .map_err(|e| StoreError::backend(format!("Bad persona_reply column: {}", e)))?;

    Ok(TurnRecord {
        session_id: SessionId::from_uuid(session_id),
        position: TurnPosition::new(position.max(0) as u64),
        recorded_at: Timestamp::from_datetime(recorded_at),
        product_id: ProductId::new(product_id)
            .map_err(|e| StoreError::backend(format!("Bad stored product_id: {}", e)))?,
        level: Level::new(level.max(0) as u32)
            .map_err(|e| StoreError::backend(format!("Bad stored level: {}", e)))?,
        trainee_input,
        persona_reply,
    })
}

#[async_trait]
impl ConversationStore for PostgresConversationStore {
    async fn append(&self, turn: NewTurn) -> Result<TurnRecord, StoreError> {
        let row = sqlx::query(
            r#"
            INSERT INTO turns (session_id, product_id, level, trainee_input, persona_reply)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING session_id, position, recorded_at, product_id, level,
                      trainee_input, persona_reply
            "#,
        )
        .bind(turn.session_id.as_uuid())
        .bind(turn.product_id.as_str())
        .bind(turn.level.value() as i32)
        .bind(&turn.trainee_input)
        .bind(&turn.persona_reply)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::backend(format!("Failed to append turn: {}", e)))?;

        record_from_row(&row)
    }

    async fn list_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<TurnRecord>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT session_id, position, recorded_at, product_id, level,
                   trainee_input, persona_reply
            FROM turns
            WHERE session_id = $1
            ORDER BY position ASC
            "#,
        )
        .bind(session_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::backend(format!("Failed to list turns: {}", e)))?;

        rows.iter().map(record_from_row).collect()
    }

    async fn find_latest_session(
        &self,
        product_id: &ProductId,
        level: Level,
    ) -> Result<Option<SessionId>, StoreError> {
        let row = sqlx::query(
            r#"
            SELECT session_id
            FROM turns
            WHERE product_id = $1 AND level = $2
            ORDER BY position DESC
            LIMIT 1
            "#,
        )
        .bind(product_id.as_str())
        .bind(level.value() as i32)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::backend(format!("Failed to find latest session: {}", e)))?;

        match row {
            Some(row) => {
                let session_id: Uuid = row
                    .try_get("session_id")
                    .map_err(|e| StoreError::backend(format!("Bad session_id column: {}", e)))?;
                Ok(Some(SessionId::from_uuid(session_id)))
            }
            None => Ok(None),
        }
    }
}
