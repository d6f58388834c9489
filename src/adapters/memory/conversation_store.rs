//! In-memory ConversationStore adapter.
//!
//! Keeps a (product, level) secondary index updated on append so the
//! latest-session lookup never scans session histories.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{ProductId, SessionId, Timestamp};
use crate::domain::training::{Level, NewTurn, TurnPosition, TurnRecord};
use crate::ports::{ConversationStore, StoreError};

#[derive(Debug, Default)]
struct Inner {
    next_position: u64,
    by_session: HashMap<SessionId, Vec<TurnRecord>>,
    // (product, level) -> session holding the highest turn position there
    latest: HashMap<(ProductId, Level), (TurnPosition, SessionId)>,
}

/// In-memory turn history with a latest-session index.
#[derive(Debug, Clone, Default)]
pub struct InMemoryConversationStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryConversationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions with at least one turn.
    pub async fn session_count(&self) -> usize {
        self.inner.read().await.by_session.len()
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn append(&self, turn: NewTurn) -> Result<TurnRecord, StoreError> {
        let mut inner = self.inner.write().await;
        inner.next_position += 1;
        let position = TurnPosition::new(inner.next_position);

        let record = TurnRecord {
            session_id: turn.session_id,
            position,
            recorded_at: Timestamp::now(),
            product_id: turn.product_id.clone(),
            level: turn.level,
            trainee_input: turn.trainee_input,
            persona_reply: turn.persona_reply,
        };

        inner
            .by_session
            .entry(turn.session_id)
            .or_default()
            .push(record.clone());
        inner
            .latest
            .insert((turn.product_id, turn.level), (position, turn.session_id));

        Ok(record)
    }

    async fn list_by_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Vec<TurnRecord>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.by_session.get(session_id).cloned().unwrap_or_default())
    }

    async fn find_latest_session(
        &self,
        product_id: &ProductId,
        level: Level,
    ) -> Result<Option<SessionId>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .latest
            .get(&(product_id.clone(), level))
            .map(|(_, session_id)| *session_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product() -> ProductId {
        ProductId::new("p1").unwrap()
    }

    fn opening(session_id: SessionId, level: Level) -> NewTurn {
        NewTurn::opening(session_id, product(), level, "Hello")
    }

    #[tokio::test]
    async fn append_assigns_strictly_increasing_positions() {
        let store = InMemoryConversationStore::new();
        let session = SessionId::new();

        let first = store.append(opening(session, Level::ONE)).await.unwrap();
        let second = store
            .append(NewTurn::exchange(
                session,
                product(),
                Level::ONE,
                "pitch",
                "question",
            ))
            .await
            .unwrap();

        assert!(second.position > first.position);
    }

    #[tokio::test]
    async fn list_by_session_returns_chronological_order() {
        let store = InMemoryConversationStore::new();
        let session = SessionId::new();

        store.append(opening(session, Level::ONE)).await.unwrap();
        for i in 0..5 {
            store
                .append(NewTurn::exchange(
                    session,
                    product(),
                    Level::ONE,
                    format!("pitch {}", i),
                    format!("question {}", i),
                ))
                .await
                .unwrap();
        }

        let history = store.list_by_session(&session).await.unwrap();
        assert_eq!(history.len(), 6);
        for pair in history.windows(2) {
            assert!(pair[0].position < pair[1].position);
        }
    }

    #[tokio::test]
    async fn list_of_unknown_session_is_empty_not_error() {
        let store = InMemoryConversationStore::new();
        let history = store.list_by_session(&SessionId::new()).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn find_latest_session_resolves_ties_by_recency() {
        let store = InMemoryConversationStore::new();
        let older = SessionId::new();
        let newer = SessionId::new();

        store.append(opening(older, Level::ONE)).await.unwrap();
        store.append(opening(newer, Level::ONE)).await.unwrap();

        let found = store
            .find_latest_session(&product(), Level::ONE)
            .await
            .unwrap();
        assert_eq!(found, Some(newer));

        // a fresh turn on the older session makes it latest again
        store
            .append(NewTurn::exchange(
                older,
                product(),
                Level::ONE,
                "pitch",
                "question",
            ))
            .await
            .unwrap();
        let found = store
            .find_latest_session(&product(), Level::ONE)
            .await
            .unwrap();
        assert_eq!(found, Some(older));
    }

    #[tokio::test]
    async fn find_latest_session_is_level_scoped() {
        let store = InMemoryConversationStore::new();
        let session = SessionId::new();
        store.append(opening(session, Level::ONE)).await.unwrap();

        let found = store
            .find_latest_session(&product(), Level::new(2).unwrap())
            .await
            .unwrap();
        assert_eq!(found, None);
    }
}
