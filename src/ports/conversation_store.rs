//! ConversationStore port - append-only turn history.

use async_trait::async_trait;

use crate::domain::foundation::{ProductId, SessionId};
use crate::domain::training::{Level, NewTurn, TurnRecord};

use super::StoreError;

/// Port for session turn history.
///
/// Turns are append-only and immutable; the store assigns each appended turn
/// a strictly-increasing position.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Appends a turn, returning the stored record with its assigned position.
    async fn append(&self, turn: NewTurn) -> Result<TurnRecord, StoreError>;

    /// Lists all turns for a session in ascending position order.
    ///
    /// Unknown sessions yield an empty list, not an error.
    async fn list_by_session(&self, session_id: &SessionId)
        -> Result<Vec<TurnRecord>, StoreError>;

    /// Finds the session with the most recent turn for a (product, level).
    ///
    /// Ties resolve by highest turn position. Implementations back this with
    /// a (product, level, position) index rather than a full scan.
    async fn find_latest_session(
        &self,
        product_id: &ProductId,
        level: Level,
    ) -> Result<Option<SessionId>, StoreError>;
}
