//! Stored conversation turns.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ProductId, SessionId, Timestamp};

use super::Level;

/// Position of a turn within the store's total order.
///
/// Assigned by the ConversationStore on append and strictly increasing, so
/// history reads come back in chronological order and "most recent session"
/// lookups have an unambiguous tiebreaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TurnPosition(u64);

impl TurnPosition {
    /// Creates a position from a raw sequence value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw sequence value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// A turn as submitted for persistence, before the store assigns a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTurn {
    pub session_id: SessionId,
    pub product_id: ProductId,
    pub level: Level,
    /// Trainee text; empty on the opening turn where the persona speaks first.
    pub trainee_input: String,
    pub persona_reply: String,
}

impl NewTurn {
    /// Creates the opening turn of a session: persona speaks, trainee is silent.
    pub fn opening(
        session_id: SessionId,
        product_id: ProductId,
        level: Level,
        persona_reply: impl Into<String>,
    ) -> Self {
        Self {
            session_id,
            product_id,
            level,
            trainee_input: String::new(),
            persona_reply: persona_reply.into(),
        }
    }

    /// Creates a regular exchange turn.
    pub fn exchange(
        session_id: SessionId,
        product_id: ProductId,
        level: Level,
        trainee_input: impl Into<String>,
        persona_reply: impl Into<String>,
    ) -> Self {
        Self {
            session_id,
            product_id,
            level,
            trainee_input: trainee_input.into(),
            persona_reply: persona_reply.into(),
        }
    }
}

/// A persisted turn. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    pub session_id: SessionId,
    pub position: TurnPosition,
    pub recorded_at: Timestamp,
    pub product_id: ProductId,
    pub level: Level,
    pub trainee_input: String,
    pub persona_reply: String,
}

impl TurnRecord {
    /// Returns true if neither side said anything.
    pub fn is_empty(&self) -> bool {
        self.trainee_input.is_empty() && self.persona_reply.is_empty()
    }

    /// Returns true if the trainee spoke in this turn.
    pub fn has_trainee_input(&self) -> bool {
        !self.trainee_input.is_empty()
    }
}
