//! SessionRouter - decides whether to start, resume, or reset.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::foundation::{DomainError, Percentage, ProductId, SessionId, UserId};
use crate::domain::training::{Level, TurnRecord};
use crate::ports::{ConversationStore, ProgressStore};

use super::engine::{ConversationEngine, StartedConversation};

/// Routing input: the caller's recorded view of progress.
#[derive(Debug, Clone)]
pub struct RouteCommand {
    pub user_id: UserId,
    pub product_id: ProductId,
    /// Most recently passed level, 0 when none.
    pub levels_passed: u32,
    /// In-level conviction fraction from the last recorded turn.
    pub progress_percentage: Percentage,
    /// Discard stored progress and start over at level 1.
    pub reset: bool,
}

/// What the router decided.
#[derive(Debug, Clone)]
pub enum RouteOutcome {
    /// A fresh session was opened and the persona spoke first.
    Started(StartedConversation),
    /// An in-progress session was found; its history is returned without
    /// generating a new turn.
    Resumed {
        session_id: SessionId,
        previous_messages: Vec<TurnRecord>,
    },
}

/// Entry orchestrator for the training flow.
pub struct SessionRouter {
    engine: Arc<ConversationEngine>,
    conversations: Arc<dyn ConversationStore>,
    progress: Arc<dyn ProgressStore>,
}

impl SessionRouter {
    pub fn new(
        engine: Arc<ConversationEngine>,
        conversations: Arc<dyn ConversationStore>,
        progress: Arc<dyn ProgressStore>,
    ) -> Self {
        Self {
            engine,
            conversations,
            progress,
        }
    }

    /// Routes a trainee into a session.
    ///
    /// Policy, in precedence order: reset wins and starts over at level 1;
    /// positive in-level progress resumes the latest session at the level
    /// being attempted; a passed level with no progress starts fresh at the
    /// next level; otherwise start fresh at level 1.
    pub async fn route(&self, cmd: RouteCommand) -> Result<RouteOutcome, DomainError> {
        debug!(
            user_id = %cmd.user_id,
            product_id = %cmd.product_id,
            levels_passed = cmd.levels_passed,
            progress = %cmd.progress_percentage,
            reset = cmd.reset,
            "routing session"
        );

        if cmd.reset {
            info!(user_id = %cmd.user_id, product_id = %cmd.product_id, "reset requested, starting over at level 1");
            self.progress.delete(&cmd.user_id, &cmd.product_id).await?;
            return self.start(&cmd, Level::ONE).await;
        }

        if cmd.levels_passed == 0 {
            if cmd.progress_percentage.is_positive() {
                // An unfinished level-1 conversation exists somewhere.
                return self.resume_or_start(&cmd, Level::ONE).await;
            }
            return self.start(&cmd, Level::ONE).await;
        }

        let next_level = Level::new(cmd.levels_passed)
            .map_err(DomainError::from)?
            .next();
        if cmd.progress_percentage.is_positive() {
            self.resume_or_start(&cmd, next_level).await
        } else {
            self.start(&cmd, next_level).await
        }
    }

    async fn start(&self, cmd: &RouteCommand, level: Level) -> Result<RouteOutcome, DomainError> {
        let started = self
            .engine
            .start(&cmd.user_id, cmd.product_id.clone(), level)
            .await?;
        Ok(RouteOutcome::Started(started))
    }

    /// Read-only resume: fetch the latest session's history at `level`.
    /// Never invokes the generator; a missing session falls back to a fresh
    /// start at the same level.
    async fn resume_or_start(
        &self,
        cmd: &RouteCommand,
        level: Level,
    ) -> Result<RouteOutcome, DomainError> {
        let latest = self
            .conversations
            .find_latest_session(&cmd.product_id, level)
            .await?;

        match latest {
            Some(session_id) => {
                info!(%session_id, %level, "resuming latest session");
                let previous_messages = self.conversations.list_by_session(&session_id).await?;
                Ok(RouteOutcome::Resumed {
                    session_id,
                    previous_messages,
                })
            }
            None => {
                debug!(%level, "no session to resume, starting fresh");
                self.start(cmd, level).await
            }
        }
    }
}
