//! ConversationEngine - executes single conversation turns.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::foundation::{DomainError, ErrorCode, Percentage, ProductId, SessionId, UserId};
use crate::domain::training::{prompt, Level, NewTurn, Progress};
use crate::ports::{
    ConversationStore, ConvictionEvaluator, DialogueGenerator, GenerationRequest, LevelCatalog,
    ProgressStore,
};

/// Tunables for the engine, injected at construction.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    /// Actor identifier the progress ledger is keyed by. This is the
    /// simulated customer, not the trainee: who is chatting and whose
    /// mastery is tracked are deliberately separate.
    pub tracked_actor: UserId,
    /// Number of transcript lines presented to the generator.
    pub history_window: usize,
    /// Token cap for the opening turn.
    pub opening_max_new_tokens: u32,
    /// Token cap for continuation turns.
    pub continuation_max_new_tokens: u32,
    /// Sampling temperature for both turn kinds.
    pub temperature: f32,
    /// Nucleus-sampling threshold for both turn kinds.
    pub top_p: f32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            tracked_actor: UserId::new("ai-customer").expect("default actor id is non-empty"),
            history_window: prompt::DEFAULT_HISTORY_WINDOW,
            opening_max_new_tokens: 100,
            continuation_max_new_tokens: 150,
            temperature: 0.7,
            top_p: 0.9,
        }
    }
}

/// Result of opening a new session.
#[derive(Debug, Clone)]
pub struct StartedConversation {
    pub session_id: SessionId,
    pub ai_response: String,
    pub level: Level,
}

/// Result of one continuation turn.
#[derive(Debug, Clone)]
pub struct TurnOutcome {
    pub session_id: SessionId,
    pub ai_response: String,
    pub conviction_score: Percentage,
    pub mood: String,
    pub convinced: bool,
    pub levels_passed: Vec<Level>,
    pub current_level: Level,
    pub progress_percentage: Percentage,
}

/// Executes conversation turns: context assembly, generation, reply
/// extraction, conviction evaluation, progression, persistence.
pub struct ConversationEngine {
    catalog: Arc<dyn LevelCatalog>,
    generator: Arc<dyn DialogueGenerator>,
    evaluator: Arc<dyn ConvictionEvaluator>,
    conversations: Arc<dyn ConversationStore>,
    progress: Arc<dyn ProgressStore>,
    settings: EngineSettings,
    // Per-session serialization: concurrent turns against one session apply
    // one at a time. Turns on different sessions run in parallel.
    session_locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl ConversationEngine {
    pub fn new(
        catalog: Arc<dyn LevelCatalog>,
        generator: Arc<dyn DialogueGenerator>,
        evaluator: Arc<dyn ConvictionEvaluator>,
        conversations: Arc<dyn ConversationStore>,
        progress: Arc<dyn ProgressStore>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            catalog,
            generator,
            evaluator,
            conversations,
            progress,
            settings,
            session_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Opens a new session at `level`: the persona speaks first.
    pub async fn start(
        &self,
        user_id: &UserId,
        product_id: ProductId,
        level: Level,
    ) -> Result<StartedConversation, DomainError> {
        info!(%user_id, %product_id, %level, "starting new training session");

        let context = self.catalog.persona_context(&product_id, level).await?;

        let request = GenerationRequest::new(prompt::opening_prompt(&context))
            .with_max_new_tokens(self.settings.opening_max_new_tokens)
            .with_temperature(self.settings.temperature)
            .with_top_p(self.settings.top_p);
        let raw = self.generator.generate(request).await?;
        let reply = prompt::extract_reply(&raw, prompt::OPENING_DELIMITER);

        let session_id = SessionId::new();
        self.conversations
            .append(NewTurn::opening(
                session_id,
                product_id.clone(),
                level,
                reply.clone(),
            ))
            .await?;

        debug!(%session_id, "opening turn persisted");
        Ok(StartedConversation {
            session_id,
            ai_response: reply,
            level,
        })
    }

    /// Applies one trainee turn to an existing session.
    pub async fn continue_turn(
        &self,
        session_id: SessionId,
        user_input: &str,
    ) -> Result<TurnOutcome, DomainError> {
        if user_input.is_empty() {
            return Err(DomainError::validation("user_input", "'user_input' is required"));
        }

        let lock = self.session_lock(session_id).await;
        let outcome = {
            let _guard = lock.lock().await;
            self.apply_turn(session_id, user_input).await
        };
        drop(lock);
        self.release_session_lock(session_id).await;
        outcome
    }

    async fn apply_turn(
        &self,
        session_id: SessionId,
        user_input: &str,
    ) -> Result<TurnOutcome, DomainError> {
        let history = self.conversations.list_by_session(&session_id).await?;
        let first = history.first().ok_or_else(|| {
            DomainError::new(
                ErrorCode::SessionNotFound,
                format!("no conversation found for session {}", session_id),
            )
        })?;
        // Product and level come from the opening record: the level is fixed
        // at session-open time and only advances through this flow.
        let product_id = first.product_id.clone();
        let level = first.level;

        let lines = prompt::transcript_lines(&history, user_input);
        let windowed = prompt::window_lines(&lines, self.settings.history_window);

        let context = self.catalog.persona_context(&product_id, level).await?;
        let persona_delimiter = format!("{}:", context.persona_name);

        let request = GenerationRequest::new(prompt::continuation_prompt(&context, windowed))
            .with_max_new_tokens(self.settings.continuation_max_new_tokens)
            .with_temperature(self.settings.temperature)
            .with_top_p(self.settings.top_p)
            .with_stop(prompt::stop_sequences(&context.persona_name));
        let raw = self.generator.generate(request).await?;

        let reply = prompt::extract_reply(&raw, &persona_delimiter);
        if reply.is_empty() {
            warn!(%session_id, "generator produced no usable reply");
            return Err(DomainError::new(
                ErrorCode::EmptyGeneration,
                "generator produced an empty reply",
            ));
        }

        let conviction = self.evaluator.evaluate(&reply).await?;
        debug!(
            %session_id,
            score = conviction.conviction_score.value(),
            convinced = conviction.convinced,
            "persona reply evaluated"
        );

        let mut progress = self
            .progress
            .get(&self.settings.tracked_actor, &product_id)
            .await?;
        let current_level = progress.apply(level, &conviction);
        self.progress
            .put(&self.settings.tracked_actor, &product_id, &progress)
            .await?;

        if conviction.convinced {
            info!(%session_id, passed = %level, now_at = %current_level, "level passed");
        }

        // Progress is already written; a failure here leaves the two stores
        // out of step, so the error is flagged for the caller to reconcile.
        self.conversations
            .append(NewTurn::exchange(
                session_id,
                product_id,
                current_level,
                user_input,
                reply.clone(),
            ))
            .await
            .map_err(|e| DomainError::from(e).with_ambiguous_state())?;

        Ok(TurnOutcome {
            session_id,
            ai_response: reply,
            conviction_score: conviction.conviction_score,
            mood: conviction.mood,
            convinced: conviction.convinced,
            levels_passed: progress.levels_passed.clone(),
            current_level,
            progress_percentage: progress.progress_percentage,
        })
    }

    /// Progress snapshot for the tracked actor on a product.
    pub async fn tracked_progress(&self, product_id: &ProductId) -> Result<Progress, DomainError> {
        Ok(self
            .progress
            .get(&self.settings.tracked_actor, product_id)
            .await?)
    }

    async fn session_lock(&self, session_id: SessionId) -> Arc<Mutex<()>> {
        let mut locks = self.session_locks.lock().await;
        Arc::clone(locks.entry(session_id).or_default())
    }

    /// Removes the registry entry once no turn holds or awaits the lock.
    /// Keeps the map bounded by in-flight sessions instead of every session
    /// id ever seen.
    async fn release_session_lock(&self, session_id: SessionId) {
        let mut locks = self.session_locks.lock().await;
        if let Some(lock) = locks.get(&session_id) {
            if Arc::strong_count(lock) == 1 {
                locks.remove(&session_id);
            }
        }
    }
}
