//! Integration tests for the full training flow.
//!
//! These tests wire the router, engine, and progress service over the
//! in-memory adapters and a scripted generator, and walk a trainee through
//! starting, pitching, passing a level, resuming, and resetting.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use sales_trainer::adapters::generation::ScriptedDialogueGenerator;
use sales_trainer::adapters::memory::{
    InMemoryConversationStore, InMemoryProgressStore, StaticLevelCatalog,
};
use sales_trainer::application::{
    ConversationEngine, EngineSettings, ProgressService, RouteCommand, RouteOutcome, SessionRouter,
};
use sales_trainer::domain::foundation::{Percentage, ProductId, UserId};
use sales_trainer::domain::training::{ConvictionResult, Level};
use sales_trainer::ports::{
    ConversationStore, ConvictionEvaluator, DialogueGenerator, EvaluationError, ProgressStore,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

const CATALOG_YAML: &str = r#"
products:
  solarmax:
    name: SolarMax Panels
    description: Rooftop solar panels with battery storage.
    levels:
      1:
        name: Maria
        primary_trait: Skeptical
        description: A homeowner wary of upfront costs.
      2:
        name: Victor
        primary_trait: Analytical
        description: An engineer who wants hard numbers.
      3:
        name: Elena
        primary_trait: Dismissive
        description: A landlord convinced solar is a fad.
"#;

/// Evaluator replaying a fixed sequence of verdicts.
struct SequencedEvaluator {
    verdicts: Mutex<Vec<ConvictionResult>>,
}

impl SequencedEvaluator {
    fn new(verdicts: Vec<ConvictionResult>) -> Self {
        Self {
            verdicts: Mutex::new(verdicts),
        }
    }
}

#[async_trait]
impl ConvictionEvaluator for SequencedEvaluator {
    async fn evaluate(&self, _reply: &str) -> Result<ConvictionResult, EvaluationError> {
        let mut verdicts = self.verdicts.lock().unwrap();
        if verdicts.is_empty() {
            return Err(EvaluationError::Unavailable("verdict script ran out".into()));
        }
        Ok(verdicts.remove(0))
    }
}

struct Harness {
    router: SessionRouter,
    engine: Arc<ConversationEngine>,
    progress_service: ProgressService,
}

fn harness(script: Vec<String>, verdicts: Vec<ConvictionResult>) -> Harness {
    let catalog = Arc::new(StaticLevelCatalog::from_yaml_str(CATALOG_YAML).unwrap());
    let conversations = Arc::new(InMemoryConversationStore::new());
    let progress = Arc::new(InMemoryProgressStore::new());
    let generator = Arc::new(ScriptedDialogueGenerator::with_script(script));
    let evaluator = Arc::new(SequencedEvaluator::new(verdicts));

    let engine = Arc::new(ConversationEngine::new(
        catalog,
        generator as Arc<dyn DialogueGenerator>,
        evaluator,
        Arc::clone(&conversations) as Arc<dyn ConversationStore>,
        Arc::clone(&progress) as Arc<dyn ProgressStore>,
        EngineSettings::default(),
    ));
    let router = SessionRouter::new(
        Arc::clone(&engine),
        Arc::clone(&conversations) as Arc<dyn ConversationStore>,
        Arc::clone(&progress) as Arc<dyn ProgressStore>,
    );
    let progress_service = ProgressService::new(progress as Arc<dyn ProgressStore>);

    Harness {
        router,
        engine,
        progress_service,
    }
}

fn trainee() -> UserId {
    UserId::new("trainee-1").unwrap()
}

fn tracked_actor() -> UserId {
    UserId::new("ai-customer").unwrap()
}

fn product() -> ProductId {
    ProductId::new("solarmax").unwrap()
}

fn fresh_route() -> RouteCommand {
    RouteCommand {
        user_id: trainee(),
        product_id: product(),
        levels_passed: 0,
        progress_percentage: Percentage::ZERO,
        reset: false,
    }
}

fn verdict(score: u8, mood: &str, convinced: bool) -> ConvictionResult {
    ConvictionResult::new(Percentage::new(score), mood, convinced)
}

// =============================================================================
// Flow Tests
// =============================================================================

#[tokio::test]
async fn fresh_trainee_gets_a_level_one_opening() {
    let h = harness(
        vec!["Assistant: So, what's this about solar panels?".to_string()],
        vec![],
    );

    let outcome = h.router.route(fresh_route()).await.unwrap();
    match outcome {
        RouteOutcome::Started(started) => {
            assert_eq!(started.level, Level::ONE);
            assert_eq!(started.ai_response, "So, what's this about solar panels?");
        }
        _ => panic!("expected a fresh start"),
    }
}

#[tokio::test]
async fn unconvinced_turn_records_in_level_progress() {
    let h = harness(
        vec![
            "Assistant: So, what's this about solar panels?".to_string(),
            "Maria: I've heard these break after a few years.\nSalesperson:".to_string(),
        ],
        vec![verdict(40, "doubtful", false)],
    );

    let started = match h.router.route(fresh_route()).await.unwrap() {
        RouteOutcome::Started(started) => started,
        _ => panic!("expected a fresh start"),
    };

    let turn = h
        .engine
        .continue_turn(started.session_id, "They carry a 25-year warranty.")
        .await
        .unwrap();

    assert_eq!(turn.ai_response, "I've heard these break after a few years.");
    assert_eq!(turn.conviction_score.value(), 40);
    assert!(!turn.convinced);
    assert!(turn.levels_passed.is_empty());
    assert_eq!(turn.current_level, Level::ONE);
    assert_eq!(turn.progress_percentage.value(), 40);

    // Progress is stored under the simulated customer, not the trainee.
    let stored = h
        .progress_service
        .check(&tracked_actor(), &product())
        .await
        .unwrap();
    assert_eq!(stored.progress_percentage.value(), 40);
    assert!(stored.levels_passed.is_empty());
}

#[tokio::test]
async fn convinced_turn_passes_the_level_and_resets_the_fraction() {
    let h = harness(
        vec![
            "Assistant: So, what's this about solar panels?".to_string(),
            "Maria: Alright, you've won me over. Where do I sign?".to_string(),
        ],
        vec![verdict(92, "enthusiastic", true)],
    );

    let started = match h.router.route(fresh_route()).await.unwrap() {
        RouteOutcome::Started(started) => started,
        _ => panic!("expected a fresh start"),
    };

    let turn = h
        .engine
        .continue_turn(started.session_id, "The payback period is under six years.")
        .await
        .unwrap();

    assert!(turn.convinced);
    assert_eq!(turn.levels_passed, vec![Level::ONE]);
    assert_eq!(turn.current_level, Level::new(2).unwrap());
    assert_eq!(turn.progress_percentage, Percentage::ZERO);

    let stored = h
        .progress_service
        .check(&tracked_actor(), &product())
        .await
        .unwrap();
    assert_eq!(stored.levels_passed, vec![Level::ONE]);
    assert_eq!(stored.progress_percentage, Percentage::ZERO);
}

#[tokio::test]
async fn partial_progress_resumes_the_same_session() {
    let h = harness(
        vec![
            "Assistant: So, what's this about solar panels?".to_string(),
            "Maria: Hmm, tell me more about the battery.".to_string(),
        ],
        vec![verdict(55, "curious", false)],
    );

    let started = match h.router.route(fresh_route()).await.unwrap() {
        RouteOutcome::Started(started) => started,
        _ => panic!("expected a fresh start"),
    };
    h.engine
        .continue_turn(started.session_id, "It stores a full day of power.")
        .await
        .unwrap();

    // Route again with the progress the first turn produced.
    let cmd = RouteCommand {
        progress_percentage: Percentage::new(55),
        ..fresh_route()
    };
    match h.router.route(cmd).await.unwrap() {
        RouteOutcome::Resumed {
            session_id,
            previous_messages,
        } => {
            assert_eq!(session_id, started.session_id);
            assert_eq!(previous_messages.len(), 2);
            assert!(previous_messages[0].trainee_input.is_empty());
            assert_eq!(
                previous_messages[1].trainee_input,
                "It stores a full day of power."
            );
        }
        _ => panic!("expected a resume"),
    }
}

#[tokio::test]
async fn passed_level_routes_to_the_next_persona() {
    let h = harness(
        vec![
            "Assistant: So, what's this about solar panels?".to_string(),
            "Maria: Fine, I'm convinced.".to_string(),
            "Assistant: I'm an engineer. Show me the efficiency curves.".to_string(),
        ],
        vec![verdict(95, "enthusiastic", true)],
    );

    let started = match h.router.route(fresh_route()).await.unwrap() {
        RouteOutcome::Started(started) => started,
        _ => panic!("expected a fresh start"),
    };
    let turn = h
        .engine
        .continue_turn(started.session_id, "Look at these install numbers.")
        .await
        .unwrap();
    assert_eq!(turn.current_level, Level::new(2).unwrap());

    // Passed level 1, no in-level progress: a fresh level-2 session.
    let cmd = RouteCommand {
        levels_passed: 1,
        ..fresh_route()
    };
    match h.router.route(cmd).await.unwrap() {
        RouteOutcome::Started(started) => {
            assert_eq!(started.level, Level::new(2).unwrap());
            assert_eq!(
                started.ai_response,
                "I'm an engineer. Show me the efficiency curves."
            );
        }
        _ => panic!("expected a fresh start at level 2"),
    }
}

#[tokio::test]
async fn reset_discards_progress_and_starts_over() {
    let h = harness(
        vec![
            "Assistant: So, what's this about solar panels?".to_string(),
            "Maria: Fine, I'm convinced.".to_string(),
            "Assistant: So, what's this about solar panels?".to_string(),
        ],
        vec![verdict(95, "enthusiastic", true)],
    );

    let started = match h.router.route(fresh_route()).await.unwrap() {
        RouteOutcome::Started(started) => started,
        _ => panic!("expected a fresh start"),
    };
    h.engine
        .continue_turn(started.session_id, "It pays for itself.")
        .await
        .unwrap();

    let cmd = RouteCommand {
        levels_passed: 1,
        progress_percentage: Percentage::new(80),
        reset: true,
        ..fresh_route()
    };
    match h.router.route(cmd).await.unwrap() {
        RouteOutcome::Started(started) => assert_eq!(started.level, Level::ONE),
        _ => panic!("expected a fresh start after reset"),
    }
}

#[tokio::test]
async fn progress_service_reset_clears_the_tracked_record() {
    let h = harness(
        vec![
            "Assistant: So, what's this about solar panels?".to_string(),
            "Maria: Interesting, go on.".to_string(),
        ],
        vec![verdict(60, "curious", false)],
    );

    let started = match h.router.route(fresh_route()).await.unwrap() {
        RouteOutcome::Started(started) => started,
        _ => panic!("expected a fresh start"),
    };
    h.engine
        .continue_turn(started.session_id, "Half your bill disappears.")
        .await
        .unwrap();

    let stored = h
        .progress_service
        .check(&tracked_actor(), &product())
        .await
        .unwrap();
    assert!(stored.progress_percentage.is_positive());

    h.progress_service
        .reset(&tracked_actor(), &product())
        .await
        .unwrap();

    let cleared = h
        .progress_service
        .check(&tracked_actor(), &product())
        .await
        .unwrap();
    assert_eq!(cleared.progress_percentage, Percentage::ZERO);
    assert!(cleared.levels_passed.is_empty());
}

#[tokio::test]
async fn unknown_product_is_rejected() {
    let h = harness(vec![], vec![]);

    let cmd = RouteCommand {
        product_id: ProductId::new("toasters").unwrap(),
        ..fresh_route()
    };
    let err = h.router.route(cmd).await.unwrap_err();
    assert!(err.code.is_not_found());
}
