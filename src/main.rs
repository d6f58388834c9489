//! Main entrypoint for the sales trainer service.
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing tracing.
//! 3. Connecting storage and the model endpoints (or their in-memory and
//!    scripted development stand-ins).
//! 4. Constructing the Axum router and applying middleware.
//! 5. Starting the web server and handling graceful shutdown.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sales_trainer::adapters::evaluation::{
    EvaluationEndpointConfig, HttpConvictionEvaluator, ScriptedConvictionEvaluator,
};
use sales_trainer::adapters::generation::{
    GenerationEndpointConfig, HttpDialogueGenerator, ScriptedDialogueGenerator,
};
use sales_trainer::adapters::http::{training_router, TrainingAppState};
use sales_trainer::adapters::memory::{
    InMemoryConversationStore, InMemoryProgressStore, StaticLevelCatalog,
};
use sales_trainer::adapters::postgres::{PostgresConversationStore, PostgresProgressStore};
use sales_trainer::application::{
    ConversationEngine, EngineSettings, ProgressService, SessionRouter,
};
use sales_trainer::config::AppConfig;
use sales_trainer::domain::foundation::UserId;
use sales_trainer::ports::{ConversationStore, ConvictionEvaluator, DialogueGenerator, ProgressStore};

/// Listens for the `Ctrl+C` signal to gracefully shut down the server.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received shutdown signal. Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();
    info!("Configuration loaded. Initializing application state...");

    let catalog = Arc::new(StaticLevelCatalog::from_yaml_file(
        &config.training.catalog_path,
    )?);
    info!(
        path = %config.training.catalog_path,
        products = catalog.product_count(),
        "persona catalog loaded"
    );

    let (conversations, progress): (Arc<dyn ConversationStore>, Arc<dyn ProgressStore>) =
        if config.database.has_postgres() {
            let url = config.database.url.as_deref().unwrap_or_default();
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .min_connections(config.database.min_connections)
                .acquire_timeout(config.database.connect_timeout())
                .connect(url)
                .await?;
            sqlx::migrate!("./migrations").run(&pool).await?;
            info!("Database connection established and migrations are up-to-date.");
            (
                Arc::new(PostgresConversationStore::new(pool.clone())),
                Arc::new(PostgresProgressStore::new(pool)),
            )
        } else {
            info!("No database configured, keeping all state in memory.");
            (
                Arc::new(InMemoryConversationStore::new()),
                Arc::new(InMemoryProgressStore::new()),
            )
        };

    let generator: Arc<dyn DialogueGenerator> = if config.generation.has_endpoint() {
        let url = config.generation.endpoint_url.as_deref().unwrap_or_default();
        let mut endpoint =
            GenerationEndpointConfig::new(url).with_timeout(config.generation.timeout());
        if let Some(api_key) = &config.generation.api_key {
            endpoint = endpoint.with_api_key(api_key.expose_secret());
        }
        info!(endpoint = %url, "using HTTP dialogue generator");
        Arc::new(HttpDialogueGenerator::new(endpoint)?)
    } else {
        info!("No generation endpoint configured, using scripted generator.");
        Arc::new(ScriptedDialogueGenerator::new())
    };

    let evaluator: Arc<dyn ConvictionEvaluator> = if config.evaluation.has_endpoint() {
        let url = config.evaluation.endpoint_url.as_deref().unwrap_or_default();
        let endpoint =
            EvaluationEndpointConfig::new(url).with_timeout(config.evaluation.timeout());
        info!(endpoint = %url, "using HTTP conviction evaluator");
        Arc::new(HttpConvictionEvaluator::new(endpoint)?)
    } else {
        info!("No evaluation endpoint configured, using scripted evaluator.");
        Arc::new(ScriptedConvictionEvaluator::lukewarm())
    };

    let settings = EngineSettings {
        tracked_actor: UserId::new(&config.training.tracked_actor)?,
        history_window: config.training.history_window,
        opening_max_new_tokens: config.generation.opening_max_new_tokens,
        continuation_max_new_tokens: config.generation.continuation_max_new_tokens,
        temperature: config.generation.temperature,
        top_p: config.generation.top_p,
    };

    let engine = Arc::new(ConversationEngine::new(
        catalog,
        generator,
        evaluator,
        Arc::clone(&conversations),
        Arc::clone(&progress),
        settings,
    ));
    let router = Arc::new(SessionRouter::new(
        Arc::clone(&engine),
        conversations,
        Arc::clone(&progress),
    ));
    let progress_service = Arc::new(ProgressService::new(progress));

    let state = TrainingAppState::new(router, engine, progress_service);

    let cors = {
        let origins = config.server.cors_origins_list();
        if origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let parsed: Vec<HeaderValue> = origins
                .iter()
                .map(|o| o.parse())
                .collect::<Result<_, _>>()?;
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(parsed))
                .allow_methods(Any)
                .allow_headers(Any)
        }
    };

    let app = training_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors);

    let addr = config.server.socket_addr();
    info!(%addr, "Service configured. Starting server...");
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server has shut down.");
    Ok(())
}
