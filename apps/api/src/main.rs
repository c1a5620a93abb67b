mod ai;
mod ats;
mod config;
mod enrichment;
mod errors;
mod export;
mod form;
mod llm_client;
mod models;
mod render;
mod routes;
mod session;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use std::sync::Arc;

use crate::ai::LlmAi;
use crate::ats::{AtsScorer, RemoteScorer};
use crate::config::Config;
use crate::enrichment::{Enricher, RemoteEnricher};
use crate::export::ChromePdfSink;
use crate::llm_client::LlmClient;
use crate::render::FsTemplateSource;
use crate::routes::build_router;
use crate::session::SessionStore;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on a missing AI backend)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting GenResume API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the in-process AI service (also serves /ai/*)
    let ai = match &config.llm_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone()).context("Failed to build LLM client")?;
            info!("LLM client initialized (model: {})", llm_client::MODEL);
            Some(Arc::new(LlmAi::new(llm)))
        }
        None => None,
    };

    // Enrichment + scoring: a deployed AI service wins over the in-process one
    let (enricher, scorer) = match (&config.ai_service_url, &ai) {
        (Some(url), _) => {
            info!("Using remote AI service at {url}");
            (
                Arc::new(RemoteEnricher::new(url).context("Failed to build enrichment client")?)
                    as Arc<dyn Enricher>,
                Arc::new(RemoteScorer::new(url).context("Failed to build scoring client")?)
                    as Arc<dyn AtsScorer>,
            )
        }
        (None, Some(ai)) => {
            info!("Using in-process AI service");
            (
                Arc::clone(ai) as Arc<dyn Enricher>,
                Arc::clone(ai) as Arc<dyn AtsScorer>,
            )
        }
        (None, None) => anyhow::bail!("No AI backend configured"),
    };

    // Templates are read from disk on every render
    info!("Templates directory: {}", config.templates_dir.display());
    let templates = Arc::new(FsTemplateSource::new(config.templates_dir.clone()));

    // PDF export through headless Chromium
    let exporter = Arc::new(ChromePdfSink::new(config.chrome_executable.clone()));

    // Abandoned sessions are swept in the background
    let sessions = Arc::new(SessionStore::new());
    Arc::clone(&sessions).spawn_sweeper(config.session_idle_ttl);
    info!("Session idle TTL: {}s", config.session_idle_ttl.as_secs());

    // Build app state
    let state = AppState {
        sessions,
        templates,
        enricher,
        scorer,
        exporter,
        ai,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
