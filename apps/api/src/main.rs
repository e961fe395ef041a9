mod config;
mod errors;
mod interview;
mod llm_client;
mod projects;
mod questions;
mod resume;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::projects::storage::ProjectStore;
use crate::questions::TechnicalQuestions;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Recruit API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_key.clone(), config.gemini_model.clone())
        .context("Failed to build Gemini HTTP client")?;
    info!("LLM client initialized (model: {})", llm.model());

    // Technical question index (built lazily unless warm-up is enabled)
    let http = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(30))
        .build()
        .context("Failed to build corpus HTTP client")?;
    let questions = Arc::new(TechnicalQuestions::new(config.questions_settings()?, http));

    if config.warm_up_on_start {
        let questions = Arc::clone(&questions);
        tokio::spawn(async move {
            match questions.warm_up().await {
                Ok(()) => info!("Technical question index warmed up"),
                Err(e) => warn!("Warm-up failed, index will be built on first request: {e}"),
            }
        });
    }

    let projects = Arc::new(ProjectStore::new(config.projects_root.clone()));
    info!("Project workspaces under {}", projects.root().display());

    // Build app state
    let state = AppState {
        llm,
        config: config.clone(),
        questions,
        projects,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Recruit API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
