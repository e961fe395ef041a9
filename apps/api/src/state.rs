use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::projects::storage::ProjectStore;
use crate::questions::TechnicalQuestions;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub config: Config,
    /// Corpus + embedding index, built lazily on first use.
    pub questions: Arc<TechnicalQuestions>,
    pub projects: Arc<ProjectStore>,
}
