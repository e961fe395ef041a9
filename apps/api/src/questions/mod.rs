//! Technical question retrieval.
//!
//! Flow: job description → encode → cosine rank against cached corpus
//! vectors → resolve hits → format.
//!
//! The corpus and its embeddings are built at most once per process and
//! published as an immutable `Arc<CorpusIndex>`. Concurrent first requests
//! share a single build; a failed build is not cached and the next request
//! retries it.

pub mod corpus;
pub mod embedding;
pub mod formatter;
pub mod handlers;
pub mod ranker;

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::questions::corpus::{load_corpus, CorpusSource, Problem};
use crate::questions::embedding::{EmbeddingVector, FastEmbedder, HashEmbedder, TextEmbedder};
use crate::questions::formatter::{format_problem, TechnicalQuestion};
use crate::questions::ranker::{rank, SimilarityResult};

#[derive(Debug, Error)]
pub enum QuestionsError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Corpus unavailable: {0}")]
    CorpusUnavailable(String),

    #[error("Embedding model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("Encoding error: {0}")]
    EncodingError(String),

    #[error("Corpus is empty")]
    EmptyCorpus,

    #[error("Malformed problem record (line {line}): {reason}")]
    MalformedProblemRecord { line: usize, reason: String },
}

impl QuestionsError {
    /// Infrastructure failures that a later request may not hit again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            QuestionsError::CorpusUnavailable(_) | QuestionsError::ModelUnavailable(_)
        )
    }
}

/// Which encoder backs the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmbedderBackend {
    /// all-MiniLM-L6-v2 via fastembed; weights cached under `cache_dir`.
    FastEmbed { cache_dir: PathBuf },
    /// Deterministic feature hashing, no download.
    Hash { dimension: usize },
}

#[derive(Debug, Clone)]
pub struct QuestionsSettings {
    pub source: CorpusSource,
    pub backend: EmbedderBackend,
    pub corpus_fetch_timeout: Duration,
    pub model_load_timeout: Duration,
}

// ────────────────────────────────────────────────────────────────────────────
// CorpusIndex
// ────────────────────────────────────────────────────────────────────────────

/// Problems plus their embeddings, index-aligned. Never mutated once built.
pub struct CorpusIndex {
    problems: Vec<Problem>,
    vectors: Vec<EmbeddingVector>,
    embedder: Arc<dyn TextEmbedder>,
    built_at: DateTime<Utc>,
}

impl CorpusIndex {
    /// Embeds every problem's `query` in one batch.
    pub fn build(
        problems: Vec<Problem>,
        embedder: Arc<dyn TextEmbedder>,
    ) -> Result<Self, QuestionsError> {
        if problems.is_empty() {
            return Err(QuestionsError::EmptyCorpus);
        }

        let started = Instant::now();
        let texts: Vec<String> = problems.iter().map(|p| p.query.clone()).collect();
        let vectors = embedder.encode_batch(&texts)?;

        info!(
            "Embedded {} problems with {} ({} dims) in {}ms",
            vectors.len(),
            embedder.model_name(),
            embedder.dimension(),
            started.elapsed().as_millis()
        );

        Ok(Self {
            problems,
            vectors,
            embedder,
            built_at: Utc::now(),
        })
    }

    pub fn problems(&self) -> &[Problem] {
        &self.problems
    }

    /// Encodes `text` and ranks the whole corpus against it.
    pub fn rank_text(&self, text: &str, k: usize) -> Result<Vec<SimilarityResult>, QuestionsError> {
        let query = self.embedder.encode(text)?;
        rank(&query, &self.vectors, k)
    }

    /// Top-k formatted questions for `text`, in ranked order.
    pub fn search(&self, text: &str, k: usize) -> Result<Vec<TechnicalQuestion>, QuestionsError> {
        let hits = self.rank_text(text, k)?;

        let questions = hits
            .iter()
            .filter_map(|hit| {
                let problem = &self.problems[hit.index];
                debug!("Hit {} score={:.4}", problem.task_id, hit.score);
                match format_problem(problem) {
                    Ok(question) => Some(question),
                    Err(e) => {
                        warn!("Dropping ranked problem #{}: {e}", hit.index);
                        None
                    }
                }
            })
            .collect();

        Ok(questions)
    }
}

/// Snapshot reported by the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct IndexStatus {
    pub ready: bool,
    pub problems: usize,
    pub model: Option<String>,
    pub dimension: Option<usize>,
    pub built_at: Option<DateTime<Utc>>,
    pub load_attempts: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// TechnicalQuestions service
// ────────────────────────────────────────────────────────────────────────────

/// Process-wide retrieval service. Held in `AppState` behind an `Arc`.
pub struct TechnicalQuestions {
    settings: QuestionsSettings,
    http: reqwest::Client,
    index: OnceCell<Arc<CorpusIndex>>,
    load_attempts: AtomicUsize,
}

impl TechnicalQuestions {
    pub fn new(settings: QuestionsSettings, http: reqwest::Client) -> Self {
        Self {
            settings,
            http,
            index: OnceCell::new(),
            load_attempts: AtomicUsize::new(0),
        }
    }

    /// Returns the `k` corpus problems closest to `job_description`.
    pub async fn find_top_questions(
        &self,
        job_description: &str,
        k: usize,
    ) -> Result<Vec<TechnicalQuestion>, QuestionsError> {
        let job_description = job_description.trim();
        if job_description.is_empty() {
            return Err(QuestionsError::InvalidInput(
                "job_description is required".to_string(),
            ));
        }
        if k == 0 {
            return Err(QuestionsError::InvalidInput(
                "top_k must be greater than 0".to_string(),
            ));
        }

        let index = self.index().await?;
        let text = job_description.to_string();

        let questions = tokio::task::spawn_blocking(move || index.search(&text, k))
            .await
            .map_err(|e| QuestionsError::EncodingError(format!("search task failed: {e}")))??;

        info!("Matched {} technical questions (top_k={k})", questions.len());
        Ok(questions)
    }

    /// Builds the index now instead of on the first request.
    pub async fn warm_up(&self) -> Result<(), QuestionsError> {
        self.index().await.map(|_| ())
    }

    pub fn is_ready(&self) -> bool {
        self.index.initialized()
    }

    pub fn status(&self) -> IndexStatus {
        let load_attempts = self.load_attempts.load(Ordering::Relaxed);
        match self.index.get() {
            Some(index) => IndexStatus {
                ready: self.is_ready(),
                problems: index.problems().len(),
                model: Some(index.embedder.model_name().to_string()),
                dimension: Some(index.embedder.dimension()),
                built_at: Some(index.built_at),
                load_attempts,
            },
            None => IndexStatus {
                ready: false,
                problems: 0,
                model: None,
                dimension: None,
                built_at: None,
                load_attempts,
            },
        }
    }

    /// The published index, building it on first use.
    pub async fn index(&self) -> Result<Arc<CorpusIndex>, QuestionsError> {
        self.index
            .get_or_try_init(|| self.build_index())
            .await
            .cloned()
    }

    async fn build_index(&self) -> Result<Arc<CorpusIndex>, QuestionsError> {
        let attempt = self.load_attempts.fetch_add(1, Ordering::Relaxed) + 1;
        info!("Building technical question index (attempt {attempt})");

        let result: Result<Arc<CorpusIndex>, QuestionsError> = async {
            let problems = load_corpus(
                &self.settings.source,
                &self.http,
                self.settings.corpus_fetch_timeout,
            )
            .await?;
            let embedder = self.load_embedder().await?;

            let index = tokio::task::spawn_blocking(move || CorpusIndex::build(problems, embedder))
                .await
                .map_err(|e| QuestionsError::EncodingError(format!("index build task failed: {e}")))??;

            Ok::<_, QuestionsError>(Arc::new(index))
        }
        .await;

        if let Err(e) = &result {
            warn!("Technical question index build failed: {e}");
        }
        result
    }

    async fn load_embedder(&self) -> Result<Arc<dyn TextEmbedder>, QuestionsError> {
        match &self.settings.backend {
            EmbedderBackend::Hash { dimension } => Ok(Arc::new(HashEmbedder::new(*dimension))),
            EmbedderBackend::FastEmbed { cache_dir } => {
                let cache_dir = cache_dir.clone();
                let timeout = self.settings.model_load_timeout;

                // A timed-out load keeps running on its blocking thread; the
                // result is discarded and the next request starts over.
                let loaded = tokio::time::timeout(
                    timeout,
                    tokio::task::spawn_blocking(move || FastEmbedder::load(cache_dir)),
                )
                .await
                .map_err(|_| {
                    QuestionsError::ModelUnavailable(format!(
                        "model load timed out after {}s",
                        timeout.as_secs()
                    ))
                })?
                .map_err(|e| QuestionsError::ModelUnavailable(format!("model load task failed: {e}")))??;

                Ok(Arc::new(loaded))
            }
        }
    }
}
