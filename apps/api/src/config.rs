use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::DEFAULT_MODEL;
use crate::questions::corpus::{CorpusSource, DEFAULT_CORPUS_URL};
use crate::questions::embedding::MINILM_DIMENSION;
use crate::questions::{EmbedderBackend, QuestionsSettings};

/// Resume PDFs routinely exceed axum's 2 MiB default.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub port: u16,
    pub rust_log: String,
    /// Local JSONL corpus; takes precedence over `corpus_url` when set.
    pub corpus_path: Option<PathBuf>,
    pub corpus_url: String,
    pub corpus_fetch_timeout: Duration,
    pub model_load_timeout: Duration,
    pub embedding_backend: String,
    pub embedding_cache_dir: PathBuf,
    pub default_top_k: usize,
    pub max_top_k: usize,
    pub warm_up_on_start: bool,
    pub projects_root: PathBuf,
    /// Request body cap for the upload endpoints.
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_model: env_or("GEMINI_MODEL", DEFAULT_MODEL),
            port: parse_env("PORT", 8000)?,
            rust_log: env_or("RUST_LOG", "info"),
            corpus_path: std::env::var("CORPUS_PATH").ok().map(PathBuf::from),
            corpus_url: env_or("CORPUS_URL", DEFAULT_CORPUS_URL),
            corpus_fetch_timeout: Duration::from_secs(parse_env("CORPUS_FETCH_TIMEOUT_SECS", 120)?),
            model_load_timeout: Duration::from_secs(parse_env("MODEL_LOAD_TIMEOUT_SECS", 300)?),
            embedding_backend: env_or("EMBEDDING_BACKEND", "fastembed"),
            embedding_cache_dir: PathBuf::from(env_or("EMBEDDING_CACHE_DIR", ".fastembed_cache")),
            default_top_k: parse_env("DEFAULT_TOP_K", 3)?,
            max_top_k: parse_env("MAX_TOP_K", 50)?,
            warm_up_on_start: parse_env("WARM_UP_ON_START", false)?,
            projects_root: PathBuf::from(env_or("PROJECTS_ROOT", "projects")),
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.default_top_k == 0 {
            bail!("DEFAULT_TOP_K must be greater than 0");
        }
        if self.max_top_k < self.default_top_k {
            bail!("MAX_TOP_K must be at least DEFAULT_TOP_K");
        }
        if self.max_upload_bytes == 0 {
            bail!("MAX_UPLOAD_BYTES must be greater than 0");
        }
        self.embedder_backend()?;
        Ok(())
    }

    pub fn embedder_backend(&self) -> Result<EmbedderBackend> {
        match self.embedding_backend.to_ascii_lowercase().as_str() {
            "fastembed" => Ok(EmbedderBackend::FastEmbed {
                cache_dir: self.embedding_cache_dir.clone(),
            }),
            "hash" => Ok(EmbedderBackend::Hash {
                dimension: MINILM_DIMENSION,
            }),
            other => bail!("EMBEDDING_BACKEND must be 'fastembed' or 'hash', got '{other}'"),
        }
    }

    pub fn questions_settings(&self) -> Result<QuestionsSettings> {
        let source = match &self.corpus_path {
            Some(path) => CorpusSource::File { path: path.clone() },
            None => CorpusSource::Remote {
                url: self.corpus_url.clone(),
            },
        };

        Ok(QuestionsSettings {
            source,
            backend: self.embedder_backend()?,
            corpus_fetch_timeout: self.corpus_fetch_timeout,
            model_load_timeout: self.model_load_timeout,
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
