//! On-disk project workspaces: `<root>/proj_<id>/{job_title,job_desc}/…`.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

const DEFAULT_JOB_DESC_FILENAME: &str = "job_description.txt";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn io_err(path: &Path) -> impl FnOnce(io::Error) -> StorageError + '_ {
    move |source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// Paths written for a new project, returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectInfo {
    pub id: u64,
    pub project_dir: String,
    pub job_title_path: String,
    pub job_desc_path: String,
    pub job_description_name: String,
}

pub struct ProjectStore {
    root: PathBuf,
    // serialises id allocation + directory creation
    create_lock: Mutex<()>,
}

impl ProjectStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            create_lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Persists a new project and returns where its files landed.
    pub async fn create_project(
        &self,
        job_title: &str,
        job_desc: &[u8],
        job_desc_filename: Option<&str>,
    ) -> Result<ProjectInfo, StorageError> {
        let _guard = self.create_lock.lock().await;

        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(io_err(&self.root))?;

        let id = next_project_id(&self.root).await?;
        let project_dir = self.root.join(format!("proj_{id}"));
        let job_title_dir = project_dir.join("job_title");
        let job_desc_dir = project_dir.join("job_desc");

        tokio::fs::create_dir_all(&job_title_dir)
            .await
            .map_err(io_err(&job_title_dir))?;
        tokio::fs::create_dir_all(&job_desc_dir)
            .await
            .map_err(io_err(&job_desc_dir))?;

        let title_path = job_title_dir.join("title.txt");
        let title = job_title.trim();
        let title_contents = if title.is_empty() {
            String::new()
        } else {
            format!("{title}\n")
        };
        tokio::fs::write(&title_path, title_contents)
            .await
            .map_err(io_err(&title_path))?;

        let safe_name = sanitize_filename(job_desc_filename);
        let job_desc_path = job_desc_dir.join(&safe_name);
        tokio::fs::write(&job_desc_path, job_desc)
            .await
            .map_err(io_err(&job_desc_path))?;

        info!("Created project workspace {}", project_dir.display());

        Ok(ProjectInfo {
            id,
            project_dir: project_dir.display().to_string(),
            job_title_path: title_path.display().to_string(),
            job_desc_path: job_desc_path.display().to_string(),
            job_description_name: safe_name,
        })
    }
}

/// One past the highest existing `proj_<digits>` directory id.
async fn next_project_id(root: &Path) -> Result<u64, StorageError> {
    let mut entries = tokio::fs::read_dir(root).await.map_err(io_err(root))?;
    let mut max_id = 0u64;

    while let Some(entry) = entries.next_entry().await.map_err(io_err(root))? {
        let is_dir = entry
            .file_type()
            .await
            .map(|t| t.is_dir())
            .unwrap_or(false);
        if !is_dir {
            continue;
        }
        if let Some(id) = entry.file_name().to_str().and_then(parse_project_dir) {
            max_id = max_id.max(id);
        }
    }

    Ok(max_id + 1)
}

fn parse_project_dir(name: &str) -> Option<u64> {
    let digits = name.strip_prefix("proj_")?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Keeps only the final path component; falls back to a default name.
pub fn sanitize_filename(filename: Option<&str>) -> String {
    filename
        .map(|name| name.rsplit(['/', '\\']).next().unwrap_or("").trim())
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map(String::from)
        .unwrap_or_else(|| DEFAULT_JOB_DESC_FILENAME.to_string())
}
