//! Loads the LeetCode problem dataset (JSON Lines, over HTTP or from a local
//! file) and validates each line into a typed `Problem`.

use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::questions::QuestionsError;

/// Train split of the LeetCode dataset on the Hugging Face hub.
pub const DEFAULT_CORPUS_URL: &str =
    "https://huggingface.co/datasets/newfacade/LeetCodeDataset/resolve/main/LeetCodeDataset-train.jsonl";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    /// Any dataset label outside the three known levels, kept verbatim.
    Other(String),
}

impl From<String> for Difficulty {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            "hard" => Difficulty::Hard,
            _ => Difficulty::Other(value),
        }
    }
}

impl From<Difficulty> for String {
    fn from(value: Difficulty) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Difficulty::Easy => f.write_str("Easy"),
            Difficulty::Medium => f.write_str("Medium"),
            Difficulty::Hard => f.write_str("Hard"),
            Difficulty::Other(label) => f.write_str(label),
        }
    }
}

/// One technical interview problem, validated at load time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Problem {
    pub task_id: String,
    pub difficulty: Difficulty,
    pub problem_description: String,
    pub starter_code: String,
    pub tags: Vec<String>,
    /// Dataset-defined examples, passed through untouched.
    pub input_output: Value,
    /// Natural-language statement used for embedding.
    pub query: String,
}

/// Untyped shape of a dataset line. Every field is optional so that
/// validation, not serde, decides what a malformed record is.
#[derive(Debug, Default, Deserialize)]
struct RawProblemRecord {
    task_id: Option<String>,
    difficulty: Option<String>,
    problem_description: Option<String>,
    starter_code: Option<String>,
    tags: Option<Vec<String>>,
    input_output: Option<Value>,
    query: Option<String>,
}

impl RawProblemRecord {
    fn into_problem(self, line: usize) -> Result<Problem, QuestionsError> {
        let malformed = |reason: &str| QuestionsError::MalformedProblemRecord {
            line,
            reason: reason.to_string(),
        };

        let task_id = self
            .task_id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| malformed("missing task_id"))?;
        let query = self
            .query
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| malformed("missing query"))?;
        let difficulty = self
            .difficulty
            .ok_or_else(|| malformed("missing difficulty"))?;
        let problem_description = self
            .problem_description
            .ok_or_else(|| malformed("missing problem_description"))?;

        Ok(Problem {
            task_id,
            difficulty: Difficulty::from(difficulty),
            problem_description,
            starter_code: self.starter_code.unwrap_or_default(),
            tags: self.tags.unwrap_or_default(),
            input_output: self.input_output.unwrap_or(Value::Null),
            query,
        })
    }
}

/// Where the corpus comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorpusSource {
    Remote { url: String },
    File { path: PathBuf },
}

impl fmt::Display for CorpusSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorpusSource::Remote { url } => write!(f, "{url}"),
            CorpusSource::File { path } => write!(f, "{}", path.display()),
        }
    }
}

/// Fetches and parses the corpus. Bounded by `timeout`.
pub async fn load_corpus(
    source: &CorpusSource,
    http: &reqwest::Client,
    timeout: Duration,
) -> Result<Vec<Problem>, QuestionsError> {
    info!("Loading technical question corpus from {source}");

    let body = tokio::time::timeout(timeout, fetch_source(source, http))
        .await
        .map_err(|_| {
            QuestionsError::CorpusUnavailable(format!("timed out after {timeout:?} fetching {source}"))
        })??;

    let problems = parse_corpus(&body);
    if problems.is_empty() {
        return Err(QuestionsError::EmptyCorpus);
    }

    info!("Loaded {} technical problems", problems.len());
    Ok(problems)
}

async fn fetch_source(source: &CorpusSource, http: &reqwest::Client) -> Result<String, QuestionsError> {
    match source {
        CorpusSource::Remote { url } => {
            let response = http
                .get(url)
                .send()
                .await
                .map_err(|e| QuestionsError::CorpusUnavailable(format!("request to {url} failed: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                return Err(QuestionsError::CorpusUnavailable(format!(
                    "{url} returned status {status}"
                )));
            }

            response
                .text()
                .await
                .map_err(|e| QuestionsError::CorpusUnavailable(format!("failed to read body of {url}: {e}")))
        }
        CorpusSource::File { path } => tokio::fs::read_to_string(path).await.map_err(|e| {
            QuestionsError::CorpusUnavailable(format!("failed to read {}: {e}", path.display()))
        }),
    }
}

/// Parses JSON Lines into problems, in file order.
///
/// Bad lines (invalid JSON, missing fields, duplicate `task_id`) are skipped
/// with a warning so one broken record never takes the corpus down.
pub fn parse_corpus(body: &str) -> Vec<Problem> {
    let mut problems = Vec::new();
    let mut seen = HashSet::new();
    let mut skipped = 0usize;

    for (i, raw_line) in body.lines().enumerate() {
        let line = i + 1;
        if raw_line.trim().is_empty() {
            continue;
        }

        let parsed = serde_json::from_str::<RawProblemRecord>(raw_line)
            .map_err(|e| QuestionsError::MalformedProblemRecord {
                line,
                reason: format!("invalid JSON: {e}"),
            })
            .and_then(|raw| raw.into_problem(line))
            .and_then(|problem| {
                if seen.insert(problem.task_id.clone()) {
                    Ok(problem)
                } else {
                    Err(QuestionsError::MalformedProblemRecord {
                        line,
                        reason: format!("duplicate task_id '{}'", problem.task_id),
                    })
                }
            });

        match parsed {
            Ok(problem) => problems.push(problem),
            Err(e) => {
                skipped += 1;
                warn!("Skipping corpus record: {e}");
            }
        }
    }

    if skipped > 0 {
        warn!("Skipped {skipped} malformed corpus records");
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TWO_SUM: &str = r#"{"task_id": "two-sum", "question_id": 1, "difficulty": "Easy", "tags": ["Array", "Hash Table"], "problem_description": "Given an array of integers nums and an integer target, return indices of the two numbers such that they add up to target.", "starter_code": "class Solution:\n    def twoSum(self, nums: List[int], target: int) -> List[int]:", "input_output": [{"input": "nums = [2,7,11,15], target = 9", "output": "[0, 1]"}], "query": "Given an array of integers nums and an integer target, return indices of the two numbers."}"#;
    const LRU: &str = r#"{"task_id": "lru-cache", "difficulty": "Medium", "tags": ["Design"], "problem_description": "Design an LRU cache.", "starter_code": "", "input_output": [], "query": "Design a data structure that follows the constraints of a Least Recently Used cache."}"#;

    #[test]
    fn test_parse_valid_lines_in_order() {
        let body = format!("{TWO_SUM}\n{LRU}\n");
        let problems = parse_corpus(&body);
        assert_eq!(problems.len(), 2);
        assert_eq!(problems[0].task_id, "two-sum");
        assert_eq!(problems[0].difficulty, Difficulty::Easy);
        assert_eq!(problems[0].tags, vec!["Array", "Hash Table"]);
        assert_eq!(problems[1].task_id, "lru-cache");
        assert_eq!(problems[1].difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_parse_skips_blank_and_invalid_lines() {
        let body = format!("\n{TWO_SUM}\nnot json at all\n\n{LRU}");
        let problems = parse_corpus(&body);
        let ids: Vec<&str> = problems.iter().map(|p| p.task_id.as_str()).collect();
        assert_eq!(ids, vec!["two-sum", "lru-cache"]);
    }

    #[test]
    fn test_parse_quarantines_missing_query() {
        let body = r#"{"task_id": "no-query", "difficulty": "Hard", "problem_description": "x"}"#;
        assert!(parse_corpus(body).is_empty());
    }

    #[test]
    fn test_parse_quarantines_duplicate_task_id() {
        let body = format!("{TWO_SUM}\n{TWO_SUM}");
        assert_eq!(parse_corpus(&body).len(), 1);
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let body = r#"{"task_id": "a-b", "difficulty": "Easy", "problem_description": "d", "query": "q"}"#;
        let problems = parse_corpus(body);
        assert_eq!(problems[0].starter_code, "");
        assert!(problems[0].tags.is_empty());
        assert_eq!(problems[0].input_output, Value::Null);
    }

    #[test]
    fn test_difficulty_keeps_unknown_labels() {
        assert_eq!(Difficulty::from("hard".to_string()), Difficulty::Hard);
        let other = Difficulty::from("Insane".to_string());
        assert_eq!(other, Difficulty::Other("Insane".to_string()));
        assert_eq!(serde_json::to_string(&other).unwrap(), r#""Insane""#);
        assert_eq!(serde_json::to_string(&Difficulty::Medium).unwrap(), r#""Medium""#);
    }

    #[tokio::test]
    async fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{TWO_SUM}").unwrap();
        writeln!(file, "{LRU}").unwrap();

        let source = CorpusSource::File {
            path: file.path().to_path_buf(),
        };
        let problems = load_corpus(&source, &reqwest::Client::new(), Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(problems.len(), 2);
    }

    #[tokio::test]
    async fn test_load_missing_file_is_unavailable() {
        let source = CorpusSource::File {
            path: PathBuf::from("/nonexistent/corpus.jsonl"),
        };
        let err = load_corpus(&source, &reqwest::Client::new(), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, QuestionsError::CorpusUnavailable(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_load_all_malformed_is_empty_corpus() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{{\"task_id\": \"x\"}}").unwrap();

        let source = CorpusSource::File {
            path: file.path().to_path_buf(),
        };
        let err = load_corpus(&source, &reqwest::Client::new(), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, QuestionsError::EmptyCorpus));
    }

    fn remote(server: &MockServer) -> CorpusSource {
        CorpusSource::Remote {
            url: format!("{}/train.jsonl", server.uri()),
        }
    }

    #[tokio::test]
    async fn test_load_from_remote_url() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/train.jsonl"))
            .respond_with(ResponseTemplate::new(200).set_body_string(format!("{TWO_SUM}\n{LRU}\n")))
            .expect(1)
            .mount(&server)
            .await;

        let problems = load_corpus(&remote(&server), &reqwest::Client::new(), Duration::from_secs(5))
            .await
            .unwrap();
        let ids: Vec<&str> = problems.iter().map(|p| p.task_id.as_str()).collect();
        assert_eq!(ids, vec!["two-sum", "lru-cache"]);
    }

    #[tokio::test]
    async fn test_remote_error_status_is_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = load_corpus(&remote(&server), &reqwest::Client::new(), Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, QuestionsError::CorpusUnavailable(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_slow_remote_times_out_as_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(TWO_SUM)
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let err = load_corpus(&remote(&server), &reqwest::Client::new(), Duration::from_millis(100))
            .await
            .unwrap_err();
        match &err {
            QuestionsError::CorpusUnavailable(msg) => assert!(msg.contains("timed out"), "{msg}"),
            other => panic!("expected CorpusUnavailable, got {other:?}"),
        }
        assert!(err.is_retryable());
    }
}
