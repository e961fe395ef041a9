//! Maps a corpus `Problem` into the `/technical_questions` response shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::questions::corpus::{Difficulty, Problem};
use crate::questions::QuestionsError;

/// Externally visible question record. The similarity score is not exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalQuestion {
    pub title: String,
    pub difficulty: Difficulty,
    pub problem_description: String,
    pub starter_code: String,
    /// Raw query text the problem was embedded from.
    pub desc: String,
    pub tags: Vec<String>,
    pub input_output: Value,
}

/// `"two-sum"` → `"Two Sum"`.
pub fn format_title(task_id: &str) -> String {
    task_id
        .replace('-', " ")
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First character uppercased, the rest lowercased.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

pub fn format_problem(problem: &Problem) -> Result<TechnicalQuestion, QuestionsError> {
    if problem.task_id.trim().is_empty() {
        return Err(QuestionsError::MalformedProblemRecord {
            line: 0,
            reason: "problem has an empty task_id".to_string(),
        });
    }
    if problem.query.trim().is_empty() {
        return Err(QuestionsError::MalformedProblemRecord {
            line: 0,
            reason: format!("problem '{}' has an empty query", problem.task_id),
        });
    }

    Ok(TechnicalQuestion {
        title: format_title(&problem.task_id),
        difficulty: problem.difficulty.clone(),
        problem_description: problem.problem_description.clone(),
        starter_code: problem.starter_code.clone(),
        desc: problem.query.clone(),
        tags: problem.tags.clone(),
        input_output: problem.input_output.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn problem(task_id: &str) -> Problem {
        Problem {
            task_id: task_id.to_string(),
            difficulty: Difficulty::Easy,
            problem_description: "Find two numbers that add up to target.".to_string(),
            starter_code: "class Solution: ...".to_string(),
            tags: vec!["Array".to_string()],
            input_output: json!([{"input": "[2,7], 9", "output": "[0,1]"}]),
            query: "Return indices of the two numbers.".to_string(),
        }
    }

    #[test]
    fn test_format_title_two_sum() {
        assert_eq!(format_title("two-sum"), "Two Sum");
    }

    #[test]
    fn test_format_title_lowercases_tail() {
        assert_eq!(format_title("lru-CACHE"), "Lru Cache");
    }

    #[test]
    fn test_format_title_collapses_separators() {
        assert_eq!(format_title("-3sum--closest-"), "3sum Closest");
    }

    #[test]
    fn test_format_problem_maps_fields() {
        let q = format_problem(&problem("two-sum")).unwrap();
        assert_eq!(q.title, "Two Sum");
        assert_eq!(q.difficulty, Difficulty::Easy);
        assert_eq!(q.desc, "Return indices of the two numbers.");
        assert_eq!(q.tags, vec!["Array"]);
        assert_eq!(q.input_output[0]["output"], "[0,1]");
    }

    #[test]
    fn test_format_problem_serializes_without_score() {
        let value = serde_json::to_value(format_problem(&problem("two-sum")).unwrap()).unwrap();
        let obj = value.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "desc",
                "difficulty",
                "input_output",
                "problem_description",
                "starter_code",
                "tags",
                "title"
            ]
        );
        assert_eq!(obj["difficulty"], "Easy");
    }

    #[test]
    fn test_format_problem_rejects_empty_task_id() {
        let err = format_problem(&problem("  ")).unwrap_err();
        assert!(matches!(err, QuestionsError::MalformedProblemRecord { .. }));
    }
}
