//! Behavioral question generation — asks Gemini for exactly three
//! resume-aware questions using a JSON response schema.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::errors::AppError;
use crate::interview::prompts::BEHAVIORAL_PROMPT_TEMPLATE;
use crate::llm_client::LlmClient;

pub const QUESTION_COUNT: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BehavioralQuestions {
    pub questions: Vec<String>,
}

/// Model output before validation. Items may be any JSON type.
#[derive(Debug, Deserialize)]
struct RawBehavioralPayload {
    questions: Option<Vec<Value>>,
}

/// Response schema sent with the request (OpenAPI subset used by Gemini).
pub fn behavioral_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "questions": {
                "type": "ARRAY",
                "description": "Exactly three single-sentence behavioral interview questions tailored to the candidate's resume and the job description.",
                "items": {
                    "type": "STRING",
                    "description": "One realistic behavioral interview question."
                }
            }
        },
        "required": ["questions"]
    })
}

pub fn build_prompt(resume: &str, job_description: &str) -> String {
    BEHAVIORAL_PROMPT_TEMPLATE
        .replace("{job_description}", job_description.trim())
        .replace("{resume}", resume.trim())
}

pub async fn generate_behavioral_questions(
    llm: &LlmClient,
    resume: &str,
    job_description: &str,
) -> Result<BehavioralQuestions, AppError> {
    if resume.trim().is_empty() {
        return Err(AppError::Validation("resume is required".to_string()));
    }
    if job_description.trim().is_empty() {
        return Err(AppError::Validation("job_description is required".to_string()));
    }

    let prompt = build_prompt(resume, job_description);
    let raw: RawBehavioralPayload = llm
        .generate_json(&prompt, behavioral_schema())
        .await
        .map_err(|e| AppError::Llm(format!("Behavioral question generation failed: {e}")))?;

    let questions = clean_questions(raw)?;
    info!("Generated {} behavioral questions", questions.len());
    Ok(BehavioralQuestions { questions })
}

/// Trims string items, drops blanks and non-strings, and enforces the count.
fn clean_questions(raw: RawBehavioralPayload) -> Result<Vec<String>, AppError> {
    let items = raw.questions.ok_or_else(|| {
        AppError::Llm("Model response did not include a 'questions' list".to_string())
    })?;

    let cleaned: Vec<String> = items
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(String::from)
        .collect();

    if cleaned.len() != QUESTION_COUNT {
        return Err(AppError::Llm(format!(
            "Model returned {} behavioral questions, expected {QUESTION_COUNT}",
            cleaned.len()
        )));
    }
    Ok(cleaned)
}
