use axum::{extract::State, Json};
use serde::Deserialize;

use crate::errors::AppError;
use crate::interview::behavioral::{generate_behavioral_questions, BehavioralQuestions};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BehavioralQuestionsRequest {
    #[serde(default)]
    pub resume: String,
    #[serde(default)]
    pub job_description: String,
}

/// POST /behavioral_questions
pub async fn handle_behavioral_questions(
    State(state): State<AppState>,
    Json(request): Json<BehavioralQuestionsRequest>,
) -> Result<Json<BehavioralQuestions>, AppError> {
    let questions =
        generate_behavioral_questions(&state.llm, &request.resume, &request.job_description)
            .await?;
    Ok(Json(questions))
}
