pub mod form;
pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::interview::handlers::handle_behavioral_questions;
use crate::projects::handlers::handle_create_project;
use crate::questions::handlers::handle_technical_questions;
use crate::resume::handlers::{handle_resume_latex, handle_summarize_job};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .route("/health", get(health::health_handler))
        .route("/technical_questions", post(handle_technical_questions))
        .route("/behavioral_questions", post(handle_behavioral_questions))
        .route("/summarize_job", post(handle_summarize_job))
        .route(
            "/resume/latex",
            post(handle_resume_latex).layer(upload_limit.clone()),
        )
        .route(
            "/api/projects",
            post(handle_create_project).layer(upload_limit),
        )
        .with_state(state)
}
