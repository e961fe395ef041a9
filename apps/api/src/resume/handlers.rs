//! Axum route handlers for resume tailoring.

use std::path::Path;

use axum::{
    extract::{Multipart, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::resume::latex::generate_latex_resume;
use crate::resume::summary::summarize_job_description;
use crate::routes::form::MultipartForm;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SummarizeJobRequest {
    #[serde(default)]
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct SummarizeJobResponse {
    pub summary: String,
}

#[derive(Debug, Serialize)]
pub struct LatexResumeResponse {
    pub latex: String,
}

/// POST /summarize_job
pub async fn handle_summarize_job(
    State(state): State<AppState>,
    Json(request): Json<SummarizeJobRequest>,
) -> Result<Json<SummarizeJobResponse>, AppError> {
    let summary = summarize_job_description(&state.llm, &request.job_description).await?;
    Ok(Json(SummarizeJobResponse { summary }))
}

/// POST /resume/latex
///
/// Multipart: `job_description` text field and `resume` PDF file.
pub async fn handle_resume_latex(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<LatexResumeResponse>, AppError> {
    let form = MultipartForm::read(multipart).await?;

    let job_description = form
        .text("job_description")
        .ok_or_else(|| AppError::Validation("job_description form field is required".to_string()))?
        .to_string();

    let resume = form
        .file("resume")
        .filter(|f| !f.filename.trim().is_empty())
        .ok_or_else(|| {
            AppError::Validation(
                "A resume PDF must be uploaded using the 'resume' form field".to_string(),
            )
        })?;

    if !is_pdf_filename(&resume.filename) {
        return Err(AppError::Validation(
            "Only PDF resumes are supported at this time".to_string(),
        ));
    }

    let latex = generate_latex_resume(&state.llm, &job_description, resume.bytes.clone()).await?;
    Ok(Json(LatexResumeResponse { latex }))
}

/// Files without an extension are assumed to be PDFs.
fn is_pdf_filename(filename: &str) -> bool {
    match Path::new(filename).extension() {
        Some(ext) => ext.eq_ignore_ascii_case("pdf"),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_extension_checks() {
        assert!(is_pdf_filename("resume.pdf"));
        assert!(is_pdf_filename("Resume.PDF"));
        assert!(is_pdf_filename("resume"));
        assert!(!is_pdf_filename("resume.docx"));
    }
}
