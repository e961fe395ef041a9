use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::errors::AppError;
use crate::projects::storage::ProjectInfo;
use crate::routes::form::MultipartForm;
use crate::state::AppState;

/// POST /api/projects
///
/// Multipart: `job_title` text field and `job_desc` file.
pub async fn handle_create_project(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ProjectInfo>, AppError> {
    let form = MultipartForm::read(multipart).await?;

    let job_title = form
        .fields
        .get("job_title")
        .ok_or_else(|| AppError::Validation("job_title form field is required".to_string()))?;

    let job_desc = form
        .file("job_desc")
        .ok_or_else(|| AppError::Validation("job_desc file is required".to_string()))?;

    if job_desc.bytes.is_empty() {
        return Err(AppError::Validation(
            "Uploaded job description is empty.".to_string(),
        ));
    }

    let info = state
        .projects
        .create_project(job_title, &job_desc.bytes, Some(&job_desc.filename))
        .await?;

    Ok(Json(info))
}
