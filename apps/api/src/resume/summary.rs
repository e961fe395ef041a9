//! Job description summary — condenses a posting to its key qualifications
//! so later prompts spend fewer tokens.

use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::resume::prompts::JOB_SUMMARY_PROMPT_TEMPLATE;

pub fn build_summary_prompt(job_description: &str) -> String {
    JOB_SUMMARY_PROMPT_TEMPLATE.replace("{job_description}", job_description.trim())
}

pub async fn summarize_job_description(
    llm: &LlmClient,
    job_description: &str,
) -> Result<String, AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation("job_description is required".to_string()));
    }

    let summary = llm
        .generate(&build_summary_prompt(job_description), &[])
        .await
        .map_err(|e| AppError::Llm(format!("Failed to summarize job description: {e}")))?;

    Ok(summary.trim().to_string())
}
