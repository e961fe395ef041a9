//! LaTeX resume generation — sends the uploaded PDF with the job description
//! and extracts the LaTeX document from the model's reply.

use std::sync::OnceLock;

use bytes::Bytes;
use regex::Regex;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::{FileAttachment, LlmClient};
use crate::resume::prompts::LATEX_RESUME_PROMPT_TEMPLATE;

fn code_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)```(?:latex)?\s*(.*?)```").expect("valid regex"))
}

fn document_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\\documentclass[\s\S]+?\\end\{document\})").expect("valid regex")
    })
}

fn latex_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\\documentclass|\\begin\{document\}|\\section\{").expect("valid regex")
    })
}

/// Heuristic check that a snippet is LaTeX source.
pub fn looks_like_latex(content: &str) -> bool {
    latex_marker_re().is_match(content)
}

/// Extracts LaTeX from a model reply.
///
/// Order: first fenced block that looks like LaTeX, then the first
/// `\documentclass … \end{document}` span, then the whole reply.
pub fn find_latex_code(response: &str) -> Result<String, AppError> {
    if response.trim().is_empty() {
        return Err(AppError::Llm("Model returned an empty LaTeX response".to_string()));
    }

    if let Some(block) = code_block_re()
        .captures_iter(response)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
        .find(|block| looks_like_latex(block))
    {
        return Ok(block.trim().to_string());
    }

    if let Some(m) = document_re().find(response) {
        return Ok(m.as_str().trim().to_string());
    }

    warn!("No LaTeX structure found in model response; returning it verbatim");
    Ok(response.to_string())
}

pub async fn generate_latex_resume(
    llm: &LlmClient,
    job_description: &str,
    resume_pdf: Bytes,
) -> Result<String, AppError> {
    if job_description.trim().is_empty() {
        return Err(AppError::Validation("job_description is required".to_string()));
    }
    if resume_pdf.is_empty() {
        return Err(AppError::Validation("Uploaded resume is empty".to_string()));
    }

    let prompt = LATEX_RESUME_PROMPT_TEMPLATE.replace("{job_description}", job_description.trim());
    let size = resume_pdf.len();
    let response = llm
        .generate(&prompt, &[FileAttachment::pdf(resume_pdf)])
        .await
        .map_err(|e| AppError::Llm(format!("LaTeX resume generation failed: {e}")))?;

    let latex = find_latex_code(&response)?;
    info!(
        "Generated LaTeX resume ({} chars) from {} byte PDF",
        latex.len(),
        size
    );
    Ok(latex)
}
