// Resume tailoring: LaTeX resume generation and job description summaries.
// All LLM calls go through llm_client.

pub mod handlers;
pub mod latex;
pub mod prompts;
pub mod summary;
