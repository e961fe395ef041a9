// Behavioral interview preparation.
// All LLM calls go through llm_client.

pub mod behavioral;
pub mod handlers;
pub mod prompts;
