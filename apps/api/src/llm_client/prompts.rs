// Shared prompt fragments. Each service that calls the LLM keeps its own
// prompts.rs alongside it.

/// System instruction for every structured (JSON schema) call.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";
