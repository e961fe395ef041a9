// LLM prompt constants for behavioral question generation.

/// Behavioral question prompt. Replace `{resume}` and `{job_description}` before sending.
pub const BEHAVIORAL_PROMPT_TEMPLATE: &str = "You are a senior hiring manager preparing a behavioral interview. \
Write concise, professional, single-sentence behavioral questions \
that help gauge how the candidate has demonstrated key skills in the past.

Instructions:
- Write exactly three questions.
- Focus on leadership, collaboration, ownership, and problem-solving scenarios.
- Each question must reference themes, accomplishments, or gaps you infer from the resume and job description.
- Avoid yes/no questions and keep them <= 30 words.
- Do not include numbering, bullet points, or explanatory text.

Resume:
{resume}

Job Description:
{job_description}";
