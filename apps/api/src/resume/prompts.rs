// LLM prompt constants for resume tailoring.

/// LaTeX resume prompt. Replace `{job_description}` before sending; the
/// resume PDF is attached to the same request.
pub const LATEX_RESUME_PROMPT_TEMPLATE: &str = r#"You are an expert Resume Writer and LaTeX Typesetter. Your goal is to rewrite the attached resume into a clean, professional, single-page LaTeX document tailored specifically to the Job Description provided.

### KEY FORMATTING PRINCIPLES:
1. **Structure:** Use a clean, modern layout (e.g., simple sections, clear headings). Avoid columns if they clutter the text. Keep headers left-aligned
2. **Typography:** Use a professional sans-serif font (like Helvetica or Arial via packages). Ensure high readability.
3. **Consolidate:** Fix any inconsistencies in spacing, dates, or bullet point formatting.

### THE ONE-PAGE MANDATE:
The output MUST be exactly one page. Use the following hierarchy to achieve this:
1. Use the `geometry` package to adjust margins (e.g., 0.5in) to maximize space.
2. Use the `enumitem` package to reduce vertical spacing between bullet points (`nolistsep`).
3. Rewrite wordy sentences to be concise without losing meaning.
4. Only as a last resort, slightly reduce the font size, but NEVER go below 10pt.

### CONTENT OPTIMIZATION:
1. **ATS Optimization:** Analyze the Job Description. Naturally integrate key hard skills and keywords into the resume summary and experience bullets.
2. **Impact:** Rewrite bullet points using the Google 'XYZ' formula (Accomplished [X] as measured by [Y], by doing [Z]) or the STAR method.
3. **Relevance:** Emphasize experience relevant to the Job Description and de-emphasize irrelevant roles.

### OUTPUT RULES:
1. Return valid, compilable LaTeX code only.
2. Wrap the code in \begin{document}...\end{document}.
3. Do not include any markdown blocks (```latex), preambles, or conversational text.

### JOB DESCRIPTION:
{job_description}"#;

/// Job summary prompt. Replace `{job_description}` before sending.
pub const JOB_SUMMARY_PROMPT_TEMPLATE: &str = "Please summarize this job description to highlight the \
key qualifications that the job wants. Keep it short and use plain text. Here is the job:
{job_description}";
