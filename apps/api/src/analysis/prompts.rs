// Prompt builders for the LLM-backed endpoints.
// Both prompts enumerate the exact JSON keys the schemas in `models` accept.

/// Résumé text beyond this many characters is not sent to the model.
pub const CV_CHAR_LIMIT: usize = 120_000;
/// Job description text beyond this many characters is not sent to the model.
pub const JD_CHAR_LIMIT: usize = 60_000;

pub fn build_analysis_prompt(cv_text: &str, jd_text: &str) -> String {
    format!(
        r#"
You are an expert technical recruiter and hiring manager. Analyze the candidate CV against the job description.

Return ONLY a JSON object with these keys and types:
- improvement_suggestions: string[] (3-8 bullets, concise)
- fit_score: number (0-100)
- fit_reason: string
- expected_salary_note: string

CV:
"""{cv}"""

JOB DESCRIPTION:
"""{jd}"""

Be factual and specific; avoid hallucinations. Keep salary note for Israel (gross/month) as a broad range when uncertain.
"#,
        cv = truncate_chars(cv_text, CV_CHAR_LIMIT),
        jd = truncate_chars(jd_text, JD_CHAR_LIMIT),
    )
}

pub fn build_extract_prompt(cv_text: &str) -> String {
    format!(
        r#"
Extract structured information from the following CV.
Return ONLY a JSON object with keys:
- name (string|null)
- email (string|null)
- phone (string|null)
- location (string|null)
- years_experience (string|null)
- skills (string[])
- education (string[])
- certifications (string[])
- summary (string|null)

CV:
"""{cv}"""
"#,
        cv = truncate_chars(cv_text, CV_CHAR_LIMIT),
    )
}

/// Longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}
