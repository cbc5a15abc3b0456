//! Result assembly: shapes a `MatchResult` into the public analysis payload.

use serde::Serialize;

use crate::heuristic::scorer::{suggestions_for, MatchResult};

/// Maximum entries kept in each list of the response.
pub const MAX_LIST_ITEMS: usize = 6;

/// Rough salary banding for junior-mid support/data/ops roles in Israel. Not derived from input.
pub const SALARY_RANGE_NOTE: &str = "₪17K–₪23K gross (rough guide; adjust by seniority/company).";

pub const FALLBACK_SUGGESTION: &str = "Looks good—tighten bullets with numbers and outcomes.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisResponse {
    pub fit_score: u32,
    pub highlights: Vec<String>,
    pub gaps: Vec<String>,
    pub salary_range: String,
    pub suggestions: Vec<String>,
}

pub fn assemble_analysis(result: &MatchResult) -> AnalysisResponse {
    let mut suggestions = suggestions_for(&result.gaps);
    suggestions.truncate(MAX_LIST_ITEMS);
    if suggestions.is_empty() {
        suggestions.push(FALLBACK_SUGGESTION.to_string());
    }

    AnalysisResponse {
        fit_score: result.score.min(100),
        highlights: result
            .hits
            .iter()
            .take(MAX_LIST_ITEMS)
            .map(|h| format!("Found: {h}"))
            .collect(),
        gaps: result
            .gaps
            .iter()
            .take(MAX_LIST_ITEMS)
            .map(|g| format!("Missing signal for: {g}"))
            .collect(),
        salary_range: SALARY_RANGE_NOTE.to_string(),
        suggestions,
    }
}
