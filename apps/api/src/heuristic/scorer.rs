//! Keyword + role-title scoring of a résumé against a JD's `SkillSet`.
//!
//! Points: must-have keyword 10, nice-to-have 4, role-title match 6.
//! The total is clamped to 0–100.

use crate::heuristic::fuzzy::{best_match, partial_ratio};
use crate::heuristic::skills::SkillSet;

pub const WANTED_POINTS: i64 = 10;
pub const NICE_POINTS: i64 = 4;
pub const ROLE_MATCH_POINTS: i64 = 6;
pub const ROLE_MATCH_THRESHOLD: f64 = 80.0;
/// Only the head of the résumé is compared against role titles.
pub const ROLE_SCAN_CHARS: usize = 2000;

pub const ROLE_TITLES: &[&str] = &[
    "technical support",
    "support engineer",
    "site reliability",
    "devops",
    "data engineer",
    "qa",
    "customer success",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub score: u32,
    pub hits: Vec<String>,
    pub gaps: Vec<String>,
}

pub fn score_resume(cv_text: &str, skills: &SkillSet) -> MatchResult {
    let cv_lower = cv_text.to_lowercase();
    let mut score: i64 = 0;
    let mut hits = Vec::new();
    let mut gaps = Vec::new();

    for keyword in &skills.wanted {
        if cv_lower.contains(keyword) {
            score += WANTED_POINTS;
            hits.push(keyword.to_string());
        } else {
            gaps.push(keyword.to_string());
        }
    }

    for keyword in &skills.nice {
        if cv_lower.contains(keyword) {
            score += NICE_POINTS;
            hits.push(keyword.to_string());
        }
    }

    let head: String = cv_lower.chars().take(ROLE_SCAN_CHARS).collect();
    if let Some((role, similarity)) = best_match(&head, ROLE_TITLES, partial_ratio) {
        if similarity >= ROLE_MATCH_THRESHOLD {
            score += ROLE_MATCH_POINTS;
            hits.push(format!("role match: {role}"));
        }
    }

    MatchResult {
        score: score.clamp(0, 100) as u32,
        hits,
        gaps,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Suggestions
// ────────────────────────────────────────────────────────────────────────────

/// Advice emitted once when any of `gaps` is missing from the résumé.
#[derive(Debug)]
pub struct SuggestionRule {
    pub gaps: &'static [&'static str],
    pub text: &'static str,
}

pub const SUGGESTION_RULES: &[SuggestionRule] = &[
    SuggestionRule {
        gaps: &["sql"],
        text: "Add a bullet with SQL: queries you ran, logs you analyzed, or metrics you computed.",
    },
    SuggestionRule {
        gaps: &["api", "rest"],
        text: "Mention REST APIs you integrated/troubleshot; include tools and error codes.",
    },
    SuggestionRule {
        gaps: &["linux"],
        text: "Show Linux experience (shell, logs, services, systemctl, journalctl).",
    },
    SuggestionRule {
        gaps: &["support"],
        text: "Quantify support impact (tickets/week, SLA, MTTR, escalations handled).",
    },
];

/// Template suggestions for the given gaps, in rule order. May be empty.
pub fn suggestions_for(gaps: &[String]) -> Vec<String> {
    SUGGESTION_RULES
        .iter()
        .filter(|rule| rule.gaps.iter().any(|g| gaps.iter().any(|m| m == g)))
        .map(|rule| rule.text.to_string())
        .collect()
}
