//! Heuristic fit analysis: keyword signals from the JD, substring evidence in
//! the résumé, a fuzzy role-title bonus, then a fixed-shape response.
//! No LLM involved; fully deterministic.

pub mod fuzzy;
pub mod report;
pub mod scorer;
pub mod skills;

use tracing::debug;

use crate::heuristic::report::{assemble_analysis, AnalysisResponse};
use crate::heuristic::scorer::score_resume;
use crate::heuristic::skills::SkillSet;

/// Runs the full heuristic pipeline on already-extracted résumé text.
pub fn analyze(cv_text: &str, job_description: &str) -> AnalysisResponse {
    let skills = SkillSet::from_job_description(job_description);
    let result = score_resume(cv_text, &skills);
    debug!(
        wanted = ?skills.wanted,
        nice = ?skills.nice,
        score = result.score,
        "Heuristic scoring complete"
    );
    assemble_analysis(&result)
}
