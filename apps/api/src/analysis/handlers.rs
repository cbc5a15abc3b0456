//! Axum route handlers for résumé extraction and analysis.

use axum::{
    extract::{Multipart, State},
    Json,
};

use crate::analysis::models::{AnalyzeResponse, BatchAnalyzeResponse, ExtractResponse};
use crate::analysis::service::{analyze_batch, analyze_document, extract_fields};
use crate::config::MAX_BATCH_FILES;
use crate::errors::AppError;
use crate::extraction::extract_text_blocking;
use crate::extraction::upload::UploadForm;
use crate::heuristic::{self, report::AnalysisResponse};
use crate::state::AppState;

const CV_FIELD: &str = "cv_file";
const BATCH_FIELD: &str = "files";
const JD_FIELD: &str = "job_description";

fn require_job_description(form: &UploadForm) -> Result<String, AppError> {
    let jd = form.require_text(JD_FIELD)?;
    if jd.trim().is_empty() {
        return Err(AppError::Validation(format!("{JD_FIELD} cannot be empty")));
    }
    Ok(jd.to_string())
}

/// POST /extract
///
/// Multipart `cv_file`. Returns contact details, skills, education and
/// certifications pulled out of the résumé by the model.
pub async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractResponse>, AppError> {
    let mut form = UploadForm::read(multipart, &[CV_FIELD], &state.config).await?;
    let doc = form.take_file(CV_FIELD)?;

    let fields = extract_fields(state.llm.as_ref(), doc).await?;
    Ok(Json(fields))
}

/// POST /analyze
///
/// Multipart `cv_file` + `job_description`. Returns the model's fit analysis.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let mut form = UploadForm::read(multipart, &[CV_FIELD], &state.config).await?;
    let job_description = require_job_description(&form)?;
    let doc = form.take_file(CV_FIELD)?;

    let analysis = analyze_document(state.llm.as_ref(), doc, &job_description).await?;
    Ok(Json(analysis))
}

/// POST /analyze/batch
///
/// Multipart `files` (repeated) + one shared `job_description`. Per-file
/// failures are embedded in the results instead of failing the request.
pub async fn handle_analyze_batch(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<BatchAnalyzeResponse>, AppError> {
    let mut form = UploadForm::read(multipart, &[BATCH_FIELD], &state.config).await?;
    let job_description = require_job_description(&form)?;
    let uploads = form.take_files(BATCH_FIELD);
    if uploads.is_empty() {
        return Err(AppError::Validation(format!(
            "Missing file field '{BATCH_FIELD}'"
        )));
    }

    if uploads.len() as u64 > MAX_BATCH_FILES {
        return Err(AppError::Validation(format!(
            "At most {MAX_BATCH_FILES} files per batch, got {}",
            uploads.len()
        )));
    }

    let response = analyze_batch(state.llm.as_ref(), uploads, job_description).await;
    Ok(Json(response))
}

/// POST /analyze/heuristic
///
/// Multipart `cv_file` + `job_description`. Keyword and role-title scoring
/// only; no model call.
pub async fn handle_analyze_heuristic(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let mut form = UploadForm::read(multipart, &[CV_FIELD], &state.config).await?;
    let job_description = require_job_description(&form)?;
    let doc = form.take_file(CV_FIELD)?;

    let cv_text = extract_text_blocking(doc).await?;
    Ok(Json(heuristic::analyze(&cv_text, &job_description)))
}
