//! Orchestration for the LLM-backed endpoints: extract text, prompt the model,
//! validate its JSON against the response schema.

use tracing::{info, warn};

use crate::analysis::models::{
    AnalyzeResponse, BatchAnalyzeItem, BatchAnalyzeResponse, ExtractResponse, ModelOutput,
};
use crate::analysis::prompts::{build_analysis_prompt, build_extract_prompt};
use crate::errors::AppError;
use crate::extraction::upload::FileUpload;
use crate::extraction::{extract_text_blocking, UploadedDocument};
use crate::llm_client::{strip_json_fences, LlmProvider};

/// Length of the raw model output quoted back when it fails validation.
const EXCERPT_CHARS: usize = 300;

/// Parses raw model text into `T`: fences stripped, JSON parsed, schema checked.
pub fn parse_model_output<T: ModelOutput>(raw: &str) -> Result<T, AppError> {
    let invalid = |detail: String| AppError::InvalidModelOutput {
        detail,
        excerpt: raw.chars().take(EXCERPT_CHARS).collect(),
    };

    let parsed: T = serde_json::from_str(strip_json_fences(raw)).map_err(|e| invalid(e.to_string()))?;
    parsed.validate().map_err(invalid)?;
    Ok(parsed)
}

pub async fn request_structured<T: ModelOutput>(
    llm: &dyn LlmProvider,
    prompt: &str,
) -> Result<T, AppError> {
    let raw = llm.complete(prompt).await?;
    parse_model_output(&raw)
}

pub async fn analyze_document(
    llm: &dyn LlmProvider,
    doc: UploadedDocument,
    job_description: &str,
) -> Result<AnalyzeResponse, AppError> {
    let cv_text = extract_text_blocking(doc).await?;
    request_structured(llm, &build_analysis_prompt(&cv_text, job_description)).await
}

pub async fn extract_fields(
    llm: &dyn LlmProvider,
    doc: UploadedDocument,
) -> Result<ExtractResponse, AppError> {
    let cv_text = extract_text_blocking(doc).await?;
    request_structured(llm, &build_extract_prompt(&cv_text)).await
}

/// Analyzes each upload in order. A failing item becomes a placeholder result;
/// it never aborts the batch.
pub async fn analyze_batch(
    llm: &dyn LlmProvider,
    uploads: Vec<FileUpload>,
    job_description: String,
) -> BatchAnalyzeResponse {
    let mut results = Vec::with_capacity(uploads.len());

    for upload in uploads {
        let filename = upload.display_name().to_string();
        let outcome = match upload.content {
            Ok(doc) => analyze_document(llm, doc, &job_description).await,
            Err(e) => Err(e),
        };

        let result = outcome.unwrap_or_else(|e| {
            warn!(filename = %filename, "Batch item failed: {e}");
            AnalyzeResponse::failed(&e)
        });
        results.push(BatchAnalyzeItem { filename, result });
    }

    info!(items = results.len(), "Batch analysis complete");

    BatchAnalyzeResponse {
        job_description,
        results,
    }
}
