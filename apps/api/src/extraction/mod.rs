//! Document extraction: turns an uploaded résumé (bytes + declared filename)
//! into plain text.
//!
//! Dispatch is by case-insensitive filename suffix:
//! - `.txt`  → UTF-8, invalid byte sequences dropped
//! - `.docx` → one line per paragraph (`docx`)
//! - `.pdf`  → one chunk per page (`pdf`)
//! - other   → best-effort UTF-8 decode, rejected if the bytes look binary
//!
//! Size limits are enforced while the upload is read (`upload`), before any
//! decoder runs.

pub mod docx;
pub mod pdf;
pub mod upload;

use bytes::Bytes;
use thiserror::Error;
use tracing::debug;

use crate::errors::AppError;

/// Share of undecodable characters above which an unknown file is treated as binary.
const MAX_UNDECODABLE_RATIO: f64 = 0.10;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("invalid DOCX package: {0}")]
    Docx(String),

    #[error("invalid PDF document: {0}")]
    Pdf(String),
}

/// Decoder selected for an upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentKind {
    PlainText,
    Docx,
    Pdf,
    Unknown,
}

impl DocumentKind {
    pub fn from_filename(filename: &str) -> Self {
        let name = filename.to_lowercase();
        if name.ends_with(".txt") {
            DocumentKind::PlainText
        } else if name.ends_with(".docx") {
            DocumentKind::Docx
        } else if name.ends_with(".pdf") {
            DocumentKind::Pdf
        } else {
            DocumentKind::Unknown
        }
    }
}

/// A single uploaded file. Lives for one request.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub bytes: Bytes,
}

impl UploadedDocument {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    pub fn kind(&self) -> DocumentKind {
        DocumentKind::from_filename(&self.filename)
    }
}

/// Extracts plain text from an uploaded document. Never fails on bad encoding;
/// an empty buffer always yields an empty string.
pub fn extract_text(doc: &UploadedDocument) -> Result<String, ExtractionError> {
    if doc.bytes.is_empty() {
        return Ok(String::new());
    }

    let kind = doc.kind();
    debug!(filename = %doc.filename, ?kind, size = doc.bytes.len(), "Extracting document text");

    match kind {
        DocumentKind::PlainText => Ok(decode_utf8_ignoring_errors(&doc.bytes).0),
        DocumentKind::Docx => docx::extract_paragraphs(&doc.bytes),
        DocumentKind::Pdf => pdf::extract_pages(&doc.bytes),
        DocumentKind::Unknown => decode_fallback(doc),
    }
}

/// Runs `extract_text` on the blocking pool. Decoder panics surface as
/// `MalformedDocument` instead of tearing down the request task.
pub async fn extract_text_blocking(doc: UploadedDocument) -> Result<String, AppError> {
    let filename = doc.filename.clone();
    tokio::task::spawn_blocking(move || extract_text(&doc))
        .await
        .map_err(|e| AppError::MalformedDocument(format!("decoder aborted on '{filename}': {e}")))?
        .map_err(AppError::from)
}

fn decode_fallback(doc: &UploadedDocument) -> Result<String, ExtractionError> {
    let (text, dropped) = decode_utf8_ignoring_errors(&doc.bytes);
    let total = text.chars().count() + dropped;
    let binary = doc.bytes.contains(&0)
        || (total > 0 && dropped as f64 / total as f64 > MAX_UNDECODABLE_RATIO);
    if binary {
        return Err(ExtractionError::UnsupportedFileType(doc.filename.clone()));
    }
    Ok(text)
}

/// Decodes UTF-8, dropping invalid sequences. Returns the text and the number
/// of dropped sequences.
fn decode_utf8_ignoring_errors(bytes: &[u8]) -> (String, usize) {
    let mut text = String::with_capacity(bytes.len());
    let mut dropped = 0;
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        if !chunk.invalid().is_empty() {
            dropped += 1;
        }
    }
    (text, dropped)
}
