//! Multipart upload reading with a per-file byte ceiling.
//!
//! File parts are streamed chunk by chunk; once a part crosses the ceiling the
//! rest of it is only counted (for the error message), never buffered.

use std::collections::HashMap;

use axum::extract::multipart::{Field, Multipart};
use bytes::{Bytes, BytesMut};
use tracing::{info, warn};

use super::UploadedDocument;
use crate::config::Config;
use crate::errors::AppError;

/// One file part of a multipart form. `content` holds the per-file outcome so a
/// batch can keep going past an oversized file.
#[derive(Debug)]
pub struct FileUpload {
    pub field: String,
    pub filename: Option<String>,
    pub content: Result<UploadedDocument, AppError>,
}

impl FileUpload {
    /// Name used in responses; `cv` when the client sent no filename.
    pub fn display_name(&self) -> &str {
        self.filename.as_deref().filter(|n| !n.is_empty()).unwrap_or("cv")
    }
}

#[derive(Debug, Default)]
pub struct UploadForm {
    files: Vec<FileUpload>,
    fields: HashMap<String, String>,
}

impl UploadForm {
    /// Drains a multipart body. Parts named in `file_fields` (or carrying a
    /// filename) are treated as files, everything else as text.
    pub async fn read(
        mut multipart: Multipart,
        file_fields: &[&str],
        config: &Config,
    ) -> Result<Self, AppError> {
        let mut form = UploadForm::default();

        while let Some(mut field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            let filename = field.file_name().map(String::from);

            if filename.is_some() || file_fields.contains(&name.as_str()) {
                let content = match read_capped(&mut field, config.max_file_bytes()).await? {
                    Ok(bytes) => Ok(UploadedDocument::new(
                        filename.clone().unwrap_or_default(),
                        bytes,
                    )),
                    Err(size) => Err(AppError::FileTooLarge {
                        size_mb: bytes_to_mb(size),
                        max_mb: config.max_file_size_mb,
                    }),
                };
                match &content {
                    Ok(doc) => info!(field = %name, filename = %doc.filename, size = doc.bytes.len(), "Received upload"),
                    Err(e) => warn!(field = %name, ?filename, "Rejected upload: {e}"),
                }
                form.files.push(FileUpload {
                    field: name,
                    filename,
                    content,
                });
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }

        Ok(form)
    }

    pub fn require_text(&self, name: &str) -> Result<&str, AppError> {
        self.fields
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| AppError::Validation(format!("Missing form field '{name}'")))
    }

    /// Takes the first file sent under `name`, surfacing its read error if any.
    pub fn take_file(&mut self, name: &str) -> Result<UploadedDocument, AppError> {
        let index = self
            .files
            .iter()
            .position(|f| f.field == name)
            .ok_or_else(|| AppError::Validation(format!("Missing file field '{name}'")))?;
        self.files.remove(index).content
    }

    /// All files sent under `name`, in upload order.
    pub fn take_files(&mut self, name: &str) -> Vec<FileUpload> {
        let (matching, rest) = std::mem::take(&mut self.files)
            .into_iter()
            .partition(|f| f.field == name);
        self.files = rest;
        matching
    }
}

/// Reads one part into memory. The outer `Result` is a broken multipart body;
/// the inner `Err` carries the full size of a part that crossed `max_bytes`.
async fn read_capped(
    field: &mut Field<'_>,
    max_bytes: u64,
) -> Result<Result<Bytes, u64>, AppError> {
    let mut buf = BytesMut::new();

    while let Some(chunk) = field.chunk().await? {
        let seen = (buf.len() + chunk.len()) as u64;
        if seen > max_bytes {
            let mut size = seen;
            while let Some(rest) = field.chunk().await? {
                size += rest.len() as u64;
            }
            return Ok(Err(size));
        }
        buf.extend_from_slice(&chunk);
    }

    Ok(Ok(buf.freeze()))
}

fn bytes_to_mb(n: u64) -> f64 {
    (n as f64 / (1024.0 * 1024.0) * 100.0).round() / 100.0
}
