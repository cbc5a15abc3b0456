//! PDF text: the text layer of every page, in page order, one page per chunk
//! joined by newlines. Pages without a text layer (scanned images) contribute
//! an empty chunk, so words never run together across a page break.

use super::ExtractionError;

pub fn extract_pages(bytes: &[u8]) -> Result<String, ExtractionError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractionError::Pdf(e.to_string()))?;
    Ok(pages.join("\n"))
}
