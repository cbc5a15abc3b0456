//! DOCX text: every `w:p` in `word/document.xml`, in document order, one line each.
//! Table cell paragraphs are included. Paragraphs nested inside another paragraph
//! (text boxes) are skipped so their text is not spliced into the host line.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use super::ExtractionError;

const DOCUMENT_PART: &str = "word/document.xml";

pub fn extract_paragraphs(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| ExtractionError::Docx(e.to_string()))?;

    let mut xml = String::new();
    archive
        .by_name(DOCUMENT_PART)
        .map_err(|e| ExtractionError::Docx(format!("{DOCUMENT_PART}: {e}")))?
        .read_to_string(&mut xml)
        .map_err(|e| ExtractionError::Docx(format!("{DOCUMENT_PART}: {e}")))?;

    paragraphs_from_xml(&xml).map(|paragraphs| paragraphs.join("\n"))
}

fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>, ExtractionError> {
    let mut reader = Reader::from_str(xml);
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    // Depth of open `w:p` elements; text is only collected at depth 1.
    let mut para_depth = 0usize;
    let mut in_text = false;

    loop {
        let event = reader
            .read_event()
            .map_err(|e| ExtractionError::Docx(format!("XML error at {}: {e}", reader.buffer_position())))?;

        match event {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => para_depth += 1,
                b"w:t" if para_depth == 1 => in_text = true,
                b"w:tab" if para_depth == 1 => current.push('\t'),
                b"w:br" | b"w:cr" if para_depth == 1 => current.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:p" if para_depth == 0 => paragraphs.push(String::new()),
                b"w:tab" if para_depth == 1 => current.push('\t'),
                b"w:br" | b"w:cr" if para_depth == 1 => current.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text => {
                let text = t
                    .unescape()
                    .map_err(|e| ExtractionError::Docx(e.to_string()))?;
                current.push_str(&text);
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    para_depth = para_depth.saturating_sub(1);
                    if para_depth == 0 {
                        paragraphs.push(std::mem::take(&mut current));
                    }
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(paragraphs)
}
