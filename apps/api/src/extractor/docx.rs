use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use thiserror::Error;
use zip::ZipArchive;

const DOCUMENT_PART: &str = "word/document.xml";

#[derive(Debug, Error)]
pub enum DocxError {
    #[error("not a valid DOCX archive: {0}")]
    Archive(#[from] zip::result::ZipError),

    #[error("failed to read word/document.xml: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed document XML: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Extracts every `w:p` paragraph of the main document part, one per line.
pub fn extract_text(bytes: &[u8]) -> Result<String, DocxError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name(DOCUMENT_PART)?.read_to_string(&mut xml)?;

    Ok(paragraphs(&xml)?.join("\n"))
}

/// Paragraphs in the order they open. Text boxes nest paragraphs inside
/// paragraphs, so each open paragraph holds a slot in `done` reserved at its
/// start tag. `mc:Fallback` repeats the `mc:Choice` content and is skipped.
fn paragraphs(xml: &str) -> Result<Vec<String>, DocxError> {
    let mut reader = Reader::from_str(xml);

    let mut done: Vec<String> = Vec::new();
    let mut open: Vec<usize> = Vec::new();
    let mut in_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => match e.name().as_ref() {
                b"w:p" => {
                    open.push(done.len());
                    done.push(String::new());
                }
                b"w:t" => in_text = true,
                b"mc:Fallback" => {
                    reader.read_to_end(e.name())?;
                }
                _ => {}
            },
            Event::Empty(e) => {
                let ch = match e.name().as_ref() {
                    b"w:p" => {
                        done.push(String::new());
                        None
                    }
                    b"w:tab" => Some('\t'),
                    b"w:br" | b"w:cr" => Some('\n'),
                    _ => None,
                };
                if let (Some(ch), Some(&slot)) = (ch, open.last()) {
                    done[slot].push(ch);
                }
            }
            Event::Text(e) if in_text => {
                if let Some(&slot) = open.last() {
                    done[slot].push_str(&e.unescape()?);
                }
            }
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_text = false,
                b"w:p" => {
                    open.pop();
                }
                _ => {}
            },
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(done)
}
