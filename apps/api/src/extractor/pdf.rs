use std::any::Any;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("{0}")]
    Parse(String),

    #[error("PDF parser aborted: {0}")]
    Panicked(String),
}

/// Extracts text page by page, joining non-empty pages with a single newline.
///
/// `pdf-extract` can panic on malformed input; that is caught and reported as an error.
pub fn extract_text(bytes: &[u8]) -> Result<String, PdfError> {
    let pages = std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem_by_pages(bytes))
        .map_err(|payload| PdfError::Panicked(panic_message(payload.as_ref())))?
        .map_err(|e| PdfError::Parse(e.to_string()))?;

    Ok(join_pages(&pages))
}

fn join_pages(pages: &[String]) -> String {
    pages
        .iter()
        .map(|page| page.trim())
        .filter(|page| !page.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown parser failure".to_string()
    }
}
