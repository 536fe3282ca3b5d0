//! Document Extractor: turns an uploaded résumé into plain text.
//!
//! Dispatch is by filename suffix only. Parser failures are wrapped into
//! `ExtractionFailed`; an empty result is returned as-is and classified by
//! the pipeline, so "wrong format" and "nothing readable" stay distinct.

pub mod docx;
pub mod pdf;

use tracing::debug;

use crate::errors::PipelineError;
use crate::models::analysis::{DocumentFormat, UploadedDocument};

/// Swappable extraction backend. `Pipeline` holds an `Arc<dyn TextExtractor>`.
///
/// Extraction is CPU-bound; callers run it on the blocking pool.
pub trait TextExtractor: Send + Sync {
    /// Returns the document's text with surrounding whitespace stripped.
    fn extract(&self, document: &UploadedDocument) -> Result<String, PipelineError>;
}

/// Default extractor: PDF via `pdf-extract`, DOCX via `zip` + `quick-xml`, TXT as UTF-8.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentExtractor;

impl TextExtractor for DocumentExtractor {
    fn extract(&self, document: &UploadedDocument) -> Result<String, PipelineError> {
        let format = document.format;
        let bytes = document.bytes.as_ref();

        let text = match format {
            DocumentFormat::Pdf => {
                pdf::extract_text(bytes).map_err(|e| PipelineError::extraction_failed(format, e))?
            }
            DocumentFormat::Docx => {
                docx::extract_text(bytes).map_err(|e| PipelineError::extraction_failed(format, e))?
            }
            DocumentFormat::Txt => std::str::from_utf8(bytes)
                .map(str::to_string)
                .map_err(|e| PipelineError::extraction_failed(format, e))?,
            DocumentFormat::Unknown => return Err(PipelineError::unsupported_format()),
        };

        let text = text.trim().to_string();
        debug!(
            filename = %document.filename,
            format = ?format,
            chars = text.chars().count(),
            "Extracted resume text"
        );
        Ok(text)
    }
}
