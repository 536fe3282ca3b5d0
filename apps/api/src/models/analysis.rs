//! Data carried through one analysis run. Nothing here outlives a request.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Résumé characters included in the prompt. Truncation is by character, never by token.
pub const RESUME_TRUNCATION_CHARS: usize = 3000;

/// Characters of extracted text echoed back as a preview in narrative mode.
pub const RESUME_PREVIEW_CHARS: usize = 500;

/// The output contract selected for a deployment. Threaded through the prompt
/// builder and the response validator; never mixed within one process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Free-form markdown meant for direct display.
    Narrative,
    /// A single fixed-schema JSON object, rejected on any deviation.
    StrictJson,
}

impl FromStr for AnalysisMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "narrative" | "markdown" => Ok(AnalysisMode::Narrative),
            "strict_json" | "strict-json" | "strict" | "json" => Ok(AnalysisMode::StrictJson),
            other => Err(format!("unknown analysis mode '{other}'")),
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMode::Narrative => f.write_str("narrative"),
            AnalysisMode::StrictJson => f.write_str("strict_json"),
        }
    }
}

/// Declared document format, derived from the filename suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
    Unknown,
}

impl DocumentFormat {
    /// Case-insensitive suffix dispatch. Anything but `.pdf`, `.docx`, `.txt` is `Unknown`.
    pub fn from_filename(filename: &str) -> Self {
        let lower = filename.trim().to_ascii_lowercase();
        if lower.ends_with(".pdf") {
            DocumentFormat::Pdf
        } else if lower.ends_with(".docx") {
            DocumentFormat::Docx
        } else if lower.ends_with(".txt") {
            DocumentFormat::Txt
        } else {
            DocumentFormat::Unknown
        }
    }
}

/// An uploaded résumé. Owned by the request and dropped after extraction.
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub filename: String,
    pub format: DocumentFormat,
    pub bytes: Bytes,
}

impl UploadedDocument {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let filename = filename.into();
        Self {
            format: DocumentFormat::from_filename(&filename),
            filename,
            bytes: bytes.into(),
        }
    }
}

/// Non-empty text pulled out of a document.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedText {
    pub content: String,
    pub source_format: DocumentFormat,
    /// Length in characters.
    pub length: usize,
}

impl ExtractedText {
    /// Returns `None` when the content is empty or whitespace-only.
    pub fn new(content: String, source_format: DocumentFormat) -> Option<Self> {
        let content = content.trim().to_string();
        if content.is_empty() {
            return None;
        }
        Some(Self {
            length: content.chars().count(),
            content,
            source_format,
        })
    }

    /// First `RESUME_PREVIEW_CHARS` characters, with `...` appended when cut.
    pub fn preview(&self) -> String {
        if self.length > RESUME_PREVIEW_CHARS {
            format!("{}...", truncate_chars(&self.content, RESUME_PREVIEW_CHARS))
        } else {
            self.content.clone()
        }
    }
}

/// The inputs to one model comparison.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub job_description: String,
    pub resume_text: String,
    pub truncation_limit: usize,
}

impl AnalysisRequest {
    pub fn new(job_description: impl Into<String>, resume_text: impl Into<String>) -> Self {
        Self {
            job_description: job_description.into(),
            resume_text: resume_text.into(),
            truncation_limit: RESUME_TRUNCATION_CHARS,
        }
    }

    /// The résumé text as it is sent to the model.
    pub fn truncated_resume(&self) -> &str {
        truncate_chars(&self.resume_text, self.truncation_limit)
    }
}

/// The strict-mode schema. Field names match the JSON contract exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct StructuredAnalysis {
    /// Kept as the model's literal number so it serializes back unchanged.
    pub match_score: serde_json::Number,
    pub strengths: Vec<String>,
    pub missing_skills: Vec<String>,
    pub summary: String,
    pub recommendations: Vec<String>,
}

/// Exactly one variant is produced per deployment mode.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisResult {
    Narrative { markdown_text: String },
    Structured(StructuredAnalysis),
}

/// Slices `s` to at most `max_chars` characters without splitting a code point.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_dispatch_is_case_insensitive() {
        assert_eq!(DocumentFormat::from_filename("CV.PDF"), DocumentFormat::Pdf);
        assert_eq!(DocumentFormat::from_filename("cv.Docx"), DocumentFormat::Docx);
        assert_eq!(DocumentFormat::from_filename("notes.txt"), DocumentFormat::Txt);
    }

    #[test]
    fn test_unknown_suffixes() {
        assert_eq!(DocumentFormat::from_filename("resume.xyz"), DocumentFormat::Unknown);
        assert_eq!(DocumentFormat::from_filename("resume.doc"), DocumentFormat::Unknown);
        assert_eq!(DocumentFormat::from_filename("pdf"), DocumentFormat::Unknown);
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("narrative".parse::<AnalysisMode>(), Ok(AnalysisMode::Narrative));
        assert_eq!("STRICT_JSON".parse::<AnalysisMode>(), Ok(AnalysisMode::StrictJson));
        assert_eq!("json".parse::<AnalysisMode>(), Ok(AnalysisMode::StrictJson));
        assert!("both".parse::<AnalysisMode>().is_err());
    }

    #[test]
    fn test_extracted_text_rejects_whitespace() {
        assert!(ExtractedText::new("  \n\t ".to_string(), DocumentFormat::Txt).is_none());
    }

    #[test]
    fn test_extracted_text_trims_and_counts_chars() {
        let text = ExtractedText::new("  Zoë Müller \n".to_string(), DocumentFormat::Txt).unwrap();
        assert_eq!(text.content, "Zoë Müller");
        assert_eq!(text.length, 10);
    }

    #[test]
    fn test_preview_short_text_is_unchanged() {
        let text = ExtractedText::new("short resume".to_string(), DocumentFormat::Txt).unwrap();
        assert_eq!(text.preview(), "short resume");
    }

    #[test]
    fn test_preview_long_text_gets_ellipsis() {
        let text = ExtractedText::new("x".repeat(501), DocumentFormat::Txt).unwrap();
        let preview = text.preview();
        assert_eq!(preview.len(), 503);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn test_truncate_chars_respects_multibyte() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[test]
    fn test_request_truncates_resume() {
        let request = AnalysisRequest::new("jd", "r".repeat(RESUME_TRUNCATION_CHARS + 10));
        assert_eq!(request.truncated_resume().chars().count(), RESUME_TRUNCATION_CHARS);
    }
}
