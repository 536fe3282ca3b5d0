use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::llm_client::LlmError;
use crate::models::analysis::DocumentFormat;

/// Caller-visible failure classes. Every pipeline failure carries exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    MissingInput,
    UnsupportedFormat,
    ExtractionFailed,
    EmptyExtractedText,
    ModelBlocked,
    ModelInvalid,
    UpstreamFailure,
}

impl ErrorKind {
    pub fn code(self) -> &'static str {
        match self {
            ErrorKind::MissingInput => "MISSING_INPUT",
            ErrorKind::UnsupportedFormat => "UNSUPPORTED_FORMAT",
            ErrorKind::ExtractionFailed => "EXTRACTION_FAILED",
            ErrorKind::EmptyExtractedText => "EMPTY_EXTRACTED_TEXT",
            ErrorKind::ModelBlocked => "MODEL_BLOCKED",
            ErrorKind::ModelInvalid => "MODEL_INVALID",
            ErrorKind::UpstreamFailure => "UPSTREAM_FAILURE",
        }
    }

    /// Client-input failures are the caller's to fix; the rest come from the model or provider.
    pub fn is_client_input(self) -> bool {
        matches!(
            self,
            ErrorKind::MissingInput
                | ErrorKind::UnsupportedFormat
                | ErrorKind::ExtractionFailed
                | ErrorKind::EmptyExtractedText
        )
    }

    pub fn status(self) -> StatusCode {
        match self {
            k if k.is_client_input() => StatusCode::BAD_REQUEST,
            ErrorKind::ModelBlocked => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}

/// A classified pipeline failure.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, PipelineError>`.
#[derive(Debug, Error)]
#[error("{}: {message}", .kind.code())]
pub struct PipelineError {
    pub kind: ErrorKind,
    pub message: String,
    /// Model output preserved for diagnosis when strict validation rejects it.
    pub raw_model_output: Option<String>,
}

impl PipelineError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            raw_model_output: None,
        }
    }

    pub fn missing_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingInput, message)
    }

    pub fn unsupported_format() -> Self {
        Self::new(
            ErrorKind::UnsupportedFormat,
            "Unsupported file format. Please upload PDF, DOCX, or TXT files.",
        )
    }

    pub fn extraction_failed(format: DocumentFormat, cause: impl std::fmt::Display) -> Self {
        let label = match format {
            DocumentFormat::Pdf => "PDF",
            DocumentFormat::Docx => "DOCX",
            DocumentFormat::Txt => "TXT",
            DocumentFormat::Unknown => "document",
        };
        Self::new(
            ErrorKind::ExtractionFailed,
            format!("Error reading {label}: {cause}"),
        )
    }

    pub fn empty_extracted_text() -> Self {
        Self::new(
            ErrorKind::EmptyExtractedText,
            "Could not extract text from resume",
        )
    }

    pub fn model_blocked(reason: &str) -> Self {
        Self::new(
            ErrorKind::ModelBlocked,
            format!(
                "The AI safety filters withheld this analysis ({reason}). \
                 Remove any sensitive information or rephrase the content and try again."
            ),
        )
    }

    pub fn model_invalid(message: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::ModelInvalid,
            message: message.into(),
            raw_model_output: Some(raw.into()),
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UpstreamFailure, message)
    }
}

impl From<LlmError> for PipelineError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Blocked { reason } => PipelineError::model_blocked(&reason),
            other => PipelineError::upstream(format!("AI analysis failed: {other}")),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    success: bool,
    error: &'a str,
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw_response: Option<&'a str>,
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        let status = self.kind.status();
        if self.kind.is_client_input() {
            tracing::warn!(kind = self.kind.code(), "Rejected analysis input: {}", self.message);
        } else {
            tracing::error!(kind = self.kind.code(), "Analysis failed: {}", self.message);
        }

        let body = Json(ErrorBody {
            success: false,
            error: &self.message,
            kind: self.kind.code(),
            raw_response: self.raw_model_output.as_deref(),
        });

        (status, body).into_response()
    }
}
