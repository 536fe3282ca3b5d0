//! Prompt Builder: pure, deterministic string assembly.
//!
//! No validation happens here. Identical `(job description, résumé, mode)`
//! always yields a byte-identical prompt.

pub mod templates;

use crate::models::analysis::{AnalysisMode, AnalysisRequest};
use templates::{
    JOB_HEADER, NARRATIVE_CLOSING, NARRATIVE_SYSTEM, RESUME_HEADER, STRICT_JSON_CLOSING,
    STRICT_JSON_SYSTEM,
};

/// Builds the prompt for a job description and raw résumé text.
/// The résumé is cut to the first `RESUME_TRUNCATION_CHARS` characters.
pub fn build_prompt(job_description: &str, resume_text: &str, mode: AnalysisMode) -> String {
    render(&AnalysisRequest::new(job_description, resume_text), mode)
}

/// Renders an already-assembled request.
pub fn render(request: &AnalysisRequest, mode: AnalysisMode) -> String {
    let (system, closing) = match mode {
        AnalysisMode::Narrative => (NARRATIVE_SYSTEM, NARRATIVE_CLOSING),
        AnalysisMode::StrictJson => (STRICT_JSON_SYSTEM, STRICT_JSON_CLOSING),
    };

    format!(
        "{system}\n\n{JOB_HEADER}\n{job}\n\n{RESUME_HEADER}\n{resume}\n\n{closing}",
        job = request.job_description,
        resume = request.truncated_resume(),
    )
}
