//! Response Validator: interprets raw model output under the active contract.
//!
//! Strict mode never repairs output: fenced JSON, prose around the object, a
//! missing field or an extra field are all rejected with the raw text attached.

use tracing::warn;

use crate::errors::PipelineError;
use crate::llm_client::RawModelOutput;
use crate::models::analysis::{AnalysisMode, AnalysisResult, StructuredAnalysis};

pub fn validate(raw: &RawModelOutput, mode: AnalysisMode) -> Result<AnalysisResult, PipelineError> {
    if raw.text.trim().is_empty() {
        return Err(PipelineError::model_invalid(
            "The AI returned an empty analysis",
            raw.text.clone(),
        ));
    }

    match mode {
        AnalysisMode::Narrative => Ok(AnalysisResult::Narrative {
            markdown_text: raw.text.clone(),
        }),
        AnalysisMode::StrictJson => parse_structured(&raw.text).map(AnalysisResult::Structured),
    }
}

fn parse_structured(text: &str) -> Result<StructuredAnalysis, PipelineError> {
    let analysis: StructuredAnalysis = serde_json::from_str(text).map_err(|e| {
        PipelineError::model_invalid(format!("AI response did not match the analysis schema: {e}"), text)
    })?;

    if !score_in_range(&analysis.match_score) {
        warn!(
            match_score = %analysis.match_score,
            "matchScore outside 0-100; passing through unchanged"
        );
    }

    Ok(analysis)
}

fn score_in_range(score: &serde_json::Number) -> bool {
    score
        .as_f64()
        .is_some_and(|s| (0.0..=100.0).contains(&s))
}
