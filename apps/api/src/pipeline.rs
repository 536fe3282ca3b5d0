//! Pipeline Orchestrator.
//!
//! Linear, short-circuiting on the first failure:
//! inputs → extract → non-empty check → prompt → model → validate.
//! Every failure leaves here as a classified `PipelineError`.

use std::sync::Arc;

use tracing::{debug, info, info_span, Instrument};
use uuid::Uuid;

use crate::errors::PipelineError;
use crate::extractor::TextExtractor;
use crate::llm_client::{GenerationConfig, ModelClient};
use crate::models::analysis::{AnalysisMode, AnalysisResult, ExtractedText, UploadedDocument};
use crate::prompt;
use crate::validator;

/// Job descriptions shorter than this (after trimming) are rejected as uninformative.
pub const MIN_JOB_DESCRIPTION_CHARS: usize = 50;

/// A successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    pub resume_preview: String,
}

/// One pipeline per process, shared by all requests. Holds no mutable state.
#[derive(Clone)]
pub struct Pipeline {
    mode: AnalysisMode,
    generation: GenerationConfig,
    extractor: Arc<dyn TextExtractor>,
    client: Arc<dyn ModelClient>,
}

impl Pipeline {
    pub fn new(
        mode: AnalysisMode,
        extractor: Arc<dyn TextExtractor>,
        client: Arc<dyn ModelClient>,
    ) -> Self {
        Self {
            mode,
            generation: GenerationConfig::for_mode(mode),
            extractor,
            client,
        }
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    pub async fn run(
        &self,
        document: Option<UploadedDocument>,
        job_description: &str,
    ) -> Result<AnalysisReport, PipelineError> {
        let span = info_span!("analysis", id = %Uuid::new_v4(), mode = %self.mode);
        self.run_stages(document, job_description)
            .instrument(span)
            .await
    }

    async fn run_stages(
        &self,
        document: Option<UploadedDocument>,
        job_description: &str,
    ) -> Result<AnalysisReport, PipelineError> {
        let (document, job_description) = check_inputs(document, job_description)?;
        debug!(filename = %document.filename, format = ?document.format, "Inputs accepted");

        let extracted = self.extract(document).await?;
        debug!(
            chars = extracted.length,
            format = ?extracted.source_format,
            "Resume text extracted"
        );

        let prompt = prompt::build_prompt(job_description, &extracted.content, self.mode);
        debug!(prompt_chars = prompt.chars().count(), "Prompt built");

        let raw = self.client.generate(&prompt, &self.generation).await?;
        debug!(finish_reason = ?raw.finish_reason, "Model responded");
        let result = validator::validate(&raw, self.mode)?;

        info!(model = self.client.model(), "Analysis complete");
        Ok(AnalysisReport {
            result,
            resume_preview: extracted.preview(),
        })
    }

    /// Runs the extractor on the blocking pool and enforces non-empty output.
    async fn extract(&self, document: UploadedDocument) -> Result<ExtractedText, PipelineError> {
        let format = document.format;
        let extractor = Arc::clone(&self.extractor);

        let text = tokio::task::spawn_blocking(move || extractor.extract(&document))
            .await
            .map_err(|e| PipelineError::upstream(format!("Text extraction task failed: {e}")))??;

        ExtractedText::new(text, format).ok_or_else(PipelineError::empty_extracted_text)
    }
}

fn check_inputs(
    document: Option<UploadedDocument>,
    job_description: &str,
) -> Result<(UploadedDocument, &str), PipelineError> {
    let document =
        document.ok_or_else(|| PipelineError::missing_input("No resume file provided"))?;
    if document.filename.trim().is_empty() {
        return Err(PipelineError::missing_input("No file selected"));
    }

    let job_description = job_description.trim();
    if job_description.is_empty() {
        return Err(PipelineError::missing_input("Job description is required"));
    }
    if job_description.chars().count() < MIN_JOB_DESCRIPTION_CHARS {
        return Err(PipelineError::missing_input(format!(
            "Job description must be at least {MIN_JOB_DESCRIPTION_CHARS} characters"
        )));
    }

    Ok((document, job_description))
}
