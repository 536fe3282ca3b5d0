//! POST /analyze: multipart upload boundary for the analysis pipeline.

use std::time::Duration;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    Json,
};
use serde::Serialize;

use crate::errors::PipelineError;
use crate::models::analysis::{AnalysisResult, StructuredAnalysis, UploadedDocument};
use crate::pipeline::AnalysisReport;
use crate::state::AppState;

const RESUME_FIELD: &str = "resume";
/// `job_requirements` is the older form field name; both are accepted.
const JOB_FIELDS: &[&str] = &["job_description", "job_requirements"];

#[derive(Debug, Default)]
struct AnalyzeForm {
    resume: Option<UploadedDocument>,
    job_description: String,
}

/// Success payload. The shape depends on the deployment's mode.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum AnalyzeResponse {
    Structured {
        success: bool,
        data: StructuredAnalysis,
    },
    Narrative {
        success: bool,
        analysis: String,
        #[serde(rename = "resumePreview")]
        resume_preview: String,
    },
}

impl From<AnalysisReport> for AnalyzeResponse {
    fn from(report: AnalysisReport) -> Self {
        match report.result {
            AnalysisResult::Structured(data) => AnalyzeResponse::Structured {
                success: true,
                data,
            },
            AnalysisResult::Narrative { markdown_text } => AnalyzeResponse::Narrative {
                success: true,
                analysis: markdown_text,
                resume_preview: report.resume_preview,
            },
        }
    }
}

/// POST /analyze, POST /api/analyze
///
/// Reading the upload and running the pipeline share one deadline of
/// `REQUEST_TIMEOUT_SECS`.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, PipelineError> {
    let mut multipart = multipart.map_err(|rejection| {
        PipelineError::missing_input(format!("Invalid upload: {}", rejection.body_text()))
    })?;

    let timeout_secs = state.config.request_timeout_secs;
    let analysis = async {
        let form = read_form(&mut multipart).await?;
        state.pipeline.run(form.resume, &form.job_description).await
    };

    let report = tokio::time::timeout(Duration::from_secs(timeout_secs), analysis)
        .await
        .map_err(|_| {
            PipelineError::upstream(format!("Analysis timed out after {timeout_secs} seconds"))
        })??;
    Ok(Json(report.into()))
}

async fn read_form(multipart: &mut Multipart) -> Result<AnalyzeForm, PipelineError> {
    let mut form = AnalyzeForm::default();

    while let Some(field) = multipart.next_field().await.map_err(invalid_upload)? {
        let name = field.name().unwrap_or_default().to_string();
        if name == RESUME_FIELD {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(invalid_upload)?;
            form.resume = Some(UploadedDocument::new(filename, bytes));
        } else if JOB_FIELDS.contains(&name.as_str()) {
            form.job_description = field.text().await.map_err(invalid_upload)?;
        }
    }

    Ok(form)
}

fn invalid_upload(err: MultipartError) -> PipelineError {
    PipelineError::missing_input(format!("Invalid upload: {}", err.body_text()))
}
