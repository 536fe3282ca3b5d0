/// LLM Client: the single point of entry for all model calls.
///
/// No other module talks to the provider directly. The pipeline only sees the
/// `ModelClient` trait; `GeminiClient` is the production implementation.
///
/// One call per invocation: no retries, no caching.
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::models::analysis::AnalysisMode;

pub mod gemini;

pub use gemini::GeminiClient;

#[derive(Debug, Error)]
pub enum LlmError {
    /// The provider completed the call but withheld content.
    #[error("content withheld by safety filters: {reason}")]
    Blocked { reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("LLM returned empty content (finish reason: {finish_reason})")]
    EmptyContent { finish_reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HarmCategory {
    #[serde(rename = "HARM_CATEGORY_HARASSMENT")]
    Harassment,
    #[serde(rename = "HARM_CATEGORY_HATE_SPEECH")]
    HateSpeech,
    #[serde(rename = "HARM_CATEGORY_SEXUALLY_EXPLICIT")]
    SexuallyExplicit,
    #[serde(rename = "HARM_CATEGORY_DANGEROUS_CONTENT")]
    DangerousContent,
}

/// Only `BLOCK_NONE` is ever sent; strict mode leaves thresholds to the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockThreshold {
    BlockNone,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: BlockThreshold,
}

/// Generation parameters. Fixed per mode; see `for_mode`.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    /// 0.0 to 1.0
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Empty means provider defaults.
    pub safety_settings: Vec<SafetySetting>,
    pub response_mime_type: Option<&'static str>,
}

impl GenerationConfig {
    /// Higher temperature, every category set to `BLOCK_NONE`.
    pub fn narrative() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 1500,
            safety_settings: [
                HarmCategory::Harassment,
                HarmCategory::HateSpeech,
                HarmCategory::SexuallyExplicit,
                HarmCategory::DangerousContent,
            ]
            .into_iter()
            .map(|category| SafetySetting {
                category,
                threshold: BlockThreshold::BlockNone,
            })
            .collect(),
            response_mime_type: None,
        }
    }

    pub fn strict_json() -> Self {
        Self {
            temperature: 0.3,
            max_output_tokens: 2048,
            safety_settings: Vec::new(),
            response_mime_type: Some("application/json"),
        }
    }

    pub fn for_mode(mode: AnalysisMode) -> Self {
        match mode {
            AnalysisMode::Narrative => Self::narrative(),
            AnalysisMode::StrictJson => Self::strict_json(),
        }
    }
}

/// Text returned by the model, untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct RawModelOutput {
    pub text: String,
    pub finish_reason: Option<String>,
}

/// A provider model usable for content generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelInfo {
    pub name: String,
    pub display_name: String,
    pub description: String,
}

/// The model client trait. Carried in `AppState` and `Pipeline` as `Arc<dyn ModelClient>`.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Performs exactly one generation call.
    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<RawModelOutput, LlmError>;

    /// Models that support content generation. Backends without a catalog return none.
    async fn list_models(&self) -> Result<Vec<ModelInfo>, LlmError> {
        Ok(Vec::new())
    }

    /// Model identifier, for logs and health output.
    fn model(&self) -> &str;
}
