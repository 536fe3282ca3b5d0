//! Google Generative Language API (v1beta) backend.
//!
//! All provider-specific response shapes live in this file. `classify_failure`
//! is the one place that reads finish reasons and prompt feedback.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{GenerationConfig, LlmError, ModelClient, ModelInfo, RawModelOutput, SafetySetting};
use crate::config::Config;

const API_VERSION: &str = "v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Finish reasons meaning the provider withheld the content.
const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
    "IMAGE_SAFETY",
];

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: WireGenerationConfig<'a>,
    #[serde(skip_serializing_if = "no_settings")]
    safety_settings: &'a [SafetySetting],
}

fn no_settings(settings: &&[SafetySetting]) -> bool {
    settings.is_empty()
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct WireGenerationConfig<'a> {
    temperature: f32,
    max_output_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'a str>,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(prompt: &'a str, config: &'a GenerationConfig) -> Self {
        Self {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: WireGenerationConfig {
                temperature: config.temperature,
                max_output_tokens: config.max_output_tokens,
                response_mime_type: config.response_mime_type,
            },
            safety_settings: &config.safety_settings,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub safety_ratings: Vec<SafetyRating>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
    /// Reasoning parts from thinking models; never part of the answer.
    #[serde(default)]
    pub thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
    #[serde(default)]
    pub safety_ratings: Vec<SafetyRating>,
}

#[derive(Debug, Deserialize)]
pub struct SafetyRating {
    pub category: String,
    pub probability: Option<String>,
    #[serde(default)]
    pub blocked: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, if any are non-empty.
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts
            .iter()
            .filter(|p| !p.thought)
            .filter_map(|p| p.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }

    /// Why the provider withheld content, or `None` if it did not.
    fn block_reason(&self) -> Option<String> {
        if let Some(feedback) = &self.prompt_feedback {
            if let Some(reason) = &feedback.block_reason {
                return Some(describe_block(
                    &format!("prompt blocked: {reason}"),
                    &feedback.safety_ratings,
                ));
            }
        }

        let candidate = self.candidates.first()?;
        let reason = candidate.finish_reason.as_deref()?;
        BLOCKING_FINISH_REASONS
            .contains(&reason)
            .then(|| describe_block(&format!("finish reason: {reason}"), &candidate.safety_ratings))
    }
}

fn describe_block(reason: &str, ratings: &[SafetyRating]) -> String {
    let flagged: Vec<&str> = ratings
        .iter()
        .filter(|r| r.blocked || matches!(r.probability.as_deref(), Some("HIGH" | "MEDIUM")))
        .map(|r| r.category.as_str())
        .collect();
    if flagged.is_empty() {
        reason.to_string()
    } else {
        format!("{reason}; flagged: {}", flagged.join(", "))
    }
}

/// Classifies a response that produced no usable text.
/// Safety withholding becomes `Blocked`; anything else is an upstream failure.
pub fn classify_failure(response: &GenerateContentResponse) -> LlmError {
    match response.block_reason() {
        Some(reason) => LlmError::Blocked { reason },
        None => LlmError::EmptyContent {
            finish_reason: response.finish_reason().unwrap_or("none").to_string(),
        },
    }
}

/// Turns a decoded provider response into model output or a classified failure.
/// A blocking finish reason wins over any partial text.
fn into_output(response: GenerateContentResponse) -> Result<RawModelOutput, LlmError> {
    if response.block_reason().is_some() {
        return Err(classify_failure(&response));
    }
    match response.text() {
        Some(text) => Ok(RawModelOutput {
            text,
            finish_reason: response.finish_reason().map(str::to_string),
        }),
        None => Err(classify_failure(&response)),
    }
}

#[derive(Debug, Deserialize)]
struct GoogleError {
    error: GoogleErrorBody,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorBody {
    message: String,
}

/// Non-2xx response body to `LlmError::Api`. Google's `{"error":{"message":..}}`
/// envelope is unwrapped; anything else is kept as-is.
fn api_error(status: u16, body: String) -> LlmError {
    let message = serde_json::from_str::<GoogleError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);
    LlmError::Api { status, message }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListModelsResponse {
    #[serde(default)]
    models: Vec<WireModel>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireModel {
    name: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    supported_generation_methods: Vec<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Gemini client. Built once at startup from the read-only `Config`.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.request_timeout_secs))
                .build()?,
            api_key: config.gemini_api_key.clone(),
            api_base: config.gemini_api_base.clone(),
            model: config.gemini_model.clone(),
        })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/{API_VERSION}/models/{}:generateContent",
            self.api_base, self.model
        )
    }

    async fn error_from(response: reqwest::Response) -> LlmError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        api_error(status, body)
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<RawModelOutput, LlmError> {
        let request_body = GenerateContentRequest::new(prompt, config);

        let response = self
            .client
            .post(self.generate_url())
            .header(API_KEY_HEADER, &self.api_key)
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let err = Self::error_from(response).await;
            warn!("Gemini API call failed: {err}");
            return Err(err);
        }

        let body = response.text().await?;
        let decoded: GenerateContentResponse = serde_json::from_str(&body)?;

        if let Some(usage) = &decoded.usage_metadata {
            debug!(
                "Gemini call finished: prompt_tokens={:?}, output_tokens={:?}, finish_reason={:?}",
                usage.prompt_token_count,
                usage.candidates_token_count,
                decoded.finish_reason()
            );
        }

        into_output(decoded)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>, LlmError> {
        let response = self
            .client
            .get(format!("{}/{API_VERSION}/models", self.api_base))
            .query(&[("pageSize", "1000")])
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        let listed: ListModelsResponse = response.json().await?;
        Ok(listed
            .models
            .into_iter()
            .filter(|m| m.supported_generation_methods.iter().any(|g| g == "generateContent"))
            .map(|m| ModelInfo {
                name: m.name,
                display_name: m.display_name,
                description: m.description,
            })
            .collect())
    }

    fn model(&self) -> &str {
        &self.model
    }
}
