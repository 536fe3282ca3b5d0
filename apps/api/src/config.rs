use anyhow::{anyhow, Context, Result};

use crate::models::analysis::AnalysisMode;

pub const DEFAULT_MODEL: &str = "gemini-flash-latest";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Application configuration loaded from environment variables.
/// Built once at startup and shared read-only behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub gemini_api_base: String,
    pub analysis_mode: AnalysisMode,
    pub port: u16,
    pub request_timeout_secs: u64,
    pub max_upload_bytes: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_model: normalize_model_name(
                &std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            ),
            gemini_api_base: std::env::var("GEMINI_API_BASE")
                .unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
                .trim_end_matches('/')
                .to_string(),
            analysis_mode: std::env::var("ANALYSIS_MODE")
                .unwrap_or_else(|_| "strict_json".to_string())
                .parse::<AnalysisMode>()
                .map_err(|e| anyhow!("ANALYSIS_MODE must be 'narrative' or 'strict_json': {e}"))?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "120".to_string())
                .parse::<u64>()
                .context("REQUEST_TIMEOUT_SECS must be a whole number of seconds")?,
            max_upload_bytes: match std::env::var("MAX_UPLOAD_BYTES") {
                Ok(v) => v
                    .parse::<usize>()
                    .context("MAX_UPLOAD_BYTES must be a byte count")?,
                Err(_) => DEFAULT_MAX_UPLOAD_BYTES,
            },
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Accepts both `gemini-2.5-flash` and the fully-qualified `models/gemini-2.5-flash`.
pub fn normalize_model_name(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix("models/")
        .unwrap_or(trimmed)
        .to_string()
}
