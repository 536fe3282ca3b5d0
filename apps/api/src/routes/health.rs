use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns a simple status object with service identity and version.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "resume-analyzer-api",
        "version": env!("CARGO_PKG_VERSION"),
        "mode": state.pipeline.mode(),
        "model": state.llm.model(),
    }))
}
