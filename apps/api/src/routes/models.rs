use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::errors::PipelineError;
use crate::state::AppState;

/// GET /api/models
/// Lists provider models that support content generation.
pub async fn handle_list_models(State(state): State<AppState>) -> Result<Json<Value>, PipelineError> {
    let models = state.llm.list_models().await?;
    Ok(Json(json!({
        "success": true,
        "models": models,
    })))
}
