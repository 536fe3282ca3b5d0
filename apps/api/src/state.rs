use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::ModelClient;
use crate::pipeline::Pipeline;

/// Shared application state injected into all route handlers via Axum extractors.
/// Everything here is read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<Pipeline>,
    /// The same client the pipeline uses; exposed for the model catalog route.
    pub llm: Arc<dyn ModelClient>,
    pub config: Arc<Config>,
}
