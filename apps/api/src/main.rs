mod config;
mod errors;
mod extractor;
mod llm_client;
mod models;
mod pipeline;
mod prompt;
mod routes;
mod state;
mod validator;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extractor::DocumentExtractor;
use crate::llm_client::{GeminiClient, ModelClient};
use crate::pipeline::Pipeline;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Arc::new(Config::from_env()?);

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume analyzer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm: Arc<dyn ModelClient> = Arc::new(GeminiClient::new(&config)?);
    info!("LLM client initialized (model: {})", llm.model());

    let pipeline = Pipeline::new(
        config.analysis_mode,
        Arc::new(DocumentExtractor),
        Arc::clone(&llm),
    );
    info!("Analysis mode: {}", config.analysis_mode);

    let state = AppState {
        pipeline: Arc::new(pipeline),
        llm,
        config: Arc::clone(&config),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
