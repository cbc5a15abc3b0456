mod analysis;
mod config;
mod errors;
mod extraction;
mod heuristic;
mod llm_client;
mod rate_limit;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::rate_limit::RateLimiter;
use crate::routes::{build_cors_layer, build_router};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing OPENAI_API_KEY)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV Analyzer API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize LLM client
    let llm = LlmClient::new(config.openai_api_key.clone(), config.model_name.clone())?
        .with_base_url(config.openai_base_url.clone());
    info!("LLM client initialized (model: {})", config.model_name);

    let rate_limiter = RateLimiter::new(Duration::from_millis(config.min_request_interval_ms));
    info!(
        "Rate limiter: min {}ms between model requests, max upload {} MB",
        config.min_request_interval_ms, config.max_file_size_mb
    );

    let cors = build_cors_layer(&config.cors_origins());

    // Build app state
    let state = AppState {
        llm: Arc::new(llm),
        config: config.clone(),
        rate_limiter: Arc::new(rate_limiter),
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
