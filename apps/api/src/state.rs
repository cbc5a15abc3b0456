use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmProvider;
use crate::rate_limit::RateLimiter;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Model backend. `LlmClient` in production, swappable for tests.
    pub llm: Arc<dyn LlmProvider>,
    pub config: Config,
    /// One limiter per process, shared by every model-backed route.
    pub rate_limiter: Arc<RateLimiter>,
}
