//! Best-effort per-process rate limiting: at most one accepted request per
//! `min_interval`. Shared through `AppState`, so every worker thread sees the
//! same timestamp.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug)]
pub struct RateLimiter {
    min_interval: Duration,
    last_accepted: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_accepted: Mutex::new(None),
        }
    }

    /// Accepts the call and records it, or rejects without touching the timestamp.
    pub fn check(&self) -> Result<(), AppError> {
        self.check_at(Instant::now())
    }

    fn check_at(&self, now: Instant) -> Result<(), AppError> {
        // A poisoned lock only means another request panicked mid-check; the
        // stored instant is still valid.
        let mut last = self
            .last_accepted
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(prev) = *last {
            if now.saturating_duration_since(prev) < self.min_interval {
                return Err(AppError::RateLimited);
            }
        }
        *last = Some(now);
        Ok(())
    }
}

/// Middleware guarding the model-backed routes.
pub async fn enforce_rate_limit(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    if let Err(e) = state.rate_limiter.check() {
        warn!(path = %request.uri().path(), "Rejected by rate limiter");
        return Err(e);
    }
    Ok(next.run(request).await)
}
