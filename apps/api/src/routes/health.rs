use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::state::AppState;

/// Maximum number of model ids returned by `/models`.
const MODEL_LIST_LIMIT: usize = 50;

/// GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "message": "API root"
    }))
}

/// GET /health
/// Returns a simple status object with the configured model.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "model": state.llm.model()
    }))
}

/// GET /models
/// Sanity check that the API key works; lists up to 50 model ids.
pub async fn models_handler(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    let ids = state.llm.list_models().await?;
    let count = ids.len();
    Ok(Json(json!({
        "count": count,
        "models": ids.into_iter().take(MODEL_LIST_LIMIT).collect::<Vec<_>>()
    })))
}
