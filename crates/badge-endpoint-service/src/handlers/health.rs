//! 存活探针

use axum::Json;
use axum::extract::State;
use serde_json::{Value, json};

use crate::state::AppState;

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "badge-endpoint-service",
        "rules": state.rules.len(),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
