use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

/// GET /health
/// Liveness probe with the current server time.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// GET /
pub async fn root_handler() -> Json<Value> {
    Json(json!({ "message": "Server is running" }))
}
