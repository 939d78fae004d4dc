//! Liveness probe.

use axum::Json;
use serde_json::{json, Value};

/// Reports service liveness.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
