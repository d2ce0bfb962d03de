// ============================
// crates/backend-lib/src/handlers/mod.rs
// ============================
//! HTTP handlers.
use axum::Json;
use serde_json::{json, Value};

pub mod auth;
pub mod notes;

/// Health check endpoint, outside the request gate
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
