//! Route handlers, one module per upstream.

pub mod chat;
pub mod flights;
pub mod vehicles;

use axum::Json;
use serde_json::{json, Value};

/// Liveness probe. Never touches an upstream.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
