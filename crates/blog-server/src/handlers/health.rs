//! Liveness endpoints

use axum::Json;
use serde_json::{json, Value};

pub async fn root() -> &'static str {
    "Blog API"
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
