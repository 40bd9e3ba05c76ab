use super::route_not_found;
use crate::state::AppState;
use axum::routing::get;
use axum::{Json, Router};
use rentwise_core::core_version;
use serde_json::{json, Value};

pub(super) fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health).fallback(route_not_found))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "version": core_version() }))
}
