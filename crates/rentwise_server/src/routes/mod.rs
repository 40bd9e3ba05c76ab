//! HTTP routes, all mounted under `/api`.

use crate::error::AppError;
use crate::state::AppState;
use axum::Json;
use axum::Router;
use rentwise_core::EntityKind;
use serde_json::{json, Value};
use uuid::Uuid;

mod dashboard;
mod health;
mod leads;
mod properties;
mod rooms;

/// Builds the API router with a JSON 404 fallback.
pub fn router(state: AppState) -> Router {
    let api = Router::new()
        .nest("/properties", properties::routes())
        .nest("/rooms", rooms::routes())
        .nest("/leads", leads::routes())
        .merge(dashboard::routes())
        .merge(health::routes());

    Router::new()
        .nest("/api", api)
        .fallback(route_not_found)
        .with_state(state)
}

/// Also each method router's fallback, so an unsupported method is a 404.
async fn route_not_found() -> AppError {
    AppError::NotFound("Route not found".to_string())
}

/// Parses a path id; malformed ids are client errors.
fn parse_id(raw: &str, entity: EntityKind) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid {entity} id `{raw}`")))
}

fn deleted(entity: EntityKind) -> Json<Value> {
    Json(json!({ "message": format!("{} deleted", entity.title()) }))
}
