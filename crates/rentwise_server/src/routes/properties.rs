use super::{deleted, parse_id, route_not_found};
use crate::error::AppError;
use crate::state::{property_service, AppState};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use rentwise_core::{EntityKind, NewProperty, Property, PropertyPatch, PropertyWithRooms};
use serde_json::Value;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_properties)
                .post(create_property)
                .fallback(route_not_found),
        )
        .route(
            "/:id",
            get(get_property)
                .put(update_property)
                .delete(delete_property)
                .fallback(route_not_found),
        )
}

async fn list_properties(
    State(state): State<AppState>,
) -> Result<Json<Vec<PropertyWithRooms>>, AppError> {
    let properties = state
        .run(|conn| property_service(conn)?.list_properties())
        .await?;
    Ok(Json(properties))
}

async fn create_property(
    State(state): State<AppState>,
    payload: Result<Json<NewProperty>, JsonRejection>,
) -> Result<(StatusCode, Json<Property>), AppError> {
    let Json(new_property) = payload?;
    let property = state
        .run(move |conn| property_service(conn)?.create_property(&new_property))
        .await?;
    Ok((StatusCode::CREATED, Json(property)))
}

async fn get_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Property>, AppError> {
    let id = parse_id(&id, EntityKind::Property)?;
    let property = state
        .run(move |conn| property_service(conn)?.get_property(id))
        .await?;
    Ok(Json(property))
}

async fn update_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PropertyPatch>, JsonRejection>,
) -> Result<Json<Property>, AppError> {
    let id = parse_id(&id, EntityKind::Property)?;
    let Json(patch) = payload?;
    let property = state
        .run(move |conn| property_service(conn)?.update_property(id, patch))
        .await?;
    Ok(Json(property))
}

async fn delete_property(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id, EntityKind::Property)?;
    state
        .run(move |conn| property_service(conn)?.delete_property(id))
        .await?;
    Ok(deleted(EntityKind::Property))
}
