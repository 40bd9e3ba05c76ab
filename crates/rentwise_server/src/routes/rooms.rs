use super::{deleted, parse_id, route_not_found};
use crate::error::AppError;
use crate::state::{room_service, AppState};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use rentwise_core::{EntityKind, NewRoom, Room, RoomPatch, RoomWithProperty};
use serde_json::Value;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_rooms)
                .post(create_room)
                .fallback(route_not_found),
        )
        .route(
            "/property/:property_id",
            get(list_rooms_by_property).fallback(route_not_found),
        )
        .route(
            "/:id",
            get(get_room)
                .put(update_room)
                .delete(delete_room)
                .fallback(route_not_found),
        )
}

async fn list_rooms(
    State(state): State<AppState>,
) -> Result<Json<Vec<RoomWithProperty>>, AppError> {
    let rooms = state.run(|conn| room_service(conn)?.list_rooms()).await?;
    Ok(Json(rooms))
}

async fn create_room(
    State(state): State<AppState>,
    payload: Result<Json<NewRoom>, JsonRejection>,
) -> Result<(StatusCode, Json<Room>), AppError> {
    let Json(new_room) = payload?;
    let room = state
        .run(move |conn| room_service(conn)?.create_room(&new_room))
        .await?;
    Ok((StatusCode::CREATED, Json(room)))
}

async fn list_rooms_by_property(
    State(state): State<AppState>,
    Path(property_id): Path<String>,
) -> Result<Json<Vec<Room>>, AppError> {
    let property_id = parse_id(&property_id, EntityKind::Property)?;
    let rooms = state
        .run(move |conn| room_service(conn)?.list_rooms_by_property(property_id))
        .await?;
    Ok(Json(rooms))
}

async fn get_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RoomWithProperty>, AppError> {
    let id = parse_id(&id, EntityKind::Room)?;
    let room = state
        .run(move |conn| room_service(conn)?.get_room_with_property(id))
        .await?;
    Ok(Json(room))
}

async fn update_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<RoomPatch>, JsonRejection>,
) -> Result<Json<Room>, AppError> {
    let id = parse_id(&id, EntityKind::Room)?;
    let Json(patch) = payload?;
    let room = state
        .run(move |conn| room_service(conn)?.update_room(id, patch))
        .await?;
    Ok(Json(room))
}

async fn delete_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id, EntityKind::Room)?;
    state
        .run(move |conn| room_service(conn)?.delete_room(id))
        .await?;
    Ok(deleted(EntityKind::Room))
}
