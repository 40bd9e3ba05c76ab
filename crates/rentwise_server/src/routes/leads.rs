use super::{deleted, parse_id, route_not_found};
use crate::error::AppError;
use crate::state::{lead_service, AppState};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use rentwise_core::{EntityKind, Lead, LeadPatch, LeadStatus, LeadWithRefs, NewLead};
use serde_json::Value;

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_leads)
                .post(create_lead)
                .fallback(route_not_found),
        )
        .route(
            "/reminders",
            get(list_pending_reminders).fallback(route_not_found),
        )
        .route(
            "/property/:property_id",
            get(list_leads_by_property).fallback(route_not_found),
        )
        .route(
            "/status/:status",
            get(list_leads_by_status).fallback(route_not_found),
        )
        .route(
            "/:id",
            get(get_lead)
                .put(update_lead)
                .delete(delete_lead)
                .fallback(route_not_found),
        )
}

async fn list_leads(State(state): State<AppState>) -> Result<Json<Vec<LeadWithRefs>>, AppError> {
    let leads = state.run(|conn| lead_service(conn)?.list_leads()).await?;
    Ok(Json(leads))
}

async fn create_lead(
    State(state): State<AppState>,
    payload: Result<Json<NewLead>, JsonRejection>,
) -> Result<(StatusCode, Json<Lead>), AppError> {
    let Json(new_lead) = payload?;
    let lead = state
        .run(move |conn| lead_service(conn)?.create_lead(&new_lead))
        .await?;
    Ok((StatusCode::CREATED, Json(lead)))
}

async fn list_pending_reminders(
    State(state): State<AppState>,
) -> Result<Json<Vec<LeadWithRefs>>, AppError> {
    let leads = state
        .run(|conn| lead_service(conn)?.list_pending_reminders())
        .await?;
    Ok(Json(leads))
}

async fn list_leads_by_property(
    State(state): State<AppState>,
    Path(property_id): Path<String>,
) -> Result<Json<Vec<LeadWithRefs>>, AppError> {
    let property_id = parse_id(&property_id, EntityKind::Property)?;
    let leads = state
        .run(move |conn| lead_service(conn)?.list_leads_by_property(property_id))
        .await?;
    Ok(Json(leads))
}

async fn list_leads_by_status(
    State(state): State<AppState>,
    Path(status): Path<String>,
) -> Result<Json<Vec<LeadWithRefs>>, AppError> {
    let status =
        LeadStatus::from_label(&status).map_err(|err| AppError::BadRequest(err.to_string()))?;
    let leads = state
        .run(move |conn| lead_service(conn)?.list_leads_by_status(status))
        .await?;
    Ok(Json(leads))
}

async fn get_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LeadWithRefs>, AppError> {
    let id = parse_id(&id, EntityKind::Lead)?;
    let lead = state
        .run(move |conn| lead_service(conn)?.get_lead_with_refs(id))
        .await?;
    Ok(Json(lead))
}

async fn update_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<LeadPatch>, JsonRejection>,
) -> Result<Json<Lead>, AppError> {
    let id = parse_id(&id, EntityKind::Lead)?;
    let Json(patch) = payload?;
    let lead = state
        .run(move |conn| lead_service(conn)?.update_lead(id, patch))
        .await?;
    Ok(Json(lead))
}

async fn delete_lead(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let id = parse_id(&id, EntityKind::Lead)?;
    state
        .run(move |conn| lead_service(conn)?.delete_lead(id))
        .await?;
    Ok(deleted(EntityKind::Lead))
}
