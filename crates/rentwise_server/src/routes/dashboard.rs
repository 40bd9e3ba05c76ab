use super::route_not_found;
use crate::error::AppError;
use crate::state::AppState;
use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use rentwise_core::{dashboard_summary, DashboardSummary};

pub(super) fn routes() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard).fallback(route_not_found))
}

async fn get_dashboard(State(state): State<AppState>) -> Result<Json<DashboardSummary>, AppError> {
    let summary = state.run(dashboard_summary).await?;
    Ok(Json(summary))
}
