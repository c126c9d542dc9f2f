use axum::{Extension, Json, extract::State};
use tracing::info;
use vaxtrack_core::{
    api_types::ApiResponse, domain::vaccination::SweepReport, principal::Principal,
};

use crate::infra::{app_state::AppState, errors::AppResult};

/// Run the overdue follow-up sweep now instead of waiting for the next tick.
pub async fn sweep(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<ApiResponse<SweepReport>>> {
    info!(%principal, "manual follow-up sweep requested");
    let report = state.records.sweep_overdue_now().await?;
    let message = format!("{} follow-up(s) marked missed", report.missed.len());
    Ok(Json(ApiResponse::success(report).with_message(message)))
}
