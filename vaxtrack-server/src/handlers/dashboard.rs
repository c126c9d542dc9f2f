use axum::{Extension, Json, extract::State};
use vaxtrack_core::{api_types::ApiResponse, clock::Clock, principal::Principal};
use vaxtrack_model::DashboardSnapshot;

use crate::infra::{app_state::AppState, errors::AppResult};

/// Dashboard snapshot for the calling pharmacist
///
/// Returns `503 Service Unavailable` naming the failed query if any part of
/// the snapshot could not be computed. Partial snapshots are never returned.
pub async fn snapshot(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> AppResult<Json<ApiResponse<DashboardSnapshot>>> {
    let now = state.clock.now();
    let snapshot = state.dashboard.snapshot(&principal, now).await?;
    Ok(Json(ApiResponse::success(snapshot)))
}
