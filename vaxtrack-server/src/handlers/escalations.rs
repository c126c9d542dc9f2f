use axum::{
    Extension, Json,
    extract::{Path, State},
};
use vaxtrack_core::{api_types::ApiResponse, principal::Principal};
use vaxtrack_model::{EscalationEntry, EscalationEntryId};

use super::parse_id;
use crate::infra::{app_state::AppState, errors::AppResult};

/// Unacknowledged entries, oldest first.
pub async fn list_open(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<EscalationEntry>>>> {
    let entries = state.escalations.list_open().await?;
    Ok(Json(ApiResponse::success(entries)))
}

pub async fn get_escalation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<EscalationEntry>>> {
    let id: EscalationEntryId = parse_id(&id)?;
    let entry = state.escalations.get(id).await?;
    Ok(Json(ApiResponse::success(entry)))
}

/// Acknowledge an entry as the calling pharmacist
///
/// Acknowledging twice is `409 Conflict`; the first acknowledgement stands.
pub async fn acknowledge(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<EscalationEntry>>> {
    let id: EscalationEntryId = parse_id(&id)?;
    let entry = state.escalations.acknowledge(&principal, id).await?;
    Ok(Json(ApiResponse::success(entry)))
}
