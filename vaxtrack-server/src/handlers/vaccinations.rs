use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use vaxtrack_core::{
    api_types::ApiResponse, domain::vaccination::RecordVaccinationInput, principal::Principal,
};
use vaxtrack_model::{VaccinationEvent, VaccinationEventId};

use super::parse_id;
use crate::infra::{app_state::AppState, errors::AppResult};

/// Record an administered dose
///
/// # Request
///
/// ```json
/// {
///   "patient_id": "P-001",
///   "vaccine_name": "COVID-19",
///   "batch_number": "BT01",
///   "dose_number": 1,
///   "administered_at": "2025-01-01T09:00:00Z",
///   "follow_up_policy": "days_14"
/// }
/// ```
///
/// # Response
///
/// - `201 Created` with the stored event, including the derived
///   `next_dose_due` and `status`
/// - `400 Bad Request` naming the offending field
pub async fn record_vaccination(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    body: Result<Json<RecordVaccinationInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<VaccinationEvent>>)> {
    let Json(input) = body?;
    let event = state.records.record_vaccination(&principal, input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(event))))
}

pub async fn get_vaccination(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<VaccinationEvent>>> {
    let id: VaccinationEventId = parse_id(&id)?;
    let event = state.records.get(id).await?;
    Ok(Json(ApiResponse::success(event)))
}

/// Complete a pending follow-up
///
/// Only an event in `follow_up_due` can be completed. Anything else,
/// including a second completion, is `409 Conflict`.
pub async fn complete_follow_up(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<VaccinationEvent>>> {
    let id: VaccinationEventId = parse_id(&id)?;
    let event = state
        .records
        .mark_follow_up_completed(&principal, id)
        .await?;
    Ok(Json(ApiResponse::success(event)))
}

/// List a patient's vaccinations, newest first
pub async fn list_patient_vaccinations(
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<VaccinationEvent>>>> {
    let events = state.records.list_by_patient(&patient_id).await?;
    Ok(Json(ApiResponse::success(events)))
}
