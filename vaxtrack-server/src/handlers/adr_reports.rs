use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
};
use vaxtrack_core::{
    api_types::ApiResponse,
    domain::adr::{SubmitAdrReportInput, SubmittedAdrReport},
    principal::Principal,
};
use vaxtrack_model::{AdrReport, AdrReportId};

use super::parse_id;
use crate::infra::{app_state::AppState, errors::AppResult};

/// Submit an adverse-reaction report
///
/// The risk tier is derived from `severity` and `outcome`; a tier supplied in
/// the body is ignored. Critical reports come back with the escalation entry
/// that was written alongside them.
///
/// # Response
///
/// - `201 Created` with `{ "report": ..., "escalation": ... }`
/// - `400 Bad Request` for missing or invalid fields
/// - `404 Not Found` if `related_vaccination_event_id` does not exist
pub async fn submit_report(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    body: Result<Json<SubmitAdrReportInput>, JsonRejection>,
) -> AppResult<(StatusCode, Json<ApiResponse<SubmittedAdrReport>>)> {
    let Json(input) = body?;
    let submitted = state.adr_reports.submit_report(&principal, input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(submitted))))
}

pub async fn get_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<AdrReport>>> {
    let id: AdrReportId = parse_id(&id)?;
    let report = state.adr_reports.get_report(id).await?;
    Ok(Json(ApiResponse::success(report)))
}
