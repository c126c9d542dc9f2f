pub mod adr_reports;
pub mod catalog;
pub mod dashboard;
pub mod escalations;
pub mod maintenance;
pub mod vaccinations;

use std::str::FromStr;

use axum::Json;
use serde_json::{Value, json};
use vaxtrack_model::ModelError;

use crate::infra::errors::AppResult;

/// Liveness probe, outside the authenticated API.
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Parses a path segment into a typed identifier.
pub(crate) fn parse_id<T>(raw: &str) -> AppResult<T>
where
    T: FromStr<Err = ModelError>,
{
    Ok(raw.parse()?)
}
