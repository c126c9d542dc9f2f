use axum::Json;
use vaxtrack_core::{api_types::ApiResponse, domain::catalog::VACCINE_CATALOG};

pub async fn list_vaccines() -> Json<ApiResponse<Vec<&'static str>>> {
    Json(ApiResponse::success(VACCINE_CATALOG.to_vec()))
}
