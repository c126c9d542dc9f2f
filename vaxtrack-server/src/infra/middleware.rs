use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use vaxtrack_core::principal::Principal;

use crate::infra::errors::AppError;

/// Header carrying the authenticated pharmacist, set by the upstream gateway.
pub const PHARMACIST_HEADER: &str = "x-pharmacist-id";

/// Resolves the caller into a [`Principal`] request extension.
pub async fn principal_middleware(
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let principal = extract_principal(request.headers())?;
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

pub fn extract_principal(headers: &HeaderMap) -> Result<Principal, AppError> {
    let raw = headers
        .get(PHARMACIST_HEADER)
        .ok_or_else(|| AppError::unauthorized("Missing pharmacist identity"))?
        .to_str()
        .map_err(|_| AppError::unauthorized("Invalid pharmacist identity"))?;

    Principal::parse(raw).map_err(|_| AppError::unauthorized("Invalid pharmacist identity"))
}
