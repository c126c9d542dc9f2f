use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use vaxtrack_core::error::CoreError;
use vaxtrack_model::ModelError;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
    /// Machine-readable error kind, e.g. `validation_error`.
    pub kind: &'static str,
}

impl AppError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            kind: default_kind(status),
        }
    }

    pub fn with_kind(mut self, kind: &'static str) -> Self {
        self.kind = kind;
        self
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, message)
    }
}

fn default_kind(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "bad_request",
        StatusCode::UNAUTHORIZED => "unauthorized",
        StatusCode::NOT_FOUND => "not_found",
        StatusCode::CONFLICT => "conflict",
        StatusCode::SERVICE_UNAVAILABLE => "unavailable",
        _ => "internal_error",
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": {
                "message": self.message,
                "status": self.status.as_u16(),
                "kind": self.kind,
            }
        }));

        (self.status, body).into_response()
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        let kind = err.kind();
        match err {
            CoreError::Validation(_) => Self::bad_request(err.to_string()),
            CoreError::NotFound { .. } => Self::not_found(err.to_string()),
            CoreError::InvalidState { .. } => Self::conflict(err.to_string()),
            CoreError::Aggregation { query, ref source } => {
                tracing::error!(query, error = %source, "dashboard aggregation failed");
                Self::unavailable(format!("dashboard query `{query}` failed"))
            }
            CoreError::Storage(ref detail) => {
                tracing::error!(error = %detail, "storage operation failed");
                Self::internal("Storage operation failed")
            }
        }
        .with_kind(kind)
    }
}

/// Malformed identifiers in the path are caller errors.
impl From<ModelError> for AppError {
    fn from(err: ModelError) -> Self {
        Self::bad_request(err.to_string()).with_kind("validation_error")
    }
}

/// Unparsable bodies and unknown enum values are reported the same way as
/// failed field validation.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text()).with_kind("validation_error")
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::internal(err.to_string())
    }
}
