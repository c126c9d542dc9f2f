use std::fmt;

use thiserror::Error;
use vaxtrack_model::ModelError;

/// Malformed or missing input. Recoverable by the caller correcting the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }

    pub fn missing(field: &'static str) -> Self {
        Self::new(field, "is required")
    }
}

/// Kinds of record the engine hands out identifiers for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    VaccinationEvent,
    AdrReport,
    EscalationEntry,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::VaccinationEvent => "vaccination event",
            Entity::AdrReport => "ADR report",
            Entity::EscalationEntry => "escalation entry",
        })
    }
}

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("{entity} {id} not found")]
    NotFound { entity: Entity, id: String },

    #[error("{entity} {id}: {reason}")]
    InvalidState {
        entity: Entity,
        id: String,
        reason: String,
    },

    #[error("dashboard query `{query}` failed: {source}")]
    Aggregation {
        query: &'static str,
        #[source]
        source: Box<CoreError>,
    },

    #[error("storage error: {0}")]
    Storage(String),
}

impl CoreError {
    pub fn not_found(entity: Entity, id: impl fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid_state(
        entity: Entity,
        id: impl fmt::Display,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidState {
            entity,
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    pub fn aggregation(query: &'static str, source: CoreError) -> Self {
        Self::Aggregation {
            query,
            source: Box::new(source),
        }
    }

    /// Stable machine-readable name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            CoreError::Validation(_) => "validation_error",
            CoreError::NotFound { .. } => "not_found",
            CoreError::InvalidState { .. } => "invalid_state",
            CoreError::Aggregation { .. } => "aggregation_error",
            CoreError::Storage(_) => "storage_error",
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }

    pub fn is_invalid_state(&self) -> bool {
        matches!(self, CoreError::InvalidState { .. })
    }
}

/// Stored values that no longer parse are a storage fault, not caller error.
impl From<ModelError> for CoreError {
    fn from(err: ModelError) -> Self {
        CoreError::Storage(format!("corrupt stored value: {err}"))
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        CoreError::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
