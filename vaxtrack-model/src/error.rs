use std::fmt::{self, Display};

/// Errors produced when parsing model values from their wire or column form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelError {
    UnknownVariant { kind: &'static str, value: String },
    InvalidDoseNumber(String),
    EmptyIdentifier(&'static str),
    InvalidIdentifier { kind: &'static str, value: String },
}

impl Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::UnknownVariant { kind, value } => {
                write!(f, "unknown {kind}: {value:?}")
            }
            ModelError::InvalidDoseNumber(raw) => {
                write!(f, "invalid dose number: {raw:?}")
            }
            ModelError::EmptyIdentifier(kind) => {
                write!(f, "{kind} cannot be empty")
            }
            ModelError::InvalidIdentifier { kind, value } => {
                write!(f, "invalid {kind}: {value:?}")
            }
        }
    }
}

impl std::error::Error for ModelError {}

pub type Result<T> = std::result::Result<T, ModelError>;
