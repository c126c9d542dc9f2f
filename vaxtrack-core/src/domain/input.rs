//! Helpers shared by the input DTOs.

use chrono::{DateTime, Utc};
use vaxtrack_model::{DoseNumber, PatientId};

use crate::error::ValidationError;

pub(crate) fn required<T>(field: &'static str, value: Option<T>) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::missing(field))
}

/// Trimmed, non-blank text.
pub(crate) fn required_text(
    field: &'static str,
    value: Option<String>,
) -> Result<String, ValidationError> {
    optional_text(value).ok_or_else(|| ValidationError::missing(field))
}

/// Trimmed text; blank becomes absent.
pub(crate) fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

pub(crate) fn patient_id(value: Option<String>) -> Result<PatientId, ValidationError> {
    let raw = required("patient_id", value)?;
    PatientId::parse(raw).map_err(|_| ValidationError::missing("patient_id"))
}

pub(crate) fn dose_number(
    field: &'static str,
    dose: DoseNumber,
) -> Result<DoseNumber, ValidationError> {
    if dose.is_valid() {
        Ok(dose)
    } else {
        Err(ValidationError::new(field, "must be at least 1 or \"booster\""))
    }
}

pub(crate) fn not_in_future(
    field: &'static str,
    at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, ValidationError> {
    if at > now {
        return Err(ValidationError::new(field, "cannot be in the future"));
    }
    Ok(at)
}
