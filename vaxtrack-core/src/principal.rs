//! Caller identity threaded through every core operation.
//!
//! Authentication happens outside the core; by the time a request reaches a
//! service the caller has been reduced to a pharmacist identifier.

use std::fmt;

use vaxtrack_model::{PharmacistId, ReviewerId};

use crate::error::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Principal {
    pub pharmacist_id: PharmacistId,
}

impl Principal {
    pub fn new(pharmacist_id: PharmacistId) -> Self {
        Self { pharmacist_id }
    }

    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        PharmacistId::parse(raw)
            .map(Self::new)
            .map_err(|e| ValidationError::new("pharmacist_id", e.to_string()))
    }

    /// The same identity acting as an escalation reviewer.
    pub fn reviewer_id(&self) -> ReviewerId {
        ReviewerId::from(self.pharmacist_id.clone())
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "pharmacist:{}", self.pharmacist_id)
    }
}
