//! Core data model definitions shared across VaxTrack crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod adr;
pub mod dashboard;
pub mod error;
pub mod escalation;
pub mod ids;
pub mod vaccination;

// Intentionally curated re-exports for downstream consumers.
pub use adr::{AdrOutcome, AdrReport, AdrSeverity, RiskTier};
pub use dashboard::{DashboardCounts, DashboardSnapshot, DueFollowUp};
pub use error::{ModelError, Result as ModelResult};
pub use escalation::EscalationEntry;
pub use ids::{
    AdrReportId, EscalationEntryId, PatientId, PharmacistId, ReviewerId,
    VaccinationEventId,
};
pub use vaccination::{
    AdministrationSite, DoseNumber, FollowUpPolicy, VaccinationEvent,
    VaccinationStatus,
};
