//! Adverse-reaction intake and risk classification.

pub mod classifier;
pub mod service;

pub use classifier::{AdrAssessmentInput, RiskAssessment, classify};
pub use service::{AdrReportService, SubmitAdrReportInput, SubmittedAdrReport};
