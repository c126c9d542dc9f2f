//! Repository ports. Application services depend on these traits only; the
//! in-memory and PostgreSQL stores implement them.

pub mod adr_reports;
pub mod dashboard;
pub mod escalations;
pub mod vaccinations;

pub use adr_reports::AdrReportsRepository;
pub use dashboard::DashboardReadPort;
pub use escalations::{AcknowledgeOutcome, EnqueueOutcome, EscalationQueueRepository};
pub use vaccinations::{StatusTransition, VaccinationEventsRepository};
