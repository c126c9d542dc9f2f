//! PostgreSQL-backed repository implementations.

pub mod adr_reports;
pub mod dashboard;
pub mod escalations;
pub mod vaccinations;

mod rows;
