//! Persistence ports and their adapters.

pub mod infrastructure;
pub mod ports;

pub use infrastructure::memory::InMemoryRecordStore;
#[cfg(feature = "database")]
pub use infrastructure::postgres::{
    PostgresAdrReportsRepository, PostgresDashboardRepository, PostgresEscalationQueueRepository,
    PostgresVaccinationEventsRepository,
};
