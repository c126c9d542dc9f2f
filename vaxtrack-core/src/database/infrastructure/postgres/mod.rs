//! PostgreSQL infrastructure adapters implementing the database ports.

pub mod repositories;

pub use repositories::adr_reports::PostgresAdrReportsRepository;
pub use repositories::dashboard::PostgresDashboardRepository;
pub use repositories::escalations::PostgresEscalationQueueRepository;
pub use repositories::vaccinations::PostgresVaccinationEventsRepository;
