use std::any::type_name_of_val;
use std::fmt;
use std::sync::Arc;

#[cfg(feature = "database")]
use sqlx::PgPool;

use crate::database::InMemoryRecordStore;
use crate::database::ports::{
    AdrReportsRepository, DashboardReadPort, EscalationQueueRepository,
    VaccinationEventsRepository,
};
#[cfg(feature = "database")]
use crate::database::{
    PostgresAdrReportsRepository, PostgresDashboardRepository, PostgresEscalationQueueRepository,
    PostgresVaccinationEventsRepository,
};

/// Aggregates the repository ports used by the application services.
#[derive(Clone)]
pub struct AppUnitOfWork {
    pub vaccinations: Arc<dyn VaccinationEventsRepository>,
    pub adr_reports: Arc<dyn AdrReportsRepository>,
    pub escalations: Arc<dyn EscalationQueueRepository>,
    pub dashboard: Arc<dyn DashboardReadPort>,
}

impl fmt::Debug for AppUnitOfWork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWork")
            .field(
                "vaccinations",
                &type_name_of_val(self.vaccinations.as_ref()),
            )
            .field("adr_reports", &type_name_of_val(self.adr_reports.as_ref()))
            .field("escalations", &type_name_of_val(self.escalations.as_ref()))
            .field("dashboard", &type_name_of_val(self.dashboard.as_ref()))
            .finish()
    }
}

impl AppUnitOfWork {
    /// Every port backed by one shared in-memory store.
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemoryRecordStore::new()))
    }

    pub fn from_store(store: Arc<InMemoryRecordStore>) -> Self {
        Self {
            vaccinations: store.clone(),
            adr_reports: store.clone(),
            escalations: store.clone(),
            dashboard: store,
        }
    }
}

#[cfg(feature = "database")]
impl AppUnitOfWork {
    pub fn from_postgres(pool: PgPool) -> Self {
        Self {
            vaccinations: Arc::new(PostgresVaccinationEventsRepository::new(pool.clone())),
            adr_reports: Arc::new(PostgresAdrReportsRepository::new(pool.clone())),
            escalations: Arc::new(PostgresEscalationQueueRepository::new(pool.clone())),
            dashboard: Arc::new(PostgresDashboardRepository::new(pool)),
        }
    }
}

/// Assembles a unit of work port by port, e.g. to swap a single port for a
/// test double.
#[derive(Default)]
pub struct AppUnitOfWorkBuilder {
    vaccinations: Option<Arc<dyn VaccinationEventsRepository>>,
    adr_reports: Option<Arc<dyn AdrReportsRepository>>,
    escalations: Option<Arc<dyn EscalationQueueRepository>>,
    dashboard: Option<Arc<dyn DashboardReadPort>>,
}

impl fmt::Debug for AppUnitOfWorkBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppUnitOfWorkBuilder")
            .field("vaccinations", &self.vaccinations.is_some())
            .field("adr_reports", &self.adr_reports.is_some())
            .field("escalations", &self.escalations.is_some())
            .field("dashboard", &self.dashboard.is_some())
            .finish()
    }
}

impl AppUnitOfWorkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fills every port from one in-memory store.
    pub fn with_store(self, store: Arc<InMemoryRecordStore>) -> Self {
        self.with_vaccinations(store.clone())
            .with_adr_reports(store.clone())
            .with_escalations(store.clone())
            .with_dashboard(store)
    }

    pub fn with_vaccinations(mut self, repo: Arc<dyn VaccinationEventsRepository>) -> Self {
        self.vaccinations = Some(repo);
        self
    }

    pub fn with_adr_reports(mut self, repo: Arc<dyn AdrReportsRepository>) -> Self {
        self.adr_reports = Some(repo);
        self
    }

    pub fn with_escalations(mut self, repo: Arc<dyn EscalationQueueRepository>) -> Self {
        self.escalations = Some(repo);
        self
    }

    pub fn with_dashboard(mut self, port: Arc<dyn DashboardReadPort>) -> Self {
        self.dashboard = Some(port);
        self
    }

    pub fn build(self) -> Result<AppUnitOfWork, String> {
        Ok(AppUnitOfWork {
            vaccinations: self
                .vaccinations
                .ok_or_else(|| "missing VaccinationEventsRepository".to_string())?,
            adr_reports: self
                .adr_reports
                .ok_or_else(|| "missing AdrReportsRepository".to_string())?,
            escalations: self
                .escalations
                .ok_or_else(|| "missing EscalationQueueRepository".to_string())?,
            dashboard: self
                .dashboard
                .ok_or_else(|| "missing DashboardReadPort".to_string())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_reports_the_first_missing_port() {
        let store = Arc::new(InMemoryRecordStore::new());
        let err = AppUnitOfWorkBuilder::new()
            .with_vaccinations(store.clone())
            .with_adr_reports(store)
            .build()
            .unwrap_err();
        assert_eq!(err, "missing EscalationQueueRepository");
    }
}
