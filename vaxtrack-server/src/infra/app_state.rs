use std::{fmt, sync::Arc};

use vaxtrack_core::{
    application::AppUnitOfWork,
    clock::Clock,
    database::ports::VaccinationEventsRepository,
    domain::{
        adr::AdrReportService, dashboard::DashboardAggregator, escalation::EscalationQueue,
        vaccination::VaccinationRecordService,
    },
};

use crate::infra::config::Config;

pub type RecordService = VaccinationRecordService<dyn VaccinationEventsRepository>;

#[derive(Clone)]
pub struct AppState {
    pub unit_of_work: Arc<AppUnitOfWork>,
    pub records: Arc<RecordService>,
    pub adr_reports: Arc<AdrReportService>,
    pub escalations: Arc<EscalationQueue>,
    pub dashboard: Arc<DashboardAggregator>,
    pub clock: Arc<dyn Clock>,
    pub config: Arc<Config>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState").finish_non_exhaustive()
    }
}

impl AppState {
    /// Wires every service to the same ports and clock.
    pub fn new(unit_of_work: AppUnitOfWork, clock: Arc<dyn Clock>, config: Arc<Config>) -> Self {
        let settings = &config.core;
        let records = VaccinationRecordService::new(unit_of_work.vaccinations.clone(), clock.clone())
            .with_settings(&settings.follow_up);
        let adr_reports = AdrReportService::new(
            unit_of_work.adr_reports.clone(),
            unit_of_work.vaccinations.clone(),
            clock.clone(),
        );
        let escalations = EscalationQueue::new(
            unit_of_work.escalations.clone(),
            unit_of_work.adr_reports.clone(),
            clock.clone(),
        );
        let dashboard = DashboardAggregator::with_settings(
            unit_of_work.dashboard.clone(),
            settings.dashboard.clone(),
        );

        Self {
            unit_of_work: Arc::new(unit_of_work),
            records: Arc::new(records),
            adr_reports: Arc::new(adr_reports),
            escalations: Arc::new(escalations),
            dashboard: Arc::new(dashboard),
            clock,
            config,
        }
    }

    pub fn unit_of_work(&self) -> Arc<AppUnitOfWork> {
        Arc::clone(&self.unit_of_work)
    }
}
