#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use vaxtrack_core::{
    application::AppUnitOfWork,
    clock::ManualClock,
    config::CoreSettings,
    database::ports::VaccinationEventsRepository,
    domain::{
        adr::{AdrReportService, SubmitAdrReportInput},
        dashboard::DashboardAggregator,
        escalation::EscalationQueue,
        vaccination::{RecordVaccinationInput, VaccinationRecordService},
    },
    principal::Principal,
};
use vaxtrack_model::{AdrOutcome, AdrSeverity, DoseNumber, FollowUpPolicy};

/// All services wired to one store and one manual clock.
pub struct Engine {
    pub uow: AppUnitOfWork,
    pub clock: ManualClock,
    pub records: Arc<VaccinationRecordService<dyn VaccinationEventsRepository>>,
    pub adr: Arc<AdrReportService>,
    pub escalations: Arc<EscalationQueue>,
    pub dashboard: Arc<DashboardAggregator>,
}

impl Engine {
    pub fn in_memory(start: DateTime<Utc>) -> Self {
        Self::with_uow(AppUnitOfWork::in_memory(), start)
    }

    pub fn with_uow(uow: AppUnitOfWork, start: DateTime<Utc>) -> Self {
        let settings = CoreSettings::default();
        let clock = ManualClock::new(start);
        let shared_clock: Arc<dyn vaxtrack_core::Clock> = Arc::new(clock.clone());

        let records = VaccinationRecordService::new(uow.vaccinations.clone(), shared_clock.clone())
            .with_settings(&settings.follow_up);
        let adr = AdrReportService::new(
            uow.adr_reports.clone(),
            uow.vaccinations.clone(),
            shared_clock.clone(),
        );
        let escalations = EscalationQueue::new(
            uow.escalations.clone(),
            uow.adr_reports.clone(),
            shared_clock,
        );
        let dashboard =
            DashboardAggregator::with_settings(uow.dashboard.clone(), settings.dashboard.clone());

        Self {
            uow,
            clock,
            records: Arc::new(records),
            adr: Arc::new(adr),
            escalations: Arc::new(escalations),
            dashboard: Arc::new(dashboard),
        }
    }
}

pub fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
}

pub fn pharmacist(id: &str) -> Principal {
    Principal::parse(id).unwrap()
}

pub fn vaccination(
    patient: &str,
    administered_at: DateTime<Utc>,
    policy: FollowUpPolicy,
) -> RecordVaccinationInput {
    RecordVaccinationInput {
        patient_id: Some(patient.into()),
        vaccine_name: Some("COVID-19".into()),
        batch_number: Some("BT01".into()),
        dose_number: Some(DoseNumber::Ordinal(1)),
        administered_at: Some(administered_at),
        follow_up_policy: Some(policy),
        ..RecordVaccinationInput::default()
    }
}

pub fn adr_report(
    patient: &str,
    onset_at: DateTime<Utc>,
    severity: AdrSeverity,
    outcome: AdrOutcome,
) -> SubmitAdrReportInput {
    SubmitAdrReportInput {
        patient_id: Some(patient.into()),
        vaccine_name: Some("Influenza".into()),
        batch_number: Some("FL2025C".into()),
        vaccinated_on: Some(onset_at.date_naive()),
        onset_at: Some(onset_at),
        severity: Some(severity),
        outcome: Some(outcome),
        symptoms: Some("Generalized rash".into()),
        ..SubmitAdrReportInput::default()
    }
}
