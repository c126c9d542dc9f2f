//! Background task that periodically marks overdue follow-ups as missed.

use std::{sync::Arc, time::Duration};

use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{error, info};
use vaxtrack_core::domain::vaccination::SweepReport;

use crate::infra::app_state::RecordService;

#[derive(Debug)]
pub struct FollowUpSweeper {
    records: Arc<RecordService>,
    interval: Duration,
}

impl FollowUpSweeper {
    pub fn new(records: Arc<RecordService>, interval: Duration) -> Self {
        Self { records, interval }
    }

    /// Runs one sweep at the service clock's current instant. Failures are
    /// logged and reported as `None`; the next tick retries.
    pub async fn tick(&self) -> Option<SweepReport> {
        match self.records.sweep_overdue_now().await {
            Ok(report) => Some(report),
            Err(err) => {
                error!(error = %err, kind = err.kind(), "overdue follow-up sweep failed");
                None
            }
        }
    }

    pub async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        info!(interval = ?self.interval, "follow-up sweeper started");

        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration as ChronoDuration, NaiveDate, TimeZone, Utc};
    use vaxtrack_core::{
        application::AppUnitOfWork,
        clock::{Clock, ManualClock},
        domain::vaccination::{RecordVaccinationInput, VaccinationRecordService},
        principal::Principal,
    };
    use vaxtrack_model::{DoseNumber, FollowUpPolicy, VaccinationStatus};

    #[tokio::test]
    async fn tick_marks_overdue_follow_ups_missed() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        let shared: Arc<dyn Clock> = Arc::new(clock.clone());
        let uow = AppUnitOfWork::in_memory();
        let records: Arc<RecordService> =
            Arc::new(VaccinationRecordService::new(uow.vaccinations.clone(), shared));

        let event = records
            .record_vaccination(
                &Principal::parse("ph-1").unwrap(),
                RecordVaccinationInput {
                    patient_id: Some("P-001".into()),
                    vaccine_name: Some("Influenza".into()),
                    batch_number: Some("FL-9".into()),
                    dose_number: Some(DoseNumber::Ordinal(1)),
                    administered_at: Some(start),
                    follow_up_policy: Some(FollowUpPolicy::Days7),
                    ..RecordVaccinationInput::default()
                },
            )
            .await
            .unwrap();

        let sweeper = FollowUpSweeper::new(records.clone(), Duration::from_secs(60));

        let early = sweeper.tick().await.unwrap();
        assert!(early.missed.is_empty());

        clock.advance(ChronoDuration::days(40));
        let report = sweeper.tick().await.unwrap();
        assert_eq!(report.missed, vec![event.id]);
        assert_eq!(report.cutoff, NaiveDate::from_ymd_opt(2025, 1, 11).unwrap());

        let stored = records.get(event.id).await.unwrap();
        assert_eq!(stored.status, VaccinationStatus::Missed);
    }
}
