//! Dashboard aggregator.
//!
//! Issues the four counting queries and two list queries concurrently and
//! folds them into one snapshot. A failed sub-query fails the snapshot; no
//! field is ever zero-filled in its place.

use std::{any::type_name_of_val, fmt, sync::Arc};

use chrono::{DateTime, Days, Utc};
use futures::TryFutureExt;
use tracing::{error, instrument};
use vaxtrack_model::{DashboardCounts, DashboardSnapshot, DueFollowUp, VaccinationEvent};

use crate::{
    config::DashboardSettings,
    database::ports::DashboardReadPort,
    domain::vaccination::schedule::days_until,
    error::{CoreError, Result},
    principal::Principal,
};

pub struct DashboardAggregator {
    port: Arc<dyn DashboardReadPort>,
    settings: DashboardSettings,
}

impl fmt::Debug for DashboardAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DashboardAggregator")
            .field("port", &type_name_of_val(self.port.as_ref()))
            .field("settings", &self.settings)
            .finish()
    }
}

impl DashboardAggregator {
    pub fn new(port: Arc<dyn DashboardReadPort>) -> Self {
        Self::with_settings(port, DashboardSettings::default())
    }

    pub fn with_settings(port: Arc<dyn DashboardReadPort>, settings: DashboardSettings) -> Self {
        Self { port, settings }
    }

    #[instrument(skip(self, principal), fields(pharmacist = %principal.pharmacist_id))]
    pub async fn snapshot(
        &self,
        principal: &Principal,
        now: DateTime<Utc>,
    ) -> Result<DashboardSnapshot> {
        let pharmacist = &principal.pharmacist_id;
        let horizon = now
            .date_naive()
            .checked_add_days(Days::new(u64::from(self.settings.due_soon_horizon_days)))
            .unwrap_or(now.date_naive());

        let joined = tokio::try_join!(
            self.port
                .count_vaccinations(pharmacist)
                .map_err(labelled("total_vaccinations")),
            self.port
                .count_active_patients(pharmacist)
                .map_err(labelled("active_patients")),
            self.port
                .count_pending_follow_ups(pharmacist)
                .map_err(labelled("pending_follow_ups")),
            self.port
                .count_adr_reports(pharmacist)
                .map_err(labelled("adr_report_count")),
            self.port
                .recent_vaccinations(pharmacist, self.settings.recent_window)
                .map_err(labelled("recent_vaccinations")),
            self.port
                .due_follow_ups(pharmacist, horizon, self.settings.due_list_limit)
                .map_err(labelled("due_follow_ups")),
        );

        let (total, patients, pending, adr_reports, recent, due) = joined.inspect_err(|err| {
            error!(error = %err, "dashboard snapshot failed");
        })?;

        Ok(DashboardSnapshot {
            counts: DashboardCounts {
                total_vaccinations: total,
                active_patients: patients,
                pending_follow_ups: pending,
                adr_report_count: adr_reports,
            },
            recent_vaccinations: recent,
            due_follow_ups: due
                .into_iter()
                .filter_map(|event| due_follow_up(event, now))
                .collect(),
            generated_at: now,
        })
    }
}

fn labelled(query: &'static str) -> impl FnOnce(CoreError) -> CoreError {
    move |err| CoreError::aggregation(query, err)
}

fn due_follow_up(event: VaccinationEvent, now: DateTime<Utc>) -> Option<DueFollowUp> {
    let due_on = event.next_dose_due?;
    Some(DueFollowUp {
        event_id: event.id,
        patient_id: event.patient_id,
        vaccine_name: event.vaccine_name,
        dose_number: event.dose_number,
        due_on,
        days_until_due: days_until(due_on, now),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::ports::dashboard::MockDashboardReadPort;
    use chrono::{NaiveDate, TimeZone};
    use vaxtrack_model::{
        DoseNumber, FollowUpPolicy, PatientId, PharmacistId, VaccinationEventId,
        VaccinationStatus,
    };

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 20, 8, 0, 0).unwrap()
    }

    fn due_event(due: NaiveDate) -> VaccinationEvent {
        let at = Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap();
        VaccinationEvent {
            id: VaccinationEventId::new(),
            patient_id: PatientId::parse("P-1").unwrap(),
            recorded_by: PharmacistId::parse("ph-1").unwrap(),
            vaccine_name: "Hepatitis B".into(),
            batch_number: "HB-1".into(),
            dose_number: DoseNumber::Ordinal(2),
            administered_at: at,
            administration_site: None,
            notes: None,
            follow_up_policy: FollowUpPolicy::NextDoseRequired,
            next_dose_due: Some(due),
            status: VaccinationStatus::FollowUpDue,
            recorded_at: at,
            status_changed_at: at,
        }
    }

    fn healthy_port() -> MockDashboardReadPort {
        let mut port = MockDashboardReadPort::new();
        port.expect_count_vaccinations().returning(|_| Ok(12));
        port.expect_count_active_patients().returning(|_| Ok(7));
        port.expect_count_pending_follow_ups().returning(|_| Ok(3));
        port.expect_count_adr_reports().returning(|_| Ok(1));
        port.expect_recent_vaccinations()
            .returning(|_, _| Ok(Vec::new()));
        port.expect_due_follow_ups().returning(|_, _, _| {
            Ok(vec![due_event(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap())])
        });
        port
    }

    #[tokio::test]
    async fn snapshot_folds_every_query() {
        let aggregator = DashboardAggregator::new(Arc::new(healthy_port()));
        let principal = Principal::parse("ph-1").unwrap();

        let snapshot = aggregator.snapshot(&principal, now()).await.unwrap();

        assert_eq!(
            snapshot.counts,
            DashboardCounts {
                total_vaccinations: 12,
                active_patients: 7,
                pending_follow_ups: 3,
                adr_report_count: 1,
            }
        );
        assert_eq!(snapshot.due_follow_ups.len(), 1);
        assert_eq!(snapshot.due_follow_ups[0].days_until_due, -5);
        assert_eq!(snapshot.generated_at, now());
    }

    #[tokio::test]
    async fn one_failed_count_fails_the_whole_snapshot() {
        let mut port = MockDashboardReadPort::new();
        port.expect_count_vaccinations().returning(|_| Ok(12));
        port.expect_count_active_patients().returning(|_| Ok(7));
        port.expect_count_pending_follow_ups()
            .returning(|_| Err(CoreError::Storage("connection reset".into())));
        port.expect_count_adr_reports().returning(|_| Ok(1));
        port.expect_recent_vaccinations()
            .returning(|_, _| Ok(Vec::new()));
        port.expect_due_follow_ups()
            .returning(|_, _, _| Ok(Vec::new()));
        let aggregator = DashboardAggregator::new(Arc::new(port));
        let principal = Principal::parse("ph-1").unwrap();

        let err = aggregator.snapshot(&principal, now()).await.unwrap_err();

        assert_eq!(err.kind(), "aggregation_error");
        assert!(matches!(
            err,
            CoreError::Aggregation { query: "pending_follow_ups", .. }
        ));
    }

    #[tokio::test]
    async fn due_list_uses_the_configured_horizon_and_limit() {
        let mut port = MockDashboardReadPort::new();
        port.expect_count_vaccinations().returning(|_| Ok(0));
        port.expect_count_active_patients().returning(|_| Ok(0));
        port.expect_count_pending_follow_ups().returning(|_| Ok(0));
        port.expect_count_adr_reports().returning(|_| Ok(0));
        port.expect_recent_vaccinations()
            .withf(|_, limit| *limit == 3)
            .returning(|_, _| Ok(Vec::new()));
        port.expect_due_follow_ups()
            .withf(|_, horizon, limit| {
                *horizon == NaiveDate::from_ymd_opt(2025, 1, 27).unwrap() && *limit == 10
            })
            .returning(|_, _, _| Ok(Vec::new()));
        let settings = DashboardSettings {
            recent_window: 3,
            due_list_limit: 10,
            due_soon_horizon_days: 7,
        };
        let aggregator = DashboardAggregator::with_settings(Arc::new(port), settings);

        let snapshot = aggregator
            .snapshot(&Principal::parse("ph-1").unwrap(), now())
            .await
            .unwrap();

        assert!(snapshot.due_follow_ups.is_empty());
    }
}
