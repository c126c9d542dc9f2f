use std::{any::type_name_of_val, fmt, sync::Arc};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use vaxtrack_model::{
    AdministrationSite, DoseNumber, FollowUpPolicy, PatientId, VaccinationEvent,
    VaccinationEventId, VaccinationStatus,
};

use super::schedule::{missed_cutoff, schedule_follow_up};
use crate::{
    clock::Clock,
    config::FollowUpSettings,
    database::ports::vaccinations::{StatusTransition, VaccinationEventsRepository},
    domain::{catalog::normalize_vaccine_name, input},
    error::{CoreError, Entity, Result, ValidationError},
    principal::Principal,
};

/// Caller-supplied fields for a newly administered dose.
///
/// Required fields are optional here so that an absent value surfaces as a
/// [`ValidationError`] naming the field.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RecordVaccinationInput {
    pub patient_id: Option<String>,
    pub vaccine_name: Option<String>,
    pub batch_number: Option<String>,
    pub dose_number: Option<DoseNumber>,
    pub administered_at: Option<DateTime<Utc>>,
    pub administration_site: Option<AdministrationSite>,
    pub notes: Option<String>,
    /// Defaults to [`FollowUpPolicy::None`].
    pub follow_up_policy: Option<FollowUpPolicy>,
    /// Only for [`FollowUpPolicy::NextDoseRequired`].
    pub next_dose_due: Option<NaiveDate>,
}

/// Outcome of one overdue sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepReport {
    pub swept_at: DateTime<Utc>,
    /// Follow-ups due on or before this date were eligible.
    pub cutoff: NaiveDate,
    pub missed: Vec<VaccinationEventId>,
}

/// Record store operations over vaccination events.
pub struct VaccinationRecordService<R>
where
    R: VaccinationEventsRepository + ?Sized,
{
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    grace_period: Duration,
}

impl<R> Clone for VaccinationRecordService<R>
where
    R: VaccinationEventsRepository + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            clock: Arc::clone(&self.clock),
            grace_period: self.grace_period,
        }
    }
}

impl<R> fmt::Debug for VaccinationRecordService<R>
where
    R: VaccinationEventsRepository + ?Sized,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaccinationRecordService")
            .field("repository", &type_name_of_val(self.repository.as_ref()))
            .field("grace_period", &self.grace_period)
            .finish()
    }
}

impl<R> VaccinationRecordService<R>
where
    R: VaccinationEventsRepository + ?Sized,
{
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            grace_period: FollowUpSettings::default().grace_period(),
        }
    }

    pub fn with_settings(mut self, settings: &FollowUpSettings) -> Self {
        self.grace_period = settings.grace_period();
        self
    }

    pub fn grace_period(&self) -> Duration {
        self.grace_period
    }

    #[instrument(skip(self, principal, input), fields(pharmacist = %principal.pharmacist_id))]
    pub async fn record_vaccination(
        &self,
        principal: &Principal,
        input: RecordVaccinationInput,
    ) -> Result<VaccinationEvent> {
        let now = self.clock.now();
        let event = build_event(principal, input, now)?;

        let stored = self.repository.insert(event).await?;
        info!(
            event_id = %stored.id,
            patient_id = %stored.patient_id,
            policy = %stored.follow_up_policy,
            status = %stored.status,
            next_dose_due = ?stored.next_dose_due,
            "vaccination recorded"
        );
        Ok(stored)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: VaccinationEventId) -> Result<VaccinationEvent> {
        debug!("loading vaccination event");
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| CoreError::not_found(Entity::VaccinationEvent, id))
    }

    /// Completes a pending follow-up. Only one of several concurrent callers
    /// on the same event succeeds; the rest see `InvalidState`.
    #[instrument(skip(self, principal), fields(pharmacist = %principal.pharmacist_id))]
    pub async fn mark_follow_up_completed(
        &self,
        principal: &Principal,
        id: VaccinationEventId,
    ) -> Result<VaccinationEvent> {
        let now = self.clock.now();
        let transition = self
            .repository
            .transition_status(
                id,
                VaccinationStatus::FollowUpDue,
                VaccinationStatus::FollowUpCompleted,
                now,
            )
            .await?;

        match transition {
            StatusTransition::Applied(event) => {
                info!(event_id = %event.id, "follow-up completed");
                Ok(event)
            }
            StatusTransition::Conflict(current) => {
                warn!(event_id = %id, %current, "follow-up completion rejected");
                Err(CoreError::invalid_state(
                    Entity::VaccinationEvent,
                    id,
                    format!("follow-up cannot be completed from status `{current}`"),
                ))
            }
            StatusTransition::Missing => Err(CoreError::not_found(Entity::VaccinationEvent, id)),
        }
    }

    #[instrument(skip(self))]
    pub async fn list_by_patient(&self, patient_id: &str) -> Result<Vec<VaccinationEvent>> {
        let patient_id = PatientId::parse(patient_id)
            .map_err(|_| ValidationError::missing("patient_id"))?;
        let events = self.repository.list_by_patient(&patient_id).await?;
        debug!(count = events.len(), "listed patient vaccinations");
        Ok(events)
    }

    /// Marks follow-ups overdue by more than the grace period as missed.
    /// Running it again with the same `now` changes nothing.
    #[instrument(skip(self))]
    pub async fn sweep_overdue(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let cutoff = missed_cutoff(now, self.grace_period)?;
        let missed = self.repository.mark_missed(cutoff, now).await?;

        if missed.is_empty() {
            debug!(%cutoff, "no overdue follow-ups");
        } else {
            info!(%cutoff, count = missed.len(), "follow-ups marked missed");
        }

        Ok(SweepReport {
            swept_at: now,
            cutoff,
            missed,
        })
    }

    /// [`sweep_overdue`](Self::sweep_overdue) at the injected clock's instant.
    pub async fn sweep_overdue_now(&self) -> Result<SweepReport> {
        self.sweep_overdue(self.clock.now()).await
    }
}

fn build_event(
    principal: &Principal,
    raw: RecordVaccinationInput,
    now: DateTime<Utc>,
) -> std::result::Result<VaccinationEvent, ValidationError> {
    let patient_id = input::patient_id(raw.patient_id)?;
    let vaccine_name = raw
        .vaccine_name
        .as_deref()
        .and_then(normalize_vaccine_name)
        .ok_or_else(|| ValidationError::missing("vaccine_name"))?;
    let batch_number = input::required_text("batch_number", raw.batch_number)?;
    let dose_number = input::dose_number(
        "dose_number",
        input::required("dose_number", raw.dose_number)?,
    )?;
    let administered_at = input::not_in_future(
        "administered_at",
        input::required("administered_at", raw.administered_at)?,
        now,
    )?;
    let follow_up_policy = raw.follow_up_policy.unwrap_or(FollowUpPolicy::None);
    let schedule = schedule_follow_up(administered_at, follow_up_policy, raw.next_dose_due)?;

    Ok(VaccinationEvent {
        id: VaccinationEventId::new(),
        patient_id,
        recorded_by: principal.pharmacist_id.clone(),
        vaccine_name,
        batch_number,
        dose_number,
        administered_at,
        administration_site: raw.administration_site,
        notes: input::optional_text(raw.notes),
        follow_up_policy,
        next_dose_due: schedule.next_dose_due,
        status: schedule.status,
        recorded_at: now,
        status_changed_at: now,
    })
}
