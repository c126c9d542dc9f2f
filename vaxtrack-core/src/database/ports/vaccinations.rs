use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use vaxtrack_model::{PatientId, VaccinationEvent, VaccinationEventId, VaccinationStatus};

use crate::error::Result;

/// Result of a compare-and-swap on an event's status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusTransition {
    Applied(VaccinationEvent),
    /// The event exists but was not in the expected state.
    Conflict(VaccinationStatus),
    Missing,
}

#[async_trait]
pub trait VaccinationEventsRepository: Send + Sync {
    async fn insert(&self, event: VaccinationEvent) -> Result<VaccinationEvent>;

    async fn get(&self, id: VaccinationEventId) -> Result<Option<VaccinationEvent>>;

    /// All events for a patient, most recently administered first.
    async fn list_by_patient(&self, patient_id: &PatientId) -> Result<Vec<VaccinationEvent>>;

    /// Moves `id` from `expected` to `next` only if it is currently in
    /// `expected`. Concurrent callers racing on the same event observe exactly
    /// one `Applied`.
    async fn transition_status(
        &self,
        id: VaccinationEventId,
        expected: VaccinationStatus,
        next: VaccinationStatus,
        at: DateTime<Utc>,
    ) -> Result<StatusTransition>;

    /// Marks every `FollowUpDue` event due on or before `cutoff` as `Missed`,
    /// returning the ids that changed.
    async fn mark_missed(
        &self,
        cutoff: NaiveDate,
        at: DateTime<Utc>,
    ) -> Result<Vec<VaccinationEventId>>;
}
