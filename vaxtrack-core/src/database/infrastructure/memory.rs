//! Process-local record store.
//!
//! All three tables sit behind one `RwLock` so that multi-record writes are
//! atomic and readers never block each other. Used when no database is
//! configured and as the fixture for tests.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;
use vaxtrack_model::{
    AdrReport, AdrReportId, EscalationEntry, EscalationEntryId, PatientId, PharmacistId,
    ReviewerId, VaccinationEvent, VaccinationEventId, VaccinationStatus,
};

use crate::{
    database::ports::{
        AcknowledgeOutcome, AdrReportsRepository, DashboardReadPort, EnqueueOutcome,
        EscalationQueueRepository, StatusTransition, VaccinationEventsRepository,
    },
    error::{CoreError, Result},
};

#[derive(Debug, Default)]
struct StoreState {
    events: HashMap<VaccinationEventId, VaccinationEvent>,
    reports: HashMap<AdrReportId, AdrReport>,
    escalations: HashMap<EscalationEntryId, EscalationEntry>,
    escalation_by_report: HashMap<AdrReportId, EscalationEntryId>,
    /// Insertion sequence, used to break ties between equal timestamps.
    escalation_order: Vec<EscalationEntryId>,
}

impl StoreState {
    fn events_recorded_by<'a>(
        &'a self,
        pharmacist: &'a PharmacistId,
    ) -> impl Iterator<Item = &'a VaccinationEvent> + 'a {
        self.events
            .values()
            .filter(move |event| &event.recorded_by == pharmacist)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    state: RwLock<StoreState>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(events: &mut [VaccinationEvent]) {
    events.sort_by(|a, b| {
        b.administered_at
            .cmp(&a.administered_at)
            .then_with(|| b.id.cmp(&a.id))
    });
}

#[async_trait]
impl VaccinationEventsRepository for InMemoryRecordStore {
    async fn insert(&self, event: VaccinationEvent) -> Result<VaccinationEvent> {
        let mut state = self.state.write().await;
        if state.events.contains_key(&event.id) {
            return Err(CoreError::Storage(format!(
                "duplicate vaccination event id {}",
                event.id
            )));
        }
        state.events.insert(event.id, event.clone());
        Ok(event)
    }

    async fn get(&self, id: VaccinationEventId) -> Result<Option<VaccinationEvent>> {
        Ok(self.state.read().await.events.get(&id).cloned())
    }

    async fn list_by_patient(&self, patient_id: &PatientId) -> Result<Vec<VaccinationEvent>> {
        let state = self.state.read().await;
        let mut events: Vec<_> = state
            .events
            .values()
            .filter(|event| &event.patient_id == patient_id)
            .cloned()
            .collect();
        newest_first(&mut events);
        Ok(events)
    }

    async fn transition_status(
        &self,
        id: VaccinationEventId,
        expected: VaccinationStatus,
        next: VaccinationStatus,
        at: DateTime<Utc>,
    ) -> Result<StatusTransition> {
        let mut state = self.state.write().await;
        let Some(event) = state.events.get_mut(&id) else {
            return Ok(StatusTransition::Missing);
        };
        if event.status != expected {
            return Ok(StatusTransition::Conflict(event.status));
        }
        event.status = next;
        event.status_changed_at = at;
        Ok(StatusTransition::Applied(event.clone()))
    }

    async fn mark_missed(
        &self,
        cutoff: NaiveDate,
        at: DateTime<Utc>,
    ) -> Result<Vec<VaccinationEventId>> {
        let mut state = self.state.write().await;
        let mut changed = Vec::new();
        for event in state.events.values_mut() {
            let overdue = event.next_dose_due.is_some_and(|due| due <= cutoff);
            if event.status == VaccinationStatus::FollowUpDue && overdue {
                event.status = VaccinationStatus::Missed;
                event.status_changed_at = at;
                changed.push(event.id);
            }
        }
        changed.sort();
        Ok(changed)
    }
}

#[async_trait]
impl AdrReportsRepository for InMemoryRecordStore {
    async fn insert_with_escalation(
        &self,
        report: AdrReport,
        escalation: Option<EscalationEntry>,
    ) -> Result<(AdrReport, Option<EscalationEntry>)> {
        let mut state = self.state.write().await;

        // Validate every write before touching any table.
        if state.reports.contains_key(&report.id) {
            return Err(CoreError::Storage(format!(
                "duplicate ADR report id {}",
                report.id
            )));
        }
        if let Some(entry) = &escalation {
            if entry.adr_report_id != report.id {
                return Err(CoreError::Storage(format!(
                    "escalation entry {} does not reference report {}",
                    entry.id, report.id
                )));
            }
            if state.escalations.contains_key(&entry.id) {
                return Err(CoreError::Storage(format!(
                    "duplicate escalation entry id {}",
                    entry.id
                )));
            }
        }

        state.reports.insert(report.id, report.clone());
        if let Some(entry) = &escalation {
            state.escalations.insert(entry.id, entry.clone());
            state.escalation_by_report.insert(report.id, entry.id);
            state.escalation_order.push(entry.id);
        }
        Ok((report, escalation))
    }

    async fn get(&self, id: AdrReportId) -> Result<Option<AdrReport>> {
        Ok(self.state.read().await.reports.get(&id).cloned())
    }
}

#[async_trait]
impl EscalationQueueRepository for InMemoryRecordStore {
    async fn enqueue(&self, entry: EscalationEntry) -> Result<EnqueueOutcome> {
        let mut state = self.state.write().await;
        if let Some(existing) = state
            .escalation_by_report
            .get(&entry.adr_report_id)
            .and_then(|id| state.escalations.get(id))
        {
            return Ok(EnqueueOutcome::AlreadyQueued(existing.clone()));
        }
        if !state.reports.contains_key(&entry.adr_report_id) {
            return Err(CoreError::Storage(format!(
                "escalation references unknown ADR report {}",
                entry.adr_report_id
            )));
        }
        state.escalations.insert(entry.id, entry.clone());
        state.escalation_by_report.insert(entry.adr_report_id, entry.id);
        state.escalation_order.push(entry.id);
        Ok(EnqueueOutcome::Inserted(entry))
    }

    async fn get(&self, id: EscalationEntryId) -> Result<Option<EscalationEntry>> {
        Ok(self.state.read().await.escalations.get(&id).cloned())
    }

    async fn find_by_report(&self, report_id: AdrReportId) -> Result<Option<EscalationEntry>> {
        let state = self.state.read().await;
        Ok(state
            .escalation_by_report
            .get(&report_id)
            .and_then(|id| state.escalations.get(id))
            .cloned())
    }

    async fn acknowledge(
        &self,
        id: EscalationEntryId,
        reviewer: &ReviewerId,
        at: DateTime<Utc>,
    ) -> Result<AcknowledgeOutcome> {
        let mut state = self.state.write().await;
        let Some(entry) = state.escalations.get_mut(&id) else {
            return Ok(AcknowledgeOutcome::Missing);
        };
        if !entry.is_open() {
            return Ok(AcknowledgeOutcome::AlreadyAcknowledged(entry.clone()));
        }
        entry.acknowledged_at = Some(at);
        entry.acknowledged_by = Some(reviewer.clone());
        Ok(AcknowledgeOutcome::Acknowledged(entry.clone()))
    }

    async fn list_open(&self) -> Result<Vec<EscalationEntry>> {
        let state = self.state.read().await;
        let mut open: Vec<(usize, EscalationEntry)> = state
            .escalation_order
            .iter()
            .enumerate()
            .filter_map(|(seq, id)| state.escalations.get(id).map(|entry| (seq, entry)))
            .filter(|(_, entry)| entry.is_open())
            .map(|(seq, entry)| (seq, entry.clone()))
            .collect();
        open.sort_by(|(seq_a, a), (seq_b, b)| {
            a.created_at.cmp(&b.created_at).then(seq_a.cmp(seq_b))
        });
        Ok(open.into_iter().map(|(_, entry)| entry).collect())
    }
}

#[async_trait]
impl DashboardReadPort for InMemoryRecordStore {
    async fn count_vaccinations(&self, pharmacist: &PharmacistId) -> Result<u64> {
        let state = self.state.read().await;
        Ok(state.events_recorded_by(pharmacist).count() as u64)
    }

    async fn count_active_patients(&self, pharmacist: &PharmacistId) -> Result<u64> {
        let state = self.state.read().await;
        let patients: HashSet<&PatientId> = state
            .events_recorded_by(pharmacist)
            .map(|event| &event.patient_id)
            .collect();
        Ok(patients.len() as u64)
    }

    async fn count_pending_follow_ups(&self, pharmacist: &PharmacistId) -> Result<u64> {
        let state = self.state.read().await;
        Ok(state
            .events_recorded_by(pharmacist)
            .filter(|event| event.status == VaccinationStatus::FollowUpDue)
            .count() as u64)
    }

    async fn count_adr_reports(&self, pharmacist: &PharmacistId) -> Result<u64> {
        let state = self.state.read().await;
        Ok(state
            .reports
            .values()
            .filter(|report| &report.reported_by == pharmacist)
            .count() as u64)
    }

    async fn recent_vaccinations(
        &self,
        pharmacist: &PharmacistId,
        limit: usize,
    ) -> Result<Vec<VaccinationEvent>> {
        let state = self.state.read().await;
        let mut events: Vec<_> = state.events_recorded_by(pharmacist).cloned().collect();
        newest_first(&mut events);
        events.truncate(limit);
        Ok(events)
    }

    async fn due_follow_ups(
        &self,
        pharmacist: &PharmacistId,
        due_on_or_before: NaiveDate,
        limit: usize,
    ) -> Result<Vec<VaccinationEvent>> {
        let state = self.state.read().await;
        let mut events: Vec<_> = state
            .events_recorded_by(pharmacist)
            .filter(|event| event.status == VaccinationStatus::FollowUpDue)
            .filter(|event| {
                event
                    .next_dose_due
                    .is_some_and(|due| due <= due_on_or_before)
            })
            .cloned()
            .collect();
        events.sort_by(|a, b| {
            a.next_dose_due
                .cmp(&b.next_dose_due)
                .then_with(|| a.id.cmp(&b.id))
        });
        events.truncate(limit);
        Ok(events)
    }
}
