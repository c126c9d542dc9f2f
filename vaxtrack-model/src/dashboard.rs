use chrono::{DateTime, NaiveDate, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    ids::{PatientId, VaccinationEventId},
    vaccination::{DoseNumber, VaccinationEvent},
};

/// Headline counters for one pharmacist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DashboardCounts {
    pub total_vaccinations: u64,
    pub active_patients: u64,
    pub pending_follow_ups: u64,
    pub adr_report_count: u64,
}

/// A follow-up that is due soon or already overdue.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DueFollowUp {
    pub event_id: VaccinationEventId,
    pub patient_id: PatientId,
    pub vaccine_name: String,
    pub dose_number: DoseNumber,
    pub due_on: NaiveDate,
    /// Negative once the due date has passed.
    pub days_until_due: i64,
}

impl DueFollowUp {
    pub fn is_overdue(&self) -> bool {
        self.days_until_due < 0
    }
}

/// Read model recomputed on every request; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DashboardSnapshot {
    pub counts: DashboardCounts,
    /// Most recent first.
    pub recent_vaccinations: Vec<VaccinationEvent>,
    /// Ascending by due date.
    pub due_follow_ups: Vec<DueFollowUp>,
    pub generated_at: DateTime<Utc>,
}
