use async_trait::async_trait;
use chrono::{DateTime, Utc};
use vaxtrack_model::{AdrReportId, EscalationEntry, EscalationEntryId, ReviewerId};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnqueueOutcome {
    Inserted(EscalationEntry),
    /// The report already had an entry; nothing was written.
    AlreadyQueued(EscalationEntry),
}

impl EnqueueOutcome {
    pub fn entry(&self) -> &EscalationEntry {
        match self {
            EnqueueOutcome::Inserted(entry) | EnqueueOutcome::AlreadyQueued(entry) => entry,
        }
    }

    pub fn into_entry(self) -> EscalationEntry {
        match self {
            EnqueueOutcome::Inserted(entry) | EnqueueOutcome::AlreadyQueued(entry) => entry,
        }
    }

    pub fn was_inserted(&self) -> bool {
        matches!(self, EnqueueOutcome::Inserted(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcknowledgeOutcome {
    Acknowledged(EscalationEntry),
    AlreadyAcknowledged(EscalationEntry),
    Missing,
}

#[async_trait]
pub trait EscalationQueueRepository: Send + Sync {
    /// Inserts `entry` unless its report already has one.
    async fn enqueue(&self, entry: EscalationEntry) -> Result<EnqueueOutcome>;

    async fn get(&self, id: EscalationEntryId) -> Result<Option<EscalationEntry>>;

    async fn find_by_report(&self, report_id: AdrReportId) -> Result<Option<EscalationEntry>>;

    /// Stamps an open entry as acknowledged. Already-acknowledged entries are
    /// returned untouched.
    async fn acknowledge(
        &self,
        id: EscalationEntryId,
        reviewer: &ReviewerId,
        at: DateTime<Utc>,
    ) -> Result<AcknowledgeOutcome>;

    /// Unacknowledged entries, oldest first.
    async fn list_open(&self) -> Result<Vec<EscalationEntry>>;
}
