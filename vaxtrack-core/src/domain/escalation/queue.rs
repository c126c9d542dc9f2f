use std::{any::type_name_of_val, fmt, sync::Arc};

use tracing::{debug, info, instrument, warn};
use vaxtrack_model::{AdrReportId, EscalationEntry, EscalationEntryId, RiskTier};

use crate::{
    clock::Clock,
    database::ports::{
        AcknowledgeOutcome, AdrReportsRepository, EnqueueOutcome, EscalationQueueRepository,
    },
    error::{CoreError, Entity, Result},
    principal::Principal,
};

pub struct EscalationQueue {
    entries: Arc<dyn EscalationQueueRepository>,
    reports: Arc<dyn AdrReportsRepository>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for EscalationQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EscalationQueue")
            .field("entries", &type_name_of_val(self.entries.as_ref()))
            .field("reports", &type_name_of_val(self.reports.as_ref()))
            .finish()
    }
}

impl EscalationQueue {
    pub fn new(
        entries: Arc<dyn EscalationQueueRepository>,
        reports: Arc<dyn AdrReportsRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            entries,
            reports,
            clock,
        }
    }

    /// Queues a critical report for review. Re-queueing an already queued
    /// report returns the existing entry as
    /// [`EnqueueOutcome::AlreadyQueued`].
    #[instrument(skip(self))]
    pub async fn enqueue(&self, report_id: AdrReportId) -> Result<EnqueueOutcome> {
        let report = self
            .reports
            .get(report_id)
            .await?
            .ok_or_else(|| CoreError::not_found(Entity::AdrReport, report_id))?;
        if report.risk_tier != RiskTier::Critical {
            return Err(CoreError::invalid_state(
                Entity::AdrReport,
                report_id,
                format!("only critical reports are escalated, this one is `{}`", report.risk_tier),
            ));
        }

        let outcome = self
            .entries
            .enqueue(EscalationEntry::open(report_id, self.clock.now()))
            .await?;
        if outcome.was_inserted() {
            info!(entry_id = %outcome.entry().id, "ADR report queued for review");
        } else {
            debug!(entry_id = %outcome.entry().id, "ADR report already queued");
        }
        Ok(outcome)
    }

    #[instrument(skip(self, principal), fields(pharmacist = %principal.pharmacist_id))]
    pub async fn acknowledge(
        &self,
        principal: &Principal,
        entry_id: EscalationEntryId,
    ) -> Result<EscalationEntry> {
        let reviewer = principal.reviewer_id();
        let outcome = self
            .entries
            .acknowledge(entry_id, &reviewer, self.clock.now())
            .await?;

        match outcome {
            AcknowledgeOutcome::Acknowledged(entry) => {
                info!(
                    entry_id = %entry.id,
                    report_id = %entry.adr_report_id,
                    "escalation acknowledged"
                );
                Ok(entry)
            }
            AcknowledgeOutcome::AlreadyAcknowledged(entry) => {
                warn!(entry_id = %entry.id, "escalation already acknowledged");
                Err(CoreError::invalid_state(
                    Entity::EscalationEntry,
                    entry_id,
                    "already acknowledged",
                ))
            }
            AcknowledgeOutcome::Missing => {
                Err(CoreError::not_found(Entity::EscalationEntry, entry_id))
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn get(&self, entry_id: EscalationEntryId) -> Result<EscalationEntry> {
        self.entries
            .get(entry_id)
            .await?
            .ok_or_else(|| CoreError::not_found(Entity::EscalationEntry, entry_id))
    }

    /// Unacknowledged entries, oldest first.
    pub async fn list_open(&self) -> Result<Vec<EscalationEntry>> {
        let open = self.entries.list_open().await?;
        debug!(count = open.len(), "listed open escalations");
        Ok(open)
    }
}
