use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use vaxtrack_model::{AdrReportId, EscalationEntry, EscalationEntryId, ReviewerId};

use super::rows::{ESCALATION_COLUMNS, map_escalation};
use crate::database::ports::escalations::{
    AcknowledgeOutcome, EnqueueOutcome, EscalationQueueRepository,
};
use crate::error::{CoreError, Result};

#[derive(Debug, Clone)]
pub struct PostgresEscalationQueueRepository {
    pool: PgPool,
}

impl PostgresEscalationQueueRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl EscalationQueueRepository for PostgresEscalationQueueRepository {
    async fn enqueue(&self, entry: EscalationEntry) -> Result<EnqueueOutcome> {
        let sql = format!(
            r#"
            INSERT INTO escalation_entries (id, adr_report_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (adr_report_id) DO NOTHING
            RETURNING {ESCALATION_COLUMNS}
            "#
        );
        let inserted = sqlx::query(&sql)
            .bind(entry.id.to_uuid())
            .bind(entry.adr_report_id.to_uuid())
            .bind(entry.created_at)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to enqueue escalation: {e}")))?;

        if let Some(row) = inserted {
            return Ok(EnqueueOutcome::Inserted(map_escalation(&row)?));
        }

        match self.find_by_report(entry.adr_report_id).await? {
            Some(existing) => Ok(EnqueueOutcome::AlreadyQueued(existing)),
            None => Err(CoreError::Storage(format!(
                "escalation for report {} was neither inserted nor found",
                entry.adr_report_id
            ))),
        }
    }

    async fn get(&self, id: EscalationEntryId) -> Result<Option<EscalationEntry>> {
        let sql = format!("SELECT {ESCALATION_COLUMNS} FROM escalation_entries WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.to_uuid())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to load escalation: {e}")))?;

        row.as_ref().map(map_escalation).transpose()
    }

    async fn find_by_report(&self, report_id: AdrReportId) -> Result<Option<EscalationEntry>> {
        let sql = format!(
            "SELECT {ESCALATION_COLUMNS} FROM escalation_entries WHERE adr_report_id = $1"
        );
        let row = sqlx::query(&sql)
            .bind(report_id.to_uuid())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| {
                CoreError::Storage(format!("Failed to load escalation for report: {e}"))
            })?;

        row.as_ref().map(map_escalation).transpose()
    }

    async fn acknowledge(
        &self,
        id: EscalationEntryId,
        reviewer: &ReviewerId,
        at: DateTime<Utc>,
    ) -> Result<AcknowledgeOutcome> {
        let sql = format!(
            r#"
            UPDATE escalation_entries
            SET acknowledged_at = $2, acknowledged_by = $3
            WHERE id = $1 AND acknowledged_at IS NULL
            RETURNING {ESCALATION_COLUMNS}
            "#
        );
        let updated = sqlx::query(&sql)
            .bind(id.to_uuid())
            .bind(at)
            .bind(reviewer.as_str())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| {
                CoreError::Storage(format!("Failed to acknowledge escalation: {e}"))
            })?;

        if let Some(row) = updated {
            return Ok(AcknowledgeOutcome::Acknowledged(map_escalation(&row)?));
        }

        Ok(match self.get(id).await? {
            Some(existing) => AcknowledgeOutcome::AlreadyAcknowledged(existing),
            None => AcknowledgeOutcome::Missing,
        })
    }

    async fn list_open(&self) -> Result<Vec<EscalationEntry>> {
        let sql = format!(
            r#"
            SELECT {ESCALATION_COLUMNS}
            FROM escalation_entries
            WHERE acknowledged_at IS NULL
            ORDER BY created_at ASC, seq ASC
            "#
        );
        let rows = sqlx::query(&sql)
            .fetch_all(self.pool())
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to list open escalations: {e}")))?;

        rows.iter().map(map_escalation).collect()
    }
}
