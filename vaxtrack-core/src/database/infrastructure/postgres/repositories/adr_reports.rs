use async_trait::async_trait;
use sqlx::PgPool;
use vaxtrack_model::{AdrReport, AdrReportId, EscalationEntry};

use super::rows::{ADR_REPORT_COLUMNS, ESCALATION_COLUMNS, map_adr_report, map_escalation};
use crate::database::ports::adr_reports::AdrReportsRepository;
use crate::error::{CoreError, Result};

#[derive(Debug, Clone)]
pub struct PostgresAdrReportsRepository {
    pool: PgPool,
}

impl PostgresAdrReportsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AdrReportsRepository for PostgresAdrReportsRepository {
    async fn insert_with_escalation(
        &self,
        report: AdrReport,
        escalation: Option<EscalationEntry>,
    ) -> Result<(AdrReport, Option<EscalationEntry>)> {
        let mut tx = self
            .pool()
            .begin()
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to begin transaction: {e}")))?;

        let report_sql = format!(
            r#"
            INSERT INTO adr_reports ({ADR_REPORT_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING {ADR_REPORT_COLUMNS}
            "#
        );
        let row = sqlx::query(&report_sql)
            .bind(report.id.to_uuid())
            .bind(report.patient_id.as_str())
            .bind(report.reported_by.as_str())
            .bind(report.related_vaccination_event_id.map(|id| id.to_uuid()))
            .bind(&report.vaccine_name)
            .bind(&report.batch_number)
            .bind(report.vaccinated_on)
            .bind(report.dose_number.map(|dose| dose.to_db_string()))
            .bind(report.onset_at)
            .bind(report.severity.as_str())
            .bind(report.outcome.as_str())
            .bind(&report.symptoms)
            .bind(report.vital_signs.as_deref())
            .bind(report.treatment.as_deref())
            .bind(report.notes.as_deref())
            .bind(report.risk_tier.as_str())
            .bind(report.escalated)
            .bind(report.reported_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to insert ADR report: {e}")))?;
        let stored_report = map_adr_report(&row)?;

        let stored_entry = match escalation {
            Some(entry) => {
                let entry_sql = format!(
                    r#"
                    INSERT INTO escalation_entries (id, adr_report_id, created_at)
                    VALUES ($1, $2, $3)
                    RETURNING {ESCALATION_COLUMNS}
                    "#
                );
                let row = sqlx::query(&entry_sql)
                    .bind(entry.id.to_uuid())
                    .bind(entry.adr_report_id.to_uuid())
                    .bind(entry.created_at)
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(|e| {
                        CoreError::Storage(format!("Failed to insert escalation entry: {e}"))
                    })?;
                Some(map_escalation(&row)?)
            }
            None => None,
        };

        tx.commit()
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to commit ADR report: {e}")))?;

        Ok((stored_report, stored_entry))
    }

    async fn get(&self, id: AdrReportId) -> Result<Option<AdrReport>> {
        let sql = format!("SELECT {ADR_REPORT_COLUMNS} FROM adr_reports WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.to_uuid())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to load ADR report: {e}")))?;

        row.as_ref().map(map_adr_report).transpose()
    }
}
