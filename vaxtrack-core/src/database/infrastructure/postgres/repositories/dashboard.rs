use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use vaxtrack_model::{PharmacistId, VaccinationEvent};

use super::rows::{VACCINATION_COLUMNS, count, limit, map_vaccination};
use crate::database::ports::dashboard::DashboardReadPort;
use crate::error::{CoreError, Result};

/// Dashboard reads. Each query is independent so the aggregator can run them
/// concurrently on separate pool connections.
#[derive(Debug, Clone)]
pub struct PostgresDashboardRepository {
    pool: PgPool,
}

impl PostgresDashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn scalar(&self, sql: &str, pharmacist: &PharmacistId, what: &str) -> Result<u64> {
        let row = sqlx::query(sql)
            .bind(pharmacist.as_str())
            .fetch_one(self.pool())
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to count {what}: {e}")))?;
        count(&row, "total")
    }
}

#[async_trait]
impl DashboardReadPort for PostgresDashboardRepository {
    async fn count_vaccinations(&self, pharmacist: &PharmacistId) -> Result<u64> {
        self.scalar(
            "SELECT COUNT(*) AS total FROM vaccination_events WHERE recorded_by = $1",
            pharmacist,
            "vaccinations",
        )
        .await
    }

    async fn count_active_patients(&self, pharmacist: &PharmacistId) -> Result<u64> {
        self.scalar(
            "SELECT COUNT(DISTINCT patient_id) AS total FROM vaccination_events WHERE recorded_by = $1",
            pharmacist,
            "active patients",
        )
        .await
    }

    async fn count_pending_follow_ups(&self, pharmacist: &PharmacistId) -> Result<u64> {
        self.scalar(
            r#"
            SELECT COUNT(*) AS total
            FROM vaccination_events
            WHERE recorded_by = $1 AND status = 'follow_up_due'
            "#,
            pharmacist,
            "pending follow-ups",
        )
        .await
    }

    async fn count_adr_reports(&self, pharmacist: &PharmacistId) -> Result<u64> {
        self.scalar(
            "SELECT COUNT(*) AS total FROM adr_reports WHERE reported_by = $1",
            pharmacist,
            "ADR reports",
        )
        .await
    }

    async fn recent_vaccinations(
        &self,
        pharmacist: &PharmacistId,
        max: usize,
    ) -> Result<Vec<VaccinationEvent>> {
        let sql = format!(
            r#"
            SELECT {VACCINATION_COLUMNS}
            FROM vaccination_events
            WHERE recorded_by = $1
            ORDER BY administered_at DESC, id DESC
            LIMIT $2
            "#
        );
        let rows = sqlx::query(&sql)
            .bind(pharmacist.as_str())
            .bind(limit(max))
            .fetch_all(self.pool())
            .await
            .map_err(|e| {
                CoreError::Storage(format!("Failed to load recent vaccinations: {e}"))
            })?;

        rows.iter().map(map_vaccination).collect()
    }

    async fn due_follow_ups(
        &self,
        pharmacist: &PharmacistId,
        due_on_or_before: NaiveDate,
        max: usize,
    ) -> Result<Vec<VaccinationEvent>> {
        let sql = format!(
            r#"
            SELECT {VACCINATION_COLUMNS}
            FROM vaccination_events
            WHERE recorded_by = $1
              AND status = 'follow_up_due'
              AND next_dose_due <= $2
            ORDER BY next_dose_due ASC, id ASC
            LIMIT $3
            "#
        );
        let rows = sqlx::query(&sql)
            .bind(pharmacist.as_str())
            .bind(due_on_or_before)
            .bind(limit(max))
            .fetch_all(self.pool())
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to load due follow-ups: {e}")))?;

        rows.iter().map(map_vaccination).collect()
    }
}
