use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;
use vaxtrack_model::{PatientId, VaccinationEvent, VaccinationEventId, VaccinationStatus};

use super::rows::{VACCINATION_COLUMNS, map_vaccination};
use crate::database::ports::vaccinations::{StatusTransition, VaccinationEventsRepository};
use crate::error::{CoreError, Result};

#[derive(Debug, Clone)]
pub struct PostgresVaccinationEventsRepository {
    pool: PgPool,
}

impl PostgresVaccinationEventsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl VaccinationEventsRepository for PostgresVaccinationEventsRepository {
    async fn insert(&self, event: VaccinationEvent) -> Result<VaccinationEvent> {
        let sql = format!(
            r#"
            INSERT INTO vaccination_events ({VACCINATION_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING {VACCINATION_COLUMNS}
            "#
        );
        let row = sqlx::query(&sql)
            .bind(event.id.to_uuid())
            .bind(event.patient_id.as_str())
            .bind(event.recorded_by.as_str())
            .bind(&event.vaccine_name)
            .bind(&event.batch_number)
            .bind(event.dose_number.to_db_string())
            .bind(event.administered_at)
            .bind(event.administration_site.map(|site| site.as_str()))
            .bind(event.notes.as_deref())
            .bind(event.follow_up_policy.as_str())
            .bind(event.next_dose_due)
            .bind(event.status.as_str())
            .bind(event.recorded_at)
            .bind(event.status_changed_at)
            .fetch_one(self.pool())
            .await
            .map_err(|e| {
                CoreError::Storage(format!("Failed to insert vaccination event: {e}"))
            })?;

        map_vaccination(&row)
    }

    async fn get(&self, id: VaccinationEventId) -> Result<Option<VaccinationEvent>> {
        let sql = format!("SELECT {VACCINATION_COLUMNS} FROM vaccination_events WHERE id = $1");
        let row = sqlx::query(&sql)
            .bind(id.to_uuid())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| CoreError::Storage(format!("Failed to load vaccination event: {e}")))?;

        row.as_ref().map(map_vaccination).transpose()
    }

    async fn list_by_patient(&self, patient_id: &PatientId) -> Result<Vec<VaccinationEvent>> {
        let sql = format!(
            r#"
            SELECT {VACCINATION_COLUMNS}
            FROM vaccination_events
            WHERE patient_id = $1
            ORDER BY administered_at DESC, id DESC
            "#
        );
        let rows = sqlx::query(&sql)
            .bind(patient_id.as_str())
            .fetch_all(self.pool())
            .await
            .map_err(|e| {
                CoreError::Storage(format!("Failed to list patient vaccinations: {e}"))
            })?;

        rows.iter().map(map_vaccination).collect()
    }

    async fn transition_status(
        &self,
        id: VaccinationEventId,
        expected: VaccinationStatus,
        next: VaccinationStatus,
        at: DateTime<Utc>,
    ) -> Result<StatusTransition> {
        let sql = format!(
            r#"
            UPDATE vaccination_events
            SET status = $3, status_changed_at = $4
            WHERE id = $1 AND status = $2
            RETURNING {VACCINATION_COLUMNS}
            "#
        );
        let updated = sqlx::query(&sql)
            .bind(id.to_uuid())
            .bind(expected.as_str())
            .bind(next.as_str())
            .bind(at)
            .fetch_optional(self.pool())
            .await
            .map_err(|e| {
                CoreError::Storage(format!("Failed to update vaccination status: {e}"))
            })?;

        if let Some(row) = updated {
            return Ok(StatusTransition::Applied(map_vaccination(&row)?));
        }

        // The guarded update matched nothing: tell a missing row from a
        // row in some other state.
        let current = sqlx::query("SELECT status FROM vaccination_events WHERE id = $1")
            .bind(id.to_uuid())
            .fetch_optional(self.pool())
            .await
            .map_err(|e| {
                CoreError::Storage(format!("Failed to read vaccination status: {e}"))
            })?;

        match current {
            None => Ok(StatusTransition::Missing),
            Some(row) => {
                let status: String = row
                    .try_get("status")
                    .map_err(|e| CoreError::Storage(format!("Failed to read status: {e}")))?;
                Ok(StatusTransition::Conflict(status.parse()?))
            }
        }
    }

    async fn mark_missed(
        &self,
        cutoff: NaiveDate,
        at: DateTime<Utc>,
    ) -> Result<Vec<VaccinationEventId>> {
        let rows = sqlx::query(
            r#"
            UPDATE vaccination_events
            SET status = 'missed', status_changed_at = $2
            WHERE status = 'follow_up_due'
              AND next_dose_due <= $1
            RETURNING id
            "#,
        )
        .bind(cutoff)
        .bind(at)
        .fetch_all(self.pool())
        .await
        .map_err(|e| CoreError::Storage(format!("Failed to sweep overdue follow-ups: {e}")))?;

        let mut ids = rows
            .iter()
            .map(|row| {
                row.try_get::<Uuid, _>("id")
                    .map(VaccinationEventId)
                    .map_err(|e| CoreError::Storage(format!("Failed to read id: {e}")))
            })
            .collect::<Result<Vec<_>>>()?;
        ids.sort();
        Ok(ids)
    }
}
