use async_trait::async_trait;
use chrono::NaiveDate;
use vaxtrack_model::{PharmacistId, VaccinationEvent};

use crate::error::Result;

/// Read-only queries backing the dashboard. Every query is scoped to the
/// records the given pharmacist created.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardReadPort: Send + Sync {
    async fn count_vaccinations(&self, pharmacist: &PharmacistId) -> Result<u64>;

    /// Distinct patients among the pharmacist's vaccination events.
    async fn count_active_patients(&self, pharmacist: &PharmacistId) -> Result<u64>;

    /// Events currently in `FollowUpDue`.
    async fn count_pending_follow_ups(&self, pharmacist: &PharmacistId) -> Result<u64>;

    async fn count_adr_reports(&self, pharmacist: &PharmacistId) -> Result<u64>;

    /// Most recently administered first.
    async fn recent_vaccinations(
        &self,
        pharmacist: &PharmacistId,
        limit: usize,
    ) -> Result<Vec<VaccinationEvent>>;

    /// `FollowUpDue` events due on or before `due_on_or_before`, earliest
    /// due date first.
    async fn due_follow_ups(
        &self,
        pharmacist: &PharmacistId,
        due_on_or_before: NaiveDate,
        limit: usize,
    ) -> Result<Vec<VaccinationEvent>>;
}
