use async_trait::async_trait;
use vaxtrack_model::{AdrReport, AdrReportId, EscalationEntry};

use crate::error::Result;

#[async_trait]
pub trait AdrReportsRepository: Send + Sync {
    /// Persists the report and, when given, its escalation entry in one
    /// atomic write. Either both are stored or neither is.
    async fn insert_with_escalation(
        &self,
        report: AdrReport,
        escalation: Option<EscalationEntry>,
    ) -> Result<(AdrReport, Option<EscalationEntry>)>;

    async fn get(&self, id: AdrReportId) -> Result<Option<AdrReport>>;
}
