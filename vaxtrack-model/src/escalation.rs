use chrono::{DateTime, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ids::{AdrReportId, EscalationEntryId, ReviewerId};

/// Mandatory-review entry for a critical ADR report. One per report.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EscalationEntry {
    pub id: EscalationEntryId,
    pub adr_report_id: AdrReportId,
    pub created_at: DateTime<Utc>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub acknowledged_at: Option<DateTime<Utc>>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub acknowledged_by: Option<ReviewerId>,
}

impl EscalationEntry {
    pub fn open(adr_report_id: AdrReportId, created_at: DateTime<Utc>) -> Self {
        Self {
            id: EscalationEntryId::new(),
            adr_report_id,
            created_at,
            acknowledged_at: None,
            acknowledged_by: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.acknowledged_at.is_none()
    }
}
