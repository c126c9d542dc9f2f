use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::ModelError,
    ids::{AdrReportId, PatientId, PharmacistId, VaccinationEventId},
    vaccination::DoseNumber,
};

/// Clinical severity of an adverse reaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AdrSeverity {
    Mild,
    Moderate,
    Severe,
    Anaphylaxis,
}

impl AdrSeverity {
    pub const ALL: [AdrSeverity; 4] = [
        AdrSeverity::Mild,
        AdrSeverity::Moderate,
        AdrSeverity::Severe,
        AdrSeverity::Anaphylaxis,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdrSeverity::Mild => "mild",
            AdrSeverity::Moderate => "moderate",
            AdrSeverity::Severe => "severe",
            AdrSeverity::Anaphylaxis => "anaphylaxis",
        }
    }
}

impl fmt::Display for AdrSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdrSeverity {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdrSeverity::ALL
            .into_iter()
            .find(|severity| severity.as_str() == s)
            .ok_or_else(|| ModelError::UnknownVariant {
                kind: "ADR severity",
                value: s.to_string(),
            })
    }
}

/// Patient outcome at the time of reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AdrOutcome {
    Recovered,
    Recovering,
    NotRecovered,
    Hospitalized,
    Fatal,
}

impl AdrOutcome {
    pub const ALL: [AdrOutcome; 5] = [
        AdrOutcome::Recovered,
        AdrOutcome::Recovering,
        AdrOutcome::NotRecovered,
        AdrOutcome::Hospitalized,
        AdrOutcome::Fatal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdrOutcome::Recovered => "recovered",
            AdrOutcome::Recovering => "recovering",
            AdrOutcome::NotRecovered => "not_recovered",
            AdrOutcome::Hospitalized => "hospitalized",
            AdrOutcome::Fatal => "fatal",
        }
    }
}

impl fmt::Display for AdrOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdrOutcome {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdrOutcome::ALL
            .into_iter()
            .find(|outcome| outcome.as_str() == s)
            .ok_or_else(|| ModelError::UnknownVariant {
                kind: "ADR outcome",
                value: s.to_string(),
            })
    }
}

/// Urgency tier derived from severity and outcome. Ordered by urgency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RiskTier {
    Routine,
    Priority,
    Critical,
}

impl RiskTier {
    pub const ALL: [RiskTier; 3] = [RiskTier::Routine, RiskTier::Priority, RiskTier::Critical];

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskTier::Routine => "routine",
            RiskTier::Priority => "priority",
            RiskTier::Critical => "critical",
        }
    }

    pub fn requires_escalation(&self) -> bool {
        matches!(self, RiskTier::Critical)
    }
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskTier {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RiskTier::ALL
            .into_iter()
            .find(|tier| tier.as_str() == s)
            .ok_or_else(|| ModelError::UnknownVariant {
                kind: "risk tier",
                value: s.to_string(),
            })
    }
}

/// An adverse-reaction report. Immutable once written; escalation state lives
/// on the matching [`EscalationEntry`](crate::escalation::EscalationEntry).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AdrReport {
    pub id: AdrReportId,
    pub patient_id: PatientId,
    pub reported_by: PharmacistId,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub related_vaccination_event_id: Option<VaccinationEventId>,
    pub vaccine_name: String,
    pub batch_number: String,
    pub vaccinated_on: NaiveDate,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub dose_number: Option<DoseNumber>,
    pub onset_at: DateTime<Utc>,
    pub severity: AdrSeverity,
    pub outcome: AdrOutcome,
    pub symptoms: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub vital_signs: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub treatment: Option<String>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub notes: Option<String>,
    pub risk_tier: RiskTier,
    /// True iff `risk_tier` is `Critical`.
    pub escalated: bool,
    pub reported_at: DateTime<Utc>,
}
