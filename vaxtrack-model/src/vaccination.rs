use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    error::ModelError,
    ids::{PatientId, PharmacistId, VaccinationEventId},
};

/// Follow-up requirement chosen when a dose is administered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FollowUpPolicy {
    None,
    #[cfg_attr(feature = "serde", serde(rename = "days_7"))]
    Days7,
    #[cfg_attr(feature = "serde", serde(rename = "days_14"))]
    Days14,
    OneWeek,
    OneMonth,
    NextDoseRequired,
}

impl FollowUpPolicy {
    pub const ALL: [FollowUpPolicy; 6] = [
        FollowUpPolicy::None,
        FollowUpPolicy::Days7,
        FollowUpPolicy::Days14,
        FollowUpPolicy::OneWeek,
        FollowUpPolicy::OneMonth,
        FollowUpPolicy::NextDoseRequired,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FollowUpPolicy::None => "none",
            FollowUpPolicy::Days7 => "days_7",
            FollowUpPolicy::Days14 => "days_14",
            FollowUpPolicy::OneWeek => "one_week",
            FollowUpPolicy::OneMonth => "one_month",
            FollowUpPolicy::NextDoseRequired => "next_dose_required",
        }
    }

    /// Whether the policy produces a follow-up at all.
    pub fn requires_follow_up(&self) -> bool {
        !matches!(self, FollowUpPolicy::None)
    }
}

impl fmt::Display for FollowUpPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FollowUpPolicy {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FollowUpPolicy::ALL
            .into_iter()
            .find(|policy| policy.as_str() == s)
            .ok_or_else(|| ModelError::UnknownVariant {
                kind: "follow-up policy",
                value: s.to_string(),
            })
    }
}

/// Lifecycle state of a vaccination event.
///
/// `Scheduled` is reserved for appointment bookings made outside this engine;
/// recorded administrations start at `Administered`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum VaccinationStatus {
    Scheduled,
    Administered,
    FollowUpDue,
    FollowUpCompleted,
    Missed,
}

impl VaccinationStatus {
    pub const ALL: [VaccinationStatus; 5] = [
        VaccinationStatus::Scheduled,
        VaccinationStatus::Administered,
        VaccinationStatus::FollowUpDue,
        VaccinationStatus::FollowUpCompleted,
        VaccinationStatus::Missed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VaccinationStatus::Scheduled => "scheduled",
            VaccinationStatus::Administered => "administered",
            VaccinationStatus::FollowUpDue => "follow_up_due",
            VaccinationStatus::FollowUpCompleted => "follow_up_completed",
            VaccinationStatus::Missed => "missed",
        }
    }

    /// States that only exist for events carrying a follow-up policy.
    pub fn is_follow_up_state(&self) -> bool {
        matches!(
            self,
            VaccinationStatus::FollowUpDue
                | VaccinationStatus::FollowUpCompleted
                | VaccinationStatus::Missed
        )
    }
}

impl fmt::Display for VaccinationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VaccinationStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VaccinationStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| ModelError::UnknownVariant {
                kind: "vaccination status",
                value: s.to_string(),
            })
    }
}

/// Position of a dose in its series. Serialized as a bare number or `"booster"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawDoseNumber", into = "RawDoseNumber"))]
pub enum DoseNumber {
    Ordinal(u32),
    Booster,
}

impl DoseNumber {
    pub fn is_valid(&self) -> bool {
        !matches!(self, DoseNumber::Ordinal(0))
    }

    /// Column form: the ordinal as decimal text, or `booster`.
    pub fn to_db_string(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for DoseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DoseNumber::Ordinal(n) => write!(f, "{n}"),
            DoseNumber::Booster => f.write_str("booster"),
        }
    }
}

impl FromStr for DoseNumber {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("booster") {
            return Ok(DoseNumber::Booster);
        }
        trimmed
            .parse::<u32>()
            .map(DoseNumber::Ordinal)
            .map_err(|_| ModelError::InvalidDoseNumber(s.to_string()))
    }
}

#[cfg(feature = "serde")]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum RawDoseNumber {
    Number(u32),
    Text(String),
}

#[cfg(feature = "serde")]
impl TryFrom<RawDoseNumber> for DoseNumber {
    type Error = ModelError;

    fn try_from(raw: RawDoseNumber) -> Result<Self, Self::Error> {
        match raw {
            RawDoseNumber::Number(n) => Ok(DoseNumber::Ordinal(n)),
            RawDoseNumber::Text(text) => text.parse(),
        }
    }
}

#[cfg(feature = "serde")]
impl From<DoseNumber> for RawDoseNumber {
    fn from(dose: DoseNumber) -> Self {
        match dose {
            DoseNumber::Ordinal(n) => RawDoseNumber::Number(n),
            DoseNumber::Booster => RawDoseNumber::Text("booster".to_string()),
        }
    }
}

/// Injection site recorded with the dose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AdministrationSite {
    LeftUpperArm,
    RightUpperArm,
    LeftThigh,
    RightThigh,
}

impl AdministrationSite {
    pub const ALL: [AdministrationSite; 4] = [
        AdministrationSite::LeftUpperArm,
        AdministrationSite::RightUpperArm,
        AdministrationSite::LeftThigh,
        AdministrationSite::RightThigh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AdministrationSite::LeftUpperArm => "left_upper_arm",
            AdministrationSite::RightUpperArm => "right_upper_arm",
            AdministrationSite::LeftThigh => "left_thigh",
            AdministrationSite::RightThigh => "right_thigh",
        }
    }
}

impl FromStr for AdministrationSite {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AdministrationSite::ALL
            .into_iter()
            .find(|site| site.as_str() == s)
            .ok_or_else(|| ModelError::UnknownVariant {
                kind: "administration site",
                value: s.to_string(),
            })
    }
}

/// A single administered dose and its derived follow-up state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VaccinationEvent {
    pub id: VaccinationEventId,
    pub patient_id: PatientId,
    pub recorded_by: PharmacistId,
    pub vaccine_name: String,
    pub batch_number: String,
    pub dose_number: DoseNumber,
    pub administered_at: DateTime<Utc>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub administration_site: Option<AdministrationSite>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub notes: Option<String>,
    pub follow_up_policy: FollowUpPolicy,
    /// Present iff `follow_up_policy` is not `None`.
    pub next_dose_due: Option<NaiveDate>,
    pub status: VaccinationStatus,
    pub recorded_at: DateTime<Utc>,
    pub status_changed_at: DateTime<Utc>,
}

impl VaccinationEvent {
    /// Checks the two data-model invariants linking policy, due date and status.
    pub fn upholds_invariants(&self) -> bool {
        let due_matches_policy =
            self.next_dose_due.is_some() == self.follow_up_policy.requires_follow_up();
        let status_matches_policy =
            !self.status.is_follow_up_state() || self.follow_up_policy.requires_follow_up();
        due_matches_policy && status_matches_policy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn follow_up_policy_round_trips_through_column_form() {
        for policy in FollowUpPolicy::ALL {
            assert_eq!(policy.as_str().parse::<FollowUpPolicy>(), Ok(policy));
        }
        assert!("fortnightly".parse::<FollowUpPolicy>().is_err());
    }

    #[test]
    fn dose_number_accepts_ordinals_and_booster() {
        assert_eq!("2".parse::<DoseNumber>(), Ok(DoseNumber::Ordinal(2)));
        assert_eq!("Booster".parse::<DoseNumber>(), Ok(DoseNumber::Booster));
        assert!("second".parse::<DoseNumber>().is_err());
        assert!(!DoseNumber::Ordinal(0).is_valid());
        assert!(DoseNumber::Booster.is_valid());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn dose_number_wire_form_is_number_or_booster() {
        assert_eq!(serde_json::to_string(&DoseNumber::Ordinal(3)).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&DoseNumber::Booster).unwrap(),
            "\"booster\""
        );
        let parsed: DoseNumber = serde_json::from_str("\"booster\"").unwrap();
        assert_eq!(parsed, DoseNumber::Booster);
        let parsed: DoseNumber = serde_json::from_str("1").unwrap();
        assert_eq!(parsed, DoseNumber::Ordinal(1));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn follow_up_policy_wire_names_match_column_names() {
        for policy in FollowUpPolicy::ALL {
            let json = serde_json::to_string(&policy).unwrap();
            assert_eq!(json, format!("\"{}\"", policy.as_str()));
        }
    }
}
