//! Follow-up scheduler.
//!
//! Pure mapping from an administration instant and follow-up policy to the
//! next due date and initial status. No clock reads happen here; the sweep
//! helpers take `now` explicitly.

use chrono::{DateTime, Days, Duration, NaiveDate, Utc};
use vaxtrack_model::{FollowUpPolicy, VaccinationStatus};

use crate::error::ValidationError;

/// Derived follow-up state for a freshly administered dose.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FollowUpSchedule {
    pub next_dose_due: Option<NaiveDate>,
    pub status: VaccinationStatus,
}

/// Fixed interval in days for policies that derive their due date.
pub fn policy_interval_days(policy: FollowUpPolicy) -> Option<u64> {
    match policy {
        FollowUpPolicy::Days7 | FollowUpPolicy::OneWeek => Some(7),
        FollowUpPolicy::Days14 => Some(14),
        FollowUpPolicy::OneMonth => Some(30),
        FollowUpPolicy::None | FollowUpPolicy::NextDoseRequired => None,
    }
}

/// Computes `(next_dose_due, status)` for a dose.
///
/// `explicit_due` is only accepted for [`FollowUpPolicy::NextDoseRequired`],
/// where it is mandatory and must fall strictly after the administration date.
pub fn schedule_follow_up(
    administered_at: DateTime<Utc>,
    policy: FollowUpPolicy,
    explicit_due: Option<NaiveDate>,
) -> Result<FollowUpSchedule, ValidationError> {
    let administered_on = administered_at.date_naive();

    match policy {
        FollowUpPolicy::None => {
            if explicit_due.is_some() {
                return Err(ValidationError::new(
                    "next_dose_due",
                    "must be absent when no follow-up is required",
                ));
            }
            Ok(FollowUpSchedule {
                next_dose_due: None,
                status: VaccinationStatus::Administered,
            })
        }
        FollowUpPolicy::NextDoseRequired => {
            let due = explicit_due.ok_or_else(|| {
                ValidationError::new(
                    "next_dose_due",
                    "is required when the next dose is required",
                )
            })?;
            if due <= administered_on {
                return Err(ValidationError::new(
                    "next_dose_due",
                    format!("must be after the administration date {administered_on}"),
                ));
            }
            Ok(FollowUpSchedule {
                next_dose_due: Some(due),
                status: VaccinationStatus::FollowUpDue,
            })
        }
        derived => {
            if explicit_due.is_some() {
                return Err(ValidationError::new(
                    "next_dose_due",
                    format!("is derived from the `{derived}` policy and cannot be set"),
                ));
            }
            let days = policy_interval_days(derived).unwrap_or_default();
            let due = administered_on
                .checked_add_days(Days::new(days))
                .ok_or_else(|| {
                    ValidationError::new("administered_at", "is out of the supported date range")
                })?;
            Ok(FollowUpSchedule {
                next_dose_due: Some(due),
                status: VaccinationStatus::FollowUpDue,
            })
        }
    }
}

/// Latest due date that counts as missed at `now`.
///
/// Due dates are compared at day granularity: a follow-up due on `D` is missed
/// once `now - grace` has reached day `D`. Fails when the grace period reaches
/// past the representable date range.
pub fn missed_cutoff(now: DateTime<Utc>, grace: Duration) -> Result<NaiveDate, ValidationError> {
    now.checked_sub_signed(grace)
        .map(|instant| instant.date_naive())
        .ok_or_else(|| {
            ValidationError::new(
                "follow_up.grace_period_days",
                "reaches past the supported date range",
            )
        })
}

pub fn is_missed(due: NaiveDate, now: DateTime<Utc>, grace: Duration) -> bool {
    missed_cutoff(now, grace).is_ok_and(|cutoff| due <= cutoff)
}

/// Whole days from `now`'s date to `due`; negative when overdue.
pub fn days_until(due: NaiveDate, now: DateTime<Utc>) -> i64 {
    (due - now.date_naive()).num_days()
}
