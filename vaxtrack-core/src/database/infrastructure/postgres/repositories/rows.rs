//! Row decoding shared by the repositories.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Row, postgres::PgRow};
use uuid::Uuid;
use vaxtrack_model::{
    AdministrationSite, AdrOutcome, AdrReport, AdrReportId, AdrSeverity, DoseNumber,
    EscalationEntry, EscalationEntryId, FollowUpPolicy, ModelError, PatientId, PharmacistId,
    ReviewerId, RiskTier, VaccinationEvent, VaccinationEventId, VaccinationStatus,
};

use crate::error::{CoreError, Result};

pub(super) const VACCINATION_COLUMNS: &str = r#"
    id,
    patient_id,
    recorded_by,
    vaccine_name,
    batch_number,
    dose_number,
    administered_at,
    administration_site,
    notes,
    follow_up_policy,
    next_dose_due,
    status,
    recorded_at,
    status_changed_at
"#;

pub(super) const ADR_REPORT_COLUMNS: &str = r#"
    id,
    patient_id,
    reported_by,
    related_vaccination_event_id,
    vaccine_name,
    batch_number,
    vaccinated_on,
    dose_number,
    onset_at,
    severity,
    outcome,
    symptoms,
    vital_signs,
    treatment,
    notes,
    risk_tier,
    escalated,
    reported_at
"#;

pub(super) const ESCALATION_COLUMNS: &str = r#"
    id,
    adr_report_id,
    created_at,
    acknowledged_at,
    acknowledged_by
"#;

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T>
where
    T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
{
    row.try_get(name)
        .map_err(|e| CoreError::Storage(format!("Failed to read {name}: {e}")))
}

fn parsed<T>(row: &PgRow, name: &str) -> Result<T>
where
    T: FromStr<Err = ModelError>,
{
    let raw: String = column(row, name)?;
    Ok(raw.parse::<T>()?)
}

fn parsed_opt<T>(row: &PgRow, name: &str) -> Result<Option<T>>
where
    T: FromStr<Err = ModelError>,
{
    let raw: Option<String> = column(row, name)?;
    Ok(raw.map(|value| value.parse::<T>()).transpose()?)
}

pub(super) fn map_vaccination(row: &PgRow) -> Result<VaccinationEvent> {
    let id: Uuid = column(row, "id")?;
    let administered_at: DateTime<Utc> = column(row, "administered_at")?;
    let next_dose_due: Option<NaiveDate> = column(row, "next_dose_due")?;
    let recorded_at: DateTime<Utc> = column(row, "recorded_at")?;
    let status_changed_at: DateTime<Utc> = column(row, "status_changed_at")?;

    Ok(VaccinationEvent {
        id: VaccinationEventId(id),
        patient_id: parsed::<PatientId>(row, "patient_id")?,
        recorded_by: parsed::<PharmacistId>(row, "recorded_by")?,
        vaccine_name: column(row, "vaccine_name")?,
        batch_number: column(row, "batch_number")?,
        dose_number: parsed::<DoseNumber>(row, "dose_number")?,
        administered_at,
        administration_site: parsed_opt::<AdministrationSite>(row, "administration_site")?,
        notes: column(row, "notes")?,
        follow_up_policy: parsed::<FollowUpPolicy>(row, "follow_up_policy")?,
        next_dose_due,
        status: parsed::<VaccinationStatus>(row, "status")?,
        recorded_at,
        status_changed_at,
    })
}

pub(super) fn map_adr_report(row: &PgRow) -> Result<AdrReport> {
    let id: Uuid = column(row, "id")?;
    let related: Option<Uuid> = column(row, "related_vaccination_event_id")?;

    Ok(AdrReport {
        id: AdrReportId(id),
        patient_id: parsed::<PatientId>(row, "patient_id")?,
        reported_by: parsed::<PharmacistId>(row, "reported_by")?,
        related_vaccination_event_id: related.map(VaccinationEventId),
        vaccine_name: column(row, "vaccine_name")?,
        batch_number: column(row, "batch_number")?,
        vaccinated_on: column(row, "vaccinated_on")?,
        dose_number: parsed_opt::<DoseNumber>(row, "dose_number")?,
        onset_at: column(row, "onset_at")?,
        severity: parsed::<AdrSeverity>(row, "severity")?,
        outcome: parsed::<AdrOutcome>(row, "outcome")?,
        symptoms: column(row, "symptoms")?,
        vital_signs: column(row, "vital_signs")?,
        treatment: column(row, "treatment")?,
        notes: column(row, "notes")?,
        risk_tier: parsed::<RiskTier>(row, "risk_tier")?,
        escalated: column(row, "escalated")?,
        reported_at: column(row, "reported_at")?,
    })
}

pub(super) fn map_escalation(row: &PgRow) -> Result<EscalationEntry> {
    let id: Uuid = column(row, "id")?;
    let report_id: Uuid = column(row, "adr_report_id")?;

    Ok(EscalationEntry {
        id: EscalationEntryId(id),
        adr_report_id: AdrReportId(report_id),
        created_at: column(row, "created_at")?,
        acknowledged_at: column(row, "acknowledged_at")?,
        acknowledged_by: parsed_opt::<ReviewerId>(row, "acknowledged_by")?,
    })
}

/// Converts a count column to the unsigned form the dashboard reports.
pub(super) fn count(row: &PgRow, name: &str) -> Result<u64> {
    let value: i64 = column(row, name)?;
    u64::try_from(value).map_err(|_| CoreError::Storage(format!("negative count in {name}")))
}

pub(super) fn limit(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}
