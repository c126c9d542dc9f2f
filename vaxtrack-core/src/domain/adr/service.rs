use std::{any::type_name_of_val, fmt, sync::Arc};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};
use vaxtrack_model::{
    AdrOutcome, AdrReport, AdrReportId, AdrSeverity, DoseNumber, EscalationEntry,
    VaccinationEventId,
};

use super::classifier::{AdrAssessmentInput, classify};
use crate::{
    clock::Clock,
    database::ports::{AdrReportsRepository, VaccinationEventsRepository},
    domain::{catalog::normalize_vaccine_name, input},
    error::{CoreError, Entity, Result, ValidationError},
    principal::Principal,
};

/// Caller-supplied fields of an adverse-reaction report. The risk tier is
/// always derived and cannot be supplied.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SubmitAdrReportInput {
    pub patient_id: Option<String>,
    pub related_vaccination_event_id: Option<VaccinationEventId>,
    pub vaccine_name: Option<String>,
    pub batch_number: Option<String>,
    pub vaccinated_on: Option<NaiveDate>,
    pub dose_number: Option<DoseNumber>,
    pub onset_at: Option<DateTime<Utc>>,
    pub severity: Option<AdrSeverity>,
    pub outcome: Option<AdrOutcome>,
    pub symptoms: Option<String>,
    pub vital_signs: Option<String>,
    pub treatment: Option<String>,
    pub notes: Option<String>,
}

/// A stored report and, for critical reports, the escalation entry written
/// with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmittedAdrReport {
    pub report: AdrReport,
    pub escalation: Option<EscalationEntry>,
}

pub struct AdrReportService {
    reports: Arc<dyn AdrReportsRepository>,
    vaccinations: Arc<dyn VaccinationEventsRepository>,
    clock: Arc<dyn Clock>,
}

impl fmt::Debug for AdrReportService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdrReportService")
            .field("reports", &type_name_of_val(self.reports.as_ref()))
            .field("vaccinations", &type_name_of_val(self.vaccinations.as_ref()))
            .finish()
    }
}

impl AdrReportService {
    pub fn new(
        reports: Arc<dyn AdrReportsRepository>,
        vaccinations: Arc<dyn VaccinationEventsRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            reports,
            vaccinations,
            clock,
        }
    }

    /// Classifies and stores a report. A critical report is written together
    /// with its escalation entry; neither is stored if either write fails.
    #[instrument(skip(self, principal, raw), fields(pharmacist = %principal.pharmacist_id))]
    pub async fn submit_report(
        &self,
        principal: &Principal,
        raw: SubmitAdrReportInput,
    ) -> Result<SubmittedAdrReport> {
        let now = self.clock.now();

        let symptoms = input::optional_text(raw.symptoms);
        let vital_signs = input::optional_text(raw.vital_signs);
        let assessment = classify(&AdrAssessmentInput {
            severity: raw.severity,
            outcome: raw.outcome,
            symptom_length: symptoms.as_deref().map_or(0, |text| text.chars().count()),
            vitals_present: vital_signs.is_some(),
        })?;

        let patient_id = input::patient_id(raw.patient_id)?;
        let vaccine_name = raw
            .vaccine_name
            .as_deref()
            .and_then(normalize_vaccine_name)
            .ok_or_else(|| ValidationError::missing("vaccine_name"))?;
        let batch_number = input::required_text("batch_number", raw.batch_number)?;
        let vaccinated_on = input::required("vaccinated_on", raw.vaccinated_on)?;
        if vaccinated_on > now.date_naive() {
            return Err(ValidationError::new("vaccinated_on", "cannot be in the future").into());
        }
        let dose_number = raw
            .dose_number
            .map(|dose| input::dose_number("dose_number", dose))
            .transpose()?;
        let onset_at =
            input::not_in_future("onset_at", input::required("onset_at", raw.onset_at)?, now)?;
        if onset_at.date_naive() < vaccinated_on {
            return Err(ValidationError::new(
                "onset_at",
                format!("cannot precede the vaccination date {vaccinated_on}"),
            )
            .into());
        }
        let symptoms = symptoms.ok_or_else(|| ValidationError::missing("symptoms"))?;

        if let Some(event_id) = raw.related_vaccination_event_id {
            let event = self
                .vaccinations
                .get(event_id)
                .await?
                .ok_or_else(|| CoreError::not_found(Entity::VaccinationEvent, event_id))?;
            if event.patient_id != patient_id {
                return Err(ValidationError::new(
                    "related_vaccination_event_id",
                    "belongs to a different patient",
                )
                .into());
            }
        }

        let report = AdrReport {
            id: AdrReportId::new(),
            patient_id,
            reported_by: principal.pharmacist_id.clone(),
            related_vaccination_event_id: raw.related_vaccination_event_id,
            vaccine_name,
            batch_number,
            vaccinated_on,
            dose_number,
            onset_at,
            severity: assessment.severity,
            outcome: assessment.outcome,
            symptoms,
            vital_signs,
            treatment: input::optional_text(raw.treatment),
            notes: input::optional_text(raw.notes),
            risk_tier: assessment.tier,
            escalated: assessment.escalate,
            reported_at: now,
        };
        let escalation = assessment
            .escalate
            .then(|| EscalationEntry::open(report.id, now));

        let (report, escalation) = self
            .reports
            .insert_with_escalation(report, escalation)
            .await?;

        match &escalation {
            Some(entry) => warn!(
                report_id = %report.id,
                entry_id = %entry.id,
                rule = assessment.matched_rule.unwrap_or("none"),
                "critical ADR report escalated for mandatory review"
            ),
            None => info!(
                report_id = %report.id,
                tier = %report.risk_tier,
                "ADR report recorded"
            ),
        }

        Ok(SubmittedAdrReport { report, escalation })
    }

    #[instrument(skip(self))]
    pub async fn get_report(&self, id: AdrReportId) -> Result<AdrReport> {
        debug!("loading ADR report");
        self.reports
            .get(id)
            .await?
            .ok_or_else(|| CoreError::not_found(Entity::AdrReport, id))
    }
}
