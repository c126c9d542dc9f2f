//! ADR risk classifier.
//!
//! Ordered decision table, first match wins. Symptom text and vital signs are
//! accepted for audit but do not influence the tier.

use vaxtrack_model::{AdrOutcome, AdrSeverity, RiskTier};

use crate::error::ValidationError;

/// Inputs the classifier looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdrAssessmentInput {
    pub severity: Option<AdrSeverity>,
    pub outcome: Option<AdrOutcome>,
    /// Length of the symptom description in characters.
    pub symptom_length: usize,
    pub vitals_present: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiskAssessment {
    pub severity: AdrSeverity,
    pub outcome: AdrOutcome,
    pub tier: RiskTier,
    pub escalate: bool,
    /// Name of the rule that decided the tier; `None` for the fallback.
    pub matched_rule: Option<&'static str>,
}

/// One row of the decision table.
#[derive(Debug, Clone, Copy)]
pub struct RiskRule {
    pub name: &'static str,
    pub tier: RiskTier,
    applies: fn(AdrSeverity, AdrOutcome) -> bool,
}

impl RiskRule {
    pub fn applies(&self, severity: AdrSeverity, outcome: AdrOutcome) -> bool {
        (self.applies)(severity, outcome)
    }
}

pub const RISK_RULES: [RiskRule; 4] = [
    RiskRule {
        name: "anaphylaxis",
        tier: RiskTier::Critical,
        applies: |severity, _| severity == AdrSeverity::Anaphylaxis,
    },
    RiskRule {
        name: "hospitalized_or_fatal",
        tier: RiskTier::Critical,
        applies: |_, outcome| matches!(outcome, AdrOutcome::Hospitalized | AdrOutcome::Fatal),
    },
    RiskRule {
        name: "severe",
        tier: RiskTier::Priority,
        applies: |severity, _| severity == AdrSeverity::Severe,
    },
    RiskRule {
        name: "moderate_not_recovered",
        tier: RiskTier::Priority,
        applies: |severity, outcome| {
            severity == AdrSeverity::Moderate && outcome == AdrOutcome::NotRecovered
        },
    },
];

/// Classifies a report. Missing severity or outcome is rejected, never defaulted.
pub fn classify(input: &AdrAssessmentInput) -> Result<RiskAssessment, ValidationError> {
    let severity = input
        .severity
        .ok_or_else(|| ValidationError::missing("severity"))?;
    let outcome = input
        .outcome
        .ok_or_else(|| ValidationError::missing("outcome"))?;

    Ok(classify_known(severity, outcome))
}

pub fn classify_known(severity: AdrSeverity, outcome: AdrOutcome) -> RiskAssessment {
    let (tier, matched_rule) = RISK_RULES
        .iter()
        .find(|rule| rule.applies(severity, outcome))
        .map(|rule| (rule.tier, Some(rule.name)))
        .unwrap_or((RiskTier::Routine, None));

    RiskAssessment {
        severity,
        outcome,
        tier,
        escalate: tier.requires_escalation(),
        matched_rule,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(severity: AdrSeverity, outcome: AdrOutcome) -> AdrAssessmentInput {
        AdrAssessmentInput {
            severity: Some(severity),
            outcome: Some(outcome),
            symptom_length: 12,
            vitals_present: false,
        }
    }

    #[test]
    fn anaphylaxis_is_critical_for_every_outcome() {
        for outcome in AdrOutcome::ALL {
            let assessment = classify(&input(AdrSeverity::Anaphylaxis, outcome)).unwrap();
            assert_eq!(assessment.tier, RiskTier::Critical);
            assert!(assessment.escalate);
            assert_eq!(assessment.matched_rule, Some("anaphylaxis"));
        }
    }

    #[test]
    fn hospitalization_or_death_is_critical_for_every_severity() {
        for severity in AdrSeverity::ALL {
            for outcome in [AdrOutcome::Hospitalized, AdrOutcome::Fatal] {
                let assessment = classify_known(severity, outcome);
                assert_eq!(assessment.tier, RiskTier::Critical, "{severity}/{outcome}");
            }
        }
    }

    #[test]
    fn assessment_carries_the_classified_inputs() {
        let assessment = classify(&input(AdrSeverity::Mild, AdrOutcome::Recovered)).unwrap();
        assert_eq!(assessment.severity, AdrSeverity::Mild);
        assert_eq!(assessment.outcome, AdrOutcome::Recovered);
        assert_eq!(assessment.tier, RiskTier::Routine);
    }

    #[test]
    fn missing_outcome_is_blamed_on_outcome() {
        let err = classify(&AdrAssessmentInput {
            outcome: None,
            ..input(AdrSeverity::Severe, AdrOutcome::Recovered)
        })
        .unwrap_err();
        assert_eq!(err.field, "outcome");
    }

    #[test]
    fn severe_recovering_is_priority_without_escalation() {
        let assessment = classify(&input(AdrSeverity::Severe, AdrOutcome::Recovering)).unwrap();
        assert_eq!(assessment.tier, RiskTier::Priority);
        assert!(!assessment.escalate);
    }

    #[test]
    fn moderate_hospitalized_escalates() {
        let assessment =
            classify(&input(AdrSeverity::Moderate, AdrOutcome::Hospitalized)).unwrap();
        assert_eq!(assessment.tier, RiskTier::Critical);
        assert!(assessment.escalate);
        assert_eq!(assessment.matched_rule, Some("hospitalized_or_fatal"));
    }

    #[test]
    fn moderate_only_becomes_priority_when_not_recovered() {
        assert_eq!(
            classify_known(AdrSeverity::Moderate, AdrOutcome::NotRecovered).tier,
            RiskTier::Priority
        );
        assert_eq!(
            classify_known(AdrSeverity::Moderate, AdrOutcome::Recovering).tier,
            RiskTier::Routine
        );
    }

    #[test]
    fn mild_outcomes_short_of_hospital_are_routine() {
        for outcome in [
            AdrOutcome::Recovered,
            AdrOutcome::Recovering,
            AdrOutcome::NotRecovered,
        ] {
            let assessment = classify_known(AdrSeverity::Mild, outcome);
            assert_eq!(assessment.tier, RiskTier::Routine);
            assert_eq!(assessment.matched_rule, None);
        }
    }

    #[test]
    fn free_text_and_vitals_do_not_change_the_tier() {
        let mut quiet = input(AdrSeverity::Moderate, AdrOutcome::Recovered);
        let baseline = classify(&quiet).unwrap();
        quiet.symptom_length = 4_000;
        quiet.vitals_present = true;
        assert_eq!(classify(&quiet).unwrap(), baseline);
    }

    #[test]
    fn missing_required_fields_are_rejected() {
        let mut partial = input(AdrSeverity::Mild, AdrOutcome::Recovered);
        partial.severity = None;
        assert_eq!(classify(&partial).unwrap_err().field, "severity");

        let mut partial = input(AdrSeverity::Mild, AdrOutcome::Recovered);
        partial.outcome = None;
        assert_eq!(classify(&partial).unwrap_err().field, "outcome");
    }
}
