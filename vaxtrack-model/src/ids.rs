use std::{fmt, str::FromStr};

use uuid::Uuid;

use crate::error::ModelError;

/// Declares a time-ordered UUID identifier minted by the engine.
macro_rules! engine_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub Uuid);

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl $name {
            pub fn new() -> Self {
                $name(Uuid::now_v7())
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }

            pub fn to_uuid(&self) -> Uuid {
                self.0
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                $name(value)
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s.trim()).map($name).map_err(|_| {
                    ModelError::InvalidIdentifier {
                        kind: $kind,
                        value: s.to_string(),
                    }
                })
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

/// Declares an opaque identifier owned by an external system.
macro_rules! external_id {
    ($(#[$meta:meta])* $name:ident, $kind:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
        pub struct $name(String);

        impl $name {
            /// Trims the raw value and rejects blanks.
            pub fn parse(raw: impl AsRef<str>) -> Result<Self, ModelError> {
                let trimmed = raw.as_ref().trim();
                if trimmed.is_empty() {
                    return Err(ModelError::EmptyIdentifier($kind));
                }
                Ok($name(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ModelError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(value)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

engine_id!(
    /// Identifier of a recorded vaccination event.
    VaccinationEventId,
    "vaccination event id"
);
engine_id!(
    /// Identifier of an adverse-reaction report.
    AdrReportId,
    "ADR report id"
);
engine_id!(
    /// Identifier of an entry in the mandatory-review queue.
    EscalationEntryId,
    "escalation entry id"
);

external_id!(
    /// Patient reference issued by the registration system.
    PatientId,
    "patient id"
);
external_id!(
    /// Pharmacist principal issued by the authentication layer.
    PharmacistId,
    "pharmacist id"
);
external_id!(
    /// Clinical or regulatory reviewer acknowledging an escalation.
    ReviewerId,
    "reviewer id"
);

/// A pharmacist acknowledging an escalation acts as its reviewer.
impl From<PharmacistId> for ReviewerId {
    fn from(value: PharmacistId) -> Self {
        ReviewerId(value.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_ids_are_trimmed_and_reject_blanks() {
        let id = PatientId::parse("  P-100 ").unwrap();
        assert_eq!(id.as_str(), "P-100");
        assert_eq!(
            PatientId::parse("   "),
            Err(ModelError::EmptyIdentifier("patient id"))
        );
    }

    #[test]
    fn engine_ids_parse_from_display_form() {
        let id = VaccinationEventId::new();
        let parsed: VaccinationEventId = id.to_string().parse().unwrap();
        assert_eq!(parsed, id);
        assert!("not-a-uuid".parse::<AdrReportId>().is_err());
    }
}
