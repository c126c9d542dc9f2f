//! Vaccination events and their follow-up lifecycle.

pub mod schedule;
pub mod service;

pub use schedule::{FollowUpSchedule, schedule_follow_up};
pub use service::{RecordVaccinationInput, SweepReport, VaccinationRecordService};
