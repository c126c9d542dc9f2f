//! # VaxTrack core
//!
//! Vaccination lifecycle and follow-up scheduling engine, with the
//! adverse-reaction risk classifier and escalation queue that sit beside it.
//!
//! Services depend on the repository ports in [`database::ports`]; the
//! [`application::AppUnitOfWork`] wires them to either the in-memory store or,
//! with the `database` feature, PostgreSQL.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use vaxtrack_core::{
//!     application::AppUnitOfWork,
//!     clock::SystemClock,
//!     domain::vaccination::{RecordVaccinationInput, VaccinationRecordService},
//!     principal::Principal,
//! };
//! use vaxtrack_model::FollowUpPolicy;
//!
//! async fn example() -> vaxtrack_core::error::Result<()> {
//!     let uow = AppUnitOfWork::in_memory();
//!     let records = VaccinationRecordService::new(uow.vaccinations.clone(), Arc::new(SystemClock));
//!     let principal = Principal::parse("ph-1")?;
//!
//!     let event = records
//!         .record_vaccination(
//!             &principal,
//!             RecordVaccinationInput {
//!                 patient_id: Some("P-001".into()),
//!                 vaccine_name: Some("COVID-19".into()),
//!                 batch_number: Some("BT01".into()),
//!                 dose_number: Some(vaxtrack_model::DoseNumber::Ordinal(1)),
//!                 administered_at: Some(chrono::Utc::now()),
//!                 follow_up_policy: Some(FollowUpPolicy::Days14),
//!                 ..Default::default()
//!             },
//!         )
//!         .await?;
//!     println!("next dose due {:?}", event.next_dose_due);
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Common API routes used across VaxTrack services
pub mod api_routes;
/// Common API types used across VaxTrack services
pub mod api_types;

pub mod application;
pub mod clock;
pub mod config;

/// Repository ports and their in-memory and PostgreSQL adapters
pub mod database;

pub mod domain;

/// Error types and error handling utilities
pub mod error;

pub mod principal;

#[cfg(feature = "database")]
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub use application::AppUnitOfWork;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::CoreSettings;
pub use error::{CoreError, Result, ValidationError};
pub use principal::Principal;
