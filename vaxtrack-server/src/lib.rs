//! # VaxTrack Server
//!
//! HTTP front end for the VaxTrack engine.
//!
//! ## Overview
//!
//! - **Vaccination records**: record doses, derive the follow-up due date and
//!   complete follow-ups
//! - **Adverse reactions**: classify reports and escalate critical ones for
//!   mandatory review
//! - **Dashboard**: per-pharmacist counts and due follow-ups
//! - **Sweeper**: background task marking overdue follow-ups as missed
//!
//! Callers are identified by the `x-pharmacist-id` header, set by the
//! authenticating gateway in front of the server.

pub mod handlers;
pub mod infra;
pub mod routes;

pub use infra::app_state::AppState;
pub use routes::create_app;
