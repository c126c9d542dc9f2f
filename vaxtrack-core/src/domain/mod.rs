//! Domain services of the vaccination engine.

pub mod adr;
pub mod catalog;
pub mod dashboard;
pub mod escalation;
pub mod vaccination;

mod input;
