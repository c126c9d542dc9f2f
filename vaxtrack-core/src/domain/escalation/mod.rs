//! Mandatory-review queue for critical ADR reports.

pub mod queue;

pub use queue::EscalationQueue;
