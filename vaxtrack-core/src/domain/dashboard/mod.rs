//! Per-pharmacist summary of the record store.

pub mod aggregator;

pub use aggregator::DashboardAggregator;
