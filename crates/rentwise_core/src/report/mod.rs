//! Read-only aggregate reports.

pub mod dashboard;
