//! Domain model for properties, rooms and leads.
//!
//! # Responsibility
//! - Define canonical records, create requests and partial-update patches.
//! - Own field-level validation shared by every write path.
//!
//! # Invariants
//! - Every record is identified by a stable UUID.
//! - A room belongs to exactly one property for its whole lifetime.
//! - Timestamps are UTC instants at millisecond precision.

pub mod lead;
pub mod patch;
pub mod property;
pub mod room;
pub mod timestamp;
pub mod validation;
