//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Resolve cross-entity projections (rooms of a property, the property
//!   of a room, the property and room of a lead).
//! - Keep HTTP and CLI layers decoupled from storage details.
//!
//! # Invariants
//! - Services never bypass repository validation or transactions.
//! - Single-record reads return `RepoError::NotFound` instead of `None`.

pub mod lead_service;
pub mod property_service;
pub mod room_service;
