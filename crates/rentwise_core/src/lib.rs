//! Core domain logic for Rentwise.
//! This crate is the single source of truth for property, room and lead
//! invariants; the HTTP server and CLI only adapt it.

pub mod db;
pub mod logging;
pub mod model;
pub mod report;
pub mod repo;
pub mod service;

pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::lead::{
    Lead, LeadId, LeadPatch, LeadSource, LeadStatus, LeadWithRefs, NewLead,
};
pub use model::patch::Patch;
pub use model::property::{NewProperty, Property, PropertyId, PropertyPatch, PropertyWithRooms};
pub use model::room::{
    NewRoom, Room, RoomId, RoomPatch, RoomStatus, RoomType, RoomWithProperty,
};
pub use model::timestamp::Timestamp;
pub use model::validation::ValidationError;
pub use report::dashboard::{dashboard_summary, DashboardSummary};
pub use repo::lead_repo::{LeadListQuery, LeadRepository, SqliteLeadRepository};
pub use repo::property_repo::{PropertyDeletion, PropertyRepository, SqlitePropertyRepository};
pub use repo::room_repo::{RoomRepository, SqliteRoomRepository};
pub use repo::{EntityKind, RepoError, RepoResult};
pub use service::lead_service::LeadService;
pub use service::property_service::PropertyService;
pub use service::room_service::RoomService;

/// Minimal health-check API for adapters.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
