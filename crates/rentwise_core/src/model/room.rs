//! Room domain model.
//!
//! # Invariants
//! - `property_id` is fixed at creation; patches cannot move a room.
//! - `rent` is always a finite number greater than zero.

use super::patch::Patch;
use super::property::{Property, PropertyId};
use super::timestamp::Timestamp;
use super::validation::{require_positive_rent, require_text, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable room identifier.
pub type RoomId = Uuid;

/// Bathroom/space arrangement of a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    #[serde(rename = "Private Bath")]
    PrivateBath,
    #[serde(rename = "Shared Bath")]
    SharedBath,
    #[serde(rename = "Garage")]
    Garage,
}

impl RoomType {
    pub const ALL: [RoomType; 3] = [Self::PrivateBath, Self::SharedBath, Self::Garage];

    /// Display label, identical to the JSON representation.
    pub fn label(self) -> &'static str {
        match self {
            Self::PrivateBath => "Private Bath",
            Self::SharedBath => "Shared Bath",
            Self::Garage => "Garage",
        }
    }
}

/// Occupancy state of a room.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomStatus {
    #[default]
    Vacant,
    Occupied,
}

impl RoomStatus {
    pub fn label(self) -> &'static str {
        match self {
            Self::Vacant => "Vacant",
            Self::Occupied => "Occupied",
        }
    }
}

/// Rentable unit within a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub property_id: PropertyId,
    pub room_number: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub status: RoomStatus,
    /// When the current occupancy ends.
    pub occupancy_end_date: Option<Timestamp>,
    pub rent: f64,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Room {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("roomNumber", &self.room_number)?;
        require_positive_rent(self.rent)
    }

    pub fn is_occupied(&self) -> bool {
        self.status == RoomStatus::Occupied
    }

    /// Merges a partial update into this record and re-validates it.
    pub fn apply_patch(&mut self, patch: RoomPatch) -> Result<(), ValidationError> {
        patch
            .room_number
            .apply_to_required("roomNumber", &mut self.room_number)?;
        patch.room_type.apply_to_required("type", &mut self.room_type)?;
        patch.status.apply_to_required("status", &mut self.status)?;
        patch
            .occupancy_end_date
            .apply_to_optional(&mut self.occupancy_end_date);
        patch.rent.apply_to_required("rent", &mut self.rent)?;
        patch.description.apply_to_optional(&mut self.description);
        self.validate()
    }
}

/// Create request for a room. New rooms always start `Vacant`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRoom {
    #[serde(alias = "property")]
    pub property_id: PropertyId,
    pub room_number: String,
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub rent: f64,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewRoom {
    pub fn new(
        property_id: PropertyId,
        room_number: impl Into<String>,
        room_type: RoomType,
        rent: f64,
    ) -> Self {
        Self {
            property_id,
            room_number: room_number.into(),
            room_type,
            rent,
            description: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("roomNumber", &self.room_number)?;
        require_positive_rent(self.rent)
    }
}

/// Partial update for a room.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomPatch {
    #[serde(default)]
    pub room_number: Patch<String>,
    #[serde(default, rename = "type")]
    pub room_type: Patch<RoomType>,
    #[serde(default)]
    pub status: Patch<RoomStatus>,
    #[serde(default)]
    pub occupancy_end_date: Patch<Timestamp>,
    #[serde(default)]
    pub rent: Patch<f64>,
    #[serde(default)]
    pub description: Patch<String>,
}

impl RoomPatch {
    pub fn is_empty(&self) -> bool {
        self.room_number.is_keep()
            && self.room_type.is_keep()
            && self.status.is_keep()
            && self.occupancy_end_date.is_keep()
            && self.rent.is_keep()
            && self.description.is_keep()
    }
}

/// Room projection with its owning property resolved.
///
/// `property` is `None` only when the owner vanished between the two reads.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomWithProperty {
    #[serde(flatten)]
    pub room: Room,
    pub property: Option<Property>,
}
