//! Property domain model.
//!
//! # Responsibility
//! - Define the property record and its ordered room back-references.
//! - Validate create requests and merge partial updates.
//!
//! # Invariants
//! - `name` and `address` are never blank.
//! - `rooms` lists ids of existing rooms only, in creation order.

use super::patch::Patch;
use super::room::{Room, RoomId};
use super::timestamp::Timestamp;
use super::validation::{require_text, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable property identifier.
pub type PropertyId = Uuid;

/// Managed building or unit grouping that owns rooms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: PropertyId,
    pub name: String,
    pub address: String,
    pub description: Option<String>,
    /// Owned room ids in creation order.
    pub rooms: Vec<RoomId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Property {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("address", &self.address)
    }

    /// Merges a partial update into this record and re-validates it.
    ///
    /// `rooms` and timestamps are never touched by a patch.
    pub fn apply_patch(&mut self, patch: PropertyPatch) -> Result<(), ValidationError> {
        patch.name.apply_to_required("name", &mut self.name)?;
        patch.address.apply_to_required("address", &mut self.address)?;
        patch.description.apply_to_optional(&mut self.description);
        self.validate()
    }
}

/// Create request for a property.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProperty {
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewProperty {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            description: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("address", &self.address)
    }
}

/// Partial update for a property.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyPatch {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub address: Patch<String>,
    #[serde(default)]
    pub description: Patch<String>,
}

impl PropertyPatch {
    /// Returns `true` when no field would change.
    pub fn is_empty(&self) -> bool {
        self.name.is_keep() && self.address.is_keep() && self.description.is_keep()
    }
}

/// Property projection with its rooms resolved to full records.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyWithRooms {
    pub id: PropertyId,
    pub name: String,
    pub address: String,
    pub description: Option<String>,
    pub rooms: Vec<Room>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl PropertyWithRooms {
    pub fn new(property: Property, rooms: Vec<Room>) -> Self {
        Self {
            id: property.id,
            name: property.name,
            address: property.address,
            description: property.description,
            rooms,
            created_at: property.created_at,
            updated_at: property.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{NewProperty, Property, PropertyPatch};
    use crate::model::patch::Patch;
    use crate::model::timestamp::Timestamp;
    use crate::model::validation::ValidationError;
    use uuid::Uuid;

    fn sample() -> Property {
        Property {
            id: Uuid::new_v4(),
            name: "Sunset".to_string(),
            address: "1 Main St".to_string(),
            description: Some("corner lot".to_string()),
            rooms: Vec::new(),
            created_at: Timestamp::from_millis(1).unwrap(),
            updated_at: Timestamp::from_millis(1).unwrap(),
        }
    }

    #[test]
    fn patch_distinguishes_omitted_null_and_value() {
        let patch: PropertyPatch =
            serde_json::from_str(r#"{"name":"Dawn","description":null}"#).unwrap();
        assert_eq!(patch.name, Patch::Set("Dawn".to_string()));
        assert_eq!(patch.address, Patch::Keep);
        assert_eq!(patch.description, Patch::Clear);

        let mut property = sample();
        property.apply_patch(patch).unwrap();
        assert_eq!(property.name, "Dawn");
        assert_eq!(property.address, "1 Main St");
        assert_eq!(property.description, None);
    }

    #[test]
    fn empty_patch_is_empty_and_changes_nothing() {
        let patch: PropertyPatch = serde_json::from_str("{}").unwrap();
        assert!(patch.is_empty());

        let mut property = sample();
        let before = property.clone();
        property.apply_patch(patch).unwrap();
        assert_eq!(property, before);
    }

    #[test]
    fn blank_name_is_rejected_instead_of_dropped() {
        let mut property = sample();
        let patch = PropertyPatch {
            name: Patch::Set("  ".to_string()),
            ..PropertyPatch::default()
        };
        let err = property.apply_patch(patch).unwrap_err();
        assert_eq!(err, ValidationError::BlankField("name"));
    }

    #[test]
    fn new_property_requires_address() {
        let err = NewProperty::new("Sunset", "").validate().unwrap_err();
        assert_eq!(err, ValidationError::BlankField("address"));
    }
}
