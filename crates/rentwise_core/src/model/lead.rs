//! Lead domain model.
//!
//! Leads move freely between pipeline statuses; there is no transition
//! table. Property and room references are optional and independent.

use super::patch::Patch;
use super::property::{Property, PropertyId};
use super::room::{Room, RoomId};
use super::timestamp::Timestamp;
use super::validation::{require_text, ValidationError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable lead identifier.
pub type LeadId = Uuid;

/// Channel a lead came in through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadSource {
    Roomies,
    Facebook,
    Roomster,
    Telegram,
    Sulekha,
    WhatsApp,
    Others,
}

/// Sales-pipeline status of a lead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeadStatus {
    #[default]
    New,
    Hot,
    Lease,
    Landed,
    Deny,
}

impl LeadStatus {
    pub const ALL: [LeadStatus; 5] = [
        Self::New,
        Self::Hot,
        Self::Lease,
        Self::Landed,
        Self::Deny,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::Hot => "Hot",
            Self::Lease => "Lease",
            Self::Landed => "Landed",
            Self::Deny => "Deny",
        }
    }

    /// Parses a display label such as `Landed`.
    ///
    /// # Errors
    /// - Returns `UnknownLabel` for anything outside the enumerated set.
    pub fn from_label(value: &str) -> Result<Self, ValidationError> {
        Self::ALL
            .into_iter()
            .find(|status| status.label() == value)
            .ok_or_else(|| ValidationError::UnknownLabel {
                field: "status",
                value: value.to_string(),
            })
    }
}

/// Prospective tenant inquiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub id: LeadId,
    pub name: String,
    pub contact_number: String,
    pub source: LeadSource,
    pub status: LeadStatus,
    pub property_id: Option<PropertyId>,
    pub room_id: Option<RoomId>,
    /// When the operator should follow up.
    pub reminder_date: Option<Timestamp>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Lead {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("contactNumber", &self.contact_number)
    }

    /// A reminder is pending while it is set and the lead has not landed.
    pub fn has_pending_reminder(&self) -> bool {
        self.reminder_date.is_some() && self.status != LeadStatus::Landed
    }

    pub fn apply_patch(&mut self, patch: LeadPatch) -> Result<(), ValidationError> {
        patch.name.apply_to_required("name", &mut self.name)?;
        patch
            .contact_number
            .apply_to_required("contactNumber", &mut self.contact_number)?;
        patch.source.apply_to_required("source", &mut self.source)?;
        patch.status.apply_to_required("status", &mut self.status)?;
        patch.property_id.apply_to_optional(&mut self.property_id);
        patch.room_id.apply_to_optional(&mut self.room_id);
        patch.reminder_date.apply_to_optional(&mut self.reminder_date);
        patch.notes.apply_to_optional(&mut self.notes);
        self.validate()
    }
}

/// Create request for a lead. New leads always start with status `New`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLead {
    pub name: String,
    pub contact_number: String,
    pub source: LeadSource,
    #[serde(default, alias = "property")]
    pub property_id: Option<PropertyId>,
    #[serde(default, alias = "room")]
    pub room_id: Option<RoomId>,
    #[serde(default)]
    pub reminder_date: Option<Timestamp>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl NewLead {
    pub fn new(
        name: impl Into<String>,
        contact_number: impl Into<String>,
        source: LeadSource,
    ) -> Self {
        Self {
            name: name.into(),
            contact_number: contact_number.into(),
            source,
            property_id: None,
            room_id: None,
            reminder_date: None,
            notes: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("name", &self.name)?;
        require_text("contactNumber", &self.contact_number)
    }
}

/// Partial update for a lead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadPatch {
    #[serde(default)]
    pub name: Patch<String>,
    #[serde(default)]
    pub contact_number: Patch<String>,
    #[serde(default)]
    pub source: Patch<LeadSource>,
    #[serde(default)]
    pub status: Patch<LeadStatus>,
    #[serde(default, alias = "property")]
    pub property_id: Patch<PropertyId>,
    #[serde(default, alias = "room")]
    pub room_id: Patch<RoomId>,
    #[serde(default)]
    pub reminder_date: Patch<Timestamp>,
    #[serde(default)]
    pub notes: Patch<String>,
}

impl LeadPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_keep()
            && self.contact_number.is_keep()
            && self.source.is_keep()
            && self.status.is_keep()
            && self.property_id.is_keep()
            && self.room_id.is_keep()
            && self.reminder_date.is_keep()
            && self.notes.is_keep()
    }
}

/// Lead projection with its property and room references resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadWithRefs {
    #[serde(flatten)]
    pub lead: Lead,
    pub property: Option<Property>,
    pub room: Option<Room>,
}

#[cfg(test)]
mod tests {
    use super::{Lead, LeadPatch, LeadSource, LeadStatus, NewLead};
    use crate::model::timestamp::Timestamp;
    use crate::model::validation::ValidationError;
    use uuid::Uuid;

    fn sample(status: LeadStatus, reminder_date: Option<Timestamp>) -> Lead {
        Lead {
            id: Uuid::new_v4(),
            name: "Alice".to_string(),
            contact_number: "555-1111".to_string(),
            source: LeadSource::WhatsApp,
            status,
            property_id: None,
            room_id: None,
            reminder_date,
            notes: None,
            created_at: Timestamp::from_millis(1).unwrap(),
            updated_at: Timestamp::from_millis(1).unwrap(),
        }
    }

    #[test]
    fn status_labels_roundtrip_and_reject_unknown() {
        for status in LeadStatus::ALL {
            assert_eq!(LeadStatus::from_label(status.label()), Ok(status));
        }
        assert!(matches!(
            LeadStatus::from_label("landed"),
            Err(ValidationError::UnknownLabel { field: "status", .. })
        ));
    }

    #[test]
    fn pending_reminder_excludes_landed_and_unset() {
        let due = Timestamp::from_millis(10);
        assert!(sample(LeadStatus::Hot, due).has_pending_reminder());
        assert!(!sample(LeadStatus::Landed, due).has_pending_reminder());
        assert!(!sample(LeadStatus::New, None).has_pending_reminder());
    }

    #[test]
    fn missing_source_fails_to_deserialize() {
        let result = serde_json::from_str::<NewLead>(r#"{"name":"Bob","contactNumber":"1"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn dates_travel_as_iso_strings() {
        let body = r#"{"name":"Alice","contactNumber":"555-1111","source":"WhatsApp","reminderDate":"2025-06-01T10:00:00.000Z"}"#;
        let new_lead: NewLead = serde_json::from_str(body).unwrap();
        assert_eq!(new_lead.reminder_date, Timestamp::from_millis(1_748_772_000_000));

        let json = serde_json::to_value(sample(LeadStatus::New, new_lead.reminder_date)).unwrap();
        assert_eq!(json["reminderDate"], "2025-06-01T10:00:00.000Z");
        assert_eq!(json["createdAt"], "1970-01-01T00:00:00.001Z");
    }

    #[test]
    fn any_status_is_reachable_by_patch() {
        let mut lead = sample(LeadStatus::Deny, None);
        let patch: LeadPatch = serde_json::from_str(r#"{"status":"New"}"#).unwrap();
        lead.apply_patch(patch).unwrap();
        assert_eq!(lead.status, LeadStatus::New);
    }
}
