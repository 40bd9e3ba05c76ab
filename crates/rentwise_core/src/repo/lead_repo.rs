//! Lead repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD and filtered list APIs over `leads`.
//! - Verify property/room references inside the write transaction.
//!
//! # Invariants
//! - The pending-reminder filter is fixed: `reminder_date IS NOT NULL AND
//!   status != 'landed'`.
//! - Lead status is never constrained by room status or previous status.

use super::schema::{
    ensure_connection_ready, ensure_reference, parse_optional_uuid, parse_uuid, LEADS_TABLE,
    PROPERTIES_TABLE, ROOMS_TABLE,
};
use super::{EntityKind, RepoError, RepoResult};
use crate::model::lead::{Lead, LeadId, LeadPatch, LeadSource, LeadStatus, NewLead};
use crate::model::property::PropertyId;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const LEAD_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    contact_number,
    source,
    status,
    property_uuid,
    room_uuid,
    reminder_date,
    notes,
    created_at,
    updated_at
FROM leads";

/// Query options for listing leads. Filters combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeadListQuery {
    pub property_id: Option<PropertyId>,
    pub status: Option<LeadStatus>,
    /// Restricts to leads with a reminder set and status other than `Landed`,
    /// ordered by reminder date.
    pub pending_reminders_only: bool,
}

impl LeadListQuery {
    pub fn by_property(property_id: PropertyId) -> Self {
        Self {
            property_id: Some(property_id),
            ..Self::default()
        }
    }

    pub fn by_status(status: LeadStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn pending_reminders() -> Self {
        Self {
            pending_reminders_only: true,
            ..Self::default()
        }
    }
}

/// Repository interface for lead operations.
pub trait LeadRepository {
    /// Inserts a lead with status `New`.
    fn create_lead(&self, new_lead: &NewLead) -> RepoResult<Lead>;
    fn get_lead(&self, id: LeadId) -> RepoResult<Option<Lead>>;
    fn list_leads(&self, query: &LeadListQuery) -> RepoResult<Vec<Lead>>;
    /// Merges `patch` into the stored lead in one transaction.
    fn update_lead(&self, id: LeadId, patch: LeadPatch) -> RepoResult<Lead>;
    fn delete_lead(&self, id: LeadId) -> RepoResult<()>;
}

/// SQLite-backed lead repository.
pub struct SqliteLeadRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteLeadRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[PROPERTIES_TABLE, ROOMS_TABLE, LEADS_TABLE])?;
        Ok(Self { conn })
    }
}

impl LeadRepository for SqliteLeadRepository<'_> {
    fn create_lead(&self, new_lead: &NewLead) -> RepoResult<Lead> {
        new_lead.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_lead_references(&tx, new_lead.property_id, new_lead.room_id)?;

        let id = Uuid::new_v4();
        tx.execute(
            "INSERT INTO leads (
                uuid,
                name,
                contact_number,
                source,
                status,
                property_uuid,
                room_uuid,
                reminder_date,
                notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
            params![
                id.to_string(),
                new_lead.name.as_str(),
                new_lead.contact_number.as_str(),
                lead_source_to_db(new_lead.source),
                lead_status_to_db(LeadStatus::New),
                new_lead.property_id.map(|value| value.to_string()),
                new_lead.room_id.map(|value| value.to_string()),
                new_lead.reminder_date,
                new_lead.notes.as_deref(),
            ],
        )?;

        let lead = load_lead(&tx, id)?.ok_or(RepoError::not_found(EntityKind::Lead, id))?;
        tx.commit()?;
        Ok(lead)
    }

    fn get_lead(&self, id: LeadId) -> RepoResult<Option<Lead>> {
        load_lead(self.conn, id)
    }

    fn list_leads(&self, query: &LeadListQuery) -> RepoResult<Vec<Lead>> {
        let mut sql = format!("{LEAD_SELECT_SQL} WHERE 1 = 1");
        let mut bind_values: Vec<Value> = Vec::new();

        if let Some(property_id) = query.property_id {
            sql.push_str(" AND property_uuid = ?");
            bind_values.push(Value::Text(property_id.to_string()));
        }

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(lead_status_to_db(status).to_string()));
        }

        if query.pending_reminders_only {
            sql.push_str(" AND reminder_date IS NOT NULL AND status != 'landed'");
            sql.push_str(" ORDER BY reminder_date ASC, created_at ASC, rowid ASC");
        } else {
            sql.push_str(" ORDER BY created_at ASC, rowid ASC");
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut leads = Vec::new();
        while let Some(row) = rows.next()? {
            leads.push(parse_lead_row(row)?);
        }
        Ok(leads)
    }

    fn update_lead(&self, id: LeadId, patch: LeadPatch) -> RepoResult<Lead> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut lead = load_lead(&tx, id)?.ok_or(RepoError::not_found(EntityKind::Lead, id))?;
        if patch.is_empty() {
            return Ok(lead);
        }

        ensure_lead_references(
            &tx,
            patch.property_id.as_set().copied(),
            patch.room_id.as_set().copied(),
        )?;
        lead.apply_patch(patch)?;
        tx.execute(
            "UPDATE leads
             SET
                name = ?2,
                contact_number = ?3,
                source = ?4,
                status = ?5,
                property_uuid = ?6,
                room_uuid = ?7,
                reminder_date = ?8,
                notes = ?9,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![
                id.to_string(),
                lead.name.as_str(),
                lead.contact_number.as_str(),
                lead_source_to_db(lead.source),
                lead_status_to_db(lead.status),
                lead.property_id.map(|value| value.to_string()),
                lead.room_id.map(|value| value.to_string()),
                lead.reminder_date,
                lead.notes.as_deref(),
            ],
        )?;

        let updated = load_lead(&tx, id)?.ok_or(RepoError::not_found(EntityKind::Lead, id))?;
        tx.commit()?;
        Ok(updated)
    }

    fn delete_lead(&self, id: LeadId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM leads WHERE uuid = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Lead, id));
        }
        Ok(())
    }
}

fn ensure_lead_references(
    conn: &Connection,
    property_id: Option<PropertyId>,
    room_id: Option<Uuid>,
) -> RepoResult<()> {
    if let Some(property_id) = property_id {
        ensure_reference(conn, EntityKind::Property, property_id)?;
    }
    if let Some(room_id) = room_id {
        ensure_reference(conn, EntityKind::Room, room_id)?;
    }
    Ok(())
}

fn load_lead(conn: &Connection, id: LeadId) -> RepoResult<Option<Lead>> {
    let mut stmt = conn.prepare(&format!("{LEAD_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_lead_row(row)?));
    }
    Ok(None)
}

fn parse_lead_row(row: &Row<'_>) -> RepoResult<Lead> {
    let uuid_text: String = row.get("uuid")?;

    let source_text: String = row.get("source")?;
    let source = parse_lead_source(&source_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid lead source `{source_text}` in leads.source"))
    })?;

    let status_text: String = row.get("status")?;
    let status = parse_lead_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid lead status `{status_text}` in leads.status"))
    })?;

    Ok(Lead {
        id: parse_uuid(&uuid_text, "leads.uuid")?,
        name: row.get("name")?,
        contact_number: row.get("contact_number")?,
        source,
        status,
        property_id: parse_optional_uuid(row.get("property_uuid")?, "leads.property_uuid")?,
        room_id: parse_optional_uuid(row.get("room_uuid")?, "leads.room_uuid")?,
        reminder_date: row.get("reminder_date")?,
        notes: row.get("notes")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn lead_source_to_db(source: LeadSource) -> &'static str {
    match source {
        LeadSource::Roomies => "roomies",
        LeadSource::Facebook => "facebook",
        LeadSource::Roomster => "roomster",
        LeadSource::Telegram => "telegram",
        LeadSource::Sulekha => "sulekha",
        LeadSource::WhatsApp => "whatsapp",
        LeadSource::Others => "others",
    }
}

fn parse_lead_source(value: &str) -> Option<LeadSource> {
    match value {
        "roomies" => Some(LeadSource::Roomies),
        "facebook" => Some(LeadSource::Facebook),
        "roomster" => Some(LeadSource::Roomster),
        "telegram" => Some(LeadSource::Telegram),
        "sulekha" => Some(LeadSource::Sulekha),
        "whatsapp" => Some(LeadSource::WhatsApp),
        "others" => Some(LeadSource::Others),
        _ => None,
    }
}

pub(crate) fn lead_status_to_db(status: LeadStatus) -> &'static str {
    match status {
        LeadStatus::New => "new",
        LeadStatus::Hot => "hot",
        LeadStatus::Lease => "lease",
        LeadStatus::Landed => "landed",
        LeadStatus::Deny => "deny",
    }
}

pub(crate) fn parse_lead_status(value: &str) -> Option<LeadStatus> {
    match value {
        "new" => Some(LeadStatus::New),
        "hot" => Some(LeadStatus::Hot),
        "lease" => Some(LeadStatus::Lease),
        "landed" => Some(LeadStatus::Landed),
        "deny" => Some(LeadStatus::Deny),
        _ => None,
    }
}
