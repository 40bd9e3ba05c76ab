//! Property repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `properties` and read access to the ordered
//!   `property_rooms` back-reference list.
//! - Apply the property delete cascade in one transaction.
//!
//! # Invariants
//! - `Property::rooms` is read from `property_rooms` ordered by `position`.
//! - Deleting a property removes its rooms and list entries and clears lead
//!   references to either; the lead rows themselves survive.

use super::schema::{
    ensure_connection_ready, parse_uuid, LEADS_TABLE, PROPERTIES_TABLE, PROPERTY_ROOMS_TABLE,
    ROOMS_TABLE,
};
use super::{EntityKind, RepoError, RepoResult};
use crate::model::property::{NewProperty, Property, PropertyId, PropertyPatch};
use crate::model::room::RoomId;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use uuid::Uuid;

const PROPERTY_SELECT_SQL: &str = "SELECT
    uuid,
    name,
    address,
    description,
    created_at,
    updated_at
FROM properties";

/// Outcome of a property delete, for logging and callers that report it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropertyDeletion {
    /// Rooms removed together with the property.
    pub rooms_removed: usize,
    /// Leads whose property or room reference was cleared.
    pub leads_detached: usize,
}

/// Repository interface for property operations.
pub trait PropertyRepository {
    /// Inserts a property with an empty room list.
    fn create_property(&self, new_property: &NewProperty) -> RepoResult<Property>;
    fn get_property(&self, id: PropertyId) -> RepoResult<Option<Property>>;
    /// Lists all properties in creation order.
    fn list_properties(&self) -> RepoResult<Vec<Property>>;
    /// Merges `patch` into the stored property in one transaction.
    fn update_property(&self, id: PropertyId, patch: PropertyPatch) -> RepoResult<Property>;
    fn delete_property(&self, id: PropertyId) -> RepoResult<PropertyDeletion>;
}

/// SQLite-backed property repository.
pub struct SqlitePropertyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePropertyRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(
            conn,
            &[
                PROPERTIES_TABLE,
                ROOMS_TABLE,
                PROPERTY_ROOMS_TABLE,
                LEADS_TABLE,
            ],
        )?;
        Ok(Self { conn })
    }
}

impl PropertyRepository for SqlitePropertyRepository<'_> {
    fn create_property(&self, new_property: &NewProperty) -> RepoResult<Property> {
        new_property.validate()?;

        let id = Uuid::new_v4();
        self.conn.execute(
            "INSERT INTO properties (uuid, name, address, description)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                id.to_string(),
                new_property.name.as_str(),
                new_property.address.as_str(),
                new_property.description.as_deref(),
            ],
        )?;

        load_property(self.conn, id)?.ok_or(RepoError::not_found(EntityKind::Property, id))
    }

    fn get_property(&self, id: PropertyId) -> RepoResult<Option<Property>> {
        load_property(self.conn, id)
    }

    fn list_properties(&self) -> RepoResult<Vec<Property>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROPERTY_SELECT_SQL} ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut properties = Vec::new();
        while let Some(row) = rows.next()? {
            properties.push(parse_property_row(self.conn, row)?);
        }
        Ok(properties)
    }

    fn update_property(&self, id: PropertyId, patch: PropertyPatch) -> RepoResult<Property> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut property =
            load_property(&tx, id)?.ok_or(RepoError::not_found(EntityKind::Property, id))?;
        if patch.is_empty() {
            return Ok(property);
        }

        property.apply_patch(patch)?;
        tx.execute(
            "UPDATE properties
             SET
                name = ?2,
                address = ?3,
                description = ?4,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![
                id.to_string(),
                property.name.as_str(),
                property.address.as_str(),
                property.description.as_deref(),
            ],
        )?;

        let updated =
            load_property(&tx, id)?.ok_or(RepoError::not_found(EntityKind::Property, id))?;
        tx.commit()?;
        Ok(updated)
    }

    fn delete_property(&self, id: PropertyId) -> RepoResult<PropertyDeletion> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let id_text = id.to_string();

        let rooms_removed: i64 = tx.query_row(
            "SELECT COUNT(*) FROM rooms WHERE property_uuid = ?1;",
            [id_text.as_str()],
            |row| row.get(0),
        )?;
        let leads_detached: i64 = tx.query_row(
            "SELECT COUNT(*)
             FROM leads
             WHERE property_uuid = ?1
                OR room_uuid IN (SELECT uuid FROM rooms WHERE property_uuid = ?1);",
            [id_text.as_str()],
            |row| row.get(0),
        )?;

        // Foreign keys cascade to rooms and property_rooms and null out lead references.
        let changed = tx.execute("DELETE FROM properties WHERE uuid = ?1;", [id_text.as_str()])?;
        if changed == 0 {
            return Err(RepoError::not_found(EntityKind::Property, id));
        }

        tx.commit()?;
        Ok(PropertyDeletion {
            rooms_removed: count_to_usize(rooms_removed)?,
            leads_detached: count_to_usize(leads_detached)?,
        })
    }
}

pub(crate) fn load_property(conn: &Connection, id: PropertyId) -> RepoResult<Option<Property>> {
    let mut stmt = conn.prepare(&format!("{PROPERTY_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_property_row(conn, row)?));
    }
    Ok(None)
}

fn load_room_ids(conn: &Connection, property_uuid: &str) -> RepoResult<Vec<RoomId>> {
    let mut stmt = conn.prepare(
        "SELECT room_uuid
         FROM property_rooms
         WHERE property_uuid = ?1
         ORDER BY position ASC;",
    )?;
    let mut rows = stmt.query([property_uuid])?;
    let mut ids = Vec::new();
    while let Some(row) = rows.next()? {
        let value: String = row.get(0)?;
        ids.push(parse_uuid(&value, "property_rooms.room_uuid")?);
    }
    Ok(ids)
}

fn parse_property_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Property> {
    let uuid_text: String = row.get("uuid")?;
    let id = parse_uuid(&uuid_text, "properties.uuid")?;
    let rooms = load_room_ids(conn, &uuid_text)?;

    Ok(Property {
        id,
        name: row.get("name")?,
        address: row.get("address")?,
        description: row.get("description")?,
        rooms,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    })
}

fn count_to_usize(value: i64) -> RepoResult<usize> {
    usize::try_from(value).map_err(|_| RepoError::InvalidData(format!("invalid row count {value}")))
}
