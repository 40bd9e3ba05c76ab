//! Room repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over `rooms`.
//! - Keep the owning property's `property_rooms` list in sync with room
//!   creation and deletion.
//!
//! # Invariants
//! - A room id is in `property_rooms` iff the room row exists.
//! - The list append is one `INSERT OR IGNORE ... SELECT` statement inside
//!   the same IMMEDIATE transaction as the room insert, so concurrent
//!   creations cannot lose entries and a retried append cannot duplicate one.
//! - Room delete pulls the list entry and deletes the row in one transaction.

use super::schema::{
    ensure_connection_ready, ensure_reference, parse_uuid, PROPERTIES_TABLE,
    PROPERTY_ROOMS_TABLE, ROOMS_TABLE,
};
use super::{EntityKind, RepoError, RepoResult};
use crate::model::property::PropertyId;
use crate::model::room::{NewRoom, Room, RoomId, RoomPatch, RoomStatus, RoomType};
use log::warn;
use rusqlite::types::Value;
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, Transaction, TransactionBehavior,
};
use uuid::Uuid;

const ROOM_SELECT_SQL: &str = "SELECT
    uuid,
    property_uuid,
    room_number,
    room_type,
    status,
    occupancy_end_date,
    rent,
    description,
    created_at,
    updated_at
FROM rooms";

/// Repository interface for room operations.
pub trait RoomRepository {
    /// Inserts a vacant room and appends it to its property's room list.
    fn create_room(&self, new_room: &NewRoom) -> RepoResult<Room>;
    fn get_room(&self, id: RoomId) -> RepoResult<Option<Room>>;
    /// Lists every room in creation order.
    fn list_rooms(&self) -> RepoResult<Vec<Room>>;
    /// Lists rooms owned by one property; unknown properties yield an empty list.
    fn list_rooms_by_property(&self, property_id: PropertyId) -> RepoResult<Vec<Room>>;
    /// Merges `patch` into the stored room in one transaction.
    fn update_room(&self, id: RoomId, patch: RoomPatch) -> RepoResult<Room>;
    /// Deletes the room and pulls it from its property's room list.
    fn delete_room(&self, id: RoomId) -> RepoResult<()>;
}

/// SQLite-backed room repository.
pub struct SqliteRoomRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRoomRepository<'conn> {
    /// Creates repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, &[PROPERTIES_TABLE, ROOMS_TABLE, PROPERTY_ROOMS_TABLE])?;
        Ok(Self { conn })
    }

    fn query_rooms(&self, filter_sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Room>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ROOM_SELECT_SQL} {filter_sql} ORDER BY created_at ASC, rowid ASC;"
        ))?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut rooms = Vec::new();
        while let Some(row) = rows.next()? {
            rooms.push(parse_room_row(row)?);
        }
        Ok(rooms)
    }
}

impl RoomRepository for SqliteRoomRepository<'_> {
    fn create_room(&self, new_room: &NewRoom) -> RepoResult<Room> {
        new_room.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        ensure_reference(&tx, EntityKind::Property, new_room.property_id)?;

        let id = Uuid::new_v4();
        let id_text = id.to_string();
        let property_text = new_room.property_id.to_string();
        tx.execute(
            "INSERT INTO rooms (
                uuid,
                property_uuid,
                room_number,
                room_type,
                status,
                rent,
                description
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                id_text.as_str(),
                property_text.as_str(),
                new_room.room_number.as_str(),
                room_type_to_db(new_room.room_type),
                room_status_to_db(RoomStatus::Vacant),
                new_room.rent,
                new_room.description.as_deref(),
            ],
        )?;
        tx.execute(
            "INSERT OR IGNORE INTO property_rooms (property_uuid, room_uuid, position)
             SELECT ?1, ?2, COALESCE(MAX(position), -1) + 1
             FROM property_rooms
             WHERE property_uuid = ?1;",
            params![property_text.as_str(), id_text.as_str()],
        )?;

        let room = load_room(&tx, id)?.ok_or(RepoError::not_found(EntityKind::Room, id))?;
        tx.commit()?;
        Ok(room)
    }

    fn get_room(&self, id: RoomId) -> RepoResult<Option<Room>> {
        load_room(self.conn, id)
    }

    fn list_rooms(&self) -> RepoResult<Vec<Room>> {
        self.query_rooms("", Vec::new())
    }

    fn list_rooms_by_property(&self, property_id: PropertyId) -> RepoResult<Vec<Room>> {
        self.query_rooms(
            "WHERE property_uuid = ?",
            vec![Value::Text(property_id.to_string())],
        )
    }

    fn update_room(&self, id: RoomId, patch: RoomPatch) -> RepoResult<Room> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut room = load_room(&tx, id)?.ok_or(RepoError::not_found(EntityKind::Room, id))?;
        if patch.is_empty() {
            return Ok(room);
        }

        room.apply_patch(patch)?;
        tx.execute(
            "UPDATE rooms
             SET
                room_number = ?2,
                room_type = ?3,
                status = ?4,
                occupancy_end_date = ?5,
                rent = ?6,
                description = ?7,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?1;",
            params![
                id.to_string(),
                room.room_number.as_str(),
                room_type_to_db(room.room_type),
                room_status_to_db(room.status),
                room.occupancy_end_date,
                room.rent,
                room.description.as_deref(),
            ],
        )?;

        let updated = load_room(&tx, id)?.ok_or(RepoError::not_found(EntityKind::Room, id))?;
        tx.commit()?;
        Ok(updated)
    }

    fn delete_room(&self, id: RoomId) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let id_text = id.to_string();

        let owner: Option<String> = tx
            .query_row(
                "SELECT property_uuid FROM rooms WHERE uuid = ?1;",
                [id_text.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        let Some(owner) = owner else {
            return Err(RepoError::not_found(EntityKind::Room, id));
        };

        let pulled = tx.execute(
            "DELETE FROM property_rooms WHERE property_uuid = ?1 AND room_uuid = ?2;",
            params![owner.as_str(), id_text.as_str()],
        )?;
        if pulled != 1 {
            warn!(
                "event=room_delete module=room_repo status=warn room_id={id} property_id={owner} list_entries_pulled={pulled}"
            );
        }

        tx.execute("DELETE FROM rooms WHERE uuid = ?1;", [id_text.as_str()])?;
        tx.commit()?;
        Ok(())
    }
}

pub(crate) fn load_room(conn: &Connection, id: RoomId) -> RepoResult<Option<Room>> {
    let mut stmt = conn.prepare(&format!("{ROOM_SELECT_SQL} WHERE uuid = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_room_row(row)?));
    }
    Ok(None)
}

fn parse_room_row(row: &Row<'_>) -> RepoResult<Room> {
    let uuid_text: String = row.get("uuid")?;
    let property_text: String = row.get("property_uuid")?;

    let type_text: String = row.get("room_type")?;
    let room_type = parse_room_type(&type_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid room type `{type_text}` in rooms.room_type"))
    })?;

    let status_text: String = row.get("status")?;
    let status = parse_room_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid room status `{status_text}` in rooms.status"))
    })?;

    let room = Room {
        id: parse_uuid(&uuid_text, "rooms.uuid")?,
        property_id: parse_uuid(&property_text, "rooms.property_uuid")?,
        room_number: row.get("room_number")?,
        room_type,
        status,
        occupancy_end_date: row.get("occupancy_end_date")?,
        rent: row.get("rent")?,
        description: row.get("description")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    room.validate()?;
    Ok(room)
}

pub(crate) fn room_type_to_db(room_type: RoomType) -> &'static str {
    match room_type {
        RoomType::PrivateBath => "private_bath",
        RoomType::SharedBath => "shared_bath",
        RoomType::Garage => "garage",
    }
}

pub(crate) fn parse_room_type(value: &str) -> Option<RoomType> {
    match value {
        "private_bath" => Some(RoomType::PrivateBath),
        "shared_bath" => Some(RoomType::SharedBath),
        "garage" => Some(RoomType::Garage),
        _ => None,
    }
}

fn room_status_to_db(status: RoomStatus) -> &'static str {
    match status {
        RoomStatus::Vacant => "vacant",
        RoomStatus::Occupied => "occupied",
    }
}

fn parse_room_status(value: &str) -> Option<RoomStatus> {
    match value {
        "vacant" => Some(RoomStatus::Vacant),
        "occupied" => Some(RoomStatus::Occupied),
        _ => None,
    }
}
