//! Shared row decoding and connection readiness checks for repositories.

use super::{EntityKind, RepoError, RepoResult};
use crate::db::migrations::latest_version;
use crate::model::timestamp::Timestamp;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef};
use rusqlite::{Connection, OptionalExtension, ToSql};
use uuid::Uuid;

/// Required table and its columns.
pub(crate) type TableSpec = (&'static str, &'static [&'static str]);

pub(crate) const PROPERTIES_TABLE: TableSpec = (
    "properties",
    &[
        "uuid",
        "name",
        "address",
        "description",
        "created_at",
        "updated_at",
    ],
);

pub(crate) const ROOMS_TABLE: TableSpec = (
    "rooms",
    &[
        "uuid",
        "property_uuid",
        "room_number",
        "room_type",
        "status",
        "occupancy_end_date",
        "rent",
        "description",
        "created_at",
        "updated_at",
    ],
);

pub(crate) const PROPERTY_ROOMS_TABLE: TableSpec =
    ("property_rooms", &["property_uuid", "room_uuid", "position"]);

pub(crate) const LEADS_TABLE: TableSpec = (
    "leads",
    &[
        "uuid",
        "name",
        "contact_number",
        "source",
        "status",
        "property_uuid",
        "room_uuid",
        "reminder_date",
        "notes",
        "created_at",
        "updated_at",
    ],
);

/// Rejects connections that were not bootstrapped through `db::open_*`.
pub(crate) fn ensure_connection_ready(conn: &Connection, tables: &[TableSpec]) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    for &(table, columns) in tables {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }

    Ok(())
}

// Timestamp columns hold epoch milliseconds.
impl ToSql for Timestamp {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_millis()))
    }
}

impl FromSql for Timestamp {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let millis = i64::column_result(value)?;
        Timestamp::from_millis(millis).ok_or(FromSqlError::OutOfRange(millis))
    }
}

pub(crate) fn parse_uuid(value: &str, column: &'static str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid `{value}` in {column}")))
}

pub(crate) fn parse_optional_uuid(
    value: Option<String>,
    column: &'static str,
) -> RepoResult<Option<Uuid>> {
    value.map(|value| parse_uuid(&value, column)).transpose()
}

/// Returns whether a row with `uuid = id` exists in one of the entity tables.
pub(crate) fn record_exists(conn: &Connection, entity: EntityKind, id: Uuid) -> RepoResult<bool> {
    let sql = match entity {
        EntityKind::Property => "SELECT 1 FROM properties WHERE uuid = ?1;",
        EntityKind::Room => "SELECT 1 FROM rooms WHERE uuid = ?1;",
        EntityKind::Lead => "SELECT 1 FROM leads WHERE uuid = ?1;",
    };
    let found: Option<i64> = conn
        .query_row(sql, [id.to_string()], |row| row.get(0))
        .optional()?;
    Ok(found.is_some())
}

/// Fails with `ReferenceNotFound` when `id` does not name an existing record.
pub(crate) fn ensure_reference(conn: &Connection, entity: EntityKind, id: Uuid) -> RepoResult<()> {
    if record_exists(conn, entity, id)? {
        Ok(())
    } else {
        Err(RepoError::ReferenceNotFound { entity, id })
    }
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
