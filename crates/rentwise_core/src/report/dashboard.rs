//! Occupancy and lead-pipeline dashboard.
//!
//! # Responsibility
//! - Compute per-property occupancy and overall room totals in SQL.
//! - Count leads per status and pending reminders.
//!
//! # Invariants
//! - Every room type and lead status appears in the output, zero-filled.
//! - Pending reminders use the same predicate as the lead repository.

use crate::model::lead::LeadStatus;
use crate::model::property::PropertyId;
use crate::model::room::RoomType;
use crate::repo::lead_repo::parse_lead_status;
use crate::repo::room_repo::parse_room_type;
use crate::repo::schema::{
    ensure_connection_ready, parse_uuid, LEADS_TABLE, PROPERTIES_TABLE, ROOMS_TABLE,
};
use crate::repo::{RepoError, RepoResult};
use rusqlite::Connection;
use serde::Serialize;
use std::collections::HashMap;

/// Room count for one room type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTypeCount {
    #[serde(rename = "type")]
    pub room_type: RoomType,
    pub count: usize,
}

/// Occupied/vacant split over a set of rooms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomTotals {
    pub total: usize,
    pub occupied: usize,
    pub vacant: usize,
}

/// Occupancy of one property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyOccupancy {
    pub property_id: PropertyId,
    pub name: String,
    pub rooms: RoomTotals,
    pub rooms_by_type: Vec<RoomTypeCount>,
}

/// Lead count for one pipeline status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadStatusCount {
    pub status: LeadStatus,
    pub count: usize,
}

/// Full dashboard payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub properties: Vec<PropertyOccupancy>,
    pub rooms: RoomTotals,
    pub leads_by_status: Vec<LeadStatusCount>,
    pub pending_reminders: usize,
}

/// Builds the dashboard from the current store contents.
///
/// Properties appear in creation order, including those without rooms.
pub fn dashboard_summary(conn: &Connection) -> RepoResult<DashboardSummary> {
    ensure_connection_ready(conn, &[PROPERTIES_TABLE, ROOMS_TABLE, LEADS_TABLE])?;

    let properties = property_occupancy(conn)?;
    let rooms = properties
        .iter()
        .fold(RoomTotals::default(), |acc, entry| RoomTotals {
            total: acc.total + entry.rooms.total,
            occupied: acc.occupied + entry.rooms.occupied,
            vacant: acc.vacant + entry.rooms.vacant,
        });

    Ok(DashboardSummary {
        properties,
        rooms,
        leads_by_status: leads_by_status(conn)?,
        pending_reminders: pending_reminder_count(conn)?,
    })
}

fn property_occupancy(conn: &Connection) -> RepoResult<Vec<PropertyOccupancy>> {
    let mut stmt = conn.prepare(
        "SELECT
            p.uuid,
            p.name,
            COUNT(r.uuid) AS total,
            COALESCE(SUM(CASE WHEN r.status = 'occupied' THEN 1 ELSE 0 END), 0) AS occupied
         FROM properties p
         LEFT JOIN rooms r ON r.property_uuid = p.uuid
         GROUP BY p.uuid
         ORDER BY p.created_at ASC, p.rowid ASC;",
    )?;
    let mut rows = stmt.query([])?;
    let mut result = Vec::new();
    while let Some(row) = rows.next()? {
        let uuid_text: String = row.get(0)?;
        let total = to_count(row.get(2)?)?;
        let occupied = to_count(row.get(3)?)?;
        result.push(PropertyOccupancy {
            property_id: parse_uuid(&uuid_text, "properties.uuid")?,
            name: row.get(1)?,
            rooms: RoomTotals {
                total,
                occupied,
                vacant: total.saturating_sub(occupied),
            },
            rooms_by_type: Vec::new(),
        });
    }

    let type_counts = room_type_counts(conn)?;
    for entry in &mut result {
        entry.rooms_by_type = RoomType::ALL
            .into_iter()
            .map(|room_type| RoomTypeCount {
                room_type,
                count: type_counts
                    .get(&(entry.property_id, room_type))
                    .copied()
                    .unwrap_or(0),
            })
            .collect();
    }
    Ok(result)
}

fn room_type_counts(conn: &Connection) -> RepoResult<HashMap<(PropertyId, RoomType), usize>> {
    let mut stmt = conn.prepare(
        "SELECT property_uuid, room_type, COUNT(*)
         FROM rooms
         GROUP BY property_uuid, room_type;",
    )?;
    let mut rows = stmt.query([])?;
    let mut counts = HashMap::new();
    while let Some(row) = rows.next()? {
        let property_text: String = row.get(0)?;
        let type_text: String = row.get(1)?;
        let room_type = parse_room_type(&type_text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid room type `{type_text}` in rooms.room_type"))
        })?;
        counts.insert(
            (parse_uuid(&property_text, "rooms.property_uuid")?, room_type),
            to_count(row.get(2)?)?,
        );
    }
    Ok(counts)
}

fn leads_by_status(conn: &Connection) -> RepoResult<Vec<LeadStatusCount>> {
    let mut stmt = conn.prepare("SELECT status, COUNT(*) FROM leads GROUP BY status;")?;
    let mut rows = stmt.query([])?;
    let mut counts = HashMap::new();
    while let Some(row) = rows.next()? {
        let status_text: String = row.get(0)?;
        let status = parse_lead_status(&status_text).ok_or_else(|| {
            RepoError::InvalidData(format!("invalid lead status `{status_text}` in leads.status"))
        })?;
        counts.insert(status, to_count(row.get(1)?)?);
    }

    Ok(LeadStatus::ALL
        .into_iter()
        .map(|status| LeadStatusCount {
            status,
            count: counts.get(&status).copied().unwrap_or(0),
        })
        .collect())
}

fn pending_reminder_count(conn: &Connection) -> RepoResult<usize> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*)
         FROM leads
         WHERE reminder_date IS NOT NULL AND status != 'landed';",
        [],
        |row| row.get(0),
    )?;
    to_count(count)
}

fn to_count(value: i64) -> RepoResult<usize> {
    usize::try_from(value).map_err(|_| RepoError::InvalidData(format!("invalid row count {value}")))
}
