//! Room use-case service.
//!
//! # Invariants
//! - Room create/delete keep the owning property's room list in sync; the
//!   repository performs both sides in one transaction.

use crate::model::property::{Property, PropertyId};
use crate::model::room::{NewRoom, Room, RoomId, RoomPatch, RoomWithProperty};
use crate::repo::property_repo::PropertyRepository;
use crate::repo::room_repo::RoomRepository;
use crate::repo::{EntityKind, RepoError, RepoResult};
use log::info;
use std::collections::HashMap;

/// Room service facade over room and property repositories.
pub struct RoomService<R: RoomRepository, P: PropertyRepository> {
    rooms: R,
    properties: P,
}

impl<R: RoomRepository, P: PropertyRepository> RoomService<R, P> {
    pub fn new(rooms: R, properties: P) -> Self {
        Self { rooms, properties }
    }

    /// Creates a vacant room and appends it to its property's room list.
    ///
    /// Fails with `ReferenceNotFound` when the property does not exist.
    pub fn create_room(&self, new_room: &NewRoom) -> RepoResult<Room> {
        let room = self.rooms.create_room(new_room)?;
        info!(
            "event=room_create module=room_service status=ok room_id={} property_id={}",
            room.id, room.property_id
        );
        Ok(room)
    }

    pub fn get_room(&self, id: RoomId) -> RepoResult<Room> {
        self.rooms.get_room(id)?.ok_or(RepoError::NotFound {
            entity: EntityKind::Room,
            id,
        })
    }

    /// Gets one room with its owning property resolved.
    pub fn get_room_with_property(&self, id: RoomId) -> RepoResult<RoomWithProperty> {
        let room = self.get_room(id)?;
        let property = self.properties.get_property(room.property_id)?;
        Ok(RoomWithProperty { room, property })
    }

    /// Lists every room with its owning property resolved.
    pub fn list_rooms(&self) -> RepoResult<Vec<RoomWithProperty>> {
        let rooms = self.rooms.list_rooms()?;
        let mut owners: HashMap<PropertyId, Option<Property>> = HashMap::new();
        let mut result = Vec::with_capacity(rooms.len());
        for room in rooms {
            let property = match owners.get(&room.property_id) {
                Some(cached) => cached.clone(),
                None => {
                    let loaded = self.properties.get_property(room.property_id)?;
                    owners.insert(room.property_id, loaded.clone());
                    loaded
                }
            };
            result.push(RoomWithProperty { room, property });
        }
        Ok(result)
    }

    pub fn list_rooms_by_property(&self, property_id: PropertyId) -> RepoResult<Vec<Room>> {
        self.rooms.list_rooms_by_property(property_id)
    }

    /// Merges a partial update; the owning property cannot change.
    pub fn update_room(&self, id: RoomId, patch: RoomPatch) -> RepoResult<Room> {
        let room = self.rooms.update_room(id, patch)?;
        info!(
            "event=room_update module=room_service status=ok room_id={id} room_status={}",
            room.status.label()
        );
        Ok(room)
    }

    /// Deletes a room and pulls it from its property's room list.
    pub fn delete_room(&self, id: RoomId) -> RepoResult<()> {
        self.rooms.delete_room(id)?;
        info!("event=room_delete module=room_service status=ok room_id={id}");
        Ok(())
    }
}
