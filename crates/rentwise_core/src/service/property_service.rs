//! Property use-case service.

use crate::model::property::{NewProperty, Property, PropertyId, PropertyPatch, PropertyWithRooms};
use crate::model::room::Room;
use crate::repo::property_repo::{PropertyDeletion, PropertyRepository};
use crate::repo::room_repo::RoomRepository;
use crate::repo::{EntityKind, RepoError, RepoResult};
use log::info;
use std::collections::HashMap;

/// Property service facade over property and room repositories.
pub struct PropertyService<P: PropertyRepository, R: RoomRepository> {
    properties: P,
    rooms: R,
}

impl<P: PropertyRepository, R: RoomRepository> PropertyService<P, R> {
    pub fn new(properties: P, rooms: R) -> Self {
        Self { properties, rooms }
    }

    /// Creates a property with an empty room list.
    pub fn create_property(&self, new_property: &NewProperty) -> RepoResult<Property> {
        let property = self.properties.create_property(new_property)?;
        info!(
            "event=property_create module=property_service status=ok property_id={}",
            property.id
        );
        Ok(property)
    }

    /// Gets one property with its room ids.
    pub fn get_property(&self, id: PropertyId) -> RepoResult<Property> {
        self.properties
            .get_property(id)?
            .ok_or(RepoError::NotFound {
                entity: EntityKind::Property,
                id,
            })
    }

    /// Lists all properties with their rooms resolved to full records.
    ///
    /// Rooms follow the order of each property's room list.
    pub fn list_properties(&self) -> RepoResult<Vec<PropertyWithRooms>> {
        let properties = self.properties.list_properties()?;
        let mut result = Vec::with_capacity(properties.len());
        for property in properties {
            let rooms = self.rooms.list_rooms_by_property(property.id)?;
            let rooms = order_rooms(&property, rooms);
            result.push(PropertyWithRooms::new(property, rooms));
        }
        Ok(result)
    }

    /// Merges a partial update. An empty patch returns the stored record unchanged.
    pub fn update_property(&self, id: PropertyId, patch: PropertyPatch) -> RepoResult<Property> {
        let property = self.properties.update_property(id, patch)?;
        info!("event=property_update module=property_service status=ok property_id={id}");
        Ok(property)
    }

    /// Deletes a property together with its rooms; referencing leads are detached.
    pub fn delete_property(&self, id: PropertyId) -> RepoResult<PropertyDeletion> {
        let deletion = self.properties.delete_property(id)?;
        info!(
            "event=property_delete module=property_service status=ok property_id={id} rooms_removed={} leads_detached={}",
            deletion.rooms_removed, deletion.leads_detached
        );
        Ok(deletion)
    }
}

fn order_rooms(property: &Property, rooms: Vec<Room>) -> Vec<Room> {
    let mut by_id: HashMap<_, _> = rooms.into_iter().map(|room| (room.id, room)).collect();
    property
        .rooms
        .iter()
        .filter_map(|room_id| by_id.remove(room_id))
        .collect()
}
