//! Lead use-case service.
//!
//! # Invariants
//! - List and detail reads resolve property and room references; dangling
//!   references resolve to `None` rather than failing the read.
//! - Status changes are unconstrained.

use crate::model::lead::{Lead, LeadId, LeadPatch, LeadStatus, LeadWithRefs, NewLead};
use crate::model::property::{Property, PropertyId};
use crate::model::room::{Room, RoomId};
use crate::repo::lead_repo::{LeadListQuery, LeadRepository};
use crate::repo::property_repo::PropertyRepository;
use crate::repo::room_repo::RoomRepository;
use crate::repo::{EntityKind, RepoError, RepoResult};
use log::info;
use std::collections::HashMap;

/// Lead service facade over lead, property and room repositories.
pub struct LeadService<L: LeadRepository, P: PropertyRepository, R: RoomRepository> {
    leads: L,
    properties: P,
    rooms: R,
}

impl<L: LeadRepository, P: PropertyRepository, R: RoomRepository> LeadService<L, P, R> {
    pub fn new(leads: L, properties: P, rooms: R) -> Self {
        Self {
            leads,
            properties,
            rooms,
        }
    }

    /// Creates a lead with status `New`.
    pub fn create_lead(&self, new_lead: &NewLead) -> RepoResult<Lead> {
        let lead = self.leads.create_lead(new_lead)?;
        info!(
            "event=lead_create module=lead_service status=ok lead_id={} has_reminder={}",
            lead.id,
            lead.reminder_date.is_some()
        );
        Ok(lead)
    }

    pub fn get_lead(&self, id: LeadId) -> RepoResult<Lead> {
        self.leads.get_lead(id)?.ok_or(RepoError::NotFound {
            entity: EntityKind::Lead,
            id,
        })
    }

    /// Gets one lead with property and room resolved.
    pub fn get_lead_with_refs(&self, id: LeadId) -> RepoResult<LeadWithRefs> {
        let lead = self.get_lead(id)?;
        let mut resolver = RefResolver::default();
        resolver.resolve(self, lead)
    }

    pub fn list_leads(&self) -> RepoResult<Vec<LeadWithRefs>> {
        self.list_with_refs(&LeadListQuery::default())
    }

    pub fn list_leads_by_property(
        &self,
        property_id: PropertyId,
    ) -> RepoResult<Vec<LeadWithRefs>> {
        self.list_with_refs(&LeadListQuery::by_property(property_id))
    }

    pub fn list_leads_by_status(&self, status: LeadStatus) -> RepoResult<Vec<LeadWithRefs>> {
        self.list_with_refs(&LeadListQuery::by_status(status))
    }

    /// Leads with a reminder set whose status is not `Landed`, soonest first.
    pub fn list_pending_reminders(&self) -> RepoResult<Vec<LeadWithRefs>> {
        self.list_with_refs(&LeadListQuery::pending_reminders())
    }

    /// Merges a partial update. Any status may follow any other.
    pub fn update_lead(&self, id: LeadId, patch: LeadPatch) -> RepoResult<Lead> {
        let lead = self.leads.update_lead(id, patch)?;
        info!(
            "event=lead_update module=lead_service status=ok lead_id={id} lead_status={}",
            lead.status.label()
        );
        Ok(lead)
    }

    pub fn delete_lead(&self, id: LeadId) -> RepoResult<()> {
        self.leads.delete_lead(id)?;
        info!("event=lead_delete module=lead_service status=ok lead_id={id}");
        Ok(())
    }

    fn list_with_refs(&self, query: &LeadListQuery) -> RepoResult<Vec<LeadWithRefs>> {
        let leads = self.leads.list_leads(query)?;
        let mut resolver = RefResolver::default();
        leads
            .into_iter()
            .map(|lead| resolver.resolve(self, lead))
            .collect()
    }
}

/// Per-call cache so a list touching the same property many times reads it once.
#[derive(Default)]
struct RefResolver {
    properties: HashMap<PropertyId, Option<Property>>,
    rooms: HashMap<RoomId, Option<Room>>,
}

impl RefResolver {
    fn resolve<L, P, R>(
        &mut self,
        service: &LeadService<L, P, R>,
        lead: Lead,
    ) -> RepoResult<LeadWithRefs>
    where
        L: LeadRepository,
        P: PropertyRepository,
        R: RoomRepository,
    {
        let property = match lead.property_id {
            Some(id) => self.property(&service.properties, id)?,
            None => None,
        };
        let room = match lead.room_id {
            Some(id) => self.room(&service.rooms, id)?,
            None => None,
        };
        Ok(LeadWithRefs {
            lead,
            property,
            room,
        })
    }

    fn property<P: PropertyRepository>(
        &mut self,
        repo: &P,
        id: PropertyId,
    ) -> RepoResult<Option<Property>> {
        if let Some(cached) = self.properties.get(&id) {
            return Ok(cached.clone());
        }
        let loaded = repo.get_property(id)?;
        self.properties.insert(id, loaded.clone());
        Ok(loaded)
    }

    fn room<R: RoomRepository>(&mut self, repo: &R, id: RoomId) -> RepoResult<Option<Room>> {
        if let Some(cached) = self.rooms.get(&id) {
            return Ok(cached.clone());
        }
        let loaded = repo.get_room(id)?;
        self.rooms.insert(id, loaded.clone());
        Ok(loaded)
    }
}
