//! Internal Diesel row structs.
//!
//! These never leave the persistence layer; repositories convert them into
//! domain types before returning.

use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{events, users};
use crate::domain::{EntityName, EntityNameError, Event, EventId};

/// Event joined with its location and category names.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct EventWithNamesRow {
    pub id: i64,
    pub name: String,
    pub location: String,
    pub category: String,
}

impl EventWithNamesRow {
    /// Convert into the domain event, rejecting blank names stored out of band.
    pub(crate) fn into_domain(self) -> Result<Event, String> {
        let id = self.id;
        let invalid = |err: EntityNameError| format!("event {id}: {err}");
        let name = EntityName::new(self.name).map_err(invalid)?;
        let location = EntityName::new(self.location).map_err(invalid)?;
        let category = EntityName::new(self.category).map_err(invalid)?;
        Ok(Event {
            id: EventId::new(id),
            name,
            location,
            category,
        })
    }
}

/// Insertable and changeset form of an event.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = events)]
pub(crate) struct EventValues<'a> {
    pub name: &'a str,
    pub location_id: i64,
    pub category_id: i64,
}

/// Row struct for reading accounts.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub password_hash: String,
}

/// Insertable account.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub password_hash: &'a str,
}
