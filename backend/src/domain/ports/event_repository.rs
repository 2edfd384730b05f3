//! Driven port for event persistence.
//!
//! Writes resolve location and category by name, creating them when absent,
//! inside the same atomic operation as the event write.

use async_trait::async_trait;
use pagination::PageRequest;
use serde_json::json;

use super::define_port_error;
use crate::domain::{Error, Event, EventDraft, EventId, EventQuery, Listing};

define_port_error! {
    /// Errors raised by event persistence adapters.
    pub enum EventRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "event store connection failed: {message}",
        /// A query or write failed.
        Query { message: String } => "event store query failed: {message}",
        /// Another event already uses the name.
        DuplicateName { name: String } => "an event named '{name}' already exists",
    }
}

/// Outcome of the one-time seeding step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedingResult {
    /// Events were inserted into an empty store.
    Applied {
        /// Number of events inserted.
        inserted: usize,
    },
    /// The store already held events; nothing changed.
    AlreadySeeded,
}

/// Persistence port for events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Return the window of events selected by `query` and `page`, plus the
    /// number of events matching the filters.
    async fn list(
        &self,
        query: &EventQuery,
        page: PageRequest,
    ) -> Result<Listing<Event>, EventRepositoryError>;

    /// Fetch one event.
    async fn find(&self, id: EventId) -> Result<Option<Event>, EventRepositoryError>;

    /// Insert an event, creating its location and category when missing.
    async fn create(&self, draft: &EventDraft) -> Result<Event, EventRepositoryError>;

    /// Replace every field of an event. Returns `None` for an unknown id.
    async fn update(
        &self,
        id: EventId,
        draft: &EventDraft,
    ) -> Result<Option<Event>, EventRepositoryError>;

    /// Delete an event. Returns `false` for an unknown id.
    async fn delete(&self, id: EventId) -> Result<bool, EventRepositoryError>;

    /// Insert `drafts` only when no event exists yet.
    async fn seed_if_empty(
        &self,
        drafts: &[EventDraft],
    ) -> Result<SeedingResult, EventRepositoryError>;
}

impl From<EventRepositoryError> for Error {
    fn from(value: EventRepositoryError) -> Self {
        match value {
            EventRepositoryError::Connection { message } => Self::service_unavailable(message),
            EventRepositoryError::Query { message } => Self::internal(message),
            EventRepositoryError::DuplicateName { name } => {
                Self::invalid_request(format!("an event named '{name}' already exists"))
                    .with_details(json!({ "field": "name", "value": name, "code": "not_unique" }))
            }
        }
    }
}
