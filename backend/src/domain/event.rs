//! Event aggregate and its write model.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::EntityName;

/// Surrogate key of a stored event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(i64);

impl EventId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A stored event with its related names resolved.
///
/// Every event refers to exactly one location and one category; they are
/// carried by name because names are the natural key clients use.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Surrogate key.
    pub id: EventId,
    /// Unique event name.
    pub name: EntityName,
    /// Name of the location hosting the event.
    pub location: EntityName,
    /// Name of the category the event belongs to.
    pub category: EntityName,
}

/// Values required to create or replace an event.
///
/// Location and category are resolved by name and created when missing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventDraft {
    /// Unique event name.
    pub name: EntityName,
    /// Location name to resolve or create.
    pub location: EntityName,
    /// Category name to resolve or create.
    pub category: EntityName,
}

impl EventDraft {
    /// Bundle validated names into a draft.
    pub fn new(name: EntityName, location: EntityName, category: EntityName) -> Self {
        Self {
            name,
            location,
            category,
        }
    }

    /// Materialise the draft as a stored event with the given id.
    pub fn into_event(self, id: EventId) -> Event {
        Event {
            id,
            name: self.name,
            location: self.location,
            category: self.category,
        }
    }
}
