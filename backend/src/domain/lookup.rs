//! Locations and categories: named lookups that events refer to.
//!
//! Both kinds share one shape, so they are modelled once and distinguished
//! by [`LookupKind`].

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{EntityName, Event};

/// Which lookup collection an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    /// Where an event takes place.
    Location,
    /// What sort of event it is.
    Category,
}

impl LookupKind {
    /// Singular lowercase label used in messages and paths.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Location => "location",
            Self::Category => "category",
        }
    }
}

impl fmt::Display for LookupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Surrogate key of a stored location or category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupId(i64);

impl LookupId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for LookupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A stored location or category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lookup {
    /// Surrogate key.
    pub id: LookupId,
    /// Unique name within its kind.
    pub name: EntityName,
}

/// List-view projection: the related events collapsed to a count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupSummary {
    /// Surrogate key.
    pub id: LookupId,
    /// Unique name within its kind.
    pub name: EntityName,
    /// Number of events referring to this lookup, counted by the store.
    pub event_count: u64,
}

impl LookupSummary {
    /// Collapse a lookup and its event count into the list projection.
    pub fn summarize(lookup: Lookup, event_count: u64) -> Self {
        Self {
            id: lookup.id,
            name: lookup.name,
            event_count,
        }
    }
}

/// Detail-view projection carrying every related event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupDetail {
    /// The lookup itself.
    pub lookup: Lookup,
    /// Events referring to it, ordered by id.
    pub events: Vec<Event>,
}
