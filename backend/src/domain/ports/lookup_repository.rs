//! Driven port for locations and categories.

use async_trait::async_trait;
use pagination::PageRequest;
use serde_json::json;

use super::define_port_error;
use crate::domain::{
    EntityName, Error, Listing, Lookup, LookupDetail, LookupId, LookupKind, LookupSummary,
};

define_port_error! {
    /// Errors raised by lookup persistence adapters.
    pub enum LookupRepositoryError {
        /// The store could not be reached.
        Connection { message: String } => "lookup store connection failed: {message}",
        /// A query or write failed.
        Query { message: String } => "lookup store query failed: {message}",
        /// Another lookup of the same kind already uses the name.
        DuplicateName { kind: LookupKind, name: String } => "a {kind} named '{name}' already exists",
    }
}

/// Persistence port shared by locations and categories.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LookupRepository: Send + Sync {
    /// Return a window of lookups ordered by id, each with its event count.
    async fn list(
        &self,
        kind: LookupKind,
        page: PageRequest,
    ) -> Result<Listing<LookupSummary>, LookupRepositoryError>;

    /// Fetch one lookup with all of its events.
    async fn find(
        &self,
        kind: LookupKind,
        id: LookupId,
    ) -> Result<Option<LookupDetail>, LookupRepositoryError>;

    /// Insert a new lookup; the name must be unused.
    async fn create(
        &self,
        kind: LookupKind,
        name: &EntityName,
    ) -> Result<Lookup, LookupRepositoryError>;

    /// Rename a lookup. Returns `None` for an unknown id.
    async fn rename(
        &self,
        kind: LookupKind,
        id: LookupId,
        name: &EntityName,
    ) -> Result<Option<Lookup>, LookupRepositoryError>;

    /// Delete a lookup and, through the store's cascade, its events.
    /// Returns `false` for an unknown id.
    async fn delete(&self, kind: LookupKind, id: LookupId) -> Result<bool, LookupRepositoryError>;
}

impl From<LookupRepositoryError> for Error {
    fn from(value: LookupRepositoryError) -> Self {
        match value {
            LookupRepositoryError::Connection { message } => Self::service_unavailable(message),
            LookupRepositoryError::Query { message } => Self::internal(message),
            LookupRepositoryError::DuplicateName { kind, name } => {
                Self::invalid_request(format!("a {kind} named '{name}' already exists"))
                    .with_details(json!({ "field": "name", "value": name, "code": "not_unique" }))
            }
        }
    }
}
