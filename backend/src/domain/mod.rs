//! Domain primitives, aggregates, and ports.
//!
//! Nothing here depends on Actix or Diesel. Inbound adapters translate
//! requests into these types and outbound adapters implement the ports.

pub mod auth;
pub mod error;
pub mod event;
pub mod listing;
pub mod lookup;
pub mod name;
pub mod ports;
pub mod query;
pub mod trace_id;
pub mod user;

pub use self::auth::{LoginCredentials, LoginValidationError};
pub use self::error::{Error, ErrorCode};
pub use self::event::{Event, EventDraft, EventId};
pub use self::listing::Listing;
pub use self::lookup::{Lookup, LookupDetail, LookupId, LookupKind, LookupSummary};
pub use self::name::{EntityName, EntityNameError};
pub use self::query::{EventOrdering, EventQuery, OrderField, OrderingParseError, SortDirection};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{UserId, UserIdError};
