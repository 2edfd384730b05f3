//! OpenAPI schema definitions for paginated envelopes.
//!
//! The `pagination` crate stays free of utoipa, so the concrete page shapes
//! returned by list endpoints are described here.

use utoipa::ToSchema;

use crate::inbound::http::events::EventListItem;
use crate::inbound::http::lookups::LookupListItem;

/// One page of reduced events.
#[derive(ToSchema)]
#[schema(as = EventPage)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct EventPageSchema {
    /// Number of events matching the filters.
    #[schema(example = 12)]
    count: u64,
    /// Absolute link to the next page.
    #[schema(example = "http://localhost:8080/event/?page=2")]
    next: Option<String>,
    /// Absolute link to the previous page.
    previous: Option<String>,
    results: Vec<EventListItem>,
}

/// One page of locations or categories.
#[derive(ToSchema)]
#[schema(as = LookupPage)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct LookupPageSchema {
    /// Number of entries.
    count: u64,
    /// Absolute link to the next page.
    next: Option<String>,
    /// Absolute link to the previous page.
    previous: Option<String>,
    results: Vec<LookupListItem>,
}
