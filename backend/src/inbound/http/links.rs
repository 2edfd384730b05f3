//! Absolute hyperlinks for resources and collections.
//!
//! Links are built from the scheme and host the client used, so they stay
//! valid behind proxies that set `Forwarded` or `X-Forwarded-*` headers.

use actix_web::HttpRequest;
use url::Url;

use crate::domain::{Error, EventId, LookupId, LookupKind};

pub(crate) const EVENTS_SEGMENT: &str = "event";

/// Link builder bound to the origin of one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Links {
    origin: String,
}

impl Links {
    /// Capture the origin (`scheme://host`) of `req`.
    pub fn from_request(req: &HttpRequest) -> Self {
        let info = req.connection_info();
        Self::with_origin(format!("{}://{}", info.scheme(), info.host()))
    }

    /// Build links for an explicit origin.
    pub fn with_origin(origin: impl Into<String>) -> Self {
        let mut origin = origin.into();
        while origin.ends_with('/') {
            origin.pop();
        }
        Self { origin }
    }

    /// Collection URL such as `http://host/event/`.
    pub fn collection(&self, segment: &str) -> String {
        format!("{}/{segment}/", self.origin)
    }

    /// Detail URL of an event.
    pub fn event(&self, id: EventId) -> String {
        format!("{}/{EVENTS_SEGMENT}/{id}/", self.origin)
    }

    /// Detail URL of a location or category.
    pub fn lookup(&self, kind: LookupKind, id: LookupId) -> String {
        format!("{}/{}/{id}/", self.origin, kind.label())
    }

    /// Absolute URL of the current request, query string included; the base
    /// for pagination links.
    pub fn current(&self, req: &HttpRequest) -> Result<Url, Error> {
        let path = req
            .uri()
            .path_and_query()
            .map_or("/", |path_and_query| path_and_query.as_str());
        Url::parse(&format!("{}{path}", self.origin))
            .map_err(|err| Error::internal(format!("failed to build request url: {err}")))
    }
}
