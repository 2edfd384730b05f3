//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on domain ports and remain testable without I/O.

use std::sync::Arc;

use pagination::DEFAULT_PAGE_SIZE;

use crate::domain::ports::{EventRepository, LoginService, LookupRepository};

/// Parameter object bundling the port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub events: Arc<dyn EventRepository>,
    pub lookups: Arc<dyn LookupRepository>,
    pub login: Arc<dyn LoginService>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub events: Arc<dyn EventRepository>,
    pub lookups: Arc<dyn LookupRepository>,
    pub login: Arc<dyn LoginService>,
    /// Items per page on every list endpoint.
    pub page_size: u32,
}

impl HttpState {
    /// Construct state with the default page size.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use events_backend::domain::ports::FixtureLoginService;
    /// use events_backend::inbound::http::state::{HttpState, HttpStatePorts};
    /// use events_backend::outbound::memory::InMemoryStore;
    ///
    /// let store = Arc::new(InMemoryStore::new());
    /// let state = HttpState::new(HttpStatePorts {
    ///     events: store.clone(),
    ///     lookups: store,
    ///     login: Arc::new(FixtureLoginService),
    /// });
    /// assert_eq!(state.page_size, 10);
    /// ```
    pub fn new(ports: HttpStatePorts) -> Self {
        Self::with_page_size(ports, DEFAULT_PAGE_SIZE)
    }

    /// Construct state with an explicit page size.
    pub fn with_page_size(ports: HttpStatePorts, page_size: u32) -> Self {
        let HttpStatePorts {
            events,
            lookups,
            login,
        } = ports;
        Self {
            events,
            lookups,
            login,
            page_size,
        }
    }
}
