//! HTTP server configuration object.

use events_backend::inbound::http::session_config::SessionSettings;
use events_backend::outbound::persistence::DbPool;
use std::net::SocketAddr;

/// Everything the server needs besides the port implementations.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) page_size: u32,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, page_size: u32) -> Self {
        Self {
            session,
            bind_addr,
            page_size,
            db_pool: None,
        }
    }

    /// Attach a database pool; without one the in-memory store is used.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}
