//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};

use crate::inbound::http::session_config::SessionSettings;

/// Session settings for plain-HTTP tests: fresh key, no `Secure` flag.
pub fn test_session_settings() -> SessionSettings {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
        ttl: Duration::hours(1),
    }
}

/// Session middleware built the same way as in production.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    test_session_settings().middleware()
}
