//! Cookie-session settings read from the environment.
//!
//! | Variable                         | Debug default | Release          |
//! |----------------------------------|---------------|------------------|
//! | `EVENTS_SESSION_KEY_FILE`        | temp key      | required, 64 B+  |
//! | `EVENTS_SESSION_COOKIE_SECURE`   | `true`        | required         |
//! | `EVENTS_SESSION_SAMESITE`        | `Lax`         | required         |
//! | `EVENTS_SESSION_ALLOW_EPHEMERAL` | `false`       | must be false    |
//! | `EVENTS_SESSION_TTL_HOURS`       | `2`           | optional         |
//!
//! Debug builds log a warning and fall back for missing or malformed
//! values; release builds refuse to start.

pub mod fingerprint;
mod parsing;

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use std::path::PathBuf;
use tracing::{info, warn};
use zeroize::Zeroize;

use self::parsing::{flag, same_site, ttl_hours};

pub const KEY_FILE_ENV: &str = "EVENTS_SESSION_KEY_FILE";
pub const COOKIE_SECURE_ENV: &str = "EVENTS_SESSION_COOKIE_SECURE";
pub const SAMESITE_ENV: &str = "EVENTS_SESSION_SAMESITE";
pub const ALLOW_EPHEMERAL_ENV: &str = "EVENTS_SESSION_ALLOW_EPHEMERAL";
pub const TTL_HOURS_ENV: &str = "EVENTS_SESSION_TTL_HOURS";

/// Name of the session cookie.
pub const SESSION_COOKIE_NAME: &str = "session";

const SESSION_KEY_DEFAULT_PATH: &str = "/var/run/secrets/events_session_key";
const SESSION_KEY_MIN_LEN: usize = 64;
const DEFAULT_TTL_HOURS: i64 = 2;

/// Build mode for session configuration validation.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BuildMode {
    /// Tolerate defaults and warn.
    Debug,
    /// Require explicit, valid settings.
    Release,
}

impl BuildMode {
    /// Determine the build mode from `cfg!(debug_assertions)`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use events_backend::inbound::http::session_config::BuildMode;
    ///
    /// let mode = BuildMode::from_debug_assertions();
    /// assert_eq!(mode == BuildMode::Debug, cfg!(debug_assertions));
    /// ```
    #[must_use]
    pub fn from_debug_assertions() -> Self {
        if cfg!(debug_assertions) {
            Self::Debug
        } else {
            Self::Release
        }
    }

    fn is_debug(self) -> bool {
        matches!(self, Self::Debug)
    }
}

/// Validated cookie-session settings.
#[derive(Clone)]
pub struct SessionSettings {
    /// Signing and encryption key.
    pub key: Key,
    /// Whether session cookies are marked `Secure`.
    pub cookie_secure: bool,
    pub same_site: SameSite,
    /// Lifetime of a session cookie.
    pub ttl: Duration,
}

impl SessionSettings {
    /// Short, non-reversible identifier of the active key for logs.
    pub fn fingerprint(&self) -> String {
        fingerprint::key_fingerprint(&self.key)
    }

    /// Build the cookie-session middleware that carries the login.
    pub fn middleware(&self) -> SessionMiddleware<CookieSessionStore> {
        SessionMiddleware::builder(CookieSessionStore::default(), self.key.clone())
            .cookie_name(SESSION_COOKIE_NAME.to_owned())
            .cookie_path("/".to_owned())
            .cookie_secure(self.cookie_secure)
            .cookie_http_only(true)
            .cookie_content_security(CookieContentSecurity::Private)
            .cookie_same_site(self.same_site)
            .session_lifecycle(PersistentSession::default().session_ttl(self.ttl))
            .build()
    }
}

/// Errors raised while validating session configuration.
#[derive(thiserror::Error, Debug)]
pub enum SessionConfigError {
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    #[error("failed to read session key at {path}: {source}")]
    KeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("session key at {path} too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort {
        path: PathBuf,
        length: usize,
        min_len: usize,
    },
    /// `SameSite=None` requires a secure cookie in release builds.
    #[error("EVENTS_SESSION_SAMESITE=None requires EVENTS_SESSION_COOKIE_SECURE=1")]
    InsecureSameSiteNone,
    #[error("EVENTS_SESSION_ALLOW_EPHEMERAL must be 0 in release builds")]
    EphemeralNotAllowed,
}

/// Build session settings from environment variables and build mode.
///
/// # Examples
///
/// ```rust
/// use events_backend::inbound::http::session_config::{
///     session_settings_from_env, BuildMode,
/// };
/// use mockable::MockEnv;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let key_path = std::env::temp_dir().join("events_session_key_example");
/// std::fs::write(&key_path, vec![b'a'; 64])?;
///
/// let key_path = key_path.to_string_lossy().into_owned();
/// let mut env = MockEnv::new();
/// env.expect_string().returning(move |name| match name {
///     "EVENTS_SESSION_KEY_FILE" => Some(key_path.clone()),
///     "EVENTS_SESSION_COOKIE_SECURE" => Some("1".to_owned()),
///     "EVENTS_SESSION_SAMESITE" => Some("Strict".to_owned()),
///     "EVENTS_SESSION_ALLOW_EPHEMERAL" => Some("0".to_owned()),
///     _ => None,
/// });
///
/// let settings = session_settings_from_env(&env, BuildMode::Release)?;
/// assert!(settings.cookie_secure);
/// # Ok(())
/// # }
/// ```
pub fn session_settings_from_env<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<SessionSettings, SessionConfigError> {
    let cookie_secure = flag(env, COOKIE_SECURE_ENV, mode, true)?;
    let same_site = same_site(env, mode, cookie_secure)?;
    let allow_ephemeral = flag(env, ALLOW_EPHEMERAL_ENV, mode, false)?;
    if allow_ephemeral && !mode.is_debug() {
        return Err(SessionConfigError::EphemeralNotAllowed);
    }
    let ttl = Duration::hours(ttl_hours(env, mode, DEFAULT_TTL_HOURS)?);
    let key = session_key(env, mode, allow_ephemeral)?;

    let settings = SessionSettings {
        key,
        cookie_secure,
        same_site,
        ttl,
    };
    info!(
        fingerprint = %settings.fingerprint(),
        cookie_secure,
        ttl_hours = ttl.whole_hours(),
        "session settings loaded"
    );
    Ok(settings)
}

fn session_key<E: Env>(
    env: &E,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    let path = PathBuf::from(
        env.string(KEY_FILE_ENV)
            .unwrap_or_else(|| SESSION_KEY_DEFAULT_PATH.to_owned()),
    );

    match std::fs::read(&path) {
        Ok(mut bytes) => {
            let length = bytes.len();
            if mode == BuildMode::Release && length < SESSION_KEY_MIN_LEN {
                bytes.zeroize();
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len: SESSION_KEY_MIN_LEN,
                });
            }
            let key = Key::derive_from(&bytes);
            bytes.zeroize();
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}
