//! Driving port for session login.
//!
//! Handlers authenticate through this trait so tests can swap in a fixture
//! without wiring persistence.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, UserId};

/// Authentication use-case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and return the authenticated user id.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error>;
}

const FIXTURE_USERNAME: &str = "admin";
const FIXTURE_PASSWORD: &str = "password";
const FIXTURE_USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

/// Authenticator used when no database is configured.
///
/// Accepts `admin` / `password` and yields a fixed user id.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureLoginService;

#[async_trait]
impl LoginService for FixtureLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        if credentials.username() == FIXTURE_USERNAME && credentials.password() == FIXTURE_PASSWORD
        {
            UserId::new(FIXTURE_USER_ID)
                .map_err(|err| Error::internal(format!("invalid fixture user id: {err}")))
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}
