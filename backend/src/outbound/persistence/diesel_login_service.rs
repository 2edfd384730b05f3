//! Diesel-backed `LoginService` checking argon2 hashes stored in `users`.
//!
//! Hashing and verification are CPU bound, so both run on the blocking pool.

use argon2::password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng};
use argon2::{Argon2, PasswordHash};
use async_trait::async_trait;
use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use tracing::{debug, warn};
use uuid::Uuid;

use super::diesel_helpers::{StoreFailure, classify_diesel_error, classify_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;
use crate::domain::ports::LoginService;
use crate::domain::{Error, LoginCredentials, UserId};

/// Errors raised while hashing a password.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// argon2 rejected the input or parameters.
    #[error("failed to hash password: {message}")]
    Hash { message: String },
    /// The blocking hashing task panicked or was cancelled.
    #[error("password hashing task failed: {message}")]
    Task { message: String },
}

/// Hash `password` with argon2 and a fresh random salt, returning the PHC
/// string stored in `users.password_hash`.
///
/// # Errors
/// Returns [`PasswordHashError`] when hashing fails.
pub async fn hash_password(password: String) -> Result<String, PasswordHashError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHashError::Hash {
                message: err.to_string(),
            })
    })
    .await
    .map_err(|err| PasswordHashError::Task {
        message: err.to_string(),
    })?
}

/// Check `password` against a stored PHC hash. Malformed hashes never match.
pub async fn verify_password(password: String, stored_hash: String) -> bool {
    let outcome = tokio::task::spawn_blocking(move || {
        let Ok(parsed) = PasswordHash::new(&stored_hash) else {
            warn!("stored password hash is malformed");
            return false;
        };
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
    .await;
    outcome.unwrap_or_else(|err| {
        warn!(error = %err, "password verification task failed");
        false
    })
}

fn store_error(failure: StoreFailure) -> Error {
    match failure {
        StoreFailure::Connection(message) => Error::service_unavailable(message),
        StoreFailure::UniqueViolation => Error::internal("user account write conflicted"),
        StoreFailure::Query(message) => Error::internal(message),
    }
}

fn pool_error(error: PoolError) -> Error {
    store_error(classify_pool_error(error))
}

/// Authenticates against accounts stored in PostgreSQL.
#[derive(Clone)]
pub struct DieselLoginService {
    pool: DbPool,
}

impl DieselLoginService {
    /// Create a service backed by `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Create or replace the account named `username`, keeping its id when
    /// it already exists.
    ///
    /// # Errors
    /// Returns an internal error when hashing fails and maps store failures
    /// the same way the repositories do.
    pub async fn upsert_account(&self, username: &str, password: String) -> Result<UserId, Error> {
        let password_hash = hash_password(password)
            .await
            .map_err(|err| Error::internal(err.to_string()))?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let id: Uuid = diesel::insert_into(users::table)
            .values(&NewUserRow {
                id: Uuid::new_v4(),
                username,
                password_hash: &password_hash,
            })
            .on_conflict(users::username)
            .do_update()
            .set(users::password_hash.eq(excluded(users::password_hash)))
            .returning(users::id)
            .get_result(&mut conn)
            .await
            .map_err(|err| store_error(classify_diesel_error(err, "upsert user")))?;
        Ok(UserId::from(id))
    }
}

#[async_trait]
impl LoginService for DieselLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::username.eq(credentials.username()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| store_error(classify_diesel_error(err, "load user")))?;

        let Some(row) = row else {
            debug!("login for unknown username");
            return Err(Error::unauthorized("invalid credentials"));
        };

        if verify_password(credentials.password().to_owned(), row.password_hash).await {
            Ok(UserId::from(row.id))
        } else {
            Err(Error::unauthorized("invalid credentials"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn hashed_password_verifies() {
        let hash = hash_password("correct horse".to_owned())
            .await
            .expect("hash password");
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("correct horse".to_owned(), hash).await);
    }

    #[rstest]
    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let hash = hash_password("correct horse".to_owned())
            .await
            .expect("hash password");
        assert!(!verify_password("battery staple".to_owned(), hash).await);
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_hash_never_matches() {
        assert!(!verify_password("anything".to_owned(), "not-a-phc-string".to_owned()).await);
    }

    #[rstest]
    #[case(StoreFailure::Connection("down".to_owned()), crate::domain::ErrorCode::ServiceUnavailable)]
    #[case(StoreFailure::Query("boom".to_owned()), crate::domain::ErrorCode::InternalError)]
    fn store_failures_map_to_domain_codes(
        #[case] failure: StoreFailure,
        #[case] expected: crate::domain::ErrorCode,
    ) {
        assert_eq!(store_error(failure).code(), expected);
    }
}
