//! Error translation shared by the Diesel repositories.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Store failure classified for port error construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum StoreFailure {
    /// The database could not be reached.
    Connection(String),
    /// A unique constraint rejected the write.
    UniqueViolation,
    /// Any other failure.
    Query(String),
}

/// Classify a pool checkout or build failure.
pub(crate) fn classify_pool_error(error: PoolError) -> StoreFailure {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            StoreFailure::Connection(message)
        }
    }
}

/// Classify a Diesel failure, logging its context at debug level.
pub(crate) fn classify_diesel_error(error: DieselError, operation: &str) -> StoreFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), %operation, "diesel operation failed");
        }
        other => debug!(error = %other, %operation, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            StoreFailure::UniqueViolation
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            StoreFailure::Connection("database connection closed".to_owned())
        }
        DieselError::NotFound => StoreFailure::Query(format!("{operation}: record not found")),
        _ => StoreFailure::Query(format!("{operation}: database error")),
    }
}

/// Convert a row count or id into the `u64` used by listings.
pub(crate) fn to_count(raw: i64) -> u64 {
    u64::try_from(raw).unwrap_or_default()
}

/// Convert a page window bound into the `i64` Diesel expects.
pub(crate) fn to_sql_bound(raw: u64) -> i64 {
    i64::try_from(raw).unwrap_or(i64::MAX)
}
