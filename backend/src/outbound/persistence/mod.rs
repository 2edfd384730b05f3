//! PostgreSQL persistence adapters using Diesel.
//!
//! Repositories translate between Diesel rows and domain types and map every
//! database error onto the matching port error. Row structs and the schema
//! stay private to this module.
//!
//! # Example
//!
//! ```ignore
//! use events_backend::outbound::persistence::{DbPool, DieselEventRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/events")).await?;
//! let events = DieselEventRepository::new(pool);
//! ```

mod diesel_event_repository;
pub(crate) mod diesel_helpers;
mod diesel_login_service;
mod diesel_lookup_repository;
mod lookup_resolution;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_event_repository::DieselEventRepository;
pub use diesel_login_service::{
    DieselLoginService, PasswordHashError, hash_password, verify_password,
};
pub use diesel_lookup_repository::DieselLookupRepository;
pub use migrations::{MigrationError, apply_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
