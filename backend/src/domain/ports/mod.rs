//! Domain ports: the traits adapters implement and handlers call.

mod macros;

pub(crate) use macros::define_port_error;

mod event_repository;
mod login_service;
mod lookup_repository;

#[cfg(test)]
pub use event_repository::MockEventRepository;
pub use event_repository::{EventRepository, EventRepositoryError, SeedingResult};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{FixtureLoginService, LoginService};
#[cfg(test)]
pub use lookup_repository::MockLookupRepository;
pub use lookup_repository::{LookupRepository, LookupRepositoryError};
