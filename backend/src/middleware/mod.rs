//! Request middleware.
//!
//! Request lifecycle concerns: tracing and write authorisation.

pub mod permission;
pub mod trace;

pub use permission::PermissionGate;
pub use trace::Trace;
