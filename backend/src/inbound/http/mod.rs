//! HTTP inbound adapter exposing the REST endpoints.

pub mod auth;
pub mod error;
pub mod events;
pub mod health;
pub mod links;
pub mod lookups;
pub mod paging;
pub mod root;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

use crate::domain::LookupKind;
use crate::middleware::PermissionGate;
use self::links::EVENTS_SEGMENT;
use self::validation::{invalid_body_error, invalid_query_error};

fn scope_path(segment: &str) -> String {
    format!("/{segment}")
}

/// Register the API root, the three resource collections and the auth
/// endpoints. Resource scopes sit behind [`PermissionGate`]; the caller
/// provides the session middleware and [`state::HttpState`].
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        invalid_body_error(&err).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        invalid_query_error(&err).into()
    }))
    .app_data(
        web::PathConfig::default().error_handler(|_err, _req| error::resource_not_found().into()),
    )
    .service(root::api_root)
    .service(
        web::scope(&scope_path(EVENTS_SEGMENT))
            .wrap(PermissionGate)
            .service(events::list_events)
            .service(events::create_event)
            .service(events::get_event)
            .service(events::update_event)
            .service(events::delete_event),
    )
    .service(
        web::scope(&scope_path(LookupKind::Location.label()))
            .wrap(PermissionGate)
            .service(lookups::locations::list)
            .service(lookups::locations::create)
            .service(lookups::locations::detail)
            .service(lookups::locations::rename)
            .service(lookups::locations::remove),
    )
    .service(
        web::scope(&scope_path(LookupKind::Category.label()))
            .wrap(PermissionGate)
            .service(lookups::categories::list)
            .service(lookups::categories::create)
            .service(lookups::categories::detail)
            .service(lookups::categories::rename)
            .service(lookups::categories::remove),
    )
    .service(web::scope("/auth").service(auth::login).service(auth::logout));
}
