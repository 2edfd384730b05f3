//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every endpoint of the inbound HTTP layer together
//! with the session cookie security scheme. Swagger UI serves it in debug
//! builds and `openapi-dump` prints it for tooling.

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::auth::LoginRequest;
use crate::inbound::http::events::{EventBody, EventListItem, EventPayload};
use crate::inbound::http::lookups::{LookupBody, LookupListItem, LookupPayload};
use crate::inbound::http::root::ApiRoot;
use crate::inbound::http::schemas::{EventPageSchema, LookupPageSchema};
use crate::inbound::http::session_config::SESSION_COOKIE_NAME;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                SESSION_COOKIE_NAME,
                "Session cookie issued by POST /auth/login/.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Events API",
        description = "Browse events by location and category; authenticated users may create, edit and delete them."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::root::api_root,
        crate::inbound::http::events::list_events,
        crate::inbound::http::events::create_event,
        crate::inbound::http::events::get_event,
        crate::inbound::http::events::update_event,
        crate::inbound::http::events::delete_event,
        crate::inbound::http::lookups::locations::list,
        crate::inbound::http::lookups::locations::create,
        crate::inbound::http::lookups::locations::detail,
        crate::inbound::http::lookups::locations::rename,
        crate::inbound::http::lookups::locations::remove,
        crate::inbound::http::lookups::categories::list,
        crate::inbound::http::lookups::categories::create,
        crate::inbound::http::lookups::categories::detail,
        crate::inbound::http::lookups::categories::rename,
        crate::inbound::http::lookups::categories::remove,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ApiRoot,
        EventBody,
        EventListItem,
        EventPayload,
        EventPageSchema,
        LookupBody,
        LookupListItem,
        LookupPayload,
        LookupPageSchema,
        LoginRequest,
        Error,
        ErrorCode
    )),
    tags(
        (name = "root", description = "Link map of the API"),
        (name = "events", description = "Events with their location and category"),
        (name = "locations", description = "Locations and the events held there"),
        (name = "categories", description = "Categories and their events"),
        (name = "auth", description = "Session login and logout"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
