//! Shared helpers for the HTTP integration suites.
//!
//! Suites build the production route table over a fresh [`InMemoryStore`]
//! and drive it with `actix_web::test`.

use std::path::PathBuf;
use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::cookie::time::Duration;
use actix_web::cookie::{Cookie, Key, SameSite};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::Method;
use actix_web::{test, web};
use serde_json::{Value, json};

use events_backend::domain::ports::{EventRepository, FixtureLoginService};
use events_backend::inbound::http::session_config::{SESSION_COOKIE_NAME, SessionSettings};
use events_backend::inbound::http::state::{HttpState, HttpStatePorts};
use events_backend::outbound::memory::InMemoryStore;
use events_backend::seeding::load_seed_events;

/// Host every request is sent to; links in responses use it.
pub const HOST: &str = "events.test";

/// Build the full application: session, tracing and every API route.
macro_rules! events_app {
    ($state:expr, $session:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($state)
                .wrap($session.middleware())
                .wrap(events_backend::Trace)
                .configure(events_backend::inbound::http::configure_api),
        )
        .await
    };
}
pub(crate) use events_app;

pub fn session_settings() -> SessionSettings {
    SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
        same_site: SameSite::Lax,
        ttl: Duration::hours(1),
    }
}

pub fn state_for(store: &InMemoryStore, page_size: u32) -> web::Data<HttpState> {
    let shared = Arc::new(store.clone());
    web::Data::new(HttpState::with_page_size(
        HttpStatePorts {
            events: shared.clone(),
            lookups: shared,
            login: Arc::new(FixtureLoginService),
        },
        page_size,
    ))
}

/// Load the ten bundled example events into `store`.
pub async fn seed(store: &InMemoryStore) {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("seed-events.json");
    let drafts = load_seed_events(&path).expect("seed fixture loads");
    store.seed_if_empty(&drafts).await.expect("seeding succeeds");
}

/// Store holding the ten bundled example events.
pub async fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    seed(&store).await;
    store
}

pub fn request(method: Method, uri: &str) -> test::TestRequest {
    test::TestRequest::default()
        .method(method)
        .uri(uri)
        .insert_header(("host", HOST))
}

/// Absolute URL for `path` on [`HOST`].
pub fn url(path: &str) -> String {
    format!("http://{HOST}{path}")
}

/// Log in with the fixture account and return the session cookie.
pub async fn login<S, B>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = request(Method::POST, "/auth/login/")
        .set_json(json!({ "username": "admin", "password": "password" }))
        .to_request();
    let res = test::call_service(app, req).await;
    assert!(res.status().is_success(), "login failed: {}", res.status());
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .expect("session cookie")
        .into_owned()
}

/// Send a request and return the status with the JSON body (`Null` when empty).
pub async fn send<S, B>(app: &S, req: actix_http::Request) -> (u16, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let res = test::call_service(app, req).await;
    let status = res.status().as_u16();
    let body = test::read_body(res).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, json)
}
