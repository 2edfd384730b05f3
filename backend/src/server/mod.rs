//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use events_backend::Trace;
#[cfg(debug_assertions)]
use events_backend::doc::ApiDoc;
use events_backend::domain::ports::FixtureLoginService;
use events_backend::inbound::http::configure_api;
use events_backend::inbound::http::health::{HealthState, live, ready};
use events_backend::inbound::http::session_config::SessionSettings;
use events_backend::inbound::http::state::{HttpState, HttpStatePorts};
use events_backend::outbound::memory::InMemoryStore;
use events_backend::outbound::persistence::{
    DieselEventRepository, DieselLoginService, DieselLookupRepository,
};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Pick Diesel adapters when a pool is configured, the in-memory store and
/// fixture login otherwise.
pub fn build_ports(config: &ServerConfig) -> HttpStatePorts {
    match &config.db_pool {
        Some(pool) => {
            info!(store = "postgres", "using Diesel adapters");
            HttpStatePorts {
                events: Arc::new(DieselEventRepository::new(pool.clone())),
                lookups: Arc::new(DieselLookupRepository::new(pool.clone())),
                login: Arc::new(DieselLoginService::new(pool.clone())),
            }
        }
        None => {
            info!(store = "memory", "DATABASE_URL not set; using in-memory store");
            let store = Arc::new(InMemoryStore::new());
            HttpStatePorts {
                events: store.clone(),
                lookups: store,
                login: Arc::new(FixtureLoginService),
            }
        }
    }
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session: SessionSettings,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        session,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(session.middleware())
        .wrap(Trace)
        .configure(configure_api)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct the HTTP server and mark the service ready.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
    ports: HttpStatePorts,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(HttpState::with_page_size(ports, config.page_size));
    let ServerConfig {
        session,
        bind_addr,
        page_size: _,
        db_pool: _,
    } = config;

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            session: session.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "listening");
    health_state.mark_ready();
    Ok(server)
}
