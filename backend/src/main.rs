//! Backend entry-point: loads settings, prepares the store, and serves the API.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use std::io;
use std::net::SocketAddr;

use actix_web::web;
use mockable::{DefaultEnv, Env};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use events_backend::inbound::http::health::HealthState;
use events_backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use events_backend::outbound::persistence::{DbPool, PoolConfig, apply_migrations};
use events_backend::seeding::seed_events_on_startup;
use events_backend::settings::AppSettings;
use server::{ServerConfig, build_ports, create_server};

const DATABASE_URL_ENV: &str = "DATABASE_URL";

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let env = DefaultEnv::new();
    let settings = AppSettings::load()
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let session = session_settings_from_env(&env, BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;
    let bind_addr: SocketAddr = settings.bind_addr().parse().map_err(|error| {
        io::Error::other(format!("invalid bind address '{}': {error}", settings.bind_addr()))
    })?;

    let mut config = ServerConfig::new(session, bind_addr, settings.page_size());
    if let Some(database_url) = env.string(DATABASE_URL_ENV).filter(|url| !url.is_empty()) {
        config = config.with_db_pool(prepare_database(database_url).await?);
    }

    let ports = build_ports(&config);
    seed_events_on_startup(&settings, ports.events.as_ref())
        .await
        .map_err(io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config, ports)?.await
}

/// Apply pending migrations, then open the connection pool.
async fn prepare_database(database_url: String) -> io::Result<DbPool> {
    let migration_url = database_url.clone();
    let applied = tokio::task::spawn_blocking(move || apply_migrations(&migration_url))
        .await
        .map_err(|error| io::Error::other(format!("migration task failed: {error}")))?
        .map_err(io::Error::other)?;
    info!(applied, "database schema up to date");

    DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|error| io::Error::other(format!("create database pool: {error}")))
}
