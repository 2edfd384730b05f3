//! Provision or reset a login account in PostgreSQL.
//!
//! ```text
//! create-user --username admin --password-env ADMIN_PASSWORD
//! ```

use std::env;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use events_backend::outbound::persistence::{
    DbPool, DieselLoginService, PoolConfig, apply_migrations,
};
use tokio::runtime::Builder;

/// `create-user` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "create-user",
    about = "Create or reset a login account for the events API",
    version
)]
struct CliArgs {
    /// Account name used at `POST /auth/login/`.
    #[arg(long, value_name = "name")]
    username: String,
    /// Environment variable holding the password.
    #[arg(long = "password-env", value_name = "var", default_value = "EVENTS_USER_PASSWORD")]
    password_env: String,
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("failed to create Tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let username = args.username.trim();
    if username.is_empty() {
        return Err(eyre!("username must not be empty"));
    }
    let password = env::var(&args.password_env)
        .wrap_err_with(|| format!("read password from {}", args.password_env))?;
    if password.is_empty() {
        return Err(eyre!("{} must not be empty", args.password_env));
    }

    let database_url = match args.database_url {
        Some(url) => url,
        None => env::var("DATABASE_URL")
            .wrap_err("database URL missing: set --database-url or DATABASE_URL")?,
    };

    let migration_url = database_url.clone();
    tokio::task::spawn_blocking(move || apply_migrations(&migration_url))
        .await
        .wrap_err("migration task panicked")??;

    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .wrap_err("failed to create database pool")?;
    let user_id = DieselLoginService::new(pool)
        .upsert_account(username, password)
        .await
        .map_err(|error| eyre!("failed to store account: {}", error.message()))?;

    println!("user_id={user_id}");
    println!("username={username}");
    Ok(())
}
