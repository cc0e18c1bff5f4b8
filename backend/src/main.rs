//! Vote API entry-point: loads settings, migrates the schema and serves HTTP.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use factcheck::inbound::http::health::HealthState;
use factcheck::inbound::http::session_config::{BuildMode, session_settings};
use factcheck::outbound::persistence::{
    DbPool, DieselReadinessProbe, PoolConfig, run_pending_migrations,
};
use factcheck::settings::AppSettings;
use server::{ServerConfig, create_server};

fn startup_error(context: &str, err: impl std::fmt::Display) -> std::io::Error {
    error!(error = %err, "{context}");
    std::io::Error::other(format!("{context}: {err}"))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| startup_error("failed to load settings", e))?;

    let database_url = settings
        .database_url()
        .map_err(|e| startup_error("invalid settings", e))?;
    run_pending_migrations(database_url)
        .await
        .map_err(|e| startup_error("migrations failed", e))?;
    let pool = DbPool::new(
        PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
    )
    .await
    .map_err(|e| startup_error("database pool unavailable", e))?;

    let toggles = settings
        .session_toggles()
        .map_err(|e| startup_error("invalid settings", e))?;
    let session = session_settings(&toggles, BuildMode::from_debug_assertions())
        .map_err(|e| startup_error("invalid session configuration", e))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|e| startup_error("invalid settings", e))?;

    let config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    )
    .with_login_url(settings.login_url())
    .with_db_pool(pool.clone());

    let health_state = web::Data::new(
        HealthState::new().with_probe(Arc::new(DieselReadinessProbe::new(pool))),
    );
    create_server(health_state, config)?.await
}
