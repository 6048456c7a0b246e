//! Backend entry-point: loads settings, prepares stores and serves the REST API.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use health_points::inbound::http::health::HealthState;
use health_points::inbound::http::session_config::{BuildMode, session_settings_from_env};
use health_points::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use health_points::outbound::search::MeilisearchMirror;
use server::{AppSettings, ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;
    let bind_addr = settings
        .bind_addr()
        .wrap_err("HEALTH_BIND_ADDR is not a socket address")?;

    let mut config = ServerConfig::new(
        session.key,
        session.cookie_secure,
        session.same_site,
        bind_addr,
    )
    .with_session_ttl_hours(session.ttl_hours);

    if let Some(database_url) = settings.database_url.clone() {
        migrate(database_url.clone()).await?;
        let pool = DbPool::new(
            PoolConfig::new(database_url).with_max_size(settings.db_max_connections()),
        )
        .await
        .map_err(|err| eyre!("failed to build database pool: {err}"))?;
        config = config.with_db_pool(pool);
    }

    if let Some(meili_url) = settings.meili_url.as_deref() {
        let mirror = MeilisearchMirror::new(meili_url, settings.meili_api_key.as_deref())
            .map_err(|err| eyre!("failed to configure search mirror: {err}"))?;
        if let Err(err) = mirror.prepare_indexes().await {
            warn!(error = %err, "search indexes not prepared; owner-scoped search will fail");
        }
        info!(url = meili_url, "search mirror configured");
        config = config.with_search_mirror(Arc::new(mirror));
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("failed to start server")?;
    server.await.wrap_err("server terminated with an error")
}

async fn migrate(database_url: String) -> Result<()> {
    let applied = tokio::task::spawn_blocking(move || run_pending_migrations(&database_url))
        .await
        .wrap_err("migration task panicked")?
        .map_err(|err| eyre!("{err}"))?;
    info!(applied, "database schema up to date");
    Ok(())
}
