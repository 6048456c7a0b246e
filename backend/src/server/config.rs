//! Process settings and the HTTP server configuration object.

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::cookie::{Key, SameSite};
use ortho_config::OrthoConfig;
use serde::Deserialize;

use health_points::domain::ports::SearchMirror;
use health_points::outbound::persistence::{DEFAULT_MAX_CONNECTIONS, DbPool};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Settings loaded from `HEALTH_*` environment variables, configuration files
/// and command-line flags.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HEALTH")]
pub struct AppSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection URL. In-memory stores are used when unset.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Meilisearch base URL. Search mirroring is disabled when unset.
    pub meili_url: Option<String>,
    /// Meilisearch API key.
    pub meili_api_key: Option<String>,
}

impl AppSettings {
    /// Return the configured bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        self.bind_addr
            .as_deref()
            .unwrap_or(DEFAULT_BIND_ADDR)
            .parse()
    }

    /// Return the configured pool size, falling back to the adapter default.
    pub fn db_max_connections(&self) -> u32 {
        self.db_max_connections.unwrap_or(DEFAULT_MAX_CONNECTIONS)
    }
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) session_ttl_hours: i64,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) search_mirror: Option<Arc<dyn SearchMirror>>,
}

impl ServerConfig {
    /// Construct a server configuration from session settings and a bind
    /// address. Stores default to in-memory adapters until a pool is attached.
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            session_ttl_hours: 2,
            bind_addr,
            db_pool: None,
            search_mirror: None,
        }
    }

    /// Set the persistent session lifetime.
    #[must_use]
    pub fn with_session_ttl_hours(mut self, hours: i64) -> Self {
        self.session_ttl_hours = hours;
        self
    }

    /// Attach a database connection pool for the Diesel record stores.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach a search mirror. Writes are not mirrored when none is set.
    #[must_use]
    pub fn with_search_mirror(mut self, mirror: Arc<dyn SearchMirror>) -> Self {
        self.search_mirror = Some(mirror);
        self
    }
}
