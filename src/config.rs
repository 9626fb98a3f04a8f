//! Service configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`).

use std::net::SocketAddr;
use std::time::Duration;

use crate::persistence::MySqlSettings;

/// Log output format selected with `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable lines.
    Text,
    /// One JSON object per line.
    Json,
}

/// Top-level service configuration.
///
/// Loaded once at startup via [`OrderServiceConfig::from_env`].
#[derive(Debug, Clone)]
pub struct OrderServiceConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// MySQL data source name, in driver form
    /// (`user:pass@tcp(host:port)/db?charset=utf8mb4&parseTime=True&loc=Local`)
    /// or as a `mysql://` URL.
    pub data_source_url: String,

    /// Maximum number of database connections in the pool.
    pub database_max_connections: u32,

    /// Minimum idle connections in the pool.
    pub database_min_connections: u32,

    /// Timeout in seconds for acquiring a database connection.
    pub database_connect_timeout_secs: u64,

    /// Timeout in seconds for a single save or get round-trip.
    pub database_query_timeout_secs: u64,

    /// Whether to apply bundled migrations at startup.
    pub run_migrations: bool,

    /// Upper bound in seconds for handling one HTTP request.
    pub request_timeout_secs: u64,

    /// Log output format.
    pub log_format: LogFormat,
}

impl OrderServiceConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` is set but cannot be parsed as
    /// a [`SocketAddr`].
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        let data_source_url = std::env::var("DATA_SOURCE_URL").unwrap_or_else(|_| {
            "root:root@tcp(localhost:3306)/orders?charset=utf8mb4&parseTime=True&loc=Local"
                .to_string()
        });

        let log_format = match std::env::var("LOG_FORMAT").ok().as_deref() {
            Some("json") | Some("JSON") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            listen_addr,
            data_source_url,
            database_max_connections: parse_env("DATABASE_MAX_CONNECTIONS", 10),
            database_min_connections: parse_env("DATABASE_MIN_CONNECTIONS", 1),
            database_connect_timeout_secs: parse_env("DATABASE_CONNECT_TIMEOUT_SECS", 5),
            database_query_timeout_secs: parse_env("DATABASE_QUERY_TIMEOUT_SECS", 30),
            run_migrations: parse_env_bool("DATABASE_RUN_MIGRATIONS", true),
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", 30),
            log_format,
        })
    }

    /// Pool and round-trip limits for the MySQL repository.
    #[must_use]
    pub fn mysql_settings(&self) -> MySqlSettings {
        MySqlSettings {
            max_connections: self.database_max_connections,
            min_connections: self.database_min_connections,
            connect_timeout: Duration::from_secs(self.database_connect_timeout_secs),
            query_timeout: Duration::from_secs(self.database_query_timeout_secs),
        }
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key).ok().map(|v| v.to_ascii_lowercase()).as_deref() {
        Some("true") | Some("1") => true,
        Some("false") | Some("0") => false,
        _ => default,
    }
}
