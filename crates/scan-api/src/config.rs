//! Configuration loaded from environment variables.

use std::env;
use std::net::SocketAddr;

/// Scan API server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server bind address.
    pub addr: SocketAddr,
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Schema holding the `users` and `scan_history` tables.
    pub schema: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Description | Default |
    /// |----------|-------------|---------|
    /// | `SCAN_API_ADDR` | Server bind address | `127.0.0.1:8080` |
    /// | `DATABASE_URL` | PostgreSQL connection string | (required) |
    /// | `MAIN_DB_SCHEMA` | Database schema name | `public` |
    pub fn from_env() -> Result<Self, ConfigError> {
        let addr = env::var("SCAN_API_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidAddr)?;

        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

        let schema = env::var("MAIN_DB_SCHEMA").unwrap_or_else(|_| "public".to_string());

        Ok(Self {
            addr,
            database_url,
            schema,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid SCAN_API_ADDR format")]
    InvalidAddr,

    #[error("DATABASE_URL environment variable is required")]
    MissingDatabaseUrl,
}
