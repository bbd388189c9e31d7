//! Server configuration for the SisBase HTTP API.
//!
//! Configuration comes from command line flags with environment variable
//! fallbacks, or is built programmatically.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `PORT` | 8000 | Server port |
//! | `SISBASE_HOST` | 0.0.0.0 | Host to bind |
//! | `SISBASE_LOG_LEVEL` | info | Log level |
//! | `SISBASE_REQUEST_TIMEOUT` | 30 | Request timeout (seconds) |
//! | `SISBASE_ENABLE_CORS` | true | Enable CORS |
//! | `SISBASE_CORS_ORIGINS` | * | Allowed origins |
//! | `SISBASE_CORS_METHODS` | GET,POST,PUT,DELETE,OPTIONS | Allowed methods |
//! | `SISBASE_CORS_HEADERS` | Content-Type,Accept | Allowed headers |
//! | `SISBASE_API_PREFIX` | /api | Prefix of the entity routes |
//! | `SISBASE_MAX_PAGE_SIZE` | 1000 | Upper bound for `limit` |
//! | `SISBASE_STORAGE_BACKEND` | postgres | `postgres` or `memory` |
//! | `DATABASE_URL` | | PostgreSQL connection string |
//!
//! # Example
//!
//! ```rust
//! use sisbase_rest::ServerConfig;
//!
//! let config = ServerConfig {
//!     port: 3000,
//!     api_prefix: "/v1".to_string(),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::fmt;
use std::str::FromStr;

use clap::Parser;
use thiserror::Error;

/// Storage backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackendMode {
    /// PostgreSQL, the production store.
    Postgres,
    /// Process-local tables, for development and tests.
    Memory,
}

impl fmt::Display for StorageBackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackendMode::Postgres => write!(f, "postgres"),
            StorageBackendMode::Memory => write!(f, "memory"),
        }
    }
}

/// Returned when the configured storage backend name is not recognised.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown storage backend '{0}', expected 'postgres' or 'memory'")]
pub struct UnknownBackendMode(pub String);

impl FromStr for StorageBackendMode {
    type Err = UnknownBackendMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(StorageBackendMode::Postgres),
            "memory" | "mem" => Ok(StorageBackendMode::Memory),
            _ => Err(UnknownBackendMode(s.to_string())),
        }
    }
}

/// Server configuration for the SisBase HTTP API.
///
/// Built from environment variables with [`ServerConfig::from_env`], from
/// command line arguments with [`ServerConfig::parse`], or programmatically.
#[derive(Debug, Clone, Parser)]
#[command(name = "sisbase")]
#[command(about = "SisBase registry lookup server")]
pub struct ServerConfig {
    /// Port to listen on.
    #[arg(short, long, env = "PORT", default_value = "8000")]
    pub port: u16,

    /// Host address to bind to.
    #[arg(long, env = "SISBASE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "SISBASE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Request timeout in seconds.
    #[arg(long, env = "SISBASE_REQUEST_TIMEOUT", default_value = "30")]
    pub request_timeout: u64,

    /// Enable CORS.
    #[arg(long, env = "SISBASE_ENABLE_CORS", default_value = "true")]
    pub enable_cors: bool,

    /// Allowed CORS origins (comma-separated, or * for all).
    #[arg(long, env = "SISBASE_CORS_ORIGINS", default_value = "*")]
    pub cors_origins: String,

    /// Allowed CORS methods (comma-separated, or * for all).
    #[arg(
        long,
        env = "SISBASE_CORS_METHODS",
        default_value = "GET,POST,PUT,DELETE,OPTIONS"
    )]
    pub cors_methods: String,

    /// Allowed CORS headers (comma-separated, or * for all).
    #[arg(long, env = "SISBASE_CORS_HEADERS", default_value = "Content-Type,Accept")]
    pub cors_headers: String,

    /// Prefix under which the entity routes are mounted.
    #[arg(long, env = "SISBASE_API_PREFIX", default_value = "/api")]
    pub api_prefix: String,

    /// Maximum page size accepted from `limit`.
    #[arg(long, env = "SISBASE_MAX_PAGE_SIZE", default_value = "1000")]
    pub max_page_size: i64,

    /// Storage backend: `postgres` or `memory`.
    #[arg(long, env = "SISBASE_STORAGE_BACKEND", default_value = "postgres")]
    pub storage_backend: String,

    /// Database connection string. `DB_*` variables are used when unset.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 8000,
            host: "0.0.0.0".to_string(),
            log_level: "info".to_string(),
            request_timeout: 30,
            enable_cors: true,
            cors_origins: "*".to_string(),
            cors_methods: "GET,POST,PUT,DELETE,OPTIONS".to_string(),
            cors_headers: "Content-Type,Accept".to_string(),
            api_prefix: "/api".to_string(),
            max_page_size: 1000,
            storage_backend: "postgres".to_string(),
            database_url: None,
        }
    }
}

impl ServerConfig {
    /// Creates a new ServerConfig from environment variables.
    ///
    /// Parses environment variables without requiring command line arguments.
    pub fn from_env() -> Self {
        Self::try_parse_from(["sisbase"]).unwrap_or_default()
    }

    /// Returns the socket address to bind to.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Parses the configured storage backend.
    pub fn storage_backend_mode(&self) -> Result<StorageBackendMode, UnknownBackendMode> {
        self.storage_backend.parse()
    }

    /// The API prefix without a trailing slash; empty when routes are mounted
    /// at the root.
    pub fn normalized_prefix(&self) -> &str {
        self.api_prefix.trim_end_matches('/')
    }

    /// Validates the configuration and returns every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Port cannot be 0".to_string());
        }

        if self.request_timeout == 0 {
            errors.push("Request timeout cannot be 0".to_string());
        }

        if self.max_page_size <= 0 {
            errors.push("Max page size must be positive".to_string());
        }

        if !self.api_prefix.is_empty() && !self.api_prefix.starts_with('/') {
            errors.push(format!(
                "API prefix must start with '/': {}",
                self.api_prefix
            ));
        }

        if let Err(e) = self.storage_backend_mode() {
            errors.push(e.to_string());
        }

        if let Some(url) = &self.database_url {
            if !(url.starts_with("postgres://") || url.starts_with("postgresql://")) {
                errors.push("Database URL must start with postgres:// or postgresql://".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Creates a configuration suitable for testing.
    ///
    /// Uses an ephemeral port, the memory backend and a small page cap.
    pub fn for_testing() -> Self {
        Self {
            port: 0,
            host: "127.0.0.1".to_string(),
            log_level: "debug".to_string(),
            request_timeout: 5,
            enable_cors: false,
            cors_origins: "*".to_string(),
            cors_methods: "*".to_string(),
            cors_headers: "*".to_string(),
            api_prefix: "/api".to_string(),
            max_page_size: 100,
            storage_backend: "memory".to_string(),
            database_url: None,
        }
    }
}
