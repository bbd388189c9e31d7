//! SisBase server
//!
//! Registry lookup and maintenance service over PostgreSQL.

use clap::Parser;
use sisbase_persistence::backends::memory::MemoryBackend;
use sisbase_persistence::schema::EntityRegistry;
use sisbase_rest::{ServerConfig, StorageBackendMode, create_app_with_config, init_logging};
use tracing::{info, warn};

/// Starts the Axum HTTP server.
async fn serve(app: axum::Router, config: &ServerConfig) -> anyhow::Result<()> {
    let addr = config.socket_addr();
    info!(address = %addr, "Server listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let backend_mode = config
        .storage_backend_mode()
        .map_err(|e| anyhow::anyhow!("Invalid storage backend configuration: {}", e))?;

    let registry = EntityRegistry::builtin()?;

    info!(
        port = config.port,
        host = %config.host,
        prefix = %config.normalized_prefix(),
        collections = registry.len(),
        storage_backend = %backend_mode,
        "Starting SisBase server"
    );

    match backend_mode {
        StorageBackendMode::Memory => start_memory(config, registry).await,
        StorageBackendMode::Postgres => start_postgres(config, registry).await,
    }
}

/// Starts the server with process-local tables.
async fn start_memory(config: ServerConfig, registry: EntityRegistry) -> anyhow::Result<()> {
    warn!("Using the memory backend; records are lost on shutdown");
    let app = create_app_with_config(MemoryBackend::new(), registry, config.clone());
    serve(app, &config).await
}

/// Starts the server with the PostgreSQL backend.
#[cfg(feature = "postgres")]
async fn start_postgres(config: ServerConfig, registry: EntityRegistry) -> anyhow::Result<()> {
    use sisbase_persistence::backends::postgres::PostgresBackend;

    let backend = match config.database_url.as_deref() {
        Some(url) => {
            info!("Initializing PostgreSQL backend from connection string");
            PostgresBackend::from_connection_string(url).await?
        }
        None => {
            info!("Initializing PostgreSQL backend from environment variables");
            PostgresBackend::from_env().await?
        }
    };

    let app = create_app_with_config(backend, registry, config.clone());
    serve(app, &config).await
}

/// Fallback when the postgres feature is not enabled.
#[cfg(not(feature = "postgres"))]
async fn start_postgres(_config: ServerConfig, _registry: EntityRegistry) -> anyhow::Result<()> {
    anyhow::bail!(
        "The postgres backend requires the 'postgres' feature. \
         Build with: cargo build -p sisbase --features postgres"
    )
}
