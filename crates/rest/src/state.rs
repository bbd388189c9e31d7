//! Application state for the SisBase HTTP API.
//!
//! Holds what every handler needs: the store, the registry of collections,
//! the server configuration and the pagination policy derived from it.

use std::sync::Arc;

use sisbase_persistence::EntityStore;
use sisbase_persistence::schema::{EntityRegistry, EntitySchema};
use sisbase_persistence::types::PaginationPolicy;

use crate::config::ServerConfig;
use crate::error::{RestError, RestResult};

/// Shared application state for the HTTP API.
///
/// # Type Parameters
///
/// * `S` - The storage backend type (must implement [`EntityStore`])
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use sisbase_persistence::backends::memory::MemoryBackend;
/// use sisbase_persistence::schema::EntityRegistry;
/// use sisbase_rest::{AppState, ServerConfig};
///
/// let state = AppState::new(
///     Arc::new(MemoryBackend::new()),
///     EntityRegistry::builtin().unwrap(),
///     ServerConfig::default(),
/// );
/// assert!(state.schema("abogados").is_ok());
/// ```
pub struct AppState<S> {
    /// The storage backend.
    storage: Arc<S>,

    /// Registered collections.
    registry: Arc<EntityRegistry>,

    /// Server configuration.
    config: Arc<ServerConfig>,

    /// Limit and offset resolution.
    pagination: PaginationPolicy,
}

// Manually implement Clone since S is wrapped in Arc and doesn't need to be Clone
impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
            registry: Arc::clone(&self.registry),
            config: Arc::clone(&self.config),
            pagination: self.pagination,
        }
    }
}

impl<S: EntityStore> AppState<S> {
    /// Creates a new AppState.
    pub fn new(storage: Arc<S>, registry: EntityRegistry, config: ServerConfig) -> Self {
        let pagination = PaginationPolicy::new(config.max_page_size);
        Self {
            storage,
            registry: Arc::new(registry),
            config: Arc::new(config),
            pagination,
        }
    }

    /// Returns a reference to the storage backend.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the registry of collections.
    pub fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Returns a reference to the server configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Returns the pagination policy.
    pub fn pagination(&self) -> &PaginationPolicy {
        &self.pagination
    }

    /// Looks up the schema of a collection by its path segment.
    pub fn schema(&self, entity: &str) -> RestResult<&EntitySchema> {
        self.registry
            .get(entity)
            .ok_or_else(|| RestError::UnknownEntity {
                entity: entity.to_string(),
            })
    }
}
