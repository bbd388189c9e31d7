//! SisBase persistence layer.
//!
//! This crate is the engine behind the SisBase registry lookup service. Every
//! collection is described by a static [`EntitySchema`](schema::EntitySchema);
//! one generic set of operations serves them all:
//!
//! - strategy selection for search terms (exact key, tokenized substring,
//!   language-aware full text)
//! - parameterized predicate and statement building
//! - pagination and ordering policy
//! - generic CRUD through the [`EntityStore`](core::EntityStore) trait
//! - update-time enrichment from secondary collections
//! - listings served from precomputed views
//!
//! # Backend Features
//!
//! ```toml
//! [dependencies]
//! sisbase-persistence = { version = "0.1", features = ["postgres"] }
//! ```
//!
//! - `postgres` - PostgreSQL via tokio-postgres and deadpool-postgres
//!
//! The in-memory backend is always available.
//!
//! # Architecture
//!
//! - [`schema`] - Entity schemas and the registry of built-in collections
//! - [`search`] - Strategy selection, normalisation, SQL and in-memory evaluation
//! - [`types`] - Records, write payloads, pagination
//! - [`core`] - Storage traits
//! - [`enrichment`] - Derived-field resolution
//! - [`backends`] - Memory and PostgreSQL implementations
//! - [`error`] - Error types for all operations
//!
//! # Quick Start
//!
//! ```
//! use sisbase_persistence::schema::EntityRegistry;
//! use sisbase_persistence::search::{SearchPlan, SearchRequest};
//! use sisbase_persistence::types::PaginationPolicy;
//!
//! let registry = EntityRegistry::builtin().unwrap();
//! let abogados = registry.get("abogados").unwrap();
//!
//! let plan = SearchPlan::build(
//!     &abogados.search,
//!     &SearchRequest::with_query("0001234"),
//!     &PaginationPolicy::default(),
//! );
//! assert!(!plan.is_skip());
//! ```

#![warn(rustdoc::missing_crate_level_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod backends;
pub mod core;
pub mod enrichment;
pub mod error;
pub mod schema;
pub mod search;
pub mod types;

// Re-export commonly used types at crate root
pub use crate::core::{EntityStore, ViewBackedReader};
pub use enrichment::EnrichmentResolver;
pub use error::{StorageError, StorageResult};
pub use schema::{EntityRegistry, EntitySchema};
pub use search::{SearchPlan, SearchRequest};
pub use types::{PaginationPolicy, Record, RecordInput};
