//! Core storage traits and abstractions.
//!
//! - [`EntityStore`] - Generic CRUD and listing over schema-described collections
//! - [`ViewBackedReader`] - Listings served from a schema's read views

mod storage;
mod view;

pub use storage::EntityStore;
pub use view::ViewBackedReader;
