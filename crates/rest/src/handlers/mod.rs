//! HTTP request handlers.
//!
//! One generic handler per operation serves every registered collection; the
//! collection is resolved from the first path segment.
//!
//! - [`create`] - Create a record
//! - [`search`] - List or search a collection
//! - [`read`] - Read a record by key, or list a view
//! - [`update`] - Replace a record's fields
//! - [`delete`] - Delete a record
//! - [`health`] - Root banner and health check

pub mod create;
pub mod delete;
pub mod health;
pub mod read;
pub mod search;
pub mod update;

pub use create::create_handler;
pub use delete::delete_handler;
pub use health::{health_handler, root_handler};
pub use read::read_handler;
pub use search::search_handler;
pub use update::update_handler;

use sisbase_persistence::error::ResourceError;
use sisbase_persistence::schema::EntitySchema;
use sisbase_persistence::search::matcher::column_text;
use sisbase_persistence::types::{Record, validate_key};

use crate::error::RestResult;

/// Rejects path keys the key column can never hold.
pub(crate) fn checked_key<'k>(schema: &EntitySchema, key: &'k str) -> RestResult<&'k str> {
    let key = key.trim();
    validate_key(schema, key)?;
    Ok(key)
}

/// Turns a store's `None` into a not-found error for `entity/key`.
pub(crate) fn found(schema: &EntitySchema, key: &str, record: Option<Record>) -> RestResult<Record> {
    record.ok_or_else(|| {
        ResourceError::NotFound {
            entity: schema.name.to_string(),
            key: key.to_string(),
        }
        .into()
    })
}

/// Text of a record's key, as used in its URL.
pub(crate) fn record_key(schema: &EntitySchema, record: &Record) -> Option<String> {
    column_text(record, schema.key_column().name)
}
