//! Core entity storage trait.
//!
//! This module defines the [`EntityStore`] trait, which provides generic CRUD
//! and listing operations for every registered collection. Operations are
//! parameterized by an [`EntitySchema`]; no backend knows about individual
//! collections.

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::schema::{Column, EntitySchema, ReadSource, ViewSchema};
use crate::search::{ListQuery, SearchPlan};
use crate::types::{Record, RecordInput};

/// Generic storage for schema-described collections.
///
/// Mutations return the affected row as stored. A key that matches no row is
/// a normal outcome and is reported as `Ok(None)`.
///
/// # Example
///
/// ```ignore
/// use sisbase_persistence::core::EntityStore;
/// use sisbase_persistence::types::RecordInput;
///
/// async fn example<S: EntityStore>(store: &S, schema: &EntitySchema) -> StorageResult<()> {
///     let input = RecordInput::for_create(schema, &json!({"nombres": "ANA"}))?;
///     let created = store.create(schema, &input).await?;
///     let key = created["id"].to_string();
///
///     assert!(store.get_by_key(schema, &key).await?.is_some());
///     assert!(store.delete(schema, &key).await?.is_some());
///     assert!(store.get_by_key(schema, &key).await?.is_none());
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Returns a human-readable name for this storage backend.
    fn backend_name(&self) -> &'static str;

    /// Inserts a record and returns it as stored.
    ///
    /// # Errors
    ///
    /// * `StorageError::Backend(ConstraintViolation)` - If a natural key is
    ///   already taken
    async fn create(&self, schema: &EntitySchema, input: &RecordInput) -> StorageResult<Record>;

    /// Lists records of the schema's table.
    async fn list(&self, schema: &EntitySchema, query: &ListQuery) -> StorageResult<Vec<Record>>;

    /// Lists records of one of the schema's read views.
    async fn list_view(
        &self,
        schema: &EntitySchema,
        view: &ViewSchema,
        query: &ListQuery,
    ) -> StorageResult<Vec<Record>>;

    /// Reads a record by key.
    async fn get_by_key(&self, schema: &EntitySchema, key: &str) -> StorageResult<Option<Record>>;

    /// Replaces the writable fields of a record. Returns `None` if no record
    /// has `key`.
    async fn update(
        &self,
        schema: &EntitySchema,
        key: &str,
        input: &RecordInput,
    ) -> StorageResult<Option<Record>>;

    /// Deletes a record and returns it. Returns `None` if no record has `key`.
    async fn delete(&self, schema: &EntitySchema, key: &str) -> StorageResult<Option<Record>>;

    /// Returns the first record whose `column` equals `value`.
    async fn find_by_column(
        &self,
        schema: &EntitySchema,
        column: &Column,
        value: &str,
    ) -> StorageResult<Option<Record>>;

    /// Checks that the store can serve requests.
    async fn health_check(&self) -> StorageResult<()>;

    /// Executes a search plan against a read source.
    ///
    /// A [`SearchPlan::Skip`] returns an empty result without touching the
    /// store.
    async fn search(&self, source: ReadSource<'_>, plan: &SearchPlan) -> StorageResult<Vec<Record>> {
        let SearchPlan::Query(query) = plan else {
            return Ok(Vec::new());
        };
        match source {
            ReadSource::Table(schema) => self.list(schema, query).await,
            ReadSource::View(schema, view) => self.list_view(schema, view, query).await,
        }
    }
}
