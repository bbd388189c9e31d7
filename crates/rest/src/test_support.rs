//! Store doubles for unit tests.

use async_trait::async_trait;
use sisbase_persistence::EntityStore;
use sisbase_persistence::error::{BackendError, StorageResult};
use sisbase_persistence::schema::{Column, EntitySchema, ViewSchema};
use sisbase_persistence::search::ListQuery;
use sisbase_persistence::types::{Record, RecordInput};

/// A store with no data; only its health can be configured.
pub(crate) struct MockStorage {
    healthy: bool,
}

impl MockStorage {
    pub(crate) fn healthy() -> Self {
        Self { healthy: true }
    }

    pub(crate) fn unreachable() -> Self {
        Self { healthy: false }
    }
}

#[async_trait]
impl EntityStore for MockStorage {
    fn backend_name(&self) -> &'static str {
        "mock"
    }

    async fn create(&self, _schema: &EntitySchema, _input: &RecordInput) -> StorageResult<Record> {
        unimplemented!()
    }

    async fn list(&self, _schema: &EntitySchema, _query: &ListQuery) -> StorageResult<Vec<Record>> {
        Ok(Vec::new())
    }

    async fn list_view(
        &self,
        _schema: &EntitySchema,
        _view: &ViewSchema,
        _query: &ListQuery,
    ) -> StorageResult<Vec<Record>> {
        Ok(Vec::new())
    }

    async fn get_by_key(&self, _schema: &EntitySchema, _key: &str) -> StorageResult<Option<Record>> {
        Ok(None)
    }

    async fn update(
        &self,
        _schema: &EntitySchema,
        _key: &str,
        _input: &RecordInput,
    ) -> StorageResult<Option<Record>> {
        Ok(None)
    }

    async fn delete(&self, _schema: &EntitySchema, _key: &str) -> StorageResult<Option<Record>> {
        Ok(None)
    }

    async fn find_by_column(
        &self,
        _schema: &EntitySchema,
        _column: &Column,
        _value: &str,
    ) -> StorageResult<Option<Record>> {
        Ok(None)
    }

    async fn health_check(&self) -> StorageResult<()> {
        if self.healthy {
            Ok(())
        } else {
            Err(BackendError::Unavailable {
                backend_name: "mock".to_string(),
                message: "connection refused".to_string(),
            }
            .into())
        }
    }
}
