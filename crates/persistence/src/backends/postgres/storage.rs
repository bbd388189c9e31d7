//! EntityStore implementation for PostgreSQL.

use async_trait::async_trait;
use serde_json::Value;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;
use tracing::debug;

use crate::core::EntityStore;
use crate::error::{BackendError, StorageError, StorageResult};
use crate::schema::{Column, EntitySchema, ViewSchema};
use crate::search::{ListQuery, SqlFragment, SqlParam, StatementBuilder};
use crate::types::{Record, RecordInput};

use super::PostgresBackend;

static NULL_TEXT: Option<String> = None;

fn to_sql(param: &SqlParam) -> &(dyn ToSql + Sync) {
    match param {
        SqlParam::Text(s) => s,
        SqlParam::Integer(i) => i,
        SqlParam::Null => &NULL_TEXT,
    }
}

fn row_to_record(row: &Row) -> StorageResult<Record> {
    let value: Value = row.try_get("record")?;
    match value {
        Value::Object(record) => Ok(record),
        other => Err(StorageError::Backend(BackendError::Internal {
            backend_name: "postgres".to_string(),
            message: format!("expected a JSON object row, got {}", other),
            source: None,
        })),
    }
}

impl PostgresBackend {
    /// Runs a statement and decodes every returned row.
    ///
    /// Statements are never retried; only connection acquisition is.
    async fn fetch_all(&self, statement: &SqlFragment) -> StorageResult<Vec<Record>> {
        let client = self.get_client().await?;
        let params: Vec<&(dyn ToSql + Sync)> = statement.params.iter().map(to_sql).collect();

        debug!(sql = %statement.sql, params = params.len(), "Executing statement");
        let rows = client.query(statement.sql.as_str(), &params).await?;
        rows.iter().map(row_to_record).collect()
    }

    async fn fetch_optional(&self, statement: &SqlFragment) -> StorageResult<Option<Record>> {
        Ok(self.fetch_all(statement).await?.into_iter().next())
    }
}

#[async_trait]
impl EntityStore for PostgresBackend {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn create(&self, schema: &EntitySchema, input: &RecordInput) -> StorageResult<Record> {
        let statement = StatementBuilder::insert(schema, input.assignments());
        self.fetch_optional(&statement).await?.ok_or_else(|| {
            StorageError::Backend(BackendError::Internal {
                backend_name: "postgres".to_string(),
                message: format!("insert into {} returned no row", schema.table),
                source: None,
            })
        })
    }

    async fn list(&self, schema: &EntitySchema, query: &ListQuery) -> StorageResult<Vec<Record>> {
        self.fetch_all(&StatementBuilder::select_list(schema.table, query))
            .await
    }

    async fn list_view(
        &self,
        _schema: &EntitySchema,
        view: &ViewSchema,
        query: &ListQuery,
    ) -> StorageResult<Vec<Record>> {
        self.fetch_all(&StatementBuilder::select_list(view.relation, query))
            .await
    }

    async fn get_by_key(&self, schema: &EntitySchema, key: &str) -> StorageResult<Option<Record>> {
        self.find_by_column(schema, schema.key_column(), key).await
    }

    async fn update(
        &self,
        schema: &EntitySchema,
        key: &str,
        input: &RecordInput,
    ) -> StorageResult<Option<Record>> {
        self.fetch_optional(&StatementBuilder::update(schema, key, input.assignments()))
            .await
    }

    async fn delete(&self, schema: &EntitySchema, key: &str) -> StorageResult<Option<Record>> {
        self.fetch_optional(&StatementBuilder::delete(schema, key))
            .await
    }

    async fn find_by_column(
        &self,
        schema: &EntitySchema,
        column: &Column,
        value: &str,
    ) -> StorageResult<Option<Record>> {
        self.fetch_optional(&StatementBuilder::select_one(schema.table, column, value))
            .await
    }

    async fn health_check(&self) -> StorageResult<()> {
        self.ping().await
    }
}
