//! EntityStore implementation for the in-memory backend.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::core::EntityStore;
use crate::error::{BackendError, StorageResult};
use crate::schema::{Column, EntitySchema, ViewSchema};
use crate::search::ListQuery;
use crate::search::matcher::{compare, matches_exact, matches_filter};
use crate::types::{Record, RecordInput, typed_value};

use super::{MemoryBackend, MemoryTable};

impl MemoryBackend {
    fn select(&self, table: &str, query: &ListQuery) -> Vec<Record> {
        let tables = self.tables.read();
        let Some(table) = tables.get(table) else {
            return Vec::new();
        };

        let mut rows: Vec<&Record> = table
            .rows
            .iter()
            .filter(|row| matches_filter(row, &query.filter))
            .collect();
        rows.sort_by(|a, b| compare(a, b, &query.ordering));

        let offset = usize::try_from(query.window.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.window.limit).unwrap_or(usize::MAX);
        rows.into_iter().skip(offset).take(limit).cloned().collect()
    }
}

fn position(table: &MemoryTable, column: &Column, key: &str) -> Option<usize> {
    table.rows.iter().position(|row| matches_exact(row, column, key))
}

#[async_trait]
impl EntityStore for MemoryBackend {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn create(&self, schema: &EntitySchema, input: &RecordInput) -> StorageResult<Record> {
        let mut tables = self.tables.write();
        let table = tables.entry(schema.table).or_insert_with(MemoryTable::default);
        let key = schema.key_column();

        let mut record = input.to_record();
        if schema.is_natural_key() {
            let value = input.get(key.name).unwrap_or_default();
            if position(table, key, value).is_some() {
                return Err(BackendError::ConstraintViolation {
                    backend_name: "memory".to_string(),
                    message: format!(
                        "duplicate key value violates unique constraint on {}.{}",
                        schema.table, key.name
                    ),
                }
                .into());
            }
        } else {
            let id = table.next_id;
            table.next_id += 1;
            record.insert(key.name.to_string(), Value::from(id));
        }

        debug!(table = %schema.table, rows = table.rows.len() + 1, "Inserted record");
        table.rows.push(record.clone());
        Ok(record)
    }

    async fn list(&self, schema: &EntitySchema, query: &ListQuery) -> StorageResult<Vec<Record>> {
        Ok(self.select(schema.table, query))
    }

    async fn list_view(
        &self,
        schema: &EntitySchema,
        _view: &ViewSchema,
        query: &ListQuery,
    ) -> StorageResult<Vec<Record>> {
        Ok(self.select(schema.table, query))
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
        let mut tables = self.tables.write();
        let Some(table) = tables.get_mut(schema.table) else {
            return Ok(None);
        };
        let Some(index) = position(table, schema.key_column(), key) else {
            return Ok(None);
        };

        let row = &mut table.rows[index];
        for assignment in input.assignments() {
            let value = match &assignment.value {
                Some(text) => typed_value(assignment.column.kind, text),
                None => Value::Null,
            };
            row.insert(assignment.column.name.to_string(), value);
        }
        Ok(Some(row.clone()))
    }

    async fn delete(&self, schema: &EntitySchema, key: &str) -> StorageResult<Option<Record>> {
        let mut tables = self.tables.write();
        let Some(table) = tables.get_mut(schema.table) else {
            return Ok(None);
        };
        Ok(position(table, schema.key_column(), key).map(|index| table.rows.remove(index)))
    }

    async fn find_by_column(
        &self,
        schema: &EntitySchema,
        column: &Column,
        value: &str,
    ) -> StorageResult<Option<Record>> {
        let tables = self.tables.read();
        Ok(tables
            .get(schema.table)
            .and_then(|table| position(table, column, value).map(|i| table.rows[i].clone())))
    }

    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }
}
