//! Derived-field enrichment.
//!
//! Some collections carry a field computed from secondary collections at
//! update time. The [`EnrichmentResolver`] looks the record's lookup key up in
//! each source of the schema's [`EnrichmentRule`], in order, and joins the
//! non-blank values found. The result overwrites the target field of the
//! write; it is a one-shot snapshot and is never refreshed afterwards.

use tracing::debug;

use crate::core::EntityStore;
use crate::error::{StorageResult, ValidationError};
use crate::schema::{EnrichmentRule, EntityRegistry, EntitySchema};
use crate::search::matcher::column_text;
use crate::types::RecordInput;

/// Resolves enrichment rules against a store.
pub struct EnrichmentResolver<'a, S: EntityStore + ?Sized> {
    store: &'a S,
    registry: &'a EntityRegistry,
}

impl<'a, S: EntityStore + ?Sized> EnrichmentResolver<'a, S> {
    pub fn new(store: &'a S, registry: &'a EntityRegistry) -> Self {
        Self { store, registry }
    }

    /// Merges the values found for `lookup_key` across the rule's sources.
    ///
    /// Returns an empty string when the key is blank or no source yields a
    /// value. Sources whose key column cannot hold the key are skipped
    /// without a query.
    pub async fn resolve(&self, rule: &EnrichmentRule, lookup_key: &str) -> StorageResult<String> {
        let key = lookup_key.trim();
        if key.is_empty() {
            return Ok(String::new());
        }

        let mut values = Vec::with_capacity(rule.sources.len());
        for source in rule.sources {
            let schema = self.source_schema(source.entity)?;
            if !source.key_column.kind.accepts(key) {
                debug!(source = %source.entity, "Lookup key not applicable to source");
                continue;
            }

            let found = self
                .store
                .find_by_column(schema, &source.key_column, key)
                .await?;
            let value = found
                .as_ref()
                .and_then(|record| column_text(record, source.value_field))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty());

            debug!(
                source = %source.entity,
                column = %source.key_column.name,
                found = found.is_some(),
                has_value = value.is_some(),
                "Enrichment lookup"
            );

            if let Some(value) = value {
                values.push(value);
            }
        }

        Ok(values.join(rule.separator))
    }

    /// Applies the schema's enrichment rule, if any, to a write.
    ///
    /// The target field is always overwritten, with an empty string when no
    /// source yields a value.
    pub async fn apply(&self, schema: &EntitySchema, input: &mut RecordInput) -> StorageResult<()> {
        let Some(rule) = &schema.enrichment else {
            return Ok(());
        };

        let lookup_key = input.get(rule.lookup_field).unwrap_or_default().to_string();
        let merged = self.resolve(rule, &lookup_key).await?;
        input.set(rule.target_field, Some(merged))?;
        Ok(())
    }

    fn source_schema(&self, entity: &str) -> StorageResult<&'a EntitySchema> {
        self.registry.get(entity).ok_or_else(|| {
            ValidationError::InvalidSchema {
                entity: entity.to_string(),
                message: "enrichment source is not registered".to_string(),
            }
            .into()
        })
    }
}
