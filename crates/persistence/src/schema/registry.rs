//! Registry of entity schemas keyed by route name.

use std::collections::BTreeMap;

use regex::Regex;

use super::{builtin_schemas, EntitySchema};
use crate::error::{StorageResult, ValidationError};

/// Pattern every table, view, column and language name must match. These
/// names are interpolated into statements, so anything else is refused at
/// registration.
const IDENTIFIER_PATTERN: &str = r"^[a-z_][a-z0-9_]*$";

/// Registry of the collections a server exposes.
///
/// Built once at startup and shared read-only between requests.
#[derive(Debug, Clone)]
pub struct EntityRegistry {
    schemas: BTreeMap<&'static str, EntitySchema>,
}

impl EntityRegistry {
    /// Builds a registry from the given schemas, validating each one.
    pub fn new(schemas: impl IntoIterator<Item = EntitySchema>) -> StorageResult<Self> {
        let identifier = Regex::new(IDENTIFIER_PATTERN)?;
        let mut map = BTreeMap::new();

        for schema in schemas {
            validate_schema(&schema, &identifier)?;
            if map.insert(schema.name, schema).is_some() {
                return Err(invalid(&schema, "registered twice").into());
            }
        }

        let registry = Self { schemas: map };
        registry.validate_enrichment()?;
        Ok(registry)
    }

    /// Registry of the built-in collections.
    pub fn builtin() -> StorageResult<Self> {
        Self::new(builtin_schemas())
    }

    /// Returns the schema registered under `name`.
    pub fn get(&self, name: &str) -> Option<&EntitySchema> {
        self.schemas.get(name)
    }

    /// Registered route names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.schemas.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EntitySchema> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    fn validate_enrichment(&self) -> StorageResult<()> {
        for schema in self.schemas.values() {
            let Some(rule) = &schema.enrichment else {
                continue;
            };
            for field in [rule.lookup_field, rule.target_field] {
                if schema.column(field).is_none() {
                    return Err(ValidationError::UnknownColumn {
                        entity: schema.name.to_string(),
                        column: field.to_string(),
                    }
                    .into());
                }
            }
            for source in rule.sources {
                let Some(secondary) = self.get(source.entity) else {
                    return Err(invalid(
                        schema,
                        &format!("enrichment source '{}' is not registered", source.entity),
                    )
                    .into());
                };
                for column in [source.key_column.name, source.value_field] {
                    if secondary.column(column).is_none() {
                        return Err(ValidationError::UnknownColumn {
                            entity: secondary.name.to_string(),
                            column: column.to_string(),
                        }
                        .into());
                    }
                }
            }
        }
        Ok(())
    }
}

fn validate_schema(schema: &EntitySchema, identifier: &Regex) -> StorageResult<()> {
    let mut names = vec![schema.table, schema.key.column.name];
    names.extend(schema.fields.iter().map(|c| c.name));

    let mut profiles = vec![&schema.search];
    for view in schema.views {
        names.push(view.relation);
        profiles.push(&view.profile);
    }

    for profile in profiles {
        names.push(profile.default_order);
        names.push(profile.language);
        names.extend(profile.exact_column.iter().map(|c| c.name));
        names.extend(profile.search_columns.iter().map(|c| c.name));
        names.extend(profile.text_vectors.iter().flat_map(|v| v.iter().map(|c| c.name)));
        names.extend(profile.completeness_order_field);
        if profile.default_limit <= 0 {
            return Err(invalid(schema, "default limit must be positive").into());
        }
    }

    if let Some(bad) = names.iter().find(|n| !identifier.is_match(n)) {
        return Err(invalid(schema, &format!("'{}' is not a plain identifier", bad)).into());
    }
    Ok(())
}

fn invalid(schema: &EntitySchema, message: &str) -> ValidationError {
    ValidationError::InvalidSchema {
        entity: schema.name.to_string(),
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Column, EmptyQueryPolicy, KeyColumn, SearchMode, SearchProfile};

    #[test]
    fn test_builtin_registry() {
        let registry = EntityRegistry::builtin().unwrap();
        assert_eq!(registry.len(), 14);
        assert!(registry.get("est-rurales").is_some());
        assert!(registry.get("estaciones").is_none());

        let politicos = registry.get("politicos").unwrap();
        assert_eq!(politicos.search_mode(), SearchMode::FullText);
        assert!(politicos.enrichment.is_some());

        let industrias = registry.get("industrias").unwrap();
        assert_eq!(industrias.search.default_limit, 50);
        assert_eq!(
            industrias.search.empty_query_policy,
            EmptyQueryPolicy::ReturnDefaultPage
        );
    }

    #[test]
    fn test_builtin_natural_keys() {
        let registry = EntityRegistry::builtin().unwrap();
        let natural: Vec<_> = registry
            .iter()
            .filter(|s| s.is_natural_key())
            .map(|s| s.name)
            .collect();
        assert_eq!(natural, vec!["itaipu", "yacyreta"]);
    }

    #[test]
    fn test_rejects_unsafe_identifier() {
        let schema = EntitySchema {
            name: "bad",
            table: "bad; DROP TABLE x",
            key: KeyColumn {
                column: Column::bigint("id"),
                natural: false,
            },
            fields: &[],
            search: SearchProfile::tokenized(&[], "id"),
            views: &[],
            enrichment: None,
        };
        let err = EntityRegistry::new([schema]).unwrap_err();
        assert!(err.to_string().contains("not a plain identifier"));
    }

    #[test]
    fn test_rejects_duplicate_names() {
        let schema = builtin_schemas().remove(0);
        let err = EntityRegistry::new([schema, schema]).unwrap_err();
        assert!(err.to_string().contains("registered twice"));
    }

    #[test]
    fn test_rejects_unregistered_enrichment_source() {
        let politicos = builtin_schemas()
            .into_iter()
            .find(|s| s.name == "politicos")
            .unwrap();
        let err = EntityRegistry::new([politicos]).unwrap_err();
        assert!(err.to_string().contains("personap"));
    }
}
