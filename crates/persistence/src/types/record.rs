//! Records and write payloads.

use std::str::FromStr;

use serde_json::{Map, Number, Value};

use crate::error::ValidationError;
use crate::schema::{Column, ColumnKind, EntitySchema};

/// A stored row: every column of the relation keyed by name.
pub type Record = Map<String, Value>;

/// One column value of a write. `None` stores NULL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldAssignment {
    pub column: Column,
    pub value: Option<String>,
}

/// Validated field values for a create or update.
///
/// Values are kept as text; the backend casts them to the column kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordInput {
    entity: &'static str,
    assignments: Vec<FieldAssignment>,
}

impl RecordInput {
    /// Builds the input of a create from a request body.
    ///
    /// Natural-key schemas require the key in the body.
    pub fn for_create(schema: &EntitySchema, body: &Value) -> Result<Self, ValidationError> {
        let object = as_object(schema, body)?;

        if schema.is_natural_key() {
            let key = schema.key_column();
            let value = object
                .get(key.name)
                .and_then(bind_text)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| ValidationError::MissingRequiredField {
                    entity: schema.name.to_string(),
                    field: key.name.to_string(),
                })?;
            validate_key(schema, value.trim())?;
        }

        Self::from_columns(schema, schema.insert_columns(), object)
    }

    /// Builds the input of a full-replacement update from a request body.
    ///
    /// Every writable field is assigned; fields absent from the body become
    /// NULL. The key is never part of an update.
    pub fn for_update(schema: &EntitySchema, body: &Value) -> Result<Self, ValidationError> {
        let object = as_object(schema, body)?;
        Self::from_columns(schema, schema.fields.iter(), object)
    }

    fn from_columns<'a>(
        schema: &EntitySchema,
        columns: impl Iterator<Item = &'a Column>,
        object: &Record,
    ) -> Result<Self, ValidationError> {
        let mut assignments = Vec::new();
        for column in columns {
            let value = object.get(column.name).and_then(bind_text);
            let value = check_kind(schema, column, value)?;
            assignments.push(FieldAssignment {
                column: *column,
                value,
            });
        }

        if assignments.is_empty() {
            return Err(ValidationError::InvalidRecord {
                entity: schema.name.to_string(),
                message: "no writable fields".to_string(),
            });
        }

        Ok(Self {
            entity: schema.name,
            assignments,
        })
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn assignments(&self) -> &[FieldAssignment] {
        &self.assignments
    }

    /// Returns the text value assigned to `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.assignments
            .iter()
            .find(|a| a.column.name == field)
            .and_then(|a| a.value.as_deref())
    }

    /// Overwrites the value assigned to `field`.
    pub fn set(&mut self, field: &str, value: Option<String>) -> Result<(), ValidationError> {
        let entity = self.entity;
        let assignment = self
            .assignments
            .iter_mut()
            .find(|a| a.column.name == field)
            .ok_or_else(|| ValidationError::UnknownColumn {
                entity: entity.to_string(),
                column: field.to_string(),
            })?;
        assignment.value = value;
        Ok(())
    }

    /// Renders the assignments as a typed JSON record.
    pub fn to_record(&self) -> Record {
        self.assignments
            .iter()
            .map(|a| {
                let value = match &a.value {
                    Some(v) => typed_value(a.column.kind, v),
                    None => Value::Null,
                };
                (a.column.name.to_string(), value)
            })
            .collect()
    }
}

fn as_object<'a>(schema: &EntitySchema, body: &'a Value) -> Result<&'a Record, ValidationError> {
    body.as_object()
        .ok_or_else(|| ValidationError::InvalidRecord {
            entity: schema.name.to_string(),
            message: "expected a JSON object".to_string(),
        })
}

fn check_kind(
    schema: &EntitySchema,
    column: &Column,
    value: Option<String>,
) -> Result<Option<String>, ValidationError> {
    match value {
        Some(v) if column.kind.is_numeric() => {
            let trimmed = v.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else if column.kind.accepts(trimmed) {
                Ok(Some(trimmed.to_string()))
            } else {
                Err(ValidationError::NonNumericField {
                    entity: schema.name.to_string(),
                    field: column.name.to_string(),
                    value: v,
                })
            }
        }
        other => Ok(other),
    }
}

/// Converts a JSON body value into the text bound for it. `null` binds NULL.
pub fn bind_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

/// Converts stored text into the JSON value the store would return for a
/// column of `kind`. Numbers keep every digit, however long.
pub fn typed_value(kind: ColumnKind, text: &str) -> Value {
    if kind.is_numeric() {
        let canonical = canonical_number(text);
        if let Ok(i) = canonical.parse::<i64>() {
            return Value::Number(i.into());
        }
        if let Ok(n) = Number::from_str(&canonical) {
            return Value::Number(n);
        }
    }
    Value::String(text.to_string())
}

/// Strips leading zeros and trailing fractional zeros from a decimal string.
pub fn canonical_number(text: &str) -> String {
    let text = text.trim();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let int_part = int_part.trim_start_matches('0');
    let int_part = if int_part.is_empty() { "0" } else { int_part };
    let frac_part = frac_part.trim_end_matches('0');

    let sign = if int_part == "0" && frac_part.is_empty() {
        ""
    } else {
        sign
    };
    if frac_part.is_empty() {
        format!("{}{}", sign, int_part)
    } else {
        format!("{}{}.{}", sign, int_part, frac_part)
    }
}

/// Checks that a path key can be a value of the schema's key column.
pub fn validate_key(schema: &EntitySchema, key: &str) -> Result<(), ValidationError> {
    let column = schema.key_column();
    if column.kind.accepts(key) && !key.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::InvalidKey {
            entity: schema.name.to_string(),
            key: key.to_string(),
            expected: match column.kind {
                ColumnKind::Text => "a non-empty value".to_string(),
                _ => "a numeric value".to_string(),
            },
        })
    }
}
