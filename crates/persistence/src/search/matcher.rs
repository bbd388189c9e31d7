//! In-process evaluation of search filters and orderings.
//!
//! Mirrors the SQL rendered by [`PredicateBuilder`](super::PredicateBuilder):
//! substring comparisons fold both sides with the same normaliser, exact
//! comparisons on numeric columns compare canonical decimal text.

use std::cmp::Ordering as CmpOrdering;

use serde_json::Value;

use super::lexer;
use super::normalize::normalize;
use super::strategy::SearchFilter;
use crate::schema::Column;
use crate::types::{Ordering, Record, canonical_number};

/// Returns true if `record` satisfies `filter`.
pub fn matches_filter(record: &Record, filter: &SearchFilter) -> bool {
    match filter {
        SearchFilter::All => true,
        SearchFilter::Exact { column, value } => matches_exact(record, column, value),
        SearchFilter::TokenizedAnd { columns, tokens } => tokens.iter().all(|token| {
            columns.iter().any(|c| {
                column_text(record, c.name)
                    .map(|text| normalize(&text).contains(token.as_str()))
                    .unwrap_or(false)
            })
        }),
        SearchFilter::FullText { vectors, text, .. } => vectors.iter().any(|columns| {
            let document = columns
                .iter()
                .map(|c| column_text(record, c.name).unwrap_or_default())
                .collect::<Vec<_>>()
                .join(" ");
            lexer::matches(&document, text)
        }),
    }
}

/// Compares stored values the way the SQL equality does.
pub fn matches_exact(record: &Record, column: &Column, value: &str) -> bool {
    let Some(stored) = column_text(record, column.name) else {
        return false;
    };
    if column.kind.is_numeric() {
        canonical_number(&stored) == canonical_number(value)
    } else {
        stored == value
    }
}

/// Text form of a column value; `None` for NULL or a missing column.
pub fn column_text(record: &Record, name: &str) -> Option<String> {
    match record.get(name)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}

/// Compares two records under `ordering`. NULLs sort last, as in an
/// ascending PostgreSQL sort.
pub fn compare(a: &Record, b: &Record, ordering: &Ordering) -> CmpOrdering {
    if let Some(field) = ordering.completeness_field {
        let rank = |r: &Record| {
            let populated = column_text(r, field)
                .map(|t| !t.trim().is_empty())
                .unwrap_or(false);
            if populated { 0 } else { 1 }
        };
        let by_completeness = rank(a).cmp(&rank(b));
        if by_completeness != CmpOrdering::Equal {
            return by_completeness;
        }
    }
    compare_values(a.get(ordering.order_by), b.get(ordering.order_by))
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> CmpOrdering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => CmpOrdering::Equal,
        (None, Some(_)) => CmpOrdering::Greater,
        (Some(_), None) => CmpOrdering::Less,
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            match (x.as_i64(), y.as_i64()) {
                (Some(x), Some(y)) => x.cmp(&y),
                _ => {
                    let x = x.as_f64().unwrap_or(f64::NAN);
                    let y = y.as_f64().unwrap_or(f64::NAN);
                    x.partial_cmp(&y).unwrap_or(CmpOrdering::Equal)
                }
            }
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (Some(x), Some(y)) => x.to_string().cmp(&y.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    const NAME_COLUMNS: &[Column] = &[Column::text("nombre"), Column::numeric("cedula")];

    #[test]
    fn test_tokenized_requires_every_token() {
        let r = record(json!({"nombre": "Juan\u{00A0}Pérez", "cedula": 4455667}));
        let filter = |words: &[&str]| SearchFilter::TokenizedAnd {
            columns: NAME_COLUMNS,
            tokens: words.iter().map(|w| w.to_string()).collect(),
        };

        assert!(matches_filter(&r, &filter(&["JUAN"])));
        assert!(matches_filter(&r, &filter(&["JUAN", "PÉR"])));
        assert!(matches_filter(&r, &filter(&["556"])));
        assert!(!matches_filter(&r, &filter(&["JUAN", "GOMEZ"])));
    }

    #[test]
    fn test_tokenized_normalizes_stored_values() {
        let r = record(json!({"nombre": "\u{FEFF}Ñan\u{200B}dú Straße", "cedula": null}));
        let filter = |words: &[&str]| SearchFilter::TokenizedAnd {
            columns: NAME_COLUMNS,
            tokens: words.iter().map(|w| w.to_string()).collect(),
        };

        assert!(matches_filter(&r, &filter(&["ÑANDÚ"])));
        assert!(matches_filter(&r, &filter(&["STRAßE"])));
        assert!(!matches_filter(&r, &filter(&["STRASSE"])));
    }

    #[test]
    fn test_exact_numeric_ignores_leading_zeros() {
        let r = record(json!({"cedula": 1234}));
        assert!(matches_exact(&r, &Column::numeric("cedula"), "0001234"));
        assert!(!matches_exact(&r, &Column::numeric("cedula"), "12345"));
        assert!(!matches_exact(&record(json!({})), &Column::numeric("cedula"), "1"));
    }

    #[test]
    fn test_full_text_any_vector() {
        const VECTORS: &[&[Column]] = &[
            &[Column::text("nombres"), Column::text("apellidos")],
            &[Column::text("partido")],
        ];
        let r = record(json!({"nombres": "Ana", "apellidos": "Benítez", "partido": "Colorado"}));
        let filter = |text: &str| SearchFilter::FullText {
            language: "spanish",
            vectors: VECTORS,
            text: text.to_string(),
        };

        assert!(matches_filter(&r, &filter("ana benitez")));
        assert!(!matches_filter(&r, &filter("partido colorado")));
        assert!(matches_filter(&r, &filter("colorado")));
        assert!(!matches_filter(&r, &filter("ana colorado")));
    }

    #[test]
    fn test_completeness_first_then_order() {
        let ordering = Ordering {
            completeness_field: Some("telefono"),
            order_by: "nombre",
        };
        let mut rows = vec![
            record(json!({"nombre": "Ana", "telefono": null})),
            record(json!({"nombre": "Zoe", "telefono": "0981"})),
            record(json!({"nombre": "Bea", "telefono": "   "})),
            record(json!({"nombre": "Luis", "telefono": "021"})),
        ];
        rows.sort_by(|a, b| compare(a, b, &ordering));
        let names: Vec<_> = rows.iter().map(|r| r["nombre"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["Luis", "Zoe", "Ana", "Bea"]);
    }

    #[test]
    fn test_nulls_sort_last() {
        let ordering = Ordering {
            completeness_field: None,
            order_by: "cedula",
        };
        let mut rows = vec![
            record(json!({"cedula": null})),
            record(json!({"cedula": 30})),
            record(json!({"cedula": 4})),
        ];
        rows.sort_by(|a, b| compare(a, b, &ordering));
        assert_eq!(rows[0]["cedula"], json!(4));
        assert_eq!(rows[1]["cedula"], json!(30));
        assert!(rows[2]["cedula"].is_null());
    }
}
