//! SQL predicate and statement builder.
//!
//! Renders [`SearchFilter`]s into PostgreSQL WHERE clauses with `$N`
//! placeholders, and assembles the complete statements the PostgreSQL backend
//! runs. Every value is bound as text and cast server-side; search text never
//! appears in statement text.
//!
//! Every statement yields a single `record` column holding `to_jsonb(row)`, so
//! results can be decoded without knowing the schema.

use super::normalize::{like_pattern, sql_normalized};
use super::strategy::{ListQuery, SearchFilter};
use crate::schema::{Column, ColumnKind, EntitySchema};
use crate::types::{FieldAssignment, Ordering};

/// A SQL fragment with associated parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SqlFragment {
    /// The SQL string with $N placeholders.
    pub sql: String,
    /// The parameter values.
    pub params: Vec<SqlParam>,
}

/// A SQL parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    /// Text parameter.
    Text(String),
    /// Integer parameter.
    Integer(i64),
    /// Null parameter.
    Null,
}

impl SqlParam {
    /// Creates a text parameter.
    pub fn text(s: &str) -> Self {
        SqlParam::Text(s.to_string())
    }

    fn optional(value: Option<&str>) -> Self {
        value.map(SqlParam::text).unwrap_or(SqlParam::Null)
    }
}

impl SqlFragment {
    /// Creates a new fragment with no parameters.
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Creates a fragment with parameters.
    pub fn with_params(sql: impl Into<String>, params: Vec<SqlParam>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }
}

/// A rendered WHERE clause.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    /// Condition without the `WHERE` keyword; empty when every row matches.
    pub where_clause: String,
    pub params: Vec<SqlParam>,
    /// First placeholder index not used by this predicate.
    pub next_param_index: usize,
}

impl Predicate {
    pub fn is_empty(&self) -> bool {
        self.where_clause.is_empty()
    }

    /// Renders ` WHERE ...`, or nothing for an empty predicate.
    pub fn to_sql(&self) -> String {
        if self.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.where_clause)
        }
    }
}

/// Builds WHERE clauses for search filters.
pub struct PredicateBuilder;

impl PredicateBuilder {
    /// Builds the predicate for `filter`, numbering placeholders from
    /// `start_index`.
    pub fn build(filter: &SearchFilter, start_index: usize) -> Predicate {
        let fragment = match filter {
            SearchFilter::All => None,
            SearchFilter::Exact { column, value } => {
                Some(Self::exact_condition(column, value, start_index))
            }
            SearchFilter::TokenizedAnd { columns, tokens } => {
                Self::tokenized_condition(columns, tokens, start_index)
            }
            SearchFilter::FullText {
                language,
                vectors,
                text,
            } => Self::full_text_condition(language, vectors, text, start_index),
        };

        match fragment {
            Some(fragment) => Predicate {
                next_param_index: start_index + fragment.params.len(),
                where_clause: fragment.sql,
                params: fragment.params,
            },
            None => Predicate {
                where_clause: String::new(),
                params: Vec::new(),
                next_param_index: start_index,
            },
        }
    }

    fn exact_condition(column: &Column, value: &str, index: usize) -> SqlFragment {
        // Digit strings too long for BIGINT compare as NUMERIC instead of
        // failing the cast.
        let cast = match column.kind {
            ColumnKind::Text => "TEXT",
            ColumnKind::BigInt if column.kind.accepts(value) => "TEXT::BIGINT",
            ColumnKind::BigInt | ColumnKind::Numeric => "TEXT::NUMERIC",
        };
        SqlFragment::with_params(
            format!("{} = ${}::{}", quote_ident(column.name), index, cast),
            vec![SqlParam::text(value)],
        )
    }

    /// One parameter per token, shared by every column of its OR-group.
    fn tokenized_condition(
        columns: &[Column],
        tokens: &[String],
        start_index: usize,
    ) -> Option<SqlFragment> {
        if tokens.is_empty() || columns.is_empty() {
            return None;
        }

        let mut groups = Vec::with_capacity(tokens.len());
        let mut params = Vec::with_capacity(tokens.len());
        for (i, token) in tokens.iter().enumerate() {
            let index = start_index + i;
            let alternatives: Vec<String> = columns
                .iter()
                .map(|c| format!("{} LIKE ${}", normalized_text(c), index))
                .collect();
            groups.push(format!("({})", alternatives.join(" OR ")));
            params.push(SqlParam::Text(like_pattern(token)));
        }

        Some(SqlFragment::with_params(groups.join(" AND "), params))
    }

    /// One parameter per text vector, all carrying the same text.
    fn full_text_condition(
        language: &str,
        vectors: &[&[Column]],
        text: &str,
        start_index: usize,
    ) -> Option<SqlFragment> {
        if vectors.is_empty() {
            return None;
        }

        let language = quote_literal(language);
        let mut branches = Vec::with_capacity(vectors.len());
        let mut params = Vec::with_capacity(vectors.len());
        for (i, columns) in vectors.iter().enumerate() {
            let document: Vec<String> = columns
                .iter()
                .map(|c| format!("COALESCE(CAST({} AS TEXT), '')", quote_ident(c.name)))
                .collect();
            branches.push(format!(
                "to_tsvector({lang}, {doc}) @@ plainto_tsquery({lang}, ${idx})",
                lang = language,
                doc = document.join(" || ' ' || "),
                idx = start_index + i,
            ));
            params.push(SqlParam::text(text));
        }

        Some(SqlFragment::with_params(
            format!("({})", branches.join(" OR ")),
            params,
        ))
    }

    /// Renders an `ORDER BY` clause (without the keywords).
    pub fn order_by(ordering: &Ordering) -> String {
        let primary = format!("{} ASC", quote_ident(ordering.order_by));
        match ordering.completeness_field {
            Some(field) => {
                let field = quote_ident(field);
                format!(
                    "CASE WHEN {f} IS NOT NULL AND LENGTH(TRIM(CAST({f} AS TEXT))) > 0 THEN 0 ELSE 1 END, {primary}",
                    f = field,
                    primary = primary
                )
            }
            None => primary,
        }
    }
}

/// Assembles complete statements for the PostgreSQL backend.
pub struct StatementBuilder;

impl StatementBuilder {
    /// Paged listing of `relation`.
    pub fn select_list(relation: &str, query: &ListQuery) -> SqlFragment {
        let predicate = PredicateBuilder::build(&query.filter, 1);
        let limit_index = predicate.next_param_index;

        let sql = format!(
            "SELECT to_jsonb(t) AS record FROM {relation} t{predicate} ORDER BY {order} LIMIT ${limit} OFFSET ${offset}",
            relation = quote_ident(relation),
            predicate = predicate.to_sql(),
            order = PredicateBuilder::order_by(&query.ordering),
            limit = limit_index,
            offset = limit_index + 1,
        );

        let mut params = predicate.params;
        params.push(SqlParam::Integer(query.window.limit));
        params.push(SqlParam::Integer(query.window.offset));
        SqlFragment::with_params(sql, params)
    }

    /// First row of `relation` whose `column` equals `value`.
    pub fn select_one(relation: &str, column: &Column, value: &str) -> SqlFragment {
        let condition = PredicateBuilder::exact_condition(column, value, 1);
        SqlFragment::with_params(
            format!(
                "SELECT to_jsonb(t) AS record FROM {} t WHERE {} LIMIT 1",
                quote_ident(relation),
                condition.sql
            ),
            condition.params,
        )
    }

    /// Insert returning the stored row.
    pub fn insert(schema: &EntitySchema, assignments: &[FieldAssignment]) -> SqlFragment {
        let columns: Vec<String> = assignments
            .iter()
            .map(|a| quote_ident(a.column.name))
            .collect();
        let values: Vec<String> = assignments
            .iter()
            .enumerate()
            .map(|(i, a)| bind_cast(&a.column, i + 1))
            .collect();

        let sql = returning_record(&format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING *",
            quote_ident(schema.table),
            columns.join(", "),
            values.join(", ")
        ));
        SqlFragment::with_params(sql, assignment_params(assignments))
    }

    /// Full-replacement update by key returning the stored row.
    pub fn update(schema: &EntitySchema, key: &str, assignments: &[FieldAssignment]) -> SqlFragment {
        let sets: Vec<String> = assignments
            .iter()
            .enumerate()
            .map(|(i, a)| format!("{} = {}", quote_ident(a.column.name), bind_cast(&a.column, i + 1)))
            .collect();
        let key_condition =
            PredicateBuilder::exact_condition(schema.key_column(), key, assignments.len() + 1);

        let sql = returning_record(&format!(
            "UPDATE {} SET {} WHERE {} RETURNING *",
            quote_ident(schema.table),
            sets.join(", "),
            key_condition.sql
        ));
        let mut params = assignment_params(assignments);
        params.extend(key_condition.params);
        SqlFragment::with_params(sql, params)
    }

    /// Delete by key returning the removed row.
    pub fn delete(schema: &EntitySchema, key: &str) -> SqlFragment {
        let key_condition = PredicateBuilder::exact_condition(schema.key_column(), key, 1);
        let sql = returning_record(&format!(
            "DELETE FROM {} WHERE {} RETURNING *",
            quote_ident(schema.table),
            key_condition.sql
        ));
        SqlFragment::with_params(sql, key_condition.params)
    }
}

fn returning_record(statement: &str) -> String {
    format!(
        "WITH affected AS ({}) SELECT to_jsonb(affected) AS record FROM affected",
        statement
    )
}

fn assignment_params(assignments: &[FieldAssignment]) -> Vec<SqlParam> {
    assignments
        .iter()
        .map(|a| SqlParam::optional(a.value.as_deref()))
        .collect()
}

fn bind_cast(column: &Column, index: usize) -> String {
    match column.kind {
        ColumnKind::Text => format!("${}::TEXT", index),
        kind => format!("${}::TEXT::{}", index, kind.sql_type()),
    }
}

/// The column as text, folded with the same table as the search tokens.
fn normalized_text(column: &Column) -> String {
    match column.kind {
        ColumnKind::Text => sql_normalized(&quote_ident(column.name)),
        _ => sql_normalized(&format!("CAST({} AS TEXT)", quote_ident(column.name))),
    }
}

/// Quotes an identifier. Registered names are plain identifiers, so this only
/// guards against reserved words.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
