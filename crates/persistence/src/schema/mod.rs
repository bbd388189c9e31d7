//! Entity schemas.
//!
//! An [`EntitySchema`] is the static descriptor of one collection: its table,
//! key column, writable fields and the [`SearchProfile`] that drives listing.
//! Every storage operation is parameterized by a schema, so adding a collection
//! never requires a new handler or statement.
//!
//! Schemas are plain `'static` data and are registered in an
//! [`EntityRegistry`] at startup.

mod builtin;
mod registry;

pub use builtin::builtin_schemas;
pub use registry::EntityRegistry;

use serde::{Deserialize, Serialize};

/// Storage kind of a column.
///
/// All values travel to the store as text and are cast server-side, so the
/// kind only decides the cast and which inputs are acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Free text.
    Text,
    /// 64-bit integer.
    BigInt,
    /// Arbitrary precision number.
    Numeric,
}

impl ColumnKind {
    /// Returns the SQL type name used when casting bound values.
    pub fn sql_type(&self) -> &'static str {
        match self {
            ColumnKind::Text => "TEXT",
            ColumnKind::BigInt => "BIGINT",
            ColumnKind::Numeric => "NUMERIC",
        }
    }

    /// Returns true for the numeric kinds.
    pub fn is_numeric(&self) -> bool {
        !matches!(self, ColumnKind::Text)
    }

    /// Returns true if `value` can be stored in a column of this kind.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            ColumnKind::Text => true,
            ColumnKind::BigInt => {
                let digits = value.strip_prefix('-').unwrap_or(value);
                !digits.is_empty()
                    && digits.chars().all(|c| c.is_ascii_digit())
                    && digits.trim_start_matches('0').len() <= 18
            }
            ColumnKind::Numeric => is_decimal(value),
        }
    }
}

fn is_decimal(value: &str) -> bool {
    let unsigned = value.strip_prefix('-').unwrap_or(value);
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };
    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    match frac_part {
        Some(f) => !(int_part.is_empty() && f.is_empty()) && digits(int_part) && digits(f),
        None => !int_part.is_empty() && digits(int_part),
    }
}

/// A named, typed column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl Column {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Text,
        }
    }

    pub const fn bigint(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::BigInt,
        }
    }

    pub const fn numeric(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Numeric,
        }
    }
}

/// The column that uniquely identifies a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyColumn {
    pub column: Column,
    /// When true the key is supplied by the caller on create and must be
    /// unique; otherwise the store assigns it.
    pub natural: bool,
}

/// How a non-empty search term is matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Equality against the exact-match column.
    Exact,
    /// Every whitespace token must be a substring of at least one search column.
    TokenizedAnd,
    /// Language-aware boolean match against one or more text vectors.
    FullText,
}

/// What a listing without a search term returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyQueryPolicy {
    /// No statement is issued and the result is empty.
    ReturnEmpty,
    /// The first page in default order.
    ReturnDefaultPage,
}

/// Search configuration of a read source (a table or a view).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchProfile {
    /// Query-string parameter that carries the search term.
    pub query_param: &'static str,
    pub mode: SearchMode,
    /// Column matched when the term is all digits (or in `Exact` mode).
    pub exact_column: Option<Column>,
    /// Columns matched by `TokenizedAnd`.
    pub search_columns: &'static [Column],
    /// Text vectors matched by `FullText`; each inner slice is concatenated
    /// with a single space.
    pub text_vectors: &'static [&'static [Column]],
    /// Text search configuration name.
    pub language: &'static str,
    pub default_order: &'static str,
    pub empty_query_policy: EmptyQueryPolicy,
    /// Populated values of this field sort first in unfiltered listings.
    pub completeness_order_field: Option<&'static str>,
    pub default_limit: i64,
}

impl SearchProfile {
    /// Default page size when a request gives none.
    pub const DEFAULT_LIMIT: i64 = 100;

    /// A tokenized profile with the common defaults.
    pub const fn tokenized(search_columns: &'static [Column], default_order: &'static str) -> Self {
        Self {
            query_param: "search",
            mode: SearchMode::TokenizedAnd,
            exact_column: None,
            search_columns,
            text_vectors: &[],
            language: "spanish",
            default_order,
            empty_query_policy: EmptyQueryPolicy::ReturnEmpty,
            completeness_order_field: None,
            default_limit: Self::DEFAULT_LIMIT,
        }
    }

    /// A full-text profile with the common defaults.
    pub const fn full_text(
        text_vectors: &'static [&'static [Column]],
        default_order: &'static str,
    ) -> Self {
        Self {
            query_param: "search",
            mode: SearchMode::FullText,
            exact_column: None,
            search_columns: &[],
            text_vectors,
            language: "spanish",
            default_order,
            empty_query_policy: EmptyQueryPolicy::ReturnEmpty,
            completeness_order_field: None,
            default_limit: Self::DEFAULT_LIMIT,
        }
    }
}

/// A read-only relation exposed under `/<entity>/<segment>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewSchema {
    pub segment: &'static str,
    pub relation: &'static str,
    pub profile: SearchProfile,
}

/// One secondary collection consulted during enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupSource {
    /// Registered entity name of the secondary collection.
    pub entity: &'static str,
    pub key_column: Column,
    pub value_field: &'static str,
}

/// Derived field recomputed from secondary collections on update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnrichmentRule {
    /// Field of the incoming record holding the lookup key.
    pub lookup_field: &'static str,
    /// Field overwritten with the merged result.
    pub target_field: &'static str,
    /// Sources in merge order.
    pub sources: &'static [LookupSource],
    pub separator: &'static str,
}

/// Static descriptor of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySchema {
    /// Route name.
    pub name: &'static str,
    pub table: &'static str,
    pub key: KeyColumn,
    /// Writable columns, excluding the key.
    pub fields: &'static [Column],
    pub search: SearchProfile,
    pub views: &'static [ViewSchema],
    pub enrichment: Option<EnrichmentRule>,
}

impl EntitySchema {
    pub fn key_column(&self) -> &Column {
        &self.key.column
    }

    pub fn is_natural_key(&self) -> bool {
        self.key.natural
    }

    pub fn search_mode(&self) -> SearchMode {
        self.search.mode
    }

    /// Columns written on create: the key first when it is natural.
    pub fn insert_columns(&self) -> impl Iterator<Item = &Column> {
        let key = self.key.natural.then_some(&self.key.column);
        key.into_iter().chain(self.fields.iter())
    }

    /// Looks up a column by name, including the key column.
    pub fn column(&self, name: &str) -> Option<&Column> {
        if self.key.column.name == name {
            return Some(&self.key.column);
        }
        self.fields.iter().find(|c| c.name == name)
    }

    /// Returns the view served under `segment`.
    pub fn view(&self, segment: &str) -> Option<&ViewSchema> {
        self.views.iter().find(|v| v.segment == segment)
    }
}

/// Where a listing reads from.
#[derive(Debug, Clone, Copy)]
pub enum ReadSource<'a> {
    Table(&'a EntitySchema),
    View(&'a EntitySchema, &'a ViewSchema),
}

impl<'a> ReadSource<'a> {
    /// Name of the relation to select from.
    pub fn relation(&self) -> &'a str {
        match self {
            ReadSource::Table(schema) => schema.table,
            ReadSource::View(_, view) => view.relation,
        }
    }

    pub fn profile(&self) -> &'a SearchProfile {
        match self {
            ReadSource::Table(schema) => &schema.search,
            ReadSource::View(_, view) => &view.profile,
        }
    }

    pub fn schema(&self) -> &'a EntitySchema {
        match self {
            ReadSource::Table(schema) | ReadSource::View(schema, _) => schema,
        }
    }
}
