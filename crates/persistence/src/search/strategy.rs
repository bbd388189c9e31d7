//! Search strategy selection.
//!
//! A raw search term is classified once per request into a
//! [`SearchStrategy`], then combined with pagination and ordering into a
//! [`SearchPlan`]. Backends only ever see plans.

use std::collections::HashMap;

use serde::Serialize;
use tracing::trace;

use super::normalize::{is_all_digits, sanitize, tokenize};
use crate::schema::{Column, EmptyQueryPolicy, SearchMode, SearchProfile};
use crate::types::{Ordering, PageWindow, PaginationPolicy};

/// Raw listing input as received from the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

impl SearchRequest {
    /// Extracts the search term, limit and offset from query-string
    /// parameters. The term is read from the profile's own parameter name.
    pub fn from_params(profile: &SearchProfile, params: &HashMap<String, String>) -> Self {
        Self {
            query: params.get(profile.query_param).cloned(),
            limit: params.get("limit").cloned(),
            offset: params.get("offset").cloned(),
        }
    }

    pub fn with_query(query: impl Into<String>) -> Self {
        Self {
            query: Some(query.into()),
            ..Default::default()
        }
    }
}

/// How a search term will be matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchStrategy {
    /// No usable term; the empty-query policy applies.
    Empty,
    /// Equality against one column.
    Exact { column: Column, value: String },
    /// Folded tokens, each matched as a substring of any search column.
    TokenizedAnd { tokens: Vec<String> },
    /// Language-aware match of the sanitized term.
    FullText { text: String },
    /// The term can never match; no statement is needed.
    Unsatisfiable,
}

/// Picks the strategy for a search term.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryStrategySelector;

impl QueryStrategySelector {
    /// Classifies `raw` for a read source with `profile`.
    pub fn select(profile: &SearchProfile, raw: Option<&str>) -> SearchStrategy {
        let Some(raw) = raw else {
            return SearchStrategy::Empty;
        };
        let cleaned = sanitize(raw);
        let term = cleaned.trim();
        if term.is_empty() {
            return SearchStrategy::Empty;
        }

        if let Some(column) = profile.exact_column {
            let digits = is_all_digits(term);
            if digits || profile.mode == SearchMode::Exact {
                if !digits && !column.kind.accepts(term) {
                    return SearchStrategy::Unsatisfiable;
                }
                return SearchStrategy::Exact {
                    column,
                    value: term.to_string(),
                };
            }
        }

        match profile.mode {
            // An exact profile without an exact column has nothing to compare.
            SearchMode::Exact => SearchStrategy::Unsatisfiable,
            SearchMode::FullText => SearchStrategy::FullText {
                text: term.to_string(),
            },
            SearchMode::TokenizedAnd => {
                let tokens = tokenize(term);
                if tokens.is_empty() {
                    SearchStrategy::Empty
                } else {
                    SearchStrategy::TokenizedAnd { tokens }
                }
            }
        }
    }
}

/// Row filter of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchFilter {
    /// Every row.
    All,
    Exact {
        #[serde(serialize_with = "column_name")]
        column: Column,
        value: String,
    },
    TokenizedAnd {
        #[serde(serialize_with = "column_names")]
        columns: &'static [Column],
        tokens: Vec<String>,
    },
    FullText {
        language: &'static str,
        #[serde(skip)]
        vectors: &'static [&'static [Column]],
        text: String,
    },
}

impl SearchFilter {
    /// Returns true unless the filter lists every row.
    pub fn has_term(&self) -> bool {
        !matches!(self, SearchFilter::All)
    }
}

fn column_name<S: serde::Serializer>(column: &Column, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(column.name)
}

fn column_names<S: serde::Serializer>(columns: &&'static [Column], s: S) -> Result<S::Ok, S::Error> {
    s.collect_seq(columns.iter().map(|c| c.name))
}

/// A fully resolved listing: filter, order and page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    pub filter: SearchFilter,
    pub ordering: Ordering,
    pub window: PageWindow,
}

/// What a listing request turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchPlan {
    /// No statement; the result is empty.
    Skip,
    Query(ListQuery),
}

impl SearchPlan {
    /// Builds the plan for `request` against a read source's `profile`.
    pub fn build(
        profile: &SearchProfile,
        request: &SearchRequest,
        pagination: &PaginationPolicy,
    ) -> Self {
        let strategy = QueryStrategySelector::select(profile, request.query.as_deref());
        trace!(strategy = ?strategy, "Selected search strategy");

        let filter = match strategy {
            SearchStrategy::Empty => match profile.empty_query_policy {
                EmptyQueryPolicy::ReturnEmpty => return SearchPlan::Skip,
                EmptyQueryPolicy::ReturnDefaultPage => SearchFilter::All,
            },
            SearchStrategy::Unsatisfiable => return SearchPlan::Skip,
            SearchStrategy::Exact { column, value } => SearchFilter::Exact { column, value },
            SearchStrategy::TokenizedAnd { tokens } => SearchFilter::TokenizedAnd {
                columns: profile.search_columns,
                tokens,
            },
            SearchStrategy::FullText { text } => SearchFilter::FullText {
                language: profile.language,
                vectors: profile.text_vectors,
                text,
            },
        };

        let ordering = Ordering::for_listing(profile, filter.has_term());
        let window = pagination.resolve(
            profile,
            request.limit.as_deref(),
            request.offset.as_deref(),
        );

        SearchPlan::Query(ListQuery {
            filter,
            ordering,
            window,
        })
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, SearchPlan::Skip)
    }
}
