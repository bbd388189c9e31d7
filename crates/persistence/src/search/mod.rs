//! Search planning.
//!
//! - [`normalize`] - Sanitation and case folding shared by every comparison
//! - [`strategy`] - Classifies a search term and builds the [`SearchPlan`]
//! - [`query_builder`] - Renders plans into parameterized SQL
//! - [`matcher`] - Evaluates plans against in-memory records
//! - [`lexer`] - Spanish lexer used by in-memory full-text matching
//!
//! # Flow
//!
//! ```text
//! SearchRequest ──► QueryStrategySelector ──► SearchStrategy
//!                                                 │
//!                        PaginationPolicy ──► SearchPlan (Skip | Query)
//!                                                 │
//!                        PredicateBuilder / matcher (per backend)
//! ```

pub mod lexer;
pub mod matcher;
pub mod normalize;
pub mod query_builder;
pub mod strategy;

pub use query_builder::{Predicate, PredicateBuilder, SqlFragment, SqlParam, StatementBuilder};
pub use strategy::{
    ListQuery, QueryStrategySelector, SearchFilter, SearchPlan, SearchRequest, SearchStrategy,
};
