//! Core types for the persistence layer.
//!
//! - [`Record`], [`RecordInput`] - Stored rows and validated write payloads
//! - [`PaginationPolicy`], [`PageWindow`], [`Ordering`] - Listing policy

mod pagination;
mod record;

pub use pagination::{Ordering, PageWindow, PaginationPolicy};
pub use record::{
    FieldAssignment, Record, RecordInput, bind_text, canonical_number, typed_value, validate_key,
};
