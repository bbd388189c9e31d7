//! Pagination and ordering policy for listings.
//!
//! Limit and offset arrive as raw query-string text. Resolution never fails:
//! anything unusable falls back to the read source's defaults.

use serde::{Deserialize, Serialize};

use crate::schema::SearchProfile;

/// A resolved page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageWindow {
    /// Maximum number of records to return. Always positive.
    pub limit: i64,
    /// Number of records to skip. Never negative.
    pub offset: i64,
}

/// Resolves raw limit/offset input into a [`PageWindow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationPolicy {
    max_limit: i64,
}

impl Default for PaginationPolicy {
    fn default() -> Self {
        Self {
            max_limit: Self::DEFAULT_MAX_LIMIT,
        }
    }
}

impl PaginationPolicy {
    /// Largest page served when no cap is configured.
    pub const DEFAULT_MAX_LIMIT: i64 = 1000;

    /// Creates a policy capping pages at `max_limit` records.
    pub fn new(max_limit: i64) -> Self {
        Self {
            max_limit: max_limit.max(1),
        }
    }

    pub fn max_limit(&self) -> i64 {
        self.max_limit
    }

    /// Resolves the page window for `profile`.
    ///
    /// Absent, non-numeric, zero or negative limits use the profile default.
    /// Absent, non-numeric or negative offsets become zero.
    pub fn resolve(
        &self,
        profile: &SearchProfile,
        limit: Option<&str>,
        offset: Option<&str>,
    ) -> PageWindow {
        let limit = parse_int(limit)
            .filter(|l| *l > 0)
            .unwrap_or(profile.default_limit)
            .clamp(1, self.max_limit);
        let offset = parse_int(offset).unwrap_or(0).max(0);

        PageWindow { limit, offset }
    }
}

fn parse_int(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
}

/// Ordering of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ordering {
    /// When set, records with a non-blank value in this field come first.
    pub completeness_field: Option<&'static str>,
    /// Ascending primary order.
    pub order_by: &'static str,
}

impl Ordering {
    /// Ordering for a listing, with or without a search term.
    ///
    /// Completeness-first ordering only applies to unfiltered listings.
    pub fn for_listing(profile: &SearchProfile, has_search_term: bool) -> Self {
        Self {
            completeness_field: if has_search_term {
                None
            } else {
                profile.completeness_order_field
            },
            order_by: profile.default_order,
        }
    }
}
