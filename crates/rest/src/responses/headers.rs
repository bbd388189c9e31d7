//! Response header generation.

use axum::http::{HeaderMap, HeaderValue, header};

/// Builder for response headers.
///
/// Listings carry cache-disabling headers so browsers never serve a stale
/// search result; created records carry a `Location`.
#[derive(Debug, Default)]
pub struct ResponseHeaders {
    no_cache: bool,
    location: Option<String>,
}

impl ResponseHeaders {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Headers for a listing response.
    pub fn listing() -> Self {
        Self::new().with_no_cache()
    }

    /// Adds `Cache-Control`, `Pragma` and `Expires` headers disabling caching.
    pub fn with_no_cache(mut self) -> Self {
        self.no_cache = true;
        self
    }

    /// Sets the Location URL.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Returns the Location value.
    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    /// Converts to an Axum HeaderMap.
    pub fn to_header_map(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if self.no_cache {
            headers.insert(
                header::CACHE_CONTROL,
                HeaderValue::from_static("no-cache, no-store, must-revalidate"),
            );
            headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
            headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
        }

        if let Some(location) = &self.location {
            if let Ok(value) = HeaderValue::from_str(location) {
                headers.insert(header::LOCATION, value);
            }
        }

        headers
    }
}
