//! Response building for the SisBase HTTP API.
//!
//! - [`headers`] - Cache and Location headers

pub mod headers;

pub use headers::ResponseHeaders;
