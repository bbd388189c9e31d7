//! Axum extractors for the SisBase HTTP API.
//!
//! - [`JsonBody`] - Extract a JSON object record body

mod json_body;

pub use json_body::{JsonBody, JsonBodyRejection};
