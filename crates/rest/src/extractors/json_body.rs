//! JSON record body extractor.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use tracing::debug;

use crate::error::{INVALID_RECORD_MESSAGE, RestError};

/// Axum extractor for a record body.
///
/// Accepts any content type and requires the body to be a JSON object.
/// Failures are reported in the API's error shape instead of axum's plain
/// text rejections.
///
/// # Example
///
/// ```rust,ignore
/// use sisbase_rest::extractors::JsonBody;
///
/// async fn create_handler(JsonBody(body): JsonBody) {
///     println!("fields: {}", body.as_object().map(|o| o.len()).unwrap_or(0));
/// }
/// ```
#[derive(Debug)]
pub struct JsonBody(pub Value);

/// Error type for body extraction failures.
#[derive(Debug)]
pub enum JsonBodyRejection {
    /// The body could not be read.
    Unreadable(String),
    /// JSON parsing failed.
    InvalidJson(String),
    /// Parsed, but not an object.
    NotAnObject,
}

impl IntoResponse for JsonBodyRejection {
    fn into_response(self) -> Response {
        let message = match self {
            JsonBodyRejection::Unreadable(detail) => {
                debug!(error = %detail, "Unreadable request body");
                "No se pudo leer el cuerpo de la solicitud."
            }
            JsonBodyRejection::InvalidJson(detail) => {
                debug!(error = %detail, "Request body is not valid JSON");
                "El cuerpo de la solicitud no es un JSON válido."
            }
            JsonBodyRejection::NotAnObject => INVALID_RECORD_MESSAGE,
        };
        RestError::BadRequest {
            message: message.to_string(),
        }
        .into_response()
    }
}

impl<S> FromRequest<S> for JsonBody
where
    S: Send + Sync,
{
    type Rejection = JsonBodyRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| JsonBodyRejection::Unreadable(e.to_string()))?;

        let value: Value = serde_json::from_slice(&bytes)
            .map_err(|e| JsonBodyRejection::InvalidJson(e.to_string()))?;

        if !value.is_object() {
            return Err(JsonBodyRejection::NotAnObject);
        }

        Ok(JsonBody(value))
    }
}
