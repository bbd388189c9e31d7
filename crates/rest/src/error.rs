//! Error types for the SisBase HTTP API.
//!
//! Every error is returned as a JSON body of the form `{"error": "<message>"}`,
//! with client-facing messages in Spanish.
//!
//! # Error Mapping
//!
//! | Storage Error | HTTP Status |
//! |--------------|-------------|
//! | ResourceError::NotFound | 404 |
//! | ValidationError (caller input) | 400 |
//! | ValidationError::InvalidSchema, ValidationError::UnknownColumn | 500 |
//! | BackendError | 500 |
//!
//! Backend failures are logged with their driver message and replaced by a
//! generic message before reaching the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sisbase_persistence::error::{BackendError, ResourceError, StorageError, ValidationError};
use std::fmt;
use tracing::{debug, error};

/// Message returned to clients for any store failure.
pub const GENERIC_STORE_ERROR: &str = "No se pudo realizar la operación.";

/// Message for a path key the collection's key column cannot hold.
pub const INVALID_KEY_MESSAGE: &str = "El ID proporcionado no es válido.";

/// Message for a body that is not a usable record.
pub const INVALID_RECORD_MESSAGE: &str = "Los datos enviados no son un registro válido.";

/// The primary error type for API operations.
#[derive(Debug)]
pub enum RestError {
    /// Record not found (HTTP 404).
    NotFound {
        /// Collection name.
        entity: String,
        /// Path key.
        key: String,
    },

    /// No collection is registered under this name (HTTP 404).
    UnknownEntity {
        /// Requested collection name.
        entity: String,
    },

    /// Bad request - validation error (HTTP 400).
    BadRequest {
        /// Error message.
        message: String,
    },

    /// Internal server error (HTTP 500).
    InternalError {
        /// Error message.
        message: String,
    },

    /// Store unreachable (HTTP 503).
    ServiceUnavailable {
        /// Error message.
        message: String,
    },
}

impl fmt::Display for RestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RestError::NotFound { entity, key } => {
                write!(f, "Record not found: {}/{}", entity, key)
            }
            RestError::UnknownEntity { entity } => {
                write!(f, "Unknown collection: {}", entity)
            }
            RestError::BadRequest { message } => {
                write!(f, "Bad request: {}", message)
            }
            RestError::InternalError { message } => {
                write!(f, "Internal error: {}", message)
            }
            RestError::ServiceUnavailable { message } => {
                write!(f, "Service unavailable: {}", message)
            }
        }
    }
}

impl std::error::Error for RestError {}

impl RestError {
    /// HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::NotFound { .. } | RestError::UnknownEntity { .. } => StatusCode::NOT_FOUND,
            RestError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            RestError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RestError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let message = match &self {
            RestError::NotFound { .. } => "Registro no encontrado.".to_string(),
            RestError::UnknownEntity { entity } => format!("Colección desconocida: {}", entity),
            RestError::BadRequest { message }
            | RestError::InternalError { message }
            | RestError::ServiceUnavailable { message } => message.clone(),
        };

        (self.status_code(), Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Result type for API operations.
pub type RestResult<T> = Result<T, RestError>;

// Conversions from storage errors

impl From<StorageError> for RestError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Resource(e) => e.into(),
            StorageError::Validation(e) => e.into(),
            StorageError::Backend(e) => e.into(),
        }
    }
}

impl From<ResourceError> for RestError {
    fn from(err: ResourceError) -> Self {
        match err {
            ResourceError::NotFound { entity, key } => RestError::NotFound { entity, key },
        }
    }
}

impl From<ValidationError> for RestError {
    fn from(err: ValidationError) -> Self {
        let message = match &err {
            ValidationError::InvalidSchema { .. } | ValidationError::UnknownColumn { .. } => {
                error!(error = %err, "Collection schema misconfigured");
                return RestError::InternalError {
                    message: GENERIC_STORE_ERROR.to_string(),
                };
            }
            ValidationError::InvalidRecord { .. } => INVALID_RECORD_MESSAGE.to_string(),
            ValidationError::MissingRequiredField { field, .. } => {
                format!("El campo '{}' es obligatorio.", field)
            }
            ValidationError::NonNumericField { field, .. } => {
                format!("El campo '{}' debe ser numérico.", field)
            }
            ValidationError::InvalidKey { .. } => INVALID_KEY_MESSAGE.to_string(),
        };
        debug!(error = %err, "Request rejected");
        RestError::BadRequest { message }
    }
}

impl From<BackendError> for RestError {
    fn from(err: BackendError) -> Self {
        error!(error = %err, source = ?std::error::Error::source(&err), "Store operation failed");
        RestError::InternalError {
            message: GENERIC_STORE_ERROR.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_from_storage() {
        let err: RestError = StorageError::Resource(ResourceError::NotFound {
            entity: "abogados".to_string(),
            key: "7".to_string(),
        })
        .into();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(err.to_string(), "Record not found: abogados/7");
    }

    #[test]
    fn test_validation_is_bad_request() {
        let err: RestError = StorageError::Validation(ValidationError::InvalidKey {
            entity: "itaipu".to_string(),
            key: "abc".to_string(),
            expected: "a numeric value".to_string(),
        })
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), format!("Bad request: {}", INVALID_KEY_MESSAGE));
    }

    #[test]
    fn test_validation_messages_are_spanish() {
        let message = |err: ValidationError| match RestError::from(err) {
            RestError::BadRequest { message } => message,
            other => panic!("expected a bad request, got {other}"),
        };

        assert_eq!(
            message(ValidationError::MissingRequiredField {
                entity: "yacyreta".to_string(),
                field: "cedula".to_string(),
            }),
            "El campo 'cedula' es obligatorio."
        );
        assert_eq!(
            message(ValidationError::NonNumericField {
                entity: "abogados".to_string(),
                field: "cedula".to_string(),
                value: "12x".to_string(),
            }),
            "El campo 'cedula' debe ser numérico."
        );
        assert_eq!(
            message(ValidationError::InvalidRecord {
                entity: "abogados".to_string(),
                message: "expected a JSON object".to_string(),
            }),
            INVALID_RECORD_MESSAGE
        );
    }

    #[test]
    fn test_backend_error_is_generic() {
        let err: RestError = StorageError::Backend(BackendError::QueryFailed {
            backend_name: "postgres".to_string(),
            message: "relation \"abogados\" does not exist".to_string(),
        })
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!err.to_string().contains("relation"));
    }

    #[test]
    fn test_schema_error_is_internal() {
        let err: RestError = ValidationError::InvalidSchema {
            entity: "politicos".to_string(),
            message: "enrichment source is not registered".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

        let err: RestError = ValidationError::UnknownColumn {
            entity: "politicos".to_string(),
            column: "cedula_ruc".to_string(),
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_into_response_status() {
        let response = RestError::UnknownEntity {
            entity: "nope".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = RestError::ServiceUnavailable {
            message: "down".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
