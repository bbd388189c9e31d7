//! Error types for the persistence layer.
//!
//! Storage operations return [`StorageResult`]. Errors are grouped by category so
//! the HTTP layer can map them without inspecting messages: record state
//! ([`ResourceError`]), caller input ([`ValidationError`]) and store execution
//! ([`BackendError`]).

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all storage operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Record state errors
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Validation errors
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Errors related to record state.
#[derive(Error, Debug)]
pub enum ResourceError {
    /// The requested record was not found.
    #[error("record not found: {entity}/{key}")]
    NotFound { entity: String, key: String },
}

/// Errors caused by caller-supplied input.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The request body is not a usable record.
    #[error("invalid record for {entity}: {message}")]
    InvalidRecord { entity: String, message: String },

    /// A field required for the operation is missing or blank.
    #[error("missing required field '{field}' for {entity}")]
    MissingRequiredField { entity: String, field: String },

    /// A numeric column received a value that is not a number.
    #[error("field '{field}' of {entity} must be numeric, got '{value}'")]
    NonNumericField {
        entity: String,
        field: String,
        value: String,
    },

    /// A key that cannot be a value of the key column.
    #[error("invalid key '{key}' for {entity}: expected {expected}")]
    InvalidKey {
        entity: String,
        key: String,
        expected: String,
    },

    /// A column name that the schema does not declare.
    #[error("unknown column '{column}' on {entity}")]
    UnknownColumn { entity: String, column: String },

    /// A schema that cannot be registered.
    #[error("invalid schema {entity}: {message}")]
    InvalidSchema { entity: String, message: String },
}

/// Errors raised by a storage backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// A statement failed to execute.
    #[error("query failed on {backend_name}: {message}")]
    QueryFailed {
        backend_name: String,
        message: String,
    },

    /// A uniqueness or integrity constraint rejected a write.
    #[error("constraint violation on {backend_name}: {message}")]
    ConstraintViolation {
        backend_name: String,
        message: String,
    },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Backend(BackendError::Internal {
            backend_name: "unknown".to_string(),
            message: format!("serialization error: {}", err),
            source: Some(Box::new(err)),
        })
    }
}

impl From<regex::Error> for StorageError {
    fn from(err: regex::Error) -> Self {
        StorageError::Backend(BackendError::Internal {
            backend_name: "registry".to_string(),
            message: err.to_string(),
            source: Some(Box::new(err)),
        })
    }
}

#[cfg(feature = "postgres")]
impl From<tokio_postgres::Error> for StorageError {
    fn from(err: tokio_postgres::Error) -> Self {
        use tokio_postgres::error::SqlState;

        let backend_name = "postgres".to_string();
        let message = match err.as_db_error() {
            Some(db) => db.message().to_string(),
            None => err.to_string(),
        };

        match err.code() {
            Some(code) if *code == SqlState::UNIQUE_VIOLATION => {
                StorageError::Backend(BackendError::ConstraintViolation {
                    backend_name,
                    message,
                })
            }
            Some(_) => StorageError::Backend(BackendError::QueryFailed {
                backend_name,
                message,
            }),
            None => StorageError::Backend(BackendError::Internal {
                backend_name,
                message,
                source: Some(Box::new(err)),
            }),
        }
    }
}

#[cfg(feature = "postgres")]
impl From<deadpool_postgres::PoolError> for StorageError {
    fn from(err: deadpool_postgres::PoolError) -> Self {
        StorageError::Backend(BackendError::ConnectionFailed {
            backend_name: "postgres".to_string(),
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = StorageError::Resource(ResourceError::NotFound {
            entity: "abogados".to_string(),
            key: "12".to_string(),
        });
        assert_eq!(err.to_string(), "record not found: abogados/12");
    }

    #[test]
    fn test_invalid_key_display() {
        let err = ValidationError::InvalidKey {
            entity: "itaipu".to_string(),
            key: "abc".to_string(),
            expected: "a numeric value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid key 'abc' for itaipu: expected a numeric value"
        );
    }

    #[test]
    fn test_non_numeric_field_display() {
        let err = ValidationError::NonNumericField {
            entity: "abogados".to_string(),
            field: "cedula".to_string(),
            value: "12x".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "field 'cedula' of abogados must be numeric, got '12x'"
        );
    }

    #[test]
    fn test_backend_error_display() {
        let err: StorageError = BackendError::QueryFailed {
            backend_name: "postgres".to_string(),
            message: "relation does not exist".to_string(),
        }
        .into();
        assert!(matches!(err, StorageError::Backend(_)));
        assert!(err.to_string().contains("query failed on postgres"));
    }

    #[test]
    fn test_from_serde_error() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: StorageError = parse_err.into();
        assert!(matches!(
            err,
            StorageError::Backend(BackendError::Internal { .. })
        ));
    }
}
