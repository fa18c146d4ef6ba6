//! # API Error Type
//!
//! Unified error type for the command layer.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Fatura                                 │
//! │                                                                         │
//! │  CoreError   (unknown type / slot / language) ──┐                       │
//! │  DbError     (database could not be opened)  ───┼──► ApiError           │
//! │  ConfigError (bad config file or values)     ───┘    { code, message }  │
//! │                                                                         │
//! │  Counter failures never get here: the number generator falls back to    │
//! │  a timestamp number instead.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Serialized errors look like:
//! ```json
//! { "code": "UNKNOWN_DOCUMENT_TYPE", "message": "Unknown document type: 'receipt' ..." }
//! ```

use fatura_core::CoreError;
use fatura_db::DbError;
use serde::Serialize;

use crate::config::ConfigError;

/// Error returned from commands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for command responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Row id not present in the ledger
    NotFound,

    /// Input that names no known thing (slot, language)
    ValidationError,

    /// Document type outside quote/order/invoice
    UnknownDocumentType,

    /// Configuration could not be loaded
    ConfigError,

    /// Database could not be opened
    DatabaseError,

    /// Draft or output could not be (de)serialized
    SerializationError,

    /// Anything else
    Internal,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

/// Converts core errors to API errors.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        let message = err.to_string();
        match err {
            CoreError::UnknownDocumentType(_) => ApiError::new(ErrorCode::UnknownDocumentType, message),
            CoreError::UnknownCustomerSlot(_) | CoreError::UnknownLanguage(_) => ApiError::validation(message),
        }
    }
}

/// Converts database errors to API errors.
impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        tracing::error!(error = %err, "Database error");
        ApiError::new(ErrorCode::DatabaseError, err.to_string())
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::new(ErrorCode::SerializationError, err.to_string())
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for commands.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_document_type_code() {
        let err: ApiError = CoreError::UnknownDocumentType("receipt".into()).into();
        assert_eq!(err.code, ErrorCode::UnknownDocumentType);

        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "UNKNOWN_DOCUMENT_TYPE");
        assert!(json["message"].as_str().unwrap().contains("receipt"));
    }

    #[test]
    fn test_slot_errors_are_validation() {
        let err: ApiError = CoreError::UnknownCustomerSlot("fax".into()).into();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
