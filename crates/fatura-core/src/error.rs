//! # Error Types
//!
//! Domain-specific error types for fatura-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  fatura-core errors (this file)                                        │
//! │  ├── CoreError          - Caller contract violations                   │
//! │  └── CounterStoreError  - Counter persistence failures                 │
//! │                                                                         │
//! │  fatura-db errors (separate crate)                                     │
//! │  └── DbError            - Database operation failures                  │
//! │                                                                         │
//! │  CLI errors (in app)                                                   │
//! │  └── ApiError           - What the front end sees (serialized)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## What Is NOT an Error
//! Malformed numeric input never produces an error. Unparseable quantities,
//! prices and discounts count as zero. The only failures are programming
//! errors (an unknown document type) and counter persistence failures, and
//! the latter never leave the number generator.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core engine errors.
///
/// These indicate a defect in the calling code, not bad user input.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Document type string is not one of `quote`, `order`, `invoice`.
    ///
    /// ## When This Occurs
    /// - A front end sends a type id the engine does not know
    /// - A draft file names a misspelled type
    ///
    /// The engine never falls back to `invoice` for an unknown type.
    #[error("Unknown document type: '{0}' (expected quote, order or invoice)")]
    UnknownDocumentType(String),

    /// Customer slot name is not recognised.
    #[error("Unknown customer field: '{0}'")]
    UnknownCustomerSlot(String),

    /// Language code is not recognised.
    #[error("Unknown language: '{0}' (expected ar or en)")]
    UnknownLanguage(String),
}

// =============================================================================
// Counter Store Error
// =============================================================================

/// Failures reported by a [`CounterStore`](crate::numbering::CounterStore).
///
/// The document number generator absorbs these and falls back to a
/// timestamp-derived number.
#[derive(Debug, Error)]
pub enum CounterStoreError {
    /// The backing store could not be read or written.
    #[error("Counter store unavailable: {0}")]
    Unavailable(String),

    /// The stored value cannot be used as a sequence.
    #[error("Counter '{key}' holds an invalid value: {value}")]
    Corrupt { key: String, value: i64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::UnknownDocumentType("receipt".to_string());
        assert_eq!(
            err.to_string(),
            "Unknown document type: 'receipt' (expected quote, order or invoice)"
        );

        let err = CounterStoreError::Corrupt {
            key: "fatura.document_seq".to_string(),
            value: -3,
        };
        assert_eq!(
            err.to_string(),
            "Counter 'fatura.document_seq' holds an invalid value: -3"
        );
    }
}
