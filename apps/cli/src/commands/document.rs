//! # Document Commands
//!
//! Type selection, numbering and the full summary.
//!
//! ## Lazy Numbering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  select_document_type("order")                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lock session: set type, read needs_document_number, unlock             │
//! │       │                                                                 │
//! │       ├── number already assigned ──► done (number untouched)           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  generator.allocate(Order).await        (session lock NOT held)         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lock session: assign_document_number   (first assignment wins)         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use fatura_core::{CounterStore, DocumentIdentity, DocumentType, WarrantyRules};
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};
use crate::state::{DocumentState, NumberingState};
use crate::summary::DocumentSummary;

/// Selects the document type, allocating a number on first selection.
///
/// A document that already has a number keeps it, whatever type is
/// selected afterwards.
///
/// ## Errors
/// `UNKNOWN_DOCUMENT_TYPE` for anything but `quote`, `order`, `invoice`;
/// the session is left unchanged.
pub async fn select_document_type<S: CounterStore>(
    document: &DocumentState,
    numbering: &NumberingState<S>,
    document_type: &str,
) -> ApiResult<DocumentIdentity> {
    let document_type: DocumentType = document_type.parse()?;
    debug!(%document_type, "select_document_type command");

    let needs_number = document.with_session_mut(|session| {
        session.select_document_type(document_type);
        session.needs_document_number()
    });

    if needs_number {
        let number = numbering.generator().allocate(document_type).await;
        document.with_session_mut(|session| {
            let assigned = session.assign_document_number(number.clone());
            if assigned == number {
                info!(number = %number, "Document number assigned");
            } else {
                debug!(discarded = %number, kept = %assigned, "Document already numbered");
            }
        });
    }

    Ok(document.with_session(|session| session.identity().clone()))
}

/// User edit of the document number.
pub fn set_document_number(document: &DocumentState, number: impl Into<String>) -> DocumentIdentity {
    document.with_session_mut(|session| {
        session.set_document_number(number);
        session.identity().clone()
    })
}

/// Sets the document date from `YYYY-MM-DD`.
pub fn set_document_date(document: &DocumentState, date: &str) -> ApiResult<DocumentIdentity> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|e| ApiError::validation(format!("Invalid document date '{}': {}", date, e)))?;

    Ok(document.with_session_mut(|session| {
        session.set_document_date(date);
        session.identity().clone()
    }))
}

/// Sets the currency code printed on the document.
pub fn set_currency(document: &DocumentState, currency: impl Into<String>) -> DocumentIdentity {
    document.with_session_mut(|session| {
        session.set_currency(currency);
        session.identity().clone()
    })
}

/// Everything the renderer needs for the current document.
pub fn get_document_summary(document: &DocumentState, rules: &WarrantyRules, config: &AppConfig) -> DocumentSummary {
    document.with_session(|session| DocumentSummary::build(session, rules, config))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use fatura_core::numbering::DEFAULT_COUNTER_KEY;
    use fatura_core::MemoryCounterStore;

    fn numbering() -> NumberingState<MemoryCounterStore> {
        NumberingState::new(MemoryCounterStore::new(), DEFAULT_COUNTER_KEY)
    }

    #[tokio::test]
    async fn test_first_selection_allocates_once() {
        let document = DocumentState::default();
        let numbering = numbering();

        let first = select_document_type(&document, &numbering, "quote").await.unwrap();
        let number = first.document_number.clone().unwrap();
        assert!(number.starts_with("Q-"));

        let second = select_document_type(&document, &numbering, "invoice").await.unwrap();
        assert_eq!(second.document_type, DocumentType::Invoice);
        assert_eq!(second.document_number.as_deref(), Some(number.as_str()));
        assert_eq!(numbering.generator().store().get(DEFAULT_COUNTER_KEY), Some(1));
    }

    #[tokio::test]
    async fn test_unknown_type_is_rejected_without_change() {
        let document = DocumentState::default();
        let numbering = numbering();

        let err = select_document_type(&document, &numbering, "receipt").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::UnknownDocumentType);

        document.with_session(|session| {
            assert_eq!(session.identity().document_type, DocumentType::Invoice);
            assert!(session.needs_document_number());
        });
        assert_eq!(numbering.generator().store().get(DEFAULT_COUNTER_KEY), None);
    }

    #[tokio::test]
    async fn test_user_number_survives_type_change() {
        let document = DocumentState::default();
        let numbering = numbering();

        set_document_number(&document, "MANUAL-1");
        let identity = select_document_type(&document, &numbering, "order").await.unwrap();

        assert_eq!(identity.document_number.as_deref(), Some("MANUAL-1"));
        assert_eq!(numbering.generator().store().get(DEFAULT_COUNTER_KEY), None);
    }

    #[tokio::test]
    async fn test_separate_documents_get_increasing_numbers() {
        let numbering = numbering();
        let a = DocumentState::default();
        let b = DocumentState::default();

        let first = select_document_type(&a, &numbering, "invoice").await.unwrap();
        let second = select_document_type(&b, &numbering, "invoice").await.unwrap();

        assert!(second.document_number.unwrap() > first.document_number.unwrap());
    }

    #[test]
    fn test_set_date_and_currency() {
        let document = DocumentState::default();

        let identity = set_document_date(&document, "2024-02-29").unwrap();
        assert_eq!(identity.document_date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());

        let err = set_document_date(&document, "29/02/2024").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        assert_eq!(set_currency(&document, "USD").currency, "USD");
    }
}
