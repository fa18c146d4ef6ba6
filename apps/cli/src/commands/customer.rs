//! # Customer Commands

use fatura_core::{CustomerPair, CustomerSlot, Language};
use tracing::debug;

use crate::error::ApiResult;
use crate::state::DocumentState;

/// Edits one customer slot from the `language` form.
///
/// Linked slots are written to both records; `name` only to its own.
///
/// ## Arguments
/// * `language` - `ar`/`arabic` or `en`/`english`
/// * `slot` - `name`, `phone`, `tax`, `address`, `registration` (or `cr`/`reg`)
pub fn set_customer_field(
    document: &DocumentState,
    language: &str,
    slot: &str,
    value: impl Into<String>,
) -> ApiResult<CustomerPair> {
    let language: Language = language.parse()?;
    let slot: CustomerSlot = slot.parse()?;
    debug!(?language, ?slot, "set_customer_field command");

    Ok(document.with_session_mut(|session| {
        session.set_customer_field(language, slot, value);
        session.customer().clone()
    }))
}

/// Both customer records.
pub fn get_customer(document: &DocumentState) -> CustomerPair {
    document.with_session(|session| session.customer().clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_linked_fields_follow_last_writer() {
        let document = DocumentState::default();

        set_customer_field(&document, "ar", "cr", "1010").unwrap();
        let pair = set_customer_field(&document, "en", "reg", "2020").unwrap();

        assert_eq!(pair.arabic().registration, "2020");
        assert_eq!(pair.english().registration, "2020");
    }

    #[test]
    fn test_name_is_independent() {
        let document = DocumentState::default();

        set_customer_field(&document, "arabic", "name", "محمد").unwrap();
        set_customer_field(&document, "english", "name", "Mohammed").unwrap();

        let pair = get_customer(&document);
        assert_eq!(pair.arabic().name, "محمد");
        assert_eq!(pair.english().name, "Mohammed");
    }

    #[test]
    fn test_unknown_slot_or_language() {
        let document = DocumentState::default();

        let err = set_customer_field(&document, "ar", "fax", "1").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);

        let err = set_customer_field(&document, "fr", "phone", "1").unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
