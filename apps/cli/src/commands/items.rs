//! # Line Item Commands
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  add_item ──► update_item ──► remove_item        set_discount           │
//! │      │             │               │                  │                 │
//! │      └─────────────┴───────┬───────┘                  │                 │
//! │                            ▼                          ▼                 │
//! │                     ItemsResponse { items, totals, warranty }           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use fatura_core::{LineItemPatch, WarrantyResult, WarrantyRules};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ApiError, ApiResult};
use crate::state::DocumentState;
use crate::summary::{ItemRow, TotalsView};

/// Rows plus everything derived from them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsResponse {
    pub items: Vec<ItemRow>,
    pub discount: String,
    pub totals: TotalsView,
    pub warranty: WarrantyResult,
}

fn items_response(document: &DocumentState, rules: &WarrantyRules) -> ItemsResponse {
    document.with_session(|session| ItemsResponse {
        items: session.ledger().items().iter().map(ItemRow::from).collect(),
        discount: session.discount().to_string(),
        totals: TotalsView::from(session.totals()),
        warranty: session.warranty(rules),
    })
}

/// Current rows, totals and warranty.
pub fn get_items(document: &DocumentState, rules: &WarrantyRules) -> ItemsResponse {
    items_response(document, rules)
}

/// Appends a default row. Returns its id and the updated rows.
pub fn add_item(document: &DocumentState, rules: &WarrantyRules) -> (String, ItemsResponse) {
    let id = document.with_session_mut(|session| session.add_row());
    debug!(id = %id, "add_item command");
    (id, items_response(document, rules))
}

/// Patches a row.
///
/// ## Errors
/// `NOT_FOUND` if no row has `id`.
pub fn update_item(
    document: &DocumentState,
    rules: &WarrantyRules,
    id: &str,
    patch: LineItemPatch,
) -> ApiResult<ItemsResponse> {
    debug!(id = %id, "update_item command");
    if !document.with_session_mut(|session| session.update_row(id, patch)) {
        return Err(ApiError::not_found("Line item", id));
    }
    Ok(items_response(document, rules))
}

/// Removes a row.
///
/// Removing the only row is a silent no-op; the ledger is never empty.
///
/// ## Errors
/// `NOT_FOUND` if no row has `id`.
pub fn remove_item(document: &DocumentState, rules: &WarrantyRules, id: &str) -> ApiResult<ItemsResponse> {
    debug!(id = %id, "remove_item command");
    let known = document.with_session_mut(|session| {
        let known = session.ledger().get(id).is_some();
        session.remove_row(id);
        known
    });
    if !known {
        return Err(ApiError::not_found("Line item", id));
    }
    Ok(items_response(document, rules))
}

/// Replaces the discount text.
pub fn set_discount(
    document: &DocumentState,
    rules: &WarrantyRules,
    discount: impl Into<String>,
) -> ItemsResponse {
    document.with_session_mut(|session| session.set_discount(discount));
    items_response(document, rules)
}
