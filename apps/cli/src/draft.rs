//! # Document Drafts
//!
//! A JSON description of a document, replayed through the command layer as
//! if a user had typed it.
//!
//! ## Replay Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. document_number   (a given number suppresses allocation)            │
//! │  2. document_type     (allocates on first selection)                    │
//! │  3. document_date, currency                                             │
//! │  4. customer.arabic   then customer.english                             │
//! │  5. items             (first patches the initial row, rest are added)   │
//! │  6. discount                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Because Arabic fields are applied before English ones, an English value
//! wins on a linked slot both sides set.
//!
//! ## Example
//! ```json
//! {
//!   "document_type": "invoice",
//!   "customer": {
//!     "arabic":  { "name": "مؤسسة النور", "cr": "1010" },
//!     "english": { "name": "Al Noor Est.", "phone": "0555000000" }
//!   },
//!   "items": [
//!     { "item_code": "500", "item_name": "Engine", "quantity": "1", "unit_price": "1200" }
//!   ],
//!   "discount": "50"
//! }
//! ```

use fatura_core::{CounterStore, LineItemPatch, WarrantyRules};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::commands::{customer, document, items};
use crate::error::ApiResult;
use crate::state::{DocumentState, NumberingState};

fn default_document_type() -> String {
    "invoice".to_string()
}

/// Customer fields keyed by slot name, per language.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DraftCustomer {
    pub arabic: BTreeMap<String, String>,
    pub english: BTreeMap<String, String>,
}

/// A document to replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDraft {
    #[serde(default = "default_document_type")]
    pub document_type: String,
    #[serde(default)]
    pub document_number: Option<String>,
    /// `YYYY-MM-DD`; today if absent.
    #[serde(default)]
    pub document_date: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub customer: DraftCustomer,
    #[serde(default)]
    pub items: Vec<LineItemPatch>,
    #[serde(default)]
    pub discount: Option<String>,
}

impl DocumentDraft {
    /// Parses a draft from JSON text.
    pub fn from_json(text: &str) -> ApiResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Replays the draft into `document`.
    ///
    /// Stops at the first failing step; earlier steps stay applied.
    pub async fn apply<S: CounterStore>(
        &self,
        document_state: &DocumentState,
        numbering: &NumberingState<S>,
        rules: &WarrantyRules,
    ) -> ApiResult<()> {
        debug!(document_type = %self.document_type, items = self.items.len(), "Applying draft");

        if let Some(number) = &self.document_number {
            document::set_document_number(document_state, number.clone());
        }
        document::select_document_type(document_state, numbering, &self.document_type).await?;

        if let Some(date) = &self.document_date {
            document::set_document_date(document_state, date)?;
        }
        if let Some(currency) = &self.currency {
            document::set_currency(document_state, currency.clone());
        }

        for (slot, value) in &self.customer.arabic {
            customer::set_customer_field(document_state, "ar", slot, value.clone())?;
        }
        for (slot, value) in &self.customer.english {
            customer::set_customer_field(document_state, "en", slot, value.clone())?;
        }

        for (index, patch) in self.items.iter().enumerate() {
            let first_row = match index {
                0 => document_state
                    .with_session(|session| session.ledger().items().first().map(|item| item.id.clone())),
                _ => None,
            };
            let id = match first_row {
                Some(id) => id,
                None => items::add_item(document_state, rules).0,
            };
            items::update_item(document_state, rules, &id, patch.clone())?;
        }

        if let Some(discount) = &self.discount {
            items::set_discount(document_state, rules, discount.clone());
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
