//! # Line Item Ledger
//!
//! The ordered rows of the document being edited.
//!
//! ## Row Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Ledger Operations                                │
//! │                                                                         │
//! │  add_row()      ──► push { id: new uuid, qty: "1", price: "0" }         │
//! │  update_row()   ──► patch fields of one row in place                    │
//! │  remove_row()   ──► drop one row, unless it is the last one             │
//! │                                                                         │
//! │  Quantities and prices are stored as typed text so in-progress input   │
//! │  ("1.", "") survives; they are parsed only when totals are computed.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::{parse_amount, Money};

/// Default quantity text of a new row.
pub const DEFAULT_QUANTITY: &str = "1";

/// Default unit price text of a new row.
pub const DEFAULT_UNIT_PRICE: &str = "0";

// =============================================================================
// Line Item
// =============================================================================

/// A single row of the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Session-unique id (UUID v4), never reused.
    pub id: String,
    /// Item number; drives warranty eligibility.
    pub item_code: String,
    pub item_name: String,
    pub unit: String,
    /// Quantity as typed.
    pub quantity: String,
    /// Unit price before VAT, as typed.
    pub unit_price: String,
}

impl LineItem {
    /// Creates an empty row with a fresh id.
    pub fn new() -> Self {
        LineItem {
            id: Uuid::new_v4().to_string(),
            item_code: String::new(),
            item_name: String::new(),
            unit: String::new(),
            quantity: DEFAULT_QUANTITY.to_string(),
            unit_price: DEFAULT_UNIT_PRICE.to_string(),
        }
    }

    /// Row amount shown in the items table: unit price × quantity, before VAT.
    ///
    /// Unparseable or out-of-range input shows as zero.
    pub fn line_total(&self) -> Money {
        Money::from_amount(parse_amount(&self.unit_price))
            .and_then(|price| price.multiply_quantity(parse_amount(&self.quantity)))
            .unwrap_or_default()
    }

    fn apply(&mut self, patch: LineItemPatch) {
        if let Some(item_code) = patch.item_code {
            self.item_code = item_code;
        }
        if let Some(item_name) = patch.item_name {
            self.item_name = item_name;
        }
        if let Some(unit) = patch.unit {
            self.unit = unit;
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(unit_price) = patch.unit_price {
            self.unit_price = unit_price;
        }
    }
}

impl Default for LineItem {
    fn default() -> Self {
        Self::new()
    }
}

/// A partial update to a row. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItemPatch {
    #[serde(default)]
    pub item_code: Option<String>,
    #[serde(default)]
    pub item_name: Option<String>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub quantity: Option<String>,
    #[serde(default)]
    pub unit_price: Option<String>,
}

// =============================================================================
// Ledger
// =============================================================================

/// The ordered collection of line items.
///
/// ## Invariants
/// - Never empty: it starts with one row and the last row cannot be removed
/// - Row ids are unique and stable for the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItemLedger {
    items: Vec<LineItem>,
}

impl LineItemLedger {
    /// Creates a ledger holding one default row.
    pub fn new() -> Self {
        LineItemLedger {
            items: vec![LineItem::new()],
        }
    }

    /// Appends a default row and returns its id.
    pub fn add_row(&mut self) -> String {
        let item = LineItem::new();
        let id = item.id.clone();
        self.items.push(item);
        id
    }

    /// Removes the row with `id`.
    ///
    /// Returns `false` without changing anything when `id` is unknown or
    /// names the only remaining row.
    ///
    /// ## Example
    /// ```rust
    /// use fatura_core::ledger::LineItemLedger;
    ///
    /// let mut ledger = LineItemLedger::new();
    /// let only = ledger.items()[0].id.clone();
    /// assert!(!ledger.remove_row(&only));
    /// assert_eq!(ledger.len(), 1);
    /// ```
    pub fn remove_row(&mut self, id: &str) -> bool {
        if self.items.len() <= 1 {
            return false;
        }
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Applies `patch` to the row with `id`. Returns `false` if not found.
    pub fn update_row(&mut self, id: &str, patch: LineItemPatch) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Looks up a row.
    pub fn get(&self, id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Rows in display order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Number of rows (always at least one).
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Default for LineItemLedger {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
