//! # Document Session
//!
//! The in-progress document: identity, customer pair, line items and
//! discount, plus the derived totals and warranty disclosure.
//!
//! ## Recompute-On-Read
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  edit ──► session state mutated ──► caller asks for totals()/warranty() │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                          pure functions over the current rows           │
//! │                                                                         │
//! │  Nothing derived is cached, so derived values always match the input.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::customer::{CustomerPair, CustomerSlot};
use crate::ledger::{LineItemLedger, LineItemPatch};
use crate::numbering::{CounterStore, DocumentNumberGenerator};
use crate::totals::{calculate_totals, Totals};
use crate::types::{DocumentIdentity, DocumentType, Language, DEFAULT_CURRENCY};
use crate::warranty::{WarrantyResult, WarrantyRules};

/// Default discount text of a new document.
pub const DEFAULT_DISCOUNT: &str = "0";

/// One document being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentSession {
    identity: DocumentIdentity,
    customer: CustomerPair,
    ledger: LineItemLedger,
    discount: String,
}

impl DocumentSession {
    /// Starts an invoice dated today in SAR.
    pub fn new() -> Self {
        Self::with_identity(DocumentIdentity::new(
            DocumentType::default(),
            Local::now().date_naive(),
            DEFAULT_CURRENCY,
        ))
    }

    /// Starts a session with the given header.
    pub fn with_identity(identity: DocumentIdentity) -> Self {
        DocumentSession {
            identity,
            customer: CustomerPair::new(),
            ledger: LineItemLedger::new(),
            discount: DEFAULT_DISCOUNT.to_string(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn identity(&self) -> &DocumentIdentity {
        &self.identity
    }

    pub fn customer(&self) -> &CustomerPair {
        &self.customer
    }

    pub fn ledger(&self) -> &LineItemLedger {
        &self.ledger
    }

    pub fn discount(&self) -> &str {
        &self.discount
    }

    // =========================================================================
    // Customer
    // =========================================================================

    /// Edits a customer slot from the `language` form.
    pub fn set_customer_field(&mut self, language: Language, slot: CustomerSlot, value: impl Into<String>) {
        self.customer.set_field(language, slot, value);
    }

    // =========================================================================
    // Line Items
    // =========================================================================

    /// Adds a default row and returns its id.
    pub fn add_row(&mut self) -> String {
        self.ledger.add_row()
    }

    /// Patches a row. `false` if the id is unknown.
    pub fn update_row(&mut self, id: &str, patch: LineItemPatch) -> bool {
        self.ledger.update_row(id, patch)
    }

    /// Removes a row. `false` if unknown or the last one.
    pub fn remove_row(&mut self, id: &str) -> bool {
        self.ledger.remove_row(id)
    }

    /// Replaces the discount text.
    pub fn set_discount(&mut self, discount: impl Into<String>) {
        self.discount = discount.into();
    }

    // =========================================================================
    // Identity
    // =========================================================================

    /// Switches the document type. An assigned number is kept as is.
    pub fn select_document_type(&mut self, document_type: DocumentType) {
        self.identity.document_type = document_type;
    }

    /// User edit of the document number.
    pub fn set_document_number(&mut self, number: impl Into<String>) {
        self.identity.document_number = Some(number.into());
    }

    pub fn set_document_date(&mut self, date: NaiveDate) {
        self.identity.document_date = date;
    }

    pub fn set_currency(&mut self, currency: impl Into<String>) {
        self.identity.currency = currency.into();
    }

    /// Whether a number still has to be allocated.
    pub fn needs_document_number(&self) -> bool {
        self.identity.document_number.is_none()
    }

    /// Assigns `number` only if none exists yet; returns the number in effect.
    pub fn assign_document_number(&mut self, number: String) -> &str {
        self.identity.document_number.get_or_insert(number)
    }

    /// Allocates a number for the current type on first use.
    ///
    /// Later calls, including after a type change, return the existing
    /// number without touching the counter.
    pub async fn ensure_document_number<S: CounterStore>(&mut self, generator: &DocumentNumberGenerator<S>) -> &str {
        if self.needs_document_number() {
            let number = generator.allocate(self.identity.document_type).await;
            self.identity.document_number = Some(number);
        }
        self.identity.document_number.as_deref().unwrap_or_default()
    }

    // =========================================================================
    // Derived Values
    // =========================================================================

    /// Totals for the current rows and discount.
    pub fn totals(&self) -> Totals {
        calculate_totals(self.ledger.items(), &self.discount)
    }

    /// Warranty disclosure for the current rows.
    pub fn warranty(&self, rules: &WarrantyRules) -> WarrantyResult {
        rules.evaluate(self.ledger.items())
    }
}

impl Default for DocumentSession {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
