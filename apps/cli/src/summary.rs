//! # Document Summary
//!
//! Everything the renderer needs to print one document, computed from the
//! current session in a single pass.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DocumentSummary                                                        │
//! │  ├── document   type, bilingual title, number, date, currency           │
//! │  ├── seller     header block from config                                │
//! │  ├── customer   arabic + english records, slots shown for this type     │
//! │  ├── items      rows with their formatted line totals                   │
//! │  ├── totals     cents and "0.00" strings                                │
//! │  ├── warranty   applies + both texts                                    │
//! │  └── printed_by                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use fatura_core::{
    CustomerRecord, CustomerSlot, DocumentSession, DocumentType, Language, LineItem, Totals, WarrantyResult,
    WarrantyRules,
};
use serde::{Deserialize, Serialize};

use crate::config::{AppConfig, SellerConfig};

/// Header of the printed document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentHeader {
    pub document_type: DocumentType,
    pub title_arabic: String,
    pub title_english: String,
    /// Empty until a number has been assigned.
    pub document_number: String,
    /// `YYYY-MM-DD`
    pub document_date: String,
    pub currency: String,
}

/// Customer block with the slots this document type shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerView {
    pub arabic: CustomerRecord,
    pub english: CustomerRecord,
    pub visible_slots: Vec<CustomerSlot>,
}

/// A line item plus its display amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRow {
    #[serde(flatten)]
    pub item: LineItem,
    pub line_total_cents: i64,
    pub line_total: String,
}

impl From<&LineItem> for ItemRow {
    fn from(item: &LineItem) -> Self {
        let line_total = item.line_total();
        ItemRow {
            item: item.clone(),
            line_total_cents: line_total.cents(),
            line_total: line_total.to_string(),
        }
    }
}

/// Totals in cents plus their printed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TotalsView {
    #[serde(flatten)]
    pub cents: Totals,
    pub subtotal: String,
    pub vat: String,
    pub grand_total: String,
    pub discount: String,
    pub final_total: String,
}

impl From<Totals> for TotalsView {
    fn from(totals: Totals) -> Self {
        TotalsView {
            cents: totals,
            subtotal: totals.subtotal().to_string(),
            vat: totals.vat().to_string(),
            grand_total: totals.grand_total().to_string(),
            discount: totals.discount().to_string(),
            final_total: totals.final_total().to_string(),
        }
    }
}

/// The full document as handed to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    pub document: DocumentHeader,
    pub seller: SellerConfig,
    pub customer: CustomerView,
    pub items: Vec<ItemRow>,
    pub totals: TotalsView,
    pub warranty: WarrantyResult,
    pub printed_by: String,
}

impl DocumentSummary {
    /// Builds the summary of `session` with `rules` and the config header.
    pub fn build(session: &DocumentSession, rules: &WarrantyRules, config: &AppConfig) -> Self {
        let identity = session.identity();
        let document_type = identity.document_type;

        DocumentSummary {
            document: DocumentHeader {
                document_type,
                title_arabic: document_type.title(Language::Arabic).to_string(),
                title_english: document_type.title(Language::English).to_string(),
                document_number: identity.document_number.clone().unwrap_or_default(),
                document_date: identity.document_date.format("%Y-%m-%d").to_string(),
                currency: identity.currency.clone(),
            },
            seller: config.seller.clone(),
            customer: CustomerView {
                arabic: session.customer().arabic().clone(),
                english: session.customer().english().clone(),
                visible_slots: document_type.visible_slots().to_vec(),
            },
            items: session.ledger().items().iter().map(ItemRow::from).collect(),
            totals: TotalsView::from(session.totals()),
            warranty: session.warranty(rules),
            printed_by: config.document.printed_by.clone(),
        }
    }
}
