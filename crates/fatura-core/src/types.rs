//! # Domain Types
//!
//! Document identity types used throughout Fatura.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  DocumentType   │   │DocumentIdentity │   │    TaxRate      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Quote    (Q)   │   │  document_type  │   │  bps (u32)      │       │
//! │  │  Order    (SO)  │   │  number (once)  │   │  1500 = 15%     │       │
//! │  │  Invoice  (INV) │   │  date, currency │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::customer::CustomerSlot;
use crate::error::CoreError;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so 1500 bps = 15% (Saudi VAT).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the unrounded tax on `amount`.
    ///
    /// `None` only if the multiplication overflows the decimal range.
    pub fn apply(&self, amount: Decimal) -> Option<Decimal> {
        amount
            .checked_mul(Decimal::from(self.0))?
            .checked_div(Decimal::from(10_000))
    }
}

/// The fixed VAT rate applied to every line (15%).
pub const VAT_RATE: TaxRate = TaxRate::from_bps(1500);

// =============================================================================
// Language
// =============================================================================

/// One of the two parallel display languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    Arabic,
    English,
}

impl FromStr for Language {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ar" | "arabic" => Ok(Language::Arabic),
            "en" | "english" => Ok(Language::English),
            other => Err(CoreError::UnknownLanguage(other.to_string())),
        }
    }
}

// =============================================================================
// Document Type
// =============================================================================

/// The kind of commercial document being issued.
///
/// ## What The Type Controls
/// - The prefix of the allocated document number
/// - The bilingual title printed on the document
/// - Which customer fields the front end shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// Price quotation (عرض سعر).
    Quote,
    /// Customer sales order (طلب عميل).
    Order,
    /// Simplified tax invoice (فاتورة ضريبية مبسطة).
    #[default]
    Invoice,
}

impl DocumentType {
    /// All document types in display order.
    pub const ALL: [DocumentType; 3] = [DocumentType::Quote, DocumentType::Order, DocumentType::Invoice];

    /// Prefix of the document number.
    pub const fn prefix(&self) -> &'static str {
        match self {
            DocumentType::Quote => "Q",
            DocumentType::Order => "SO",
            DocumentType::Invoice => "INV",
        }
    }

    /// Stable lowercase identifier (`quote`, `order`, `invoice`).
    pub const fn id(&self) -> &'static str {
        match self {
            DocumentType::Quote => "quote",
            DocumentType::Order => "order",
            DocumentType::Invoice => "invoice",
        }
    }

    /// Document title in the given language.
    pub const fn title(&self, language: Language) -> &'static str {
        match (self, language) {
            (DocumentType::Quote, Language::Arabic) => "عرض سعر",
            (DocumentType::Quote, Language::English) => "Quotation",
            (DocumentType::Order, Language::Arabic) => "طلب عميل",
            (DocumentType::Order, Language::English) => "Sales Order",
            (DocumentType::Invoice, Language::Arabic) => "فاتورة ضريبية مبسطة",
            (DocumentType::Invoice, Language::English) => "Simplified Tax Invoice",
        }
    }

    /// Customer slots shown for this document type.
    ///
    /// Quotes and orders only need a name and phone; the invoice carries
    /// the full tax identity of the buyer. Hidden slots keep their values.
    pub fn visible_slots(&self) -> &'static [CustomerSlot] {
        match self {
            DocumentType::Quote | DocumentType::Order => &[CustomerSlot::Name, CustomerSlot::Phone],
            DocumentType::Invoice => &CustomerSlot::ALL,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for DocumentType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "quote" => Ok(DocumentType::Quote),
            "order" => Ok(DocumentType::Order),
            "invoice" => Ok(DocumentType::Invoice),
            _ => Err(CoreError::UnknownDocumentType(s.to_string())),
        }
    }
}

// =============================================================================
// Document Identity
// =============================================================================

/// Default ISO 4217 currency for new documents.
pub const DEFAULT_CURRENCY: &str = "SAR";

/// Header data of one document instance.
///
/// `document_number` is `None` until the generator assigns one; after that
/// it only changes through explicit user edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DocumentIdentity {
    pub document_type: DocumentType,
    pub document_number: Option<String>,
    #[ts(as = "String")]
    pub document_date: NaiveDate,
    pub currency: String,
}

impl DocumentIdentity {
    /// Creates an identity with no number yet.
    pub fn new(document_type: DocumentType, document_date: NaiveDate, currency: impl Into<String>) -> Self {
        DocumentIdentity {
            document_type,
            document_number: None,
            document_date,
            currency: currency.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
