//! # fatura-core: Bilingual Quote/Order/Invoice Engine
//!
//! This crate holds the document logic of Fatura as plain functions and
//! types. The only side effect it knows about is the document counter,
//! which is injected through [`numbering::CounterStore`].
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Fatura Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    fatura CLI (apps/cli)                        │   │
//! │  │    config ──► commands ──► DocumentSummary (JSON for renderer)  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ fatura-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────┐ │   │
//! │  │   │ customer │ │  ledger  │ │  totals  │ │ warranty │ │number│ │   │
//! │  │   │  AR ⇄ EN │ │   rows   │ │ VAT/disc │ │  codes   │ │  ing │ │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘ └──────┘ │   │
//! │  │                         session ties them together              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CounterStore                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 fatura-db (SQLite counter table)                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Document type, language, identity header, VAT rate
//! - [`money`] - Cent amounts and lenient parsing of typed numbers
//! - [`customer`] - Arabic/English customer records with linked fields
//! - [`ledger`] - Line item rows
//! - [`totals`] - Subtotal, VAT, discount and final total
//! - [`warranty`] - Warranty disclosure rules
//! - [`numbering`] - Document number allocation
//! - [`session`] - One document being edited
//! - [`error`] - Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use fatura_core::ledger::LineItemPatch;
//! use fatura_core::session::DocumentSession;
//! use fatura_core::warranty::WarrantyRules;
//!
//! let mut session = DocumentSession::new();
//! let row = session.ledger().items()[0].id.clone();
//! session.update_row(&row, LineItemPatch {
//!     item_code: Some("500".into()),
//!     unit_price: Some("100".into()),
//!     ..Default::default()
//! });
//!
//! assert_eq!(session.totals().grand_total_cents, 11_500);
//! assert!(session.warranty(&WarrantyRules::default()).applies);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod customer;
pub mod error;
pub mod ledger;
pub mod money;
pub mod numbering;
pub mod session;
pub mod totals;
pub mod types;
pub mod warranty;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use customer::{CustomerPair, CustomerRecord, CustomerSlot};
pub use error::{CoreError, CoreResult, CounterStoreError};
pub use ledger::{LineItem, LineItemLedger, LineItemPatch};
pub use money::Money;
pub use numbering::{CounterStore, DocumentNumberGenerator, MemoryCounterStore};
pub use session::DocumentSession;
pub use totals::{calculate_totals, Totals};
pub use types::*;
pub use warranty::{WarrantyResult, WarrantyRules};
