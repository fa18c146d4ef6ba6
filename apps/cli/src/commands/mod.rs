//! # Commands
//!
//! The operations a front end performs on the document being edited.
//! Each command is a plain function over the state objects it needs and
//! returns what the caller should re-render.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  customer.rs   set_customer_field, get_customer                         │
//! │  items.rs      add_item, update_item, remove_item, set_discount,        │
//! │                get_items                                                │
//! │  document.rs   select_document_type, set_document_number,               │
//! │                set_document_date, set_currency, get_document_summary    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Totals and warranty are never cached: every response is computed from
//! the session as it is after the edit.

pub mod customer;
pub mod document;
pub mod items;
