//! # Customer Records
//!
//! The parallel Arabic/English customer records and the field links
//! between them.
//!
//! ## Linking Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Linked Customer Slots                              │
//! │                                                                         │
//! │   Arabic record                         English record                  │
//! │   ─────────────                         ──────────────                  │
//! │   name           (independent)          name                            │
//! │   phone          ◄──────────────────►   phone                           │
//! │   tax_number     ◄──────────────────►   tax_number                      │
//! │   address        ◄──────────────────►   address                         │
//! │   registration   ◄──────────────────►   registration                    │
//! │                                                                         │
//! │  A write to a linked slot on either side lands on both sides before     │
//! │  the call returns. Last writer wins.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The Arabic form labels the registration slot "السجل التجاري" and the
//! English form "Reg. No"; internally both are [`CustomerSlot::Registration`].

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;

use crate::error::CoreError;
use crate::types::Language;

// =============================================================================
// Customer Slot
// =============================================================================

/// A semantic field of a customer record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum CustomerSlot {
    Name,
    Phone,
    TaxNumber,
    Address,
    /// Commercial registration number.
    Registration,
}

impl CustomerSlot {
    /// All slots in form order.
    pub const ALL: [CustomerSlot; 5] = [
        CustomerSlot::Name,
        CustomerSlot::Phone,
        CustomerSlot::TaxNumber,
        CustomerSlot::Address,
        CustomerSlot::Registration,
    ];

    /// Whether edits to this slot are mirrored into the other language.
    ///
    /// Only the name is written independently per language.
    pub const fn is_linked(&self) -> bool {
        !matches!(self, CustomerSlot::Name)
    }

    /// Form label in the given language.
    pub const fn label(&self, language: Language) -> &'static str {
        match (self, language) {
            (CustomerSlot::Name, Language::Arabic) => "الاسم:",
            (CustomerSlot::Name, Language::English) => "Name:",
            (CustomerSlot::Phone, Language::Arabic) => "الهاتف:",
            (CustomerSlot::Phone, Language::English) => "Phone:",
            (CustomerSlot::TaxNumber, Language::Arabic) => "الرقم الضريبي:",
            (CustomerSlot::TaxNumber, Language::English) => "Tax No:",
            (CustomerSlot::Address, Language::Arabic) => "العنوان الوطني:",
            (CustomerSlot::Address, Language::English) => "Address:",
            (CustomerSlot::Registration, Language::Arabic) => "السجل التجاري:",
            (CustomerSlot::Registration, Language::English) => "Reg. No:",
        }
    }
}

impl FromStr for CustomerSlot {
    type Err = CoreError;

    /// Accepts the internal names plus the per-language aliases the
    /// original forms used (`tax`, `cr`, `reg`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "name" => Ok(CustomerSlot::Name),
            "phone" => Ok(CustomerSlot::Phone),
            "tax" | "tax_number" => Ok(CustomerSlot::TaxNumber),
            "address" => Ok(CustomerSlot::Address),
            "registration" | "reg" | "cr" | "commercial_register" => Ok(CustomerSlot::Registration),
            other => Err(CoreError::UnknownCustomerSlot(other.to_string())),
        }
    }
}

// =============================================================================
// Customer Record
// =============================================================================

/// One language's view of the customer.
///
/// Values are stored exactly as typed; the engine never validates them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerRecord {
    pub name: String,
    pub phone: String,
    pub tax_number: String,
    pub address: String,
    pub registration: String,
}

impl CustomerRecord {
    /// Reads a slot.
    pub fn get(&self, slot: CustomerSlot) -> &str {
        match slot {
            CustomerSlot::Name => &self.name,
            CustomerSlot::Phone => &self.phone,
            CustomerSlot::TaxNumber => &self.tax_number,
            CustomerSlot::Address => &self.address,
            CustomerSlot::Registration => &self.registration,
        }
    }

    /// Writes a slot of this record only.
    pub fn set(&mut self, slot: CustomerSlot, value: impl Into<String>) {
        let value = value.into();
        match slot {
            CustomerSlot::Name => self.name = value,
            CustomerSlot::Phone => self.phone = value,
            CustomerSlot::TaxNumber => self.tax_number = value,
            CustomerSlot::Address => self.address = value,
            CustomerSlot::Registration => self.registration = value,
        }
    }
}

// =============================================================================
// Customer Pair
// =============================================================================

/// The Arabic and English customer records kept in sync.
///
/// ## Invariant
/// For every linked slot, `arabic.get(slot) == english.get(slot)` holds
/// after every call that goes through this type.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerPair {
    arabic: CustomerRecord,
    english: CustomerRecord,
}

impl CustomerPair {
    /// Creates a pair with both records empty.
    pub fn new() -> Self {
        Self::default()
    }

    /// The Arabic record.
    pub fn arabic(&self) -> &CustomerRecord {
        &self.arabic
    }

    /// The English record.
    pub fn english(&self) -> &CustomerRecord {
        &self.english
    }

    /// The record for `language`.
    pub fn record(&self, language: Language) -> &CustomerRecord {
        match language {
            Language::Arabic => &self.arabic,
            Language::English => &self.english,
        }
    }

    /// Edit from the Arabic form.
    pub fn set_arabic_field(&mut self, slot: CustomerSlot, value: impl Into<String>) {
        self.set_field(Language::Arabic, slot, value);
    }

    /// Edit from the English form.
    pub fn set_english_field(&mut self, slot: CustomerSlot, value: impl Into<String>) {
        self.set_field(Language::English, slot, value);
    }

    /// Writes `value` into `language`'s record, and into the other record
    /// as well when `slot` is linked.
    ///
    /// ## Example
    /// ```rust
    /// use fatura_core::customer::{CustomerPair, CustomerSlot};
    ///
    /// let mut pair = CustomerPair::new();
    /// pair.set_arabic_field(CustomerSlot::Phone, "0500123007");
    /// assert_eq!(pair.english().phone, "0500123007");
    ///
    /// pair.set_english_field(CustomerSlot::Name, "Road Biker");
    /// assert_eq!(pair.arabic().name, "");
    /// ```
    pub fn set_field(&mut self, language: Language, slot: CustomerSlot, value: impl Into<String>) {
        let value = value.into();
        if slot.is_linked() {
            let (own, other) = match language {
                Language::Arabic => (&mut self.arabic, &mut self.english),
                Language::English => (&mut self.english, &mut self.arabic),
            };
            other.set(slot, value.clone());
            own.set(slot, value);
        } else {
            match language {
                Language::Arabic => self.arabic.set(slot, value),
                Language::English => self.english.set(slot, value),
            }
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const LINKED: [CustomerSlot; 4] = [
        CustomerSlot::Phone,
        CustomerSlot::TaxNumber,
        CustomerSlot::Address,
        CustomerSlot::Registration,
    ];

    #[test]
    fn test_arabic_edit_mirrors_linked_slots() {
        for slot in LINKED {
            let mut pair = CustomerPair::new();
            pair.set_arabic_field(slot, "301294984200003");
            assert_eq!(pair.english().get(slot), "301294984200003", "{:?}", slot);
            assert_eq!(pair.arabic().get(slot), "301294984200003", "{:?}", slot);
        }
    }

    #[test]
    fn test_english_edit_mirrors_linked_slots() {
        for slot in LINKED {
            let mut pair = CustomerPair::new();
            pair.set_english_field(slot, "Hail - Al-Naisiyah Road");
            assert_eq!(pair.arabic().get(slot), "Hail - Al-Naisiyah Road", "{:?}", slot);
        }
    }

    #[test]
    fn test_name_is_independent() {
        let mut pair = CustomerPair::new();
        pair.set_arabic_field(CustomerSlot::Name, "رود بايكر");
        pair.set_english_field(CustomerSlot::Name, "Road Biker");

        assert_eq!(pair.arabic().name, "رود بايكر");
        assert_eq!(pair.english().name, "Road Biker");
    }

    #[test]
    fn test_last_writer_wins() {
        let mut pair = CustomerPair::new();
        pair.set_arabic_field(CustomerSlot::Address, "حائل");
        pair.set_english_field(CustomerSlot::Address, "Hail");

        assert_eq!(pair.arabic().address, "Hail");
        assert_eq!(pair.english().address, "Hail");
    }

    #[test]
    fn test_empty_value_is_accepted_and_mirrored() {
        let mut pair = CustomerPair::new();
        pair.set_arabic_field(CustomerSlot::Phone, "0500");
        pair.set_english_field(CustomerSlot::Phone, "");

        assert_eq!(pair.arabic().phone, "");
        assert_eq!(pair.english().phone, "");
    }

    #[test]
    fn test_slot_aliases() {
        assert_eq!("cr".parse::<CustomerSlot>().unwrap(), CustomerSlot::Registration);
        assert_eq!("reg".parse::<CustomerSlot>().unwrap(), CustomerSlot::Registration);
        assert_eq!("tax".parse::<CustomerSlot>().unwrap(), CustomerSlot::TaxNumber);
        assert!("email".parse::<CustomerSlot>().is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(CustomerSlot::Registration.label(Language::Arabic), "السجل التجاري:");
        assert_eq!(CustomerSlot::Registration.label(Language::English), "Reg. No:");
    }
}
