//! # Totals Calculator
//!
//! Computes subtotal, VAT, discount and final total from the ledger.
//!
//! ## Per-Unit VAT Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  For every row:                                                         │
//! │                                                                         │
//! │    unit_vat   = round2(unit_price × 15%)      ← rounded PER UNIT        │
//! │    price_c    = cents(unit_price)                                       │
//! │    vat_c      = cents(unit_vat)                                         │
//! │    row_sub    = round(price_c × qty)                                    │
//! │    row_vat    = round(vat_c × qty)                                      │
//! │    row_grand  = row_sub + row_vat                                       │
//! │                                                                         │
//! │  final = max(Σ row_grand − cents(discount), 0)                          │
//! │                                                                         │
//! │  VAT is scaled from the rounded unit tax, NOT rounded once on the       │
//! │  extended line amount. 3 × 0.10 gives 3 × 0.02 = 0.06, not 0.05.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All rounding is half away from zero on exact decimals.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ledger::LineItem;
use crate::money::{parse_amount, Money};
use crate::types::VAT_RATE;

// =============================================================================
// Totals
// =============================================================================

/// Document totals in integer cents.
///
/// ## Invariant
/// `final_total_cents == max(grand_total_cents - discount_cents, 0)`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Totals {
    /// Sum of row amounts before VAT.
    pub subtotal_cents: i64,
    /// Sum of row VAT.
    pub vat_cents: i64,
    /// Subtotal plus VAT.
    pub grand_total_cents: i64,
    /// Discount as entered, in cents.
    pub discount_cents: i64,
    /// Amount due after discount, never negative.
    pub final_total_cents: i64,
}

impl Totals {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn vat(&self) -> Money {
        Money::from_cents(self.vat_cents)
    }

    #[inline]
    pub fn grand_total(&self) -> Money {
        Money::from_cents(self.grand_total_cents)
    }

    #[inline]
    pub fn discount(&self) -> Money {
        Money::from_cents(self.discount_cents)
    }

    #[inline]
    pub fn final_total(&self) -> Money {
        Money::from_cents(self.final_total_cents)
    }
}

/// Cent amounts of one row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct RowAmounts {
    subtotal: Money,
    vat: Money,
}

/// Computes the amounts of one row.
///
/// A row whose numbers overflow the representable range contributes
/// nothing, the same as a row with unparseable input.
fn row_amounts(item: &LineItem) -> RowAmounts {
    let price = parse_amount(&item.unit_price);
    let quantity = parse_amount(&item.quantity);

    let compute = || -> Option<RowAmounts> {
        let unit_vat = VAT_RATE
            .apply(price)?
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let price_cents = Money::from_amount(price)?;
        let vat_cents = Money::from_amount(unit_vat)?;

        Some(RowAmounts {
            subtotal: price_cents.multiply_quantity(quantity)?,
            vat: vat_cents.multiply_quantity(quantity)?,
        })
    };

    compute().unwrap_or_default()
}

/// Computes document totals.
///
/// Pure and total: any ledger and any discount text produce a result, and
/// the same input always produces the same output.
///
/// ## Example
/// ```rust
/// use fatura_core::ledger::LineItem;
/// use fatura_core::totals::calculate_totals;
///
/// let mut row = LineItem::new();
/// row.unit_price = "100".to_string();
/// row.quantity = "2".to_string();
///
/// let totals = calculate_totals(&[row], "30");
/// assert_eq!(totals.subtotal_cents, 20_000);
/// assert_eq!(totals.vat_cents, 3_000);
/// assert_eq!(totals.grand_total_cents, 23_000);
/// assert_eq!(totals.final_total_cents, 20_000);
/// ```
pub fn calculate_totals(items: &[LineItem], discount: &str) -> Totals {
    let mut subtotal = Money::zero();
    let mut vat = Money::zero();

    for item in items {
        let row = row_amounts(item);
        subtotal += row.subtotal;
        vat += row.vat;
    }

    let grand_total = subtotal + vat;
    let discount = discount_cents(discount);
    let final_total = grand_total.sub_floor_zero(discount);

    Totals {
        subtotal_cents: subtotal.cents(),
        vat_cents: vat.cents(),
        grand_total_cents: grand_total.cents(),
        discount_cents: discount.cents(),
        final_total_cents: final_total.cents(),
    }
}

/// Discount text to cents; unusable input is no discount.
///
/// A discount too large for `i64` cents saturates, so the final total still
/// clamps to zero.
fn discount_cents(discount: &str) -> Money {
    let amount: Decimal = parse_amount(discount);
    Money::from_amount_saturating(amount)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn row(price: &str, quantity: &str) -> LineItem {
        let mut item = LineItem::new();
        item.unit_price = price.to_string();
        item.quantity = quantity.to_string();
        item
    }

    #[test]
    fn test_single_row() {
        let totals = calculate_totals(&[row("100", "1")], "0");
        assert_eq!(totals.subtotal_cents, 10_000);
        assert_eq!(totals.vat_cents, 1_500);
        assert_eq!(totals.grand_total_cents, 11_500);
        assert_eq!(totals.discount_cents, 0);
        assert_eq!(totals.final_total_cents, 11_500);
    }

    #[test]
    fn test_vat_rounded_per_unit() {
        // 10.005 × 0.15 = 1.50075 → 1.50 per unit
        let totals = calculate_totals(&[row("10.005", "1")], "0");
        assert_eq!(totals.vat_cents, 150);
        assert_eq!(totals.subtotal_cents, 1001);

        // 0.10 × 0.15 = 0.015 → 0.02 per unit, × 3 = 0.06
        // (rounding the extended 0.30 × 0.15 = 0.045 would give 0.05)
        let totals = calculate_totals(&[row("0.10", "3")], "0");
        assert_eq!(totals.vat_cents, 6);
        assert_eq!(totals.subtotal_cents, 30);
    }

    #[test]
    fn test_fractional_quantity_rounds_to_cent() {
        // 3.33 × 1.5 = 4.995 → 500 cents; VAT 0.50 × 1.5 = 0.75
        let totals = calculate_totals(&[row("3.33", "1.5")], "0");
        assert_eq!(totals.subtotal_cents, 500);
        assert_eq!(totals.vat_cents, 75);
        assert_eq!(totals.grand_total_cents, 575);
    }

    #[test]
    fn test_multiple_rows_accumulate() {
        let items = [row("100", "2"), row("50", "1"), row("", "")];
        let totals = calculate_totals(&items, "");
        assert_eq!(totals.subtotal_cents, 25_000);
        assert_eq!(totals.vat_cents, 3_750);
        assert_eq!(totals.grand_total_cents, 28_750);
        assert_eq!(totals.final_total_cents, 28_750);
    }

    #[test]
    fn test_discount_is_clamped_at_zero() {
        // grand total 100.00 exactly
        let items = [row("86.96", "1")];
        let totals = calculate_totals(&items, "0");
        assert_eq!(totals.grand_total_cents, 10_000);

        let totals = calculate_totals(&items, "150.00");
        assert_eq!(totals.discount_cents, 15_000);
        assert_eq!(totals.final_total_cents, 0);
    }

    #[test]
    fn test_oversized_discount_zeroes_final_total() {
        let items = [row("100", "1")];

        let totals = calculate_totals(&items, "100000000000000000");
        assert_eq!(totals.grand_total_cents, 11_500);
        assert_eq!(totals.discount_cents, i64::MAX);
        assert_eq!(totals.final_total_cents, 0);

        let totals = calculate_totals(&items, &"9".repeat(60));
        assert_eq!(totals.final_total_cents, 0);

        let totals = calculate_totals(&items, "1e30");
        assert_eq!(totals.final_total_cents, 0);
    }

    #[test]
    fn test_discount_rounds_to_cent() {
        let totals = calculate_totals(&[row("100", "1")], "10.005");
        assert_eq!(totals.discount_cents, 1001);
        assert_eq!(totals.final_total_cents, 11_500 - 1001);
    }

    #[test]
    fn test_garbage_input_counts_as_zero() {
        let totals = calculate_totals(&[row("abc", "xyz")], "lots");
        assert_eq!(totals, Totals::default());
    }

    #[test]
    fn test_empty_item_list() {
        let totals = calculate_totals(&[], "5");
        assert_eq!(totals.grand_total_cents, 0);
        assert_eq!(totals.discount_cents, 500);
        assert_eq!(totals.final_total_cents, 0);
    }

    #[test]
    fn test_overflowing_row_contributes_nothing() {
        let huge = "9".repeat(28);
        let totals = calculate_totals(&[row(&huge, "1"), row("10", "1")], "0");
        assert_eq!(totals.subtotal_cents, 1_000);
    }

    #[test]
    fn test_final_total_never_negative() {
        let discounts = ["0", "1", "99999999", "115", "114.99", "-5", "abc", "1e17"];
        let ledgers: [&[LineItem]; 3] = [&[], &[row("100", "1")], &[row("0.01", "0.5"), row("7", "3")]];
        for items in ledgers {
            for discount in discounts {
                let totals = calculate_totals(items, discount);
                assert!(totals.final_total_cents >= 0, "{:?} {}", totals, discount);
                assert_eq!(
                    totals.final_total_cents,
                    (totals.grand_total_cents - totals.discount_cents).max(0)
                );
            }
        }
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        let items = [row("10.005", "2.5"), row("3", "7")];
        assert_eq!(calculate_totals(&items, "4.2"), calculate_totals(&items, "4.2"));
    }

    #[test]
    fn test_money_accessors() {
        let totals = calculate_totals(&[row("100", "1")], "15");
        assert_eq!(totals.final_total().to_string(), "100.00");
        assert_eq!(totals.vat().to_string(), "15.00");
        assert_eq!(totals.subtotal().to_string(), "100.00");
        assert_eq!(totals.discount().to_string(), "15.00");
        assert_eq!(totals.grand_total().to_string(), "115.00");
    }
}
