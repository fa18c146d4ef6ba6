//! # Money Module
//!
//! Provides the `Money` type and lenient parsing of user-entered amounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In binary floating point:                                              │
//! │    10.005 × 100 = 1000.4999999999999  → rounds to 1000  ❌              │
//! │                                                                         │
//! │  OUR SOLUTION: exact decimals in, integer cents out                     │
//! │    "10.005" → Decimal 10.005 → × 100 = 1000.5 → 1001 cents  ✓          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fatura_core::money::{parse_amount, Money};
//!
//! let price = parse_amount("10.99");
//! let cents = Money::from_amount(price).unwrap();
//! assert_eq!(cents.cents(), 1099);
//! assert_eq!(cents.to_string(), "10.99");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (halalas for SAR).
///
/// ## Design Decisions
/// - **i64 (signed)**: a discount larger than the grand total is legal input
///   and the intermediate difference must be representable before clamping
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **No currency**: the currency code travels on the document identity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount (major units) to cents.
    ///
    /// Rounds half away from zero at the second decimal. Returns `None`
    /// when the result does not fit in `i64` cents.
    ///
    /// ## Example
    /// ```rust
    /// use fatura_core::money::{parse_amount, Money};
    ///
    /// assert_eq!(Money::from_amount(parse_amount("10.005")).unwrap().cents(), 1001);
    /// assert_eq!(Money::from_amount(parse_amount("-0.125")).unwrap().cents(), -13);
    /// ```
    pub fn from_amount(amount: Decimal) -> Option<Self> {
        amount
            .checked_mul(Decimal::from(100))?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .map(Money)
    }

    /// Like [`Money::from_amount`], but an amount outside `i64` cents is
    /// clamped to `i64::MAX` or `i64::MIN` cents.
    pub fn from_amount_saturating(amount: Decimal) -> Self {
        Self::from_amount(amount).unwrap_or(if amount.is_sign_negative() {
            Money(i64::MIN)
        } else {
            Money(i64::MAX)
        })
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Scales the amount by a quantity that may be fractional.
    ///
    /// The product is rounded half away from zero to the nearest cent.
    /// Returns `None` if the product does not fit in `i64` cents.
    ///
    /// ## Example
    /// ```rust
    /// use fatura_core::money::{parse_amount, Money};
    ///
    /// let unit = Money::from_cents(299);
    /// assert_eq!(unit.multiply_quantity(parse_amount("3")).unwrap().cents(), 897);
    /// // 299 × 1.5 = 448.5 → 449
    /// assert_eq!(unit.multiply_quantity(parse_amount("1.5")).unwrap().cents(), 449);
    /// ```
    pub fn multiply_quantity(&self, quantity: Decimal) -> Option<Self> {
        Decimal::from(self.0)
            .checked_mul(quantity)?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .map(Money)
    }

    /// Subtracts, flooring the result at zero.
    ///
    /// ## Example
    /// ```rust
    /// use fatura_core::money::Money;
    ///
    /// let total = Money::from_cents(10_000);
    /// assert_eq!(total.sub_floor_zero(Money::from_cents(15_000)), Money::zero());
    /// ```
    pub fn sub_floor_zero(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0).max(0))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders `major.minor` with two decimals, the way amounts are printed on
/// the document. No currency symbol.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a user-entered amount, never failing.
///
/// ## Rules
/// - Surrounding whitespace is ignored
/// - The longest leading `[+-]digits[.digits][e[+-]digits]` prefix is used,
///   so `"12abc"` reads as `12`, `".5"` as `0.5` and `"1e3"` as `1000`
/// - No numeric prefix reads as `0`
/// - A number beyond the decimal range saturates to `Decimal::MAX`/`MIN`
///
/// ## Example
/// ```rust
/// use fatura_core::money::parse_amount;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_amount(" 2.50 "), Decimal::new(250, 2));
/// assert_eq!(parse_amount("7 pcs"), Decimal::from(7));
/// assert_eq!(parse_amount("2.5e2"), Decimal::from(250));
/// assert_eq!(parse_amount(""), Decimal::ZERO);
/// assert_eq!(parse_amount("abc"), Decimal::ZERO);
/// ```
pub fn parse_amount(input: &str) -> Decimal {
    let s = input.trim();
    let bytes = s.as_bytes();

    let mut pos = 0;
    let negative = match bytes.first() {
        Some(b'-') => {
            pos = 1;
            true
        }
        Some(b'+') => {
            pos = 1;
            false
        }
        _ => false,
    };

    let int_start = pos;
    pos = skip_digits(bytes, pos);
    let int_part = &s[int_start..pos];

    let mut frac_part = "";
    if bytes.get(pos) == Some(&b'.') {
        let frac_start = pos + 1;
        pos = skip_digits(bytes, frac_start);
        frac_part = &s[frac_start..pos];
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return Decimal::ZERO;
    }

    let mantissa = parse_mantissa(negative, int_part, frac_part);
    match parse_exponent(bytes, pos) {
        Some(exponent) => scale_by_power_of_ten(mantissa, exponent, negative),
        None => mantissa,
    }
}

fn skip_digits(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    pos
}

fn saturated(negative: bool) -> Decimal {
    if negative {
        Decimal::MIN
    } else {
        Decimal::MAX
    }
}

/// Builds the decimal from its digit runs. Fraction digits past the
/// representable scale are dropped.
fn parse_mantissa(negative: bool, int_part: &str, frac_part: &str) -> Decimal {
    let frac_part = &frac_part[..frac_part.len().min(MAX_SCALE)];

    let mut literal = String::with_capacity(int_part.len() + frac_part.len() + 3);
    if negative {
        literal.push('-');
    }
    literal.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        literal.push('.');
        literal.push_str(frac_part);
    }

    Decimal::from_str(&literal).unwrap_or_else(|_| saturated(negative))
}

const MAX_SCALE: usize = 28;

/// Reads `e[+-]digits` at `pos`. A bare `e` without digits is not an
/// exponent, so `"5e"` stays `5`.
fn parse_exponent(bytes: &[u8], pos: usize) -> Option<i64> {
    if !matches!(bytes.get(pos), Some(b'e' | b'E')) {
        return None;
    }

    let mut pos = pos + 1;
    let negative = match bytes.get(pos) {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let digits_end = skip_digits(bytes, pos);
    if digits_end == pos {
        return None;
    }

    let magnitude = bytes[pos..digits_end]
        .iter()
        .fold(0i64, |acc, digit| acc.saturating_mul(10).saturating_add(i64::from(digit - b'0')));
    Some(if negative { -magnitude } else { magnitude })
}

fn scale_by_power_of_ten(mantissa: Decimal, exponent: i64, negative: bool) -> Decimal {
    if mantissa.is_zero() {
        return Decimal::ZERO;
    }

    // Past 64 steps the value has either overflowed or rounded to zero.
    let steps = exponent.unsigned_abs().min(64);
    let mut value = mantissa;
    for _ in 0..steps {
        value = if exponent > 0 {
            match value.checked_mul(Decimal::TEN) {
                Some(scaled) => scaled,
                None => return saturated(negative),
            }
        } else {
            value.checked_div(Decimal::TEN).unwrap_or(Decimal::ZERO)
        };
    }
    value
}

// =============================================================================
// Unit Tests
// =============================================================================
