//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE DISPLAY-STRING PROBLEM                                             │
//! │                                                                         │
//! │  The catalogue API sends prices as display strings:                     │
//! │    "₹299", "₹1,299", "₹49.50"                                          │
//! │                                                                         │
//! │  Re-parsing those strings on every total is fragile:                    │
//! │    "299" (no glyph) → NaN → total becomes NaN  ❌ WRONG!                │
//! │                                                                         │
//! │  OUR SOLUTION: parse ONCE at ingestion, then integer paise             │
//! │    "₹1,299.50" → Money { minor: 129950, currency: INR }                │
//! │    Malformed strings are rejected before they reach any store          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use medimart_core::money::{Currency, Money};
//!
//! let price = Money::parse("₹1,299", Currency::Inr).unwrap();
//! assert_eq!(price.minor(), 129_900);
//!
//! let total = price * 2 + Money::from_rupees(40);
//! assert_eq!(total.to_string(), "₹2,638.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Currency
// =============================================================================

/// ISO 4217 currency of a [`Money`] value.
///
/// Both supported currencies have two minor-unit digits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Indian rupee. Minor unit: paise.
    #[default]
    Inr,
    /// US dollar. Minor unit: cents.
    Usd,
}

impl Currency {
    /// ISO 4217 code.
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Inr => "INR",
            Currency::Usd => "USD",
        }
    }

    /// Display glyph used by the catalogue API.
    pub const fn symbol(&self) -> char {
        match self {
            Currency::Inr => '₹',
            Currency::Usd => '$',
        }
    }

    /// Number of minor units per major unit.
    pub const fn minor_per_major(&self) -> i64 {
        100
    }

    /// Digits after the decimal point.
    pub const fn exponent(&self) -> usize {
        2
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (paise for INR).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for discounts
/// - **Currency tag**: Prevents mixing rupees with dollars silently
/// - **Derives**: Full serde support for JSON serialization
///
/// ## User Workflow Context
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                    Where Money is Used                                  │
/// │                                                                         │
/// │  CatalogProduct.price ("₹49") ──► Money::parse ──► Product.price        │
/// │                                                        │                │
/// │  CartLine.line_total ◄─────────────────────────────────┘                │
/// │        │                                                                │
/// │        ▼                                                                │
/// │  Cart.total ──► CheckoutSummary (+ delivery − discount) ──► Order.total │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Money {
    /// Amount in minor units (paise, cents).
    #[ts(type = "number")]
    minor: i64,
    currency: Currency,
}

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_minor(minor: i64, currency: Currency) -> Self {
        Money { minor, currency }
    }

    /// Creates an INR value from paise.
    ///
    /// ## Example
    /// ```rust
    /// use medimart_core::money::Money;
    ///
    /// let price = Money::from_paise(4950); // ₹49.50
    /// assert_eq!(price.major(), 49);
    /// assert_eq!(price.minor_part(), 50);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money::from_minor(paise, Currency::Inr)
    }

    /// Creates an INR value from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money::from_minor(rupees * 100, Currency::Inr)
    }

    /// Zero in the given currency.
    #[inline]
    pub const fn zero(currency: Currency) -> Self {
        Money::from_minor(0, currency)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.minor
    }

    #[inline]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Returns the major unit (rupees) portion, truncated toward zero.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.minor / self.currency.minor_per_major()
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor_part(&self) -> i64 {
        (self.minor % self.currency.minor_per_major()).abs()
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.minor == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.minor > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.minor < 0
    }

    /// Multiplies money by a quantity, saturating at the `i64` bounds.
    ///
    /// ## Example
    /// ```rust
    /// use medimart_core::money::Money;
    ///
    /// let unit_price = Money::from_rupees(49);
    /// assert_eq!(unit_price.multiply_quantity(2), Money::from_rupees(98));
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money::from_minor(self.minor.saturating_mul(qty), self.currency)
    }

    /// Adds up `items` starting from zero in `currency`.
    ///
    /// An empty iterator gives zero in `currency`, never zero rupees.
    pub fn sum_in<I>(currency: Currency, items: I) -> Money
    where
        I: IntoIterator<Item = Money>,
    {
        items
            .into_iter()
            .fold(Money::zero(currency), |total, item| total + item)
    }

    /// Clamps negative amounts to zero.
    #[inline]
    pub const fn floor_zero(&self) -> Self {
        if self.minor < 0 {
            Money::zero(self.currency)
        } else {
            *self
        }
    }

    /// Parses a catalogue display price such as `"₹1,299.50"`.
    ///
    /// ## Accepted Shapes
    /// ```text
    /// ┌─────────────────────────────────────────────────────────────────────┐
    /// │  "₹299"        → 29900     single leading glyph stripped            │
    /// │  "₹1,299"      → 129900    thousands separators stripped            │
    /// │  " ₹ 49.5 "    → 4950      whitespace trimmed, one decimal ok       │
    /// │  "Rs. 60"      → 6000      "Rs"/"Rs." accepted for INR              │
    /// │  "299"         → 29900     glyph is optional                        │
    /// │                                                                     │
    /// │  "$10" (INR)   → Error     glyph of another currency                │
    /// │  "₹₹10"        → Error     more than one glyph                      │
    /// │  "₹12.345"     → Error     more than two decimals                   │
    /// │  "free", ""    → Error     not a number                             │
    /// └─────────────────────────────────────────────────────────────────────┘
    /// ```
    ///
    /// ## Errors
    /// Returns `ValidationError::InvalidFormat` for anything that is not a
    /// non-negative decimal amount in `currency`.
    pub fn parse(input: &str, currency: Currency) -> Result<Money, ValidationError> {
        let invalid = |reason: &str| ValidationError::InvalidFormat {
            field: "price".to_string(),
            reason: format!("'{}' {}", input, reason),
        };

        let mut rest = input.trim();
        if let Some(stripped) = rest.strip_prefix(currency.symbol()) {
            rest = stripped;
        } else if currency == Currency::Inr {
            if let Some(stripped) = rest.strip_prefix("Rs.").or_else(|| rest.strip_prefix("Rs")) {
                rest = stripped;
            }
        }
        let rest = rest.trim_start();

        let digits: String = rest.chars().filter(|c| *c != ',').collect();
        if digits.is_empty() {
            return Err(invalid("is not a price"));
        }

        let (whole, fraction) = match digits.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (digits.as_str(), ""),
        };

        if whole.is_empty() && fraction.is_empty() {
            return Err(invalid("is not a price"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !fraction.chars().all(|c| c.is_ascii_digit())
        {
            return Err(invalid("is not a price"));
        }
        if fraction.len() > currency.exponent() {
            return Err(invalid("has too many decimal places"));
        }

        let whole_value: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid("is out of range"))?
        };
        let mut fraction_value: i64 = if fraction.is_empty() {
            0
        } else {
            fraction.parse().map_err(|_| invalid("is out of range"))?
        };
        for _ in fraction.len()..currency.exponent() {
            fraction_value *= 10;
        }

        whole_value
            .checked_mul(currency.minor_per_major())
            .and_then(|minor| minor.checked_add(fraction_value))
            .map(|minor| Money::from_minor(minor, currency))
            .ok_or_else(|| invalid("is out of range"))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money the way the catalogue does: `₹1,29,999.00` for INR
/// (lakh grouping), `$1,299.00` for USD.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.minor < 0 { "-" } else { "" };
        let whole = group_digits(self.major().unsigned_abs(), self.currency);
        write!(
            f,
            "{}{}{}.{:02}",
            sign,
            self.currency.symbol(),
            whole,
            self.minor_part()
        )
    }
}

fn group_digits(value: u64, currency: Currency) -> String {
    let digits = value.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let group = match currency {
        Currency::Inr => 2,
        Currency::Usd => 3,
    };

    let mut groups = Vec::new();
    let mut end = head.len();
    while end > group {
        groups.push(&head[end - group..end]);
        end -= group;
    }
    groups.push(&head[..end]);
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// Default money is zero rupees.
impl Default for Money {
    fn default() -> Self {
        Money::zero(Currency::default())
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        debug_assert_eq!(self.currency, other.currency, "currency mismatch");
        Money::from_minor(self.minor.saturating_add(other.minor), self.currency)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        debug_assert_eq!(self.currency, other.currency, "currency mismatch");
        Money::from_minor(self.minor.saturating_sub(other.minor), self.currency)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

/// Multiplication by quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        self.multiply_quantity(qty)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
