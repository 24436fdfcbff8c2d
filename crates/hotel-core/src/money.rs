//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  A booking total is room + addons + 7% tax. Summing floats drifts,      │
//! │  and the guest's receipt stops adding up.                               │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units (satang)                             │
//! │    THB 1000.00 = 100000                                                 │
//! │    Tax rounding happens once, explicitly, in calculate_tax()            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use hotel_core::money::Money;
//!
//! let nightly = Money::from_major_minor(1000, 0); // THB 1000.00
//! let two_nights = nightly.checked_mul(2).unwrap();
//! assert_eq!(two_nights.to_string(), "2000.00");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (satang for THB).
///
/// ## Where Money is Used
/// ```text
/// RoomTypeRatePrice.price_cents ──► × nights ──► room_subtotal ─┐
///                                                               ├─► taxes ─► total
/// Addon.price_cents ──► × quantity ──► addon line ─► addon_subtotal ─┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use hotel_core::money::Money;
    ///
    /// let price = Money::from_cents(150_050); // THB 1500.50
    /// assert_eq!(price.cents(), 150_050);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from major and minor units.
    ///
    /// For negative amounts only the major unit should be negative:
    /// `from_major_minor(-5, 50)` is -5.50.
    #[inline]
    pub const fn from_major_minor(major: i64, minor: i64) -> Self {
        if major < 0 {
            Money(major * 100 - minor)
        } else {
            Money(major * 100 + minor)
        }
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax on this amount, rounded to the nearest minor unit.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`. The `+5000` rounds a
    /// half-unit remainder up, which is the same as rounding the decimal
    /// product to 2 places.
    ///
    /// ## Example
    /// ```rust
    /// use hotel_core::money::Money;
    /// use hotel_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(200_000); // THB 2000.00
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(700));
    /// assert_eq!(tax.cents(), 14_000); // THB 140.00
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps large folios from overflowing
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Multiplies money by a quantity (nights, addon units).
    ///
    /// Returns `None` if the product doesn't fit in an `i64`.
    ///
    /// ## Example
    /// ```rust
    /// use hotel_core::money::Money;
    ///
    /// let breakfast = Money::from_cents(35_000);
    /// assert_eq!(breakfast.checked_mul(3).unwrap().cents(), 105_000);
    /// assert!(Money::from_cents(i64::MAX / 2).checked_mul(3).is_none());
    /// ```
    #[inline]
    pub const fn checked_mul(&self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering (`1234.50`). The currency label is added by the
/// caller so amounts embed cleanly in receipts and logs.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.cents_part())
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
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}


// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_major_minor() {
        assert_eq!(Money::from_major_minor(1000, 50).cents(), 100_050);
        assert_eq!(Money::from_major_minor(-5, 50).cents(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(214_000).to_string(), "2140.00");
        assert_eq!(Money::from_cents(505).to_string(), "5.05");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_tax_seven_percent() {
        let rate = TaxRate::from_bps(700);
        assert_eq!(Money::from_cents(200_000).calculate_tax(rate).cents(), 14_000);
        // 12.34 * 7% = 0.8638 → 0.86
        assert_eq!(Money::from_cents(1234).calculate_tax(rate).cents(), 86);
        // 0.50 * 7% = 0.035 → 0.04 (half rounds up)
        assert_eq!(Money::from_cents(50).calculate_tax(rate).cents(), 4);
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::from_cents(100);
        assert_eq!(a.checked_add(Money::from_cents(255)), Some(Money::from_cents(355)));
        assert_eq!(a.checked_mul(3), Some(Money::from_cents(300)));

        let huge = Money::from_cents(i64::MAX / 2);
        assert_eq!(huge.checked_mul(3), None);
        assert_eq!(huge.checked_add(huge).map(|m| m.cents()), Some(i64::MAX - 1));
        assert_eq!(huge.checked_add(huge).and_then(|m| m.checked_add(a)), None);
    }
}
