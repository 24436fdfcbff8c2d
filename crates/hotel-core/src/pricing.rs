//! # Pricing Engine
//!
//! Pure price computation for bookings. No I/O, deterministic for identical
//! inputs, so historical folios can be re-derived and audited.
//!
//! ## Formula
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  room_subtotal  = nightly_price × nights          (nights > 0)          │
//! │  addon_line     = price_at_booking × quantity                           │
//! │  addon_subtotal = Σ addon_line                                          │
//! │  taxes          = round2((room_subtotal + addon_subtotal) × 7%)         │
//! │  total          = room_subtotal + addon_subtotal + taxes                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rounding happens once, on the tax line; all other steps are exact integer
//! arithmetic on minor units. Any step that leaves the `i64` range fails with
//! [`CoreError::AmountOverflow`] instead of wrapping.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::TaxRate;

/// The four monetary fields of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceBreakdown {
    pub room_subtotal: Money,
    pub addon_subtotal: Money,
    pub taxes: Money,
    pub total: Money,
}

/// Stateless calculator parameterised by the tax rate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PricingEngine {
    tax_rate: TaxRate,
}

impl PricingEngine {
    pub const fn new(tax_rate: TaxRate) -> Self {
        PricingEngine { tax_rate }
    }

    pub const fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// `nightly × nights`. Zero or negative nights is rejected, never rounded.
    ///
    /// ## Example
    /// ```rust
    /// use hotel_core::money::Money;
    /// use hotel_core::pricing::PricingEngine;
    ///
    /// let engine = PricingEngine::default();
    /// assert_eq!(engine.room_subtotal(Money::from_cents(100_000), 2).unwrap().cents(), 200_000);
    /// assert!(engine.room_subtotal(Money::from_cents(100_000), 0).is_err());
    /// ```
    pub fn room_subtotal(&self, nightly: Money, nights: i64) -> CoreResult<Money> {
        if nights <= 0 {
            return Err(CoreError::NonPositiveNights { nights });
        }
        nightly
            .checked_mul(nights)
            .ok_or(CoreError::AmountOverflow { what: "room subtotal" })
    }

    /// `unit × quantity`.
    pub fn addon_line_total(&self, unit_price: Money, quantity: i64) -> CoreResult<Money> {
        unit_price
            .checked_mul(quantity)
            .ok_or(CoreError::AmountOverflow { what: "addon line" })
    }

    /// Tax on the combined room and addon subtotals.
    pub fn taxes(&self, room_subtotal: Money, addon_subtotal: Money) -> CoreResult<Money> {
        let taxable = room_subtotal
            .checked_add(addon_subtotal)
            .ok_or(CoreError::AmountOverflow { what: "taxable amount" })?;
        Ok(taxable.calculate_tax(self.tax_rate))
    }

    /// Derives taxes and total from the two subtotals.
    pub fn breakdown(&self, room_subtotal: Money, addon_subtotal: Money) -> CoreResult<PriceBreakdown> {
        let taxes = self.taxes(room_subtotal, addon_subtotal)?;
        let total = room_subtotal
            .checked_add(addon_subtotal)
            .and_then(|m| m.checked_add(taxes))
            .ok_or(CoreError::AmountOverflow { what: "booking total" })?;

        Ok(PriceBreakdown {
            room_subtotal,
            addon_subtotal,
            taxes,
            total,
        })
    }

    /// Sums `(unit_price, quantity)` pairs into an addon subtotal.
    pub fn addon_subtotal<I>(&self, lines: I) -> CoreResult<Money>
    where
        I: IntoIterator<Item = (Money, i64)>,
    {
        lines.into_iter().try_fold(Money::zero(), |acc, (unit, qty)| {
            let line = self.addon_line_total(unit, qty)?;
            acc.checked_add(line)
                .ok_or(CoreError::AmountOverflow { what: "addon subtotal" })
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
