//! # hotel-core: Pure Business Logic for the Booking Engine
//!
//! This crate is the **heart** of the booking engine. It contains the pricing
//! rules, the booking state machine and stay-date validation as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Booking Engine Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Request layer (HTTP, admin UI, ...)                │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        hotel-booking (BookingEngine, ExpirationSweeper)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ hotel-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌────────┐ │   │
//! │  │   │  types  │ │  money  │ │ pricing │ │lifecycle │ │  stay  │ │   │
//! │  │   │ Booking │ │  Money  │ │ Price-  │ │ status   │ │ dates  │ │   │
//! │  │   │ Room    │ │ TaxRate │ │Breakdown│ │ table    │ │ nights │ │   │
//! │  │   └─────────┘ └─────────┘ └─────────┘ └──────────┘ └────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    hotel-db (Database Layer)                    │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (RoomType, Room, Booking, Addon, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`pricing`] - Room, addon, tax and total computation
//! - [`lifecycle`] - Booking status transitions
//! - [`stay`] - Stay date ranges and the half-open overlap rule
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use hotel_core::money::Money;
//! use hotel_core::pricing::PricingEngine;
//!
//! let engine = PricingEngine::default(); // 7% tax
//! let room = engine.room_subtotal(Money::from_cents(100_000), 2).unwrap();
//! let breakdown = engine.breakdown(room, Money::zero()).unwrap();
//!
//! assert_eq!(breakdown.room_subtotal.cents(), 200_000);
//! assert_eq!(breakdown.taxes.cents(), 14_000);
//! assert_eq!(breakdown.total.cents(), 214_000);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod lifecycle;
pub mod money;
pub mod pricing;
pub mod stay;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use pricing::{PriceBreakdown, PricingEngine};
pub use stay::StayDates;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Tax applied to room and addon subtotals, in basis points (7%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 700;

/// How long a `pending` booking holds its room before the sweeper cancels it.
pub const DEFAULT_HOLD_MINUTES: i64 = 30;

/// Longest configurable hold (one week).
pub const MAX_HOLD_MINUTES: i64 = 7 * 24 * 60;

/// Highest catalog price in minor units (THB 10,000,000.00).
///
/// ## Business Reason
/// Keeps every nightly price × nights and addon price × quantity far inside
/// `i64`, and catches a price typed in satang where baht was meant.
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000;

/// Maximum quantity of a single addon line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ADDON_QUANTITY: i64 = 999;

/// Maximum number of adults on one booking.
pub const MAX_ADULTS: i64 = 20;

/// Currency label used when rendering amounts for guests.
pub const CURRENCY_CODE: &str = "THB";
