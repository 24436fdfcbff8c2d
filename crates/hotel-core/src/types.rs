//! # Domain Types
//!
//! Core domain types used throughout the booking engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    RoomType     │◄──│      Room       │◄──│   RoomBlock     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  name, capacity │   │  room_number    │   │  [start, end)   │       │
//! │  │  pictures       │   │  status         │   │  reason         │       │
//! │  └────────┬────────┘   └────────▲────────┘   └─────────────────┘       │
//! │           │                     │                                       │
//! │  ┌────────▼────────┐   ┌────────┴────────┐   ┌─────────────────┐       │
//! │  │RoomTypeRatePrice│   │     Booking     │──►│  BookingAddon   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  type × plan    │   │  [in, out)      │   │  quantity       │       │
//! │  │  → nightly      │   │  status, totals │   │  price frozen   │       │
//! │  └────────▲────────┘   │  expired_at     │   └────────┬────────┘       │
//! │           │            └─────────────────┘            │                 │
//! │  ┌────────┴────────┐                         ┌────────▼────────┐       │
//! │  │    RatePlan     │                         │      Addon      │       │
//! │  │  policy flags   │                         │  current price  │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity is keyed by a UUID v4 string. Rooms additionally carry a
//! human-readable `room_number`, which is also the deterministic claim order.
//!
//! ## Money Columns
//! Amounts are stored as `*_cents` integer fields (minor units) and exposed
//! as [`Money`] through accessor methods.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::ValidationError;
use crate::money::Money;
use crate::pricing::PriceBreakdown;
use crate::stay::StayDates;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000, so the 7% VAT is 700 bps and stays an
/// exact integer.
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

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate(crate::DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Room Status
// =============================================================================

/// Housekeeping status of a physical room.
///
/// Only `Maintenance` takes a room out of the availability pool; the others
/// are operational tags for the front desk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum RoomStatus {
    Available,
    Occupied,
    Dirty,
    Maintenance,
}

impl RoomStatus {
    /// Every status, in display order.
    pub const ALL: [RoomStatus; 4] = [
        RoomStatus::Available,
        RoomStatus::Occupied,
        RoomStatus::Dirty,
        RoomStatus::Maintenance,
    ];

    /// Returns the storage/wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            RoomStatus::Available => "available",
            RoomStatus::Occupied => "occupied",
            RoomStatus::Dirty => "dirty",
            RoomStatus::Maintenance => "maintenance",
        }
    }
}

impl Default for RoomStatus {
    fn default() -> Self {
        RoomStatus::Available
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive parse of a room status name.
impl FromStr for RoomStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        RoomStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| {
                ValidationError::not_allowed(
                    "room status",
                    &RoomStatus::ALL.map(|status| status.as_str()),
                )
            })
    }
}

// =============================================================================
// Booking Status
// =============================================================================

/// Status of a booking. Transitions are governed by [`crate::lifecycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "kebab-case"))]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum BookingStatus {
    /// Hold on a room, awaiting payment. Carries an expiry.
    Pending,
    /// Paid (mocked) or confirmed by staff.
    Confirmed,
    /// Cancelled by staff or by the expiration sweeper. Terminal.
    Cancelled,
    CheckedIn,
    /// Terminal.
    CheckedOut,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 5] = [
        BookingStatus::Pending,
        BookingStatus::Confirmed,
        BookingStatus::Cancelled,
        BookingStatus::CheckedIn,
        BookingStatus::CheckedOut,
    ];

    /// Returns the storage/wire name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::CheckedIn => "checked-in",
            BookingStatus::CheckedOut => "checked-out",
        }
    }
}

impl Default for BookingStatus {
    fn default() -> Self {
        BookingStatus::Pending
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive parse of a booking status name.
impl FromStr for BookingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ValidationError::Required {
                field: "status".to_string(),
            });
        }
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == normalized)
            .ok_or_else(|| {
                ValidationError::not_allowed(
                    "status",
                    &BookingStatus::ALL.map(|status| status.as_str()),
                )
            })
    }
}

// =============================================================================
// Catalog: Room Types, Amenities, Rooms
// =============================================================================

/// A sellable category of room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct RoomType {
    pub id: String,
    pub name: String,
    pub description: String,
    pub size_sqm: f64,
    pub bed_type: String,
    pub capacity: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl RoomType {
    /// Creates a room type with a fresh ID and empty descriptive fields.
    pub fn new(name: impl Into<String>, capacity: i64) -> Self {
        let now = Utc::now();
        RoomType {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: String::new(),
            size_sqm: 0.0,
            bed_type: String::new(),
            capacity,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_bed_type(mut self, bed_type: impl Into<String>) -> Self {
        self.bed_type = bed_type.into();
        self
    }

    pub fn with_size_sqm(mut self, size_sqm: f64) -> Self {
        self.size_sqm = size_sqm;
        self
    }
}

/// A room type together with its picture set and amenity names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoomTypeDetails {
    #[serde(flatten)]
    pub room_type: RoomType,
    pub picture_urls: Vec<String>,
    pub amenities: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Amenity {
    pub id: String,
    pub name: String,
}

impl Amenity {
    pub fn new(name: impl Into<String>) -> Self {
        Amenity {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }
}

/// A physical room belonging to exactly one room type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Room {
    pub id: String,
    pub room_type_id: String,
    pub room_number: String,
    pub status: RoomStatus,
}

impl Room {
    /// Creates an available room of the given type.
    pub fn new(room_type_id: impl Into<String>, room_number: impl Into<String>) -> Self {
        Room {
            id: Uuid::new_v4().to_string(),
            room_type_id: room_type_id.into(),
            room_number: room_number.into(),
            status: RoomStatus::Available,
        }
    }
}

/// An administrative hold on a room for the half-open range `[start_date, end_date)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct RoomBlock {
    pub id: String,
    pub room_id: String,
    #[ts(as = "String")]
    pub start_date: NaiveDate,
    #[ts(as = "String")]
    pub end_date: NaiveDate,
    pub reason: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Rate Plans
// =============================================================================

/// A named pricing/policy bundle. Prices live in [`RoomTypeRatePrice`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct RatePlan {
    pub id: String,
    pub name: String,
    pub description: String,
    pub is_special_package: bool,
    pub allow_free_cancel: bool,
    pub allow_pay_later: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl RatePlan {
    /// Creates a plain rate plan: not a package, no free cancel, no pay later.
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        RatePlan {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: String::new(),
            is_special_package: false,
            allow_free_cancel: false,
            allow_pay_later: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_policies(mut self, special_package: bool, free_cancel: bool, pay_later: bool) -> Self {
        self.is_special_package = special_package;
        self.allow_free_cancel = free_cancel;
        self.allow_pay_later = pay_later;
        self
    }
}

/// Nightly price of a rate plan for one room type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct RoomTypeRatePrice {
    pub room_type_id: String,
    pub rate_plan_id: String,
    pub price_cents: i64,
}

impl RoomTypeRatePrice {
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// A rate plan as sold for one room type, with that type's nightly price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct RatePlanOffer {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub rate_plan: RatePlan,
    pub price_cents: i64,
}

impl RatePlanOffer {
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Addon Catalog
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct AddonCategory {
    pub id: String,
    pub name: String,
}

impl AddonCategory {
    pub fn new(name: impl Into<String>) -> Self {
        AddonCategory {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
        }
    }
}

/// A purchasable extra (breakfast, airport transfer, ...) at its current price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Addon {
    pub id: String,
    pub category_id: String,
    pub name: String,
    pub description: String,
    pub price_cents: i64,
    /// Unit label shown next to quantities, e.g. "person" or "night".
    pub unit_name: String,
    pub picture_url: Option<String>,
}

impl Addon {
    pub fn new(category_id: impl Into<String>, name: impl Into<String>, price: Money) -> Self {
        Addon {
            id: Uuid::new_v4().to_string(),
            category_id: category_id.into(),
            name: name.into(),
            description: String::new(),
            price_cents: price.cents(),
            unit_name: "item".to_string(),
            picture_url: None,
        }
    }

    pub fn with_unit_name(mut self, unit_name: impl Into<String>) -> Self {
        self.unit_name = unit_name.into();
        self
    }

    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

// =============================================================================
// Users
// =============================================================================

/// Booking owner and notification recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        User {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            email: email.into(),
            created_at: Utc::now(),
        }
    }
}

// =============================================================================
// Bookings
// =============================================================================

/// The central reservation record.
///
/// ## Invariants
/// - `check_in_date < check_out_date`
/// - `status == Pending` implies `expired_at.is_some()`
/// - `total = room_subtotal + addon_subtotal + taxes`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub rate_plan_id: String,
    pub room_id: String,
    #[ts(as = "String")]
    pub check_in_date: NaiveDate,
    #[ts(as = "String")]
    pub check_out_date: NaiveDate,
    pub num_adults: i64,
    pub status: BookingStatus,
    pub room_subtotal_cents: i64,
    pub addon_subtotal_cents: i64,
    pub taxes_cents: i64,
    pub total_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    #[ts(as = "Option<String>")]
    pub expired_at: Option<DateTime<Utc>>,
    /// Addon lines in the order they were requested. Loaded separately.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    pub addons: Vec<BookingAddon>,
}

impl Booking {
    /// The booked stay range.
    pub fn stay(&self) -> StayDates {
        StayDates::from_validated(self.check_in_date, self.check_out_date)
    }

    /// The four stored monetary fields as a breakdown.
    pub fn breakdown(&self) -> PriceBreakdown {
        PriceBreakdown {
            room_subtotal: Money::from_cents(self.room_subtotal_cents),
            addon_subtotal: Money::from_cents(self.addon_subtotal_cents),
            taxes: Money::from_cents(self.taxes_cents),
            total: Money::from_cents(self.total_cents),
        }
    }

    pub fn room_subtotal(&self) -> Money {
        Money::from_cents(self.room_subtotal_cents)
    }

    /// Returns true if this is a pending hold whose expiry is before `now`.
    pub fn is_hold_expired(&self, now: DateTime<Utc>) -> bool {
        self.status == BookingStatus::Pending
            && self.expired_at.map_or(false, |expires| expires < now)
    }
}

/// An addon line on a booking, with its unit price frozen at attach time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct BookingAddon {
    pub id: String,
    pub booking_id: String,
    pub addon_id: String,
    /// Catalog name, joined on read.
    pub addon_name: String,
    pub quantity: i64,
    pub price_at_booking_cents: i64,
    pub position: i64,
}

impl BookingAddon {
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.price_at_booking_cents)
    }

    /// `price_at_booking × quantity`.
    ///
    /// Stored lines passed the pricing engine's overflow checks on write, so
    /// this saturates instead of failing.
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.price_at_booking_cents.saturating_mul(self.quantity))
    }
}

/// Read projection of a booking joined with the names a guest or admin sees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct BookingDetail {
    #[serde(flatten)]
    #[cfg_attr(feature = "sqlx", sqlx(flatten))]
    pub booking: Booking,
    pub rate_plan_name: String,
    pub room_number: String,
    pub room_type_name: String,
    pub username: String,
    pub user_email: String,
}

// =============================================================================
// Booking Requests
// =============================================================================

/// One requested addon line: which addon and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AddonRequest {
    pub addon_id: String,
    pub quantity: i64,
}

impl AddonRequest {
    pub fn new(addon_id: impl Into<String>, quantity: i64) -> Self {
        AddonRequest {
            addon_id: addon_id.into(),
            quantity,
        }
    }
}

/// Input to booking creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewBooking {
    pub user_id: String,
    pub rate_plan_id: String,
    pub room_type_id: String,
    #[ts(as = "String")]
    pub check_in: NaiveDate,
    #[ts(as = "String")]
    pub check_out: NaiveDate,
    pub num_adults: i64,
    #[serde(default)]
    pub addons: Vec<AddonRequest>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_status_parse_is_case_insensitive() {
        assert_eq!("Checked-In".parse::<BookingStatus>().unwrap(), BookingStatus::CheckedIn);
        assert_eq!(" CONFIRMED ".parse::<BookingStatus>().unwrap(), BookingStatus::Confirmed);
        assert!(matches!(
            "refunded".parse::<BookingStatus>(),
            Err(ValidationError::NotAllowed { .. })
        ));
        assert!(matches!(
            "".parse::<BookingStatus>(),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_booking_status_wire_names() {
        for status in BookingStatus::ALL {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status.as_str()));
        }
    }

    #[test]
    fn test_room_status_parse() {
        assert_eq!("Maintenance".parse::<RoomStatus>().unwrap(), RoomStatus::Maintenance);
        assert!("broken".parse::<RoomStatus>().is_err());
    }

    #[test]
    fn test_addon_line_total_uses_frozen_price() {
        let line = BookingAddon {
            id: "l1".into(),
            booking_id: "b1".into(),
            addon_id: "a1".into(),
            addon_name: "Breakfast".into(),
            quantity: 3,
            price_at_booking_cents: 35_000,
            position: 0,
        };
        assert_eq!(line.line_total().cents(), 105_000);
    }
}
