//! # Validation Module
//!
//! Input validation utilities for the booking engine.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Request layer (out of scope)                                 │
//! │  └── Deserialization, auth                                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: BookingEngine (Rust)                                         │
//! │  └── THIS MODULE: dates, counts, prices, names                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (check_in_date < check_out_date)                            │
//! │  ├── UNIQUE (room_number), (email), ...                                │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;

use crate::error::ValidationError;
use crate::{MAX_ADDON_QUANTITY, MAX_ADULTS, MAX_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Wire format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Date Validators
// =============================================================================

/// Parses a `YYYY-MM-DD` calendar date.
///
/// ## Example
/// ```rust
/// use hotel_core::validation::parse_date;
///
/// assert!(parse_date("check_in", "2024-01-10").is_ok());
/// assert!(parse_date("check_in", "2024-02-30").is_err());
/// assert!(parse_date("check_in", "").is_err());
/// ```
pub fn parse_date(field: &str, value: &str) -> ValidationResult<NaiveDate> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|e| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: format!("expected YYYY-MM-DD ({e})"),
    })
}

/// Rejects a date earlier than `today`.
pub fn validate_not_in_past(field: &str, date: NaiveDate, today: NaiveDate) -> ValidationResult<()> {
    if date < today {
        return Err(ValidationError::DateInPast {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a display name (room type, rate plan, addon, category...).
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most 200 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a room number such as `"101"` or `"A-12"`.
pub fn validate_room_number(room_number: &str) -> ValidationResult<()> {
    let room_number = room_number.trim();

    if room_number.is_empty() {
        return Err(ValidationError::Required {
            field: "room_number".to_string(),
        });
    }

    if room_number.len() > 20 {
        return Err(ValidationError::TooLong {
            field: "room_number".to_string(),
            max: 20,
        });
    }

    if !room_number
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ValidationError::InvalidFormat {
            field: "room_number".to_string(),
            reason: "must contain only letters, numbers, and hyphens".to_string(),
        });
    }

    Ok(())
}

/// Loose email shape check; delivery is someone else's problem.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@example.com".to_string(),
        }),
    }
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the number of adults on a booking.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ADULTS
pub fn validate_num_adults(num_adults: i64) -> ValidationResult<()> {
    if num_adults <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "num_adults".to_string(),
        });
    }

    if num_adults > MAX_ADULTS {
        return Err(ValidationError::OutOfRange {
            field: "num_adults".to_string(),
            min: 1,
            max: MAX_ADULTS,
        });
    }

    Ok(())
}

/// Validates an addon line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ADDON_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ADDON_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ADDON_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in minor units. Zero is allowed (complimentary items).
///
/// ## Rules
/// - Must not be negative
/// - Must not exceed MAX_PRICE_CENTS
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

/// Validates a room type capacity (guests per room).
pub fn validate_capacity(capacity: i64) -> ValidationResult<()> {
    if capacity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "capacity".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
