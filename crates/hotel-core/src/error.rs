//! # Error Types
//!
//! Domain-specific error types for hotel-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  hotel-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  hotel-db errors (separate crate)                                      │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  hotel-booking errors                                                  │
//! │  └── BookingError     - Validation | NotFound | Unexpected             │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → BookingError → request layer      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::types::BookingStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The requested status change is not in the transition table.
    ///
    /// ## When This Occurs
    /// - Confirming a cancelled booking
    /// - Checking out a booking that was never checked in
    /// - Any change out of a terminal status
    #[error("cannot change booking status from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// A pending hold passed its expiry before being confirmed.
    #[error("booking {booking_id} hold expired and can no longer be confirmed")]
    HoldExpired { booking_id: String },

    /// The stay covers zero or a negative number of nights.
    #[error("stay must cover at least one night, got {nights}")]
    NonPositiveNights { nights: i64 },

    /// A price computation left the range of `i64` minor units.
    #[error("{what} is too large to compute")]
    AmountOverflow { what: &'static str },

    /// The booking is cancelled or checked out and cannot be modified.
    #[error("booking {booking_id} is {status} and cannot be modified")]
    BookingClosed {
        booking_id: String,
        status: BookingStatus,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when caller input doesn't meet requirements.
/// Used for early validation before any storage access happens.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid UUID, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// A date range whose start is not strictly before its end.
    #[error("{start_field} must be before {end_field}")]
    InvalidDateRange {
        start_field: String,
        end_field: String,
    },

    /// A date that must not lie in the past.
    #[error("{field} cannot be in the past")]
    DateInPast { field: String },
}

impl ValidationError {
    /// Creates a NotAllowed error from a static list of accepted names.
    pub fn not_allowed(field: impl Into<String>, allowed: &[&str]) -> Self {
        ValidationError::NotAllowed {
            field: field.into(),
            allowed: allowed.iter().map(|s| s.to_string()).collect(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
