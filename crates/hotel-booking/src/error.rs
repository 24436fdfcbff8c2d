//! # Booking Errors
//!
//! Every engine operation fails with one of three kinds, whatever layer the
//! failure came from.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Source                              ErrorKind                          │
//! │  ─────────────────────────────────   ──────────────────                 │
//! │  ValidationError (bad input)     ──► Validation                         │
//! │  CoreError (rule violation)      ──► Validation                         │
//! │  DbError::Unique/ForeignKey      ──► Validation                         │
//! │  DbError::Conflict               ──► Validation                         │
//! │  DbError::NotFound               ──► NotFound                           │
//! │  anything else                   ──► Unexpected                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use hotel_core::{CoreError, ValidationError};
use hotel_db::DbError;

/// The three failure kinds the request layer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller input or a business rule rejected the request. Maps to 400.
    Validation,
    /// A referenced entity, or a free room, doesn't exist. Maps to 404.
    NotFound,
    /// Storage or infrastructure failure. Maps to 500.
    Unexpected,
}

/// Booking engine error.
#[derive(Debug, Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl BookingError {
    pub fn validation(message: impl Into<String>) -> Self {
        BookingError::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        BookingError::NotFound(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        BookingError::Unexpected(message.into())
    }

    /// Returns the error's kind tag.
    pub fn kind(&self) -> ErrorKind {
        match self {
            BookingError::Validation(_) => ErrorKind::Validation,
            BookingError::NotFound(_) => ErrorKind::NotFound,
            BookingError::Unexpected(_) => ErrorKind::Unexpected,
        }
    }
}

impl From<ValidationError> for BookingError {
    fn from(err: ValidationError) -> Self {
        BookingError::Validation(err.to_string())
    }
}

impl From<CoreError> for BookingError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(inner) => inner.into(),
            other => BookingError::Validation(other.to_string()),
        }
    }
}

impl From<DbError> for BookingError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => BookingError::NotFound(err.to_string()),
            DbError::Invalid(inner) => inner.into(),
            DbError::UniqueViolation { .. }
            | DbError::ForeignKeyViolation { .. }
            | DbError::Conflict(_) => BookingError::Validation(err.to_string()),
            other => BookingError::Unexpected(other.to_string()),
        }
    }
}

/// Result type for engine operations.
pub type BookingResult<T> = Result<T, BookingError>;
