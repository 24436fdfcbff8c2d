//! # Booking Lifecycle Rules
//!
//! The status transition table for bookings.
//!
//! ```text
//!                 ┌────────────┐
//!   create ──────►│  pending   │──── sweep / admin ────┐
//!                 └─────┬──────┘                        │
//!                       │ pay / admin                   ▼
//!                 ┌─────▼──────┐    admin        ┌────────────┐
//!                 │ confirmed  │────────────────►│ cancelled  │ (terminal)
//!                 └─────┬──────┘                 └────────────┘
//!                       │ admin
//!                 ┌─────▼──────┐    admin        ┌────────────┐
//!                 │ checked-in │────────────────►│checked-out │ (terminal)
//!                 └────────────┘                 └────────────┘
//! ```

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::types::{Booking, BookingStatus};

impl BookingStatus {
    /// Statuses reachable in one step from `self`.
    pub const fn allowed_next(&self) -> &'static [BookingStatus] {
        match self {
            BookingStatus::Pending => &[BookingStatus::Confirmed, BookingStatus::Cancelled],
            BookingStatus::Confirmed => &[BookingStatus::CheckedIn, BookingStatus::Cancelled],
            BookingStatus::CheckedIn => &[BookingStatus::CheckedOut],
            BookingStatus::Cancelled | BookingStatus::CheckedOut => &[],
        }
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    /// No transitions leave a terminal status.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::CheckedOut)
    }
}

/// Checks that `booking` may move to `next` at time `now`.
///
/// Besides the transition table, a pending hold that has already passed its
/// expiry cannot be confirmed; the sweeper will cancel it.
pub fn validate_transition(
    booking: &Booking,
    next: BookingStatus,
    now: DateTime<Utc>,
) -> CoreResult<()> {
    if !booking.status.can_transition_to(next) {
        return Err(CoreError::InvalidTransition {
            from: booking.status,
            to: next,
        });
    }

    if next == BookingStatus::Confirmed && booking.is_hold_expired(now) {
        return Err(CoreError::HoldExpired {
            booking_id: booking.id.clone(),
        });
    }

    Ok(())
}

/// Checks that the booking's addon lines may still be edited.
pub fn ensure_modifiable(booking: &Booking) -> CoreResult<()> {
    if booking.status.is_terminal() {
        return Err(CoreError::BookingClosed {
            booking_id: booking.id.clone(),
            status: booking.status,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn booking(status: BookingStatus, expired_at: Option<DateTime<Utc>>) -> Booking {
        let now = Utc::now();
        Booking {
            id: "b-1".into(),
            user_id: "u-1".into(),
            rate_plan_id: "rp-1".into(),
            room_id: "r-1".into(),
            check_in_date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            check_out_date: NaiveDate::from_ymd_opt(2024, 1, 12).unwrap(),
            num_adults: 2,
            status,
            room_subtotal_cents: 200_000,
            addon_subtotal_cents: 0,
            taxes_cents: 14_000,
            total_cents: 214_000,
            created_at: now,
            updated_at: now,
            expired_at,
            addons: Vec::new(),
        }
    }

    #[test]
    fn test_transition_table() {
        use BookingStatus::*;
        let allowed = [
            (Pending, Confirmed),
            (Pending, Cancelled),
            (Confirmed, CheckedIn),
            (Confirmed, Cancelled),
            (CheckedIn, CheckedOut),
        ];
        for from in BookingStatus::ALL {
            for to in BookingStatus::ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "{from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(BookingStatus::CheckedOut.is_terminal());
        assert!(!BookingStatus::CheckedIn.is_terminal());
    }

    #[test]
    fn test_confirming_an_expired_hold_is_rejected() {
        let now = Utc::now();
        let expired = booking(BookingStatus::Pending, Some(now - Duration::minutes(1)));
        assert!(matches!(
            validate_transition(&expired, BookingStatus::Confirmed, now),
            Err(CoreError::HoldExpired { .. })
        ));
        // Cancelling it is still fine.
        assert!(validate_transition(&expired, BookingStatus::Cancelled, now).is_ok());

        let live = booking(BookingStatus::Pending, Some(now + Duration::minutes(29)));
        assert!(validate_transition(&live, BookingStatus::Confirmed, now).is_ok());
    }

    #[test]
    fn test_closed_bookings_are_not_modifiable() {
        assert!(ensure_modifiable(&booking(BookingStatus::Confirmed, None)).is_ok());
        assert!(ensure_modifiable(&booking(BookingStatus::Cancelled, None)).is_err());
    }
}
