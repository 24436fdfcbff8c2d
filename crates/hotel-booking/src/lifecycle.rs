//! # Booking Lifecycle
//!
//! Creation, status changes and the read projections of a booking.
//!
//! ## Creating a Booking
//! ```text
//! validate dates, adults, quantities           ── Validation
//!        │
//! user, room type, nightly price exist?        ── NotFound
//!        │
//! room subtotal = nightly × nights
//! addon lines priced at current catalog        ── NotFound (unknown addon)
//! taxes, total
//!        │
//! ┌──────▼───────────────────────────────┐
//! │ one transaction                      │
//! │   claim lowest free room + insert    │    ── NotFound (no free room),
//! │   insert addon lines                 │       nothing persisted
//! └──────┬───────────────────────────────┘
//!        │
//!        ├──► Ok(booking)  (pending, expires at now + hold)
//!        └──► spawn confirmation (best-effort)
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use hotel_core::lifecycle::validate_transition;
use hotel_core::validation::validate_num_adults;
use hotel_core::{
    Booking, BookingAddon, BookingDetail, BookingStatus, NewBooking, PricingEngine, StayDates,
};
use hotel_db::{Database, DbError, NewBookingRecord};

use crate::addons::price_addon_lines;
use crate::availability::{no_available_room, AvailabilityResolver};
use crate::error::{BookingError, BookingResult};
use crate::notifier::{dispatch_confirmation, Notifier};

#[derive(Clone)]
pub struct BookingLifecycle {
    db: Database,
    pricing: PricingEngine,
    hold: chrono::Duration,
    notifier: Arc<dyn Notifier>,
}

impl BookingLifecycle {
    pub fn new(
        db: Database,
        pricing: PricingEngine,
        hold: chrono::Duration,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        BookingLifecycle {
            db,
            pricing,
            hold,
            notifier,
        }
    }

    /// Creates a pending booking holding one room until `now + hold`.
    pub async fn create(&self, request: &NewBooking, now: DateTime<Utc>) -> BookingResult<Booking> {
        let stay = StayDates::new(request.check_in, request.check_out)?;
        validate_num_adults(request.num_adults)?;

        if !self.db.users().exists(&request.user_id).await? {
            return Err(BookingError::not_found(format!("user {} not found", request.user_id)));
        }

        AvailabilityResolver::new(self.db.clone())
            .ensure_room_type(&request.room_type_id)
            .await?;

        let nightly = self
            .db
            .rate_plans()
            .get_price(&request.room_type_id, &request.rate_plan_id)
            .await
            .map_err(|e| match e {
                DbError::NotFound { .. } => BookingError::not_found(format!(
                    "rate plan {} has no price for room type {}",
                    request.rate_plan_id, request.room_type_id
                )),
                other => other.into(),
            })?;

        let room_subtotal = self.pricing.room_subtotal(nightly, stay.billable_nights()?)?;
        let (lines, addon_subtotal) =
            price_addon_lines(&self.db, &self.pricing, &request.addons).await?;
        let breakdown = self.pricing.breakdown(room_subtotal, addon_subtotal)?;

        let record = NewBookingRecord::new(
            &request.user_id,
            &request.rate_plan_id,
            &request.room_type_id,
            stay.check_in(),
            stay.check_out(),
            request.num_adults,
            breakdown,
            now,
            now + self.hold,
        )
        .with_addons(lines);

        let booking = match self.db.bookings().create_with_claim(&record).await {
            Ok(booking) => booking,
            Err(e) if e.is_not_found() => {
                warn!(
                    room_type_id = %request.room_type_id,
                    check_in = %stay.check_in(),
                    check_out = %stay.check_out(),
                    "No free room for booking request"
                );
                return Err(no_available_room(&request.room_type_id, stay));
            }
            Err(e) => return Err(e.into()),
        };

        info!(
            booking_id = %booking.id,
            room_id = %booking.room_id,
            total = %breakdown.total,
            "Booking created"
        );

        dispatch_confirmation(self.db.clone(), self.notifier.clone(), booking.id.clone());

        Ok(booking)
    }

    /// Moves a booking to `new_status` (case-insensitive name).
    ///
    /// The write is a compare-and-swap on the status read here, so a
    /// concurrent change makes this call fail instead of both applying.
    pub async fn change_status(
        &self,
        booking_id: &str,
        new_status: &str,
        now: DateTime<Utc>,
    ) -> BookingResult<Booking> {
        let next: BookingStatus = new_status.parse()?;
        let booking = self.get_booking(booking_id).await?;

        if let Err(e) = validate_transition(&booking, next, now) {
            warn!(booking_id = %booking_id, from = %booking.status, to = %next, "Rejected status change");
            return Err(e.into());
        }

        self.db
            .bookings()
            .update_status(booking_id, booking.status, next, now)
            .await
            .map_err(|e| match e {
                DbError::Conflict(_) => BookingError::validation(format!(
                    "booking {booking_id} changed concurrently; cannot move to {next}"
                )),
                other => other.into(),
            })?;

        info!(booking_id = %booking_id, from = %booking.status, to = %next, "Booking status changed");

        if next == BookingStatus::Confirmed {
            dispatch_confirmation(self.db.clone(), self.notifier.clone(), booking_id.to_string());
        }

        self.get_booking(booking_id).await
    }

    /// Mocked payment: confirms the booking.
    pub async fn confirm_payment(&self, booking_id: &str, now: DateTime<Utc>) -> BookingResult<Booking> {
        self.change_status(booking_id, BookingStatus::Confirmed.as_str(), now)
            .await
    }

    pub async fn get_booking(&self, booking_id: &str) -> BookingResult<Booking> {
        self.db
            .bookings()
            .get_by_id(booking_id)
            .await?
            .ok_or_else(|| booking_not_found(booking_id))
    }

    /// Booking joined with rate plan, room, room type and user names.
    pub async fn get_full_details(&self, booking_id: &str) -> BookingResult<BookingDetail> {
        self.db
            .bookings()
            .get_detail(booking_id)
            .await?
            .ok_or_else(|| booking_not_found(booking_id))
    }

    /// A user's bookings, newest first.
    pub async fn get_history(&self, user_id: &str) -> BookingResult<Vec<BookingDetail>> {
        Ok(self.db.bookings().list_by_user(user_id).await?)
    }

    pub async fn get_all(&self) -> BookingResult<Vec<BookingDetail>> {
        Ok(self.db.bookings().list_all().await?)
    }

    pub async fn get_addon_details(&self, booking_id: &str) -> BookingResult<Vec<BookingAddon>> {
        Ok(self.get_booking(booking_id).await?.addons)
    }
}

fn booking_not_found(booking_id: &str) -> BookingError {
    BookingError::not_found(format!("booking {booking_id} not found"))
}
