//! # hotel-booking: Booking Engine for the Hotel Reservation System
//!
//! Composes the pure rules in `hotel-core` with the repositories in
//! `hotel-db` into the operations a request layer calls.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           BookingEngine                                 │
//! │                                                                         │
//! │  create_booking / change_booking_status / confirm_payment               │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  ┌──────────────────┐    ┌──────────────────┐    ┌──────────────────┐   │
//! │  │ BookingLifecycle │───►│ Availability     │    │ AddonSync        │   │
//! │  │                  │    │ Resolver         │    │ Coordinator      │   │
//! │  │ validate, price, │    │ counts, lookups  │    │ replace lines,   │   │
//! │  │ claim + insert,  │    └──────────────────┘    │ re-total         │   │
//! │  │ status CAS       │                            └──────────────────┘   │
//! │  └────────┬─────────┘                                                   │
//! │           │ detached                                                    │
//! │           ▼                                                             │
//! │  ┌──────────────────┐    ┌──────────────────┐    ┌──────────────────┐   │
//! │  │ Notifier         │    │ RoomAdmin        │    │ Expiration       │   │
//! │  │ (best-effort)    │    │ blocks, status   │    │ Sweeper (task)   │   │
//! │  └──────────────────┘    └──────────────────┘    └──────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`lifecycle`] - Booking creation, status changes and read projections
//! - [`availability`] - Free-room counts and lookups
//! - [`addons`] - Replacing a booking's addon lines
//! - [`rooms`] - Room blocks and room status
//! - [`sweeper`] - Background cancellation of expired holds
//! - [`notifier`] - Confirmation rendering and the `Notifier` seam
//! - [`config`] - Engine configuration (file + env)
//! - [`error`] - `BookingError` and its three kinds
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use hotel_booking::{BookingEngine, EngineConfig, LogNotifier};
//! use hotel_db::Database;
//!
//! let config = EngineConfig::load(None)?;
//! let db = Database::new(config.db_config()).await?;
//! let engine = BookingEngine::new(db, &config, Arc::new(LogNotifier));
//!
//! let counts = engine.count_available_rooms("2024-01-10", "2024-01-12").await?;
//! let booking = engine.create_booking(&request).await?;
//! engine.confirm_payment(&booking.id).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod addons;
pub mod availability;
pub mod config;
pub mod error;
pub mod lifecycle;
pub mod notifier;
pub mod rooms;
pub mod sweeper;

#[cfg(test)]
pub(crate) mod test_support;

// =============================================================================
// Re-exports
// =============================================================================

pub use addons::AddonSyncCoordinator;
pub use availability::AvailabilityResolver;
pub use config::{ConfigError, EngineConfig};
pub use error::{BookingError, BookingResult, ErrorKind};
pub use lifecycle::BookingLifecycle;
pub use notifier::{render_confirmation, LogNotifier, NoOpNotifier, Notifier, NotifyError};
pub use rooms::RoomAdmin;
pub use sweeper::{ExpirationSweeper, ExpirationSweeperHandle};

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;

use hotel_core::{
    AddonRequest, Booking, BookingAddon, BookingDetail, NewBooking, PricingEngine, StayDates,
};
use hotel_db::Database;

// =============================================================================
// Engine Facade
// =============================================================================

/// The booking API, wired from one database handle and one configuration.
///
/// Every operation reads the wall clock once; the components underneath
/// take `now` explicitly and can be driven directly in tests.
#[derive(Clone)]
pub struct BookingEngine {
    db: Database,
    lifecycle: BookingLifecycle,
    availability: AvailabilityResolver,
    addons: AddonSyncCoordinator,
    rooms: RoomAdmin,
}

impl BookingEngine {
    pub fn new(db: Database, config: &EngineConfig, notifier: Arc<dyn Notifier>) -> Self {
        let pricing = PricingEngine::new(config.tax_rate());

        BookingEngine {
            lifecycle: BookingLifecycle::new(
                db.clone(),
                pricing,
                config.hold_duration(),
                notifier,
            ),
            availability: AvailabilityResolver::new(db.clone()),
            addons: AddonSyncCoordinator::new(db.clone(), pricing),
            rooms: RoomAdmin::new(db.clone(), config.business_offset()),
            db,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn lifecycle(&self) -> &BookingLifecycle {
        &self.lifecycle
    }

    pub fn availability(&self) -> &AvailabilityResolver {
        &self.availability
    }

    pub fn addons(&self) -> &AddonSyncCoordinator {
        &self.addons
    }

    pub fn rooms(&self) -> &RoomAdmin {
        &self.rooms
    }

    // =========================================================================
    // Bookings
    // =========================================================================

    pub async fn create_booking(&self, request: &NewBooking) -> BookingResult<Booking> {
        self.lifecycle.create(request, Utc::now()).await
    }

    pub async fn get_booking(&self, booking_id: &str) -> BookingResult<BookingDetail> {
        self.lifecycle.get_full_details(booking_id).await
    }

    pub async fn change_booking_status(&self, booking_id: &str, status: &str) -> BookingResult<Booking> {
        self.lifecycle.change_status(booking_id, status, Utc::now()).await
    }

    /// Mocked payment: succeeds immediately and confirms the booking.
    pub async fn confirm_payment(&self, booking_id: &str) -> BookingResult<Booking> {
        self.lifecycle.confirm_payment(booking_id, Utc::now()).await
    }

    pub async fn replace_booking_addons(
        &self,
        booking_id: &str,
        addons: &[AddonRequest],
    ) -> BookingResult<Booking> {
        self.addons.replace_addons(booking_id, addons, Utc::now()).await
    }

    pub async fn get_addon_details(&self, booking_id: &str) -> BookingResult<Vec<BookingAddon>> {
        self.lifecycle.get_addon_details(booking_id).await
    }

    pub async fn list_user_bookings(&self, user_id: &str) -> BookingResult<Vec<BookingDetail>> {
        self.lifecycle.get_history(user_id).await
    }

    pub async fn list_all_bookings(&self) -> BookingResult<Vec<BookingDetail>> {
        self.lifecycle.get_all().await
    }

    // =========================================================================
    // Availability
    // =========================================================================

    /// Free rooms per room type. Dates are `YYYY-MM-DD`.
    pub async fn count_available_rooms(
        &self,
        check_in: &str,
        check_out: &str,
    ) -> BookingResult<BTreeMap<String, i64>> {
        let stay = StayDates::parse(check_in, check_out)?;
        self.availability.count_free_rooms_by_type(stay).await
    }

    /// Dates are `YYYY-MM-DD`.
    pub async fn find_available_room(
        &self,
        room_type_id: &str,
        check_in: &str,
        check_out: &str,
    ) -> BookingResult<String> {
        let stay = StayDates::parse(check_in, check_out)?;
        self.availability.find_available_room(room_type_id, stay).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Catalog;
    use hotel_core::BookingStatus;

    #[tokio::test]
    async fn test_engine_end_to_end() {
        let catalog = Catalog::seed(1).await;
        let engine = BookingEngine::new(
            catalog.db.clone(),
            &EngineConfig::default(),
            Arc::new(NoOpNotifier),
        );

        let counts = engine.count_available_rooms("2024-01-10", "2024-01-12").await.unwrap();
        assert_eq!(counts[&catalog.deluxe.id], 1);

        let booking = engine
            .create_booking(&catalog.request("2024-01-10", "2024-01-12", vec![]))
            .await
            .unwrap();

        let counts = engine.count_available_rooms("2024-01-11", "2024-01-13").await.unwrap();
        assert_eq!(counts[&catalog.deluxe.id], 0);
        // Checkout day is free for the next guest.
        let room = engine
            .find_available_room(&catalog.deluxe.id, "2024-01-12", "2024-01-13")
            .await
            .unwrap();
        assert_eq!(room, booking.room_id);

        let updated = engine
            .replace_booking_addons(&booking.id, &[AddonRequest::new(&catalog.breakfast.id, 1)])
            .await
            .unwrap();
        assert_eq!(updated.total_cents, 251_450);
        assert_eq!(engine.get_addon_details(&booking.id).await.unwrap().len(), 1);

        engine.confirm_payment(&booking.id).await.unwrap();
        let detail = engine.get_booking(&booking.id).await.unwrap();
        assert_eq!(detail.booking.status, BookingStatus::Confirmed);
        assert_eq!(detail.room_number, "101");
        assert_eq!(detail.room_type_name, "Deluxe");

        engine.change_booking_status(&booking.id, "checked-in").await.unwrap();
        assert_eq!(engine.list_user_bookings(&catalog.user.id).await.unwrap().len(), 1);
        assert_eq!(engine.list_all_bookings().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_engine_rejects_malformed_dates() {
        let catalog = Catalog::seed(1).await;
        let engine = BookingEngine::new(
            catalog.db.clone(),
            &EngineConfig::default(),
            Arc::new(NoOpNotifier),
        );

        let err = engine.count_available_rooms("2024-13-01", "2024-01-12").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let err = engine
            .find_available_room(&catalog.deluxe.id, "2024-01-12", "2024-01-12")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
