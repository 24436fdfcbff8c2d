//! # Availability
//!
//! Read-side answers to "what is free for these dates". The claim itself,
//! which must be atomic with the booking insert, lives in
//! [`BookingRepository::create_with_claim`](hotel_db::BookingRepository::create_with_claim).

use std::collections::BTreeMap;

use tracing::{debug, info};

use hotel_core::StayDates;
use hotel_db::Database;

use crate::error::{BookingError, BookingResult};

#[derive(Debug, Clone)]
pub struct AvailabilityResolver {
    db: Database,
}

impl AvailabilityResolver {
    pub fn new(db: Database) -> Self {
        AvailabilityResolver { db }
    }

    /// Number of free rooms per room type for `[check_in, check_out)`.
    ///
    /// Every room type appears; zero means fully booked, blocked or under
    /// maintenance for at least one night of the stay.
    pub async fn count_free_rooms_by_type(&self, stay: StayDates) -> BookingResult<BTreeMap<String, i64>> {
        let counts = self.db.rooms().count_available_by_type(stay).await?;

        info!(
            check_in = %stay.check_in(),
            check_out = %stay.check_out(),
            room_types = counts.len(),
            free_rooms = counts.values().sum::<i64>(),
            "Availability counted"
        );

        Ok(counts)
    }

    /// The room a booking for this type and stay would get right now.
    ///
    /// Read-only; a concurrent booking may take the room before the caller
    /// acts on the answer.
    pub async fn find_available_room(&self, room_type_id: &str, stay: StayDates) -> BookingResult<String> {
        self.ensure_room_type(room_type_id).await?;

        match self.db.rooms().find_available_room(room_type_id, stay).await {
            Ok(room_id) => {
                debug!(room_type_id, room_id = %room_id, "Found free room");
                Ok(room_id)
            }
            Err(e) if e.is_not_found() => Err(no_available_room(room_type_id, stay)),
            Err(e) => Err(e.into()),
        }
    }

    /// Fails with `NotFound` if the room type doesn't exist.
    pub(crate) async fn ensure_room_type(&self, room_type_id: &str) -> BookingResult<()> {
        if self.db.rooms().room_type_exists(room_type_id).await? {
            Ok(())
        } else {
            Err(BookingError::not_found(format!(
                "missing room type inventory: {room_type_id}"
            )))
        }
    }
}

pub(crate) fn no_available_room(room_type_id: &str, stay: StayDates) -> BookingError {
    BookingError::not_found(format!(
        "no available room of type {room_type_id} from {} to {}",
        stay.check_in(),
        stay.check_out()
    ))
}
