//! # Room Administration
//!
//! Taking rooms out of inventory: date-range blocks and the room status
//! flag. Both feed the availability predicate, so a blocked or
//! maintenance room is never counted or claimed.

use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use tracing::info;

use hotel_core::validation::validate_not_in_past;
use hotel_core::{Room, RoomBlock, RoomStatus, StayDates};
use hotel_db::{Database, DbError};

use crate::error::{BookingError, BookingResult};

#[derive(Debug, Clone)]
pub struct RoomAdmin {
    db: Database,
    business_offset: FixedOffset,
}

impl RoomAdmin {
    /// `business_offset` decides what "today" is when validating blocks.
    pub fn new(db: Database, business_offset: FixedOffset) -> Self {
        RoomAdmin {
            db,
            business_offset,
        }
    }

    /// Blocks `room_id` for `[start, end)`.
    ///
    /// Rejected if the range is empty, starts before today (hotel time), or
    /// overlaps another block or a booking that isn't cancelled.
    pub async fn block_room(
        &self,
        room_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        reason: &str,
        now: DateTime<Utc>,
    ) -> BookingResult<RoomBlock> {
        let range = StayDates::new(start, end)?;
        let today = now.with_timezone(&self.business_offset).date_naive();
        validate_not_in_past("start_date", start, today)?;

        self.get_room(room_id).await?;

        let block = self
            .db
            .rooms()
            .create_block(room_id, range.check_in(), range.check_out(), reason)
            .await
            .map_err(|e| match e {
                DbError::Conflict(message) => BookingError::validation(message),
                other => other.into(),
            })?;

        info!(block_id = %block.id, room_id = %room_id, %start, %end, "Room blocked");
        Ok(block)
    }

    pub async fn list_blocks(&self, room_id: &str) -> BookingResult<Vec<RoomBlock>> {
        Ok(self.db.rooms().list_blocks(room_id).await?)
    }

    pub async fn unblock_room(&self, block_id: &str) -> BookingResult<()> {
        self.db.rooms().delete_block(block_id).await?;
        info!(block_id = %block_id, "Room unblocked");
        Ok(())
    }

    /// Sets the room's status from a case-insensitive tag
    /// (`available`, `occupied`, `dirty`, `maintenance`).
    pub async fn change_room_status(&self, room_id: &str, status: &str) -> BookingResult<Room> {
        let status: RoomStatus = status.parse()?;
        self.db.rooms().update_status(room_id, status).await?;
        info!(room_id = %room_id, %status, "Room status changed");
        self.get_room(room_id).await
    }

    async fn get_room(&self, room_id: &str) -> BookingResult<Room> {
        self.db
            .rooms()
            .get_room(room_id)
            .await?
            .ok_or_else(|| BookingError::not_found(format!("room {room_id} not found")))
    }
}
