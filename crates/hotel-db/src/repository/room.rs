//! # Room Repository
//!
//! Room types, physical rooms, room blocks and the availability queries.
//!
//! ## The Availability Predicate
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  A room r is FREE for [in, out) when all of:                            │
//! │                                                                         │
//! │   1. r.status <> 'maintenance'                                          │
//! │   2. no booking b on r with b.status <> 'cancelled'                     │
//! │        AND b.check_in_date < out AND in < b.check_out_date              │
//! │   3. no block k on r with k.start_date < out AND in < k.end_date        │
//! │                                                                         │
//! │  Dates are 'YYYY-MM-DD' text, so string comparison is date comparison.  │
//! │  Free rooms are picked in natural room-number order ("101" < "1000").   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The predicate is shared with [`BookingRepository`](super::booking::BookingRepository),
//! which embeds it in the conditional insert that claims a room.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use hotel_core::validation::{validate_capacity, validate_name, validate_room_number};
use hotel_core::{Amenity, Room, RoomBlock, RoomStatus, RoomType, RoomTypeDetails, StayDates};

/// SQL condition for "room `r` is free for `[?1, ?2)`".
///
/// Callers must bind check-in as `?1` and check-out as `?2` and alias the
/// rooms table as `r`.
pub(crate) const ROOM_IS_FREE: &str = r#"
    r.status <> 'maintenance'
    AND NOT EXISTS (
        SELECT 1 FROM bookings b
        WHERE b.room_id = r.id
          AND b.status <> 'cancelled'
          AND b.check_in_date < ?2
          AND ?1 < b.check_out_date
    )
    AND NOT EXISTS (
        SELECT 1 FROM room_blocks rb
        WHERE rb.room_id = r.id
          AND rb.start_date < ?2
          AND ?1 < rb.end_date
    )
"#;

/// Natural order for room numbers: shorter first, then lexical, so "99"
/// sorts before "101" and "101" before "1000".
pub(crate) const ROOM_NUMBER_ORDER: &str = "length(r.room_number), r.room_number";

/// Repository for room inventory.
#[derive(Debug, Clone)]
pub struct RoomRepository {
    pool: SqlitePool,
}

impl RoomRepository {
    /// Creates a new RoomRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RoomRepository { pool }
    }

    // =========================================================================
    // Availability
    // =========================================================================

    /// Counts free rooms per room type for the stay.
    ///
    /// Every room type is present in the result; types with nothing free map
    /// to zero.
    pub async fn count_available_by_type(&self, stay: StayDates) -> DbResult<BTreeMap<String, i64>> {
        let sql = format!(
            r#"
            SELECT rt.id, COUNT(r.id)
            FROM room_types rt
            LEFT JOIN rooms r
                ON r.room_type_id = rt.id
               AND {ROOM_IS_FREE}
            GROUP BY rt.id
            "#
        );

        let rows: Vec<(String, i64)> = sqlx::query_as(&sql)
            .bind(stay.check_in())
            .bind(stay.check_out())
            .fetch_all(&self.pool)
            .await?;

        debug!(
            check_in = %stay.check_in(),
            check_out = %stay.check_out(),
            room_types = rows.len(),
            "Counted available rooms"
        );

        Ok(rows.into_iter().collect())
    }

    /// Returns the first free room in natural room-number order, without reserving it.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no room of this type is free
    pub async fn find_available_room(&self, room_type_id: &str, stay: StayDates) -> DbResult<String> {
        let sql = format!(
            r#"
            SELECT r.id
            FROM rooms r
            WHERE r.room_type_id = ?3
              AND {ROOM_IS_FREE}
            ORDER BY {ROOM_NUMBER_ORDER}
            LIMIT 1
            "#
        );

        let room_id: Option<String> = sqlx::query_scalar(&sql)
            .bind(stay.check_in())
            .bind(stay.check_out())
            .bind(room_type_id)
            .fetch_optional(&self.pool)
            .await?;

        room_id.ok_or_else(|| DbError::not_found("Available room", room_type_id))
    }

    // =========================================================================
    // Room Types
    // =========================================================================

    /// Inserts a room type.
    pub async fn insert_room_type(&self, room_type: &RoomType) -> DbResult<()> {
        validate_name("name", &room_type.name)?;
        validate_capacity(room_type.capacity)?;

        debug!(id = %room_type.id, name = %room_type.name, "Inserting room type");

        sqlx::query(
            r#"
            INSERT INTO room_types (
                id, name, description, size_sqm, bed_type, capacity, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&room_type.id)
        .bind(&room_type.name)
        .bind(&room_type.description)
        .bind(room_type.size_sqm)
        .bind(&room_type.bed_type)
        .bind(room_type.capacity)
        .bind(room_type.created_at)
        .bind(room_type.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a room type by ID.
    pub async fn get_room_type(&self, id: &str) -> DbResult<Option<RoomType>> {
        let room_type = sqlx::query_as::<_, RoomType>(
            r#"
            SELECT id, name, description, size_sqm, bed_type, capacity, created_at, updated_at
            FROM room_types
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room_type)
    }

    /// Lists all room types by name.
    pub async fn list_room_types(&self) -> DbResult<Vec<RoomType>> {
        let room_types = sqlx::query_as::<_, RoomType>(
            r#"
            SELECT id, name, description, size_sqm, bed_type, capacity, created_at, updated_at
            FROM room_types
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(room_types)
    }

    /// Updates the descriptive fields of a room type. Pictures, amenities
    /// and prices are managed separately.
    pub async fn update_room_type(&self, room_type: &RoomType, now: DateTime<Utc>) -> DbResult<()> {
        validate_name("name", &room_type.name)?;
        validate_capacity(room_type.capacity)?;

        let result = sqlx::query(
            r#"
            UPDATE room_types SET
                name = ?2,
                description = ?3,
                size_sqm = ?4,
                bed_type = ?5,
                capacity = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&room_type.id)
        .bind(&room_type.name)
        .bind(&room_type.description)
        .bind(room_type.size_sqm)
        .bind(&room_type.bed_type)
        .bind(room_type.capacity)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Room type", &room_type.id));
        }

        Ok(())
    }

    /// Deletes a room type with its pictures, amenity links and prices.
    /// Fails with a foreign key violation while rooms of this type exist.
    pub async fn delete_room_type(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM room_types WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Room type", id));
        }

        Ok(())
    }

    /// Returns true if the room type exists.
    pub async fn room_type_exists(&self, id: &str) -> DbResult<bool> {
        let exists: i64 = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM room_types WHERE id = ?1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists == 1)
    }

    /// Replaces the ordered picture set of a room type.
    pub async fn set_pictures(&self, room_type_id: &str, urls: &[String]) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM room_type_pictures WHERE room_type_id = ?1")
            .bind(room_type_id)
            .execute(&mut *tx)
            .await?;

        for (position, url) in urls.iter().enumerate() {
            sqlx::query(
                "INSERT INTO room_type_pictures (room_type_id, position, url) VALUES (?1, ?2, ?3)",
            )
            .bind(room_type_id)
            .bind(position as i64)
            .bind(url)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    // =========================================================================
    // Amenities
    // =========================================================================

    /// Inserts an amenity.
    pub async fn insert_amenity(&self, amenity: &Amenity) -> DbResult<()> {
        validate_name("name", &amenity.name)?;

        sqlx::query("INSERT INTO amenities (id, name) VALUES (?1, ?2)")
            .bind(&amenity.id)
            .bind(&amenity.name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn get_amenity(&self, id: &str) -> DbResult<Option<Amenity>> {
        let amenity = sqlx::query_as::<_, Amenity>("SELECT id, name FROM amenities WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(amenity)
    }

    /// Lists all amenities by name.
    pub async fn list_amenities(&self) -> DbResult<Vec<Amenity>> {
        let amenities = sqlx::query_as::<_, Amenity>("SELECT id, name FROM amenities ORDER BY name")
            .fetch_all(&self.pool)
            .await?;

        Ok(amenities)
    }

    /// Renames an amenity.
    pub async fn update_amenity(&self, amenity: &Amenity) -> DbResult<()> {
        validate_name("name", &amenity.name)?;

        let result = sqlx::query("UPDATE amenities SET name = ?2 WHERE id = ?1")
            .bind(&amenity.id)
            .bind(&amenity.name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Amenity", &amenity.id));
        }

        Ok(())
    }

    /// Deletes an amenity and unlinks it from every room type.
    pub async fn delete_amenity(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM amenities WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Amenity", id));
        }

        Ok(())
    }

    /// Replaces the amenity links of a room type.
    pub async fn set_amenities(&self, room_type_id: &str, amenity_ids: &[String]) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM room_type_amenities WHERE room_type_id = ?1")
            .bind(room_type_id)
            .execute(&mut *tx)
            .await?;

        for amenity_id in amenity_ids {
            sqlx::query("INSERT INTO room_type_amenities (room_type_id, amenity_id) VALUES (?1, ?2)")
                .bind(room_type_id)
                .bind(amenity_id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Gets a room type with its pictures (in order) and amenity names.
    pub async fn get_room_type_details(&self, id: &str) -> DbResult<Option<RoomTypeDetails>> {
        let Some(room_type) = self.get_room_type(id).await? else {
            return Ok(None);
        };

        let picture_urls: Vec<String> = sqlx::query_scalar(
            "SELECT url FROM room_type_pictures WHERE room_type_id = ?1 ORDER BY position",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        let amenities: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT a.name
            FROM room_type_amenities rta
            JOIN amenities a ON a.id = rta.amenity_id
            WHERE rta.room_type_id = ?1
            ORDER BY a.name
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(RoomTypeDetails {
            room_type,
            picture_urls,
            amenities,
        }))
    }

    // =========================================================================
    // Rooms
    // =========================================================================

    /// Inserts a physical room.
    pub async fn insert_room(&self, room: &Room) -> DbResult<()> {
        validate_room_number(&room.room_number)?;

        debug!(id = %room.id, room_number = %room.room_number, "Inserting room");

        sqlx::query(
            "INSERT INTO rooms (id, room_type_id, room_number, status) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(&room.id)
        .bind(&room.room_type_id)
        .bind(&room.room_number)
        .bind(room.status)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &room.room_number),
            other => other,
        })?;

        Ok(())
    }

    /// Gets a room by ID.
    pub async fn get_room(&self, id: &str) -> DbResult<Option<Room>> {
        let room = sqlx::query_as::<_, Room>(
            "SELECT id, room_type_id, room_number, status FROM rooms WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(room)
    }

    /// Lists all rooms by room number.
    pub async fn list_rooms(&self) -> DbResult<Vec<Room>> {
        let sql = format!(
            "SELECT r.id, r.room_type_id, r.room_number, r.status FROM rooms r ORDER BY {ROOM_NUMBER_ORDER}"
        );
        let rooms = sqlx::query_as::<_, Room>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rooms)
    }

    /// Updates the housekeeping status of a room.
    pub async fn update_status(&self, room_id: &str, status: RoomStatus) -> DbResult<()> {
        let result = sqlx::query("UPDATE rooms SET status = ?2 WHERE id = ?1")
            .bind(room_id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Room", room_id));
        }

        Ok(())
    }

    /// Deletes a room. Fails with a foreign key violation if bookings reference it.
    pub async fn delete_room(&self, room_id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM rooms WHERE id = ?1")
            .bind(room_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Room", room_id));
        }

        Ok(())
    }

    // =========================================================================
    // Room Blocks
    // =========================================================================

    /// Blocks a room for `[start, end)`.
    ///
    /// The overlap check and the insert are one conditional statement, so two
    /// racing blocks (or a block racing a booking) cannot both land.
    ///
    /// ## Returns
    /// * `Err(DbError::Conflict)` - overlaps another block or a live booking
    pub async fn create_block(
        &self,
        room_id: &str,
        start: NaiveDate,
        end: NaiveDate,
        reason: &str,
    ) -> DbResult<RoomBlock> {
        let block = RoomBlock {
            id: Uuid::new_v4().to_string(),
            room_id: room_id.to_string(),
            start_date: start,
            end_date: end,
            reason: reason.to_string(),
            created_at: Utc::now(),
        };

        debug!(room_id = %room_id, %start, %end, "Creating room block");

        let result = sqlx::query(
            r#"
            INSERT INTO room_blocks (id, room_id, start_date, end_date, reason, created_at)
            SELECT ?3, ?4, ?1, ?2, ?5, ?6
            WHERE NOT EXISTS (
                SELECT 1 FROM room_blocks
                WHERE room_id = ?4 AND start_date < ?2 AND ?1 < end_date
            )
            AND NOT EXISTS (
                SELECT 1 FROM bookings
                WHERE room_id = ?4
                  AND status <> 'cancelled'
                  AND check_in_date < ?2
                  AND ?1 < check_out_date
            )
            "#,
        )
        .bind(block.start_date)
        .bind(block.end_date)
        .bind(&block.id)
        .bind(&block.room_id)
        .bind(&block.reason)
        .bind(block.created_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::conflict(format!(
                "room {room_id} already has a block or booking between {start} and {end}"
            )));
        }

        Ok(block)
    }

    /// Lists the blocks of a room by start date.
    pub async fn list_blocks(&self, room_id: &str) -> DbResult<Vec<RoomBlock>> {
        let blocks = sqlx::query_as::<_, RoomBlock>(
            r#"
            SELECT id, room_id, start_date, end_date, reason, created_at
            FROM room_blocks
            WHERE room_id = ?1
            ORDER BY start_date
            "#,
        )
        .bind(room_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(blocks)
    }

    /// Deletes a block.
    pub async fn delete_block(&self, block_id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM room_blocks WHERE id = ?1")
            .bind(block_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Room block", block_id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn stay(a: &str, b: &str) -> StayDates {
        StayDates::new(date(a), date(b)).unwrap()
    }

    async fn setup() -> (Database, RoomType) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let deluxe = RoomType::new("Deluxe", 2);
        db.rooms().insert_room_type(&deluxe).await.unwrap();
        (db, deluxe)
    }

    #[tokio::test]
    async fn test_find_available_is_ordered_by_room_number() {
        let (db, deluxe) = setup().await;
        let r102 = Room::new(&deluxe.id, "102");
        let r101 = Room::new(&deluxe.id, "101");
        db.rooms().insert_room(&r102).await.unwrap();
        db.rooms().insert_room(&r101).await.unwrap();

        let found = db
            .rooms()
            .find_available_room(&deluxe.id, stay("2024-01-10", "2024-01-12"))
            .await
            .unwrap();
        assert_eq!(found, r101.id);
    }

    #[tokio::test]
    async fn test_room_numbers_sort_naturally() {
        let (db, deluxe) = setup().await;
        let r1000 = Room::new(&deluxe.id, "1000");
        let r101 = Room::new(&deluxe.id, "101");
        let r99 = Room::new(&deluxe.id, "99");
        db.rooms().insert_room(&r1000).await.unwrap();
        db.rooms().insert_room(&r101).await.unwrap();

        let found = db
            .rooms()
            .find_available_room(&deluxe.id, stay("2024-01-10", "2024-01-12"))
            .await
            .unwrap();
        assert_eq!(found, r101.id);

        db.rooms().insert_room(&r99).await.unwrap();
        let numbers: Vec<String> = db
            .rooms()
            .list_rooms()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.room_number)
            .collect();
        assert_eq!(numbers, vec!["99", "101", "1000"]);
    }

    #[tokio::test]
    async fn test_maintenance_and_blocks_remove_rooms() {
        let (db, deluxe) = setup().await;
        let r101 = Room::new(&deluxe.id, "101");
        let r102 = Room::new(&deluxe.id, "102");
        db.rooms().insert_room(&r101).await.unwrap();
        db.rooms().insert_room(&r102).await.unwrap();

        db.rooms()
            .update_status(&r101.id, RoomStatus::Maintenance)
            .await
            .unwrap();
        db.rooms()
            .create_block(&r102.id, date("2024-01-11"), date("2024-01-13"), "painting")
            .await
            .unwrap();

        let counts = db
            .rooms()
            .count_available_by_type(stay("2024-01-10", "2024-01-12"))
            .await
            .unwrap();
        assert_eq!(counts.get(&deluxe.id), Some(&0));

        // Block ends on the 13th; a stay starting that day is clear.
        let counts = db
            .rooms()
            .count_available_by_type(stay("2024-01-13", "2024-01-14"))
            .await
            .unwrap();
        assert_eq!(counts.get(&deluxe.id), Some(&1));

        let err = db
            .rooms()
            .find_available_room(&deluxe.id, stay("2024-01-10", "2024-01-12"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_overlapping_blocks_rejected() {
        let (db, deluxe) = setup().await;
        let room = Room::new(&deluxe.id, "201");
        db.rooms().insert_room(&room).await.unwrap();

        db.rooms()
            .create_block(&room.id, date("2024-03-01"), date("2024-03-05"), "carpet")
            .await
            .unwrap();

        let overlap = db
            .rooms()
            .create_block(&room.id, date("2024-03-04"), date("2024-03-06"), "paint")
            .await;
        assert!(matches!(overlap, Err(DbError::Conflict(_))));

        // Adjacent is fine under the half-open rule.
        db.rooms()
            .create_block(&room.id, date("2024-03-05"), date("2024-03-06"), "paint")
            .await
            .unwrap();

        let blocks = db.rooms().list_blocks(&room.id).await.unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].start_date, date("2024-03-01"));

        db.rooms().delete_block(&blocks[0].id).await.unwrap();
        assert!(db.rooms().delete_block(&blocks[0].id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_duplicate_room_number() {
        let (db, deluxe) = setup().await;
        db.rooms().insert_room(&Room::new(&deluxe.id, "301")).await.unwrap();
        let dup = db.rooms().insert_room(&Room::new(&deluxe.id, "301")).await;
        assert!(matches!(dup, Err(DbError::UniqueViolation { .. })));
    }

    #[tokio::test]
    async fn test_room_type_details() {
        let (db, deluxe) = setup().await;
        let wifi = Amenity::new("Wi-Fi");
        let bath = Amenity::new("Bathtub");
        db.rooms().insert_amenity(&wifi).await.unwrap();
        db.rooms().insert_amenity(&bath).await.unwrap();
        db.rooms()
            .set_amenities(&deluxe.id, &[wifi.id.clone(), bath.id.clone()])
            .await
            .unwrap();
        db.rooms()
            .set_pictures(&deluxe.id, &["b.jpg".to_string(), "a.jpg".to_string()])
            .await
            .unwrap();

        let details = db.rooms().get_room_type_details(&deluxe.id).await.unwrap().unwrap();
        assert_eq!(details.picture_urls, vec!["b.jpg", "a.jpg"]);
        assert_eq!(details.amenities, vec!["Bathtub", "Wi-Fi"]);
        assert!(db.rooms().get_room_type_details("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_catalog_input_rejected() {
        let (db, deluxe) = setup().await;

        let bad_number = db.rooms().insert_room(&Room::new(&deluxe.id, "1 01")).await;
        assert!(matches!(bad_number, Err(DbError::Invalid(_))));

        let no_capacity = db.rooms().insert_room_type(&RoomType::new("Closet", 0)).await;
        assert!(matches!(no_capacity, Err(DbError::Invalid(_))));

        let unnamed = db.rooms().insert_room_type(&RoomType::new("  ", 2)).await;
        assert!(matches!(unnamed, Err(DbError::Invalid(_))));

        assert!(db.rooms().list_rooms().await.unwrap().is_empty());
        assert_eq!(db.rooms().list_room_types().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_and_delete_room_type() {
        let (db, deluxe) = setup().await;

        let mut edited = deluxe.clone();
        edited.name = "Deluxe King".to_string();
        edited.bed_type = "King".to_string();
        edited.capacity = 3;
        db.rooms().update_room_type(&edited, Utc::now()).await.unwrap();

        let stored = db.rooms().get_room_type(&deluxe.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Deluxe King");
        assert_eq!(stored.capacity, 3);
        assert_eq!(stored.bed_type, "King");

        edited.capacity = 0;
        let invalid = db.rooms().update_room_type(&edited, Utc::now()).await;
        assert!(matches!(invalid, Err(DbError::Invalid(_))));

        let ghost = RoomType::new("Ghost", 1);
        let missing = db.rooms().update_room_type(&ghost, Utc::now()).await;
        assert!(missing.unwrap_err().is_not_found());

        // Rooms still point at the type.
        let room = Room::new(&deluxe.id, "101");
        db.rooms().insert_room(&room).await.unwrap();
        let in_use = db.rooms().delete_room_type(&deluxe.id).await;
        assert!(matches!(in_use, Err(DbError::ForeignKeyViolation { .. })));

        db.rooms().delete_room(&room.id).await.unwrap();
        db.rooms()
            .set_pictures(&deluxe.id, &["a.jpg".to_string()])
            .await
            .unwrap();
        db.rooms().delete_room_type(&deluxe.id).await.unwrap();
        assert!(db.rooms().get_room_type(&deluxe.id).await.unwrap().is_none());
        assert!(db.rooms().delete_room_type(&deluxe.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_amenity_crud() {
        let (db, deluxe) = setup().await;
        let wifi = Amenity::new("Wi-Fi");
        let pool = Amenity::new("Pool");
        db.rooms().insert_amenity(&wifi).await.unwrap();
        db.rooms().insert_amenity(&pool).await.unwrap();
        db.rooms().set_amenities(&deluxe.id, &[wifi.id.clone()]).await.unwrap();

        assert_eq!(db.rooms().get_amenity(&wifi.id).await.unwrap(), Some(wifi.clone()));
        assert!(db.rooms().get_amenity("missing").await.unwrap().is_none());
        assert_eq!(db.rooms().list_amenities().await.unwrap(), vec![pool.clone(), wifi.clone()]);

        let renamed = Amenity {
            name: "Free Wi-Fi".to_string(),
            ..wifi.clone()
        };
        db.rooms().update_amenity(&renamed).await.unwrap();
        let details = db.rooms().get_room_type_details(&deluxe.id).await.unwrap().unwrap();
        assert_eq!(details.amenities, vec!["Free Wi-Fi"]);

        let blank = Amenity {
            name: String::new(),
            ..wifi.clone()
        };
        assert!(matches!(db.rooms().update_amenity(&blank).await, Err(DbError::Invalid(_))));
        assert!(db
            .rooms()
            .update_amenity(&Amenity::new("Sauna"))
            .await
            .unwrap_err()
            .is_not_found());

        // Deleting unlinks it from the room type.
        db.rooms().delete_amenity(&wifi.id).await.unwrap();
        let details = db.rooms().get_room_type_details(&deluxe.id).await.unwrap().unwrap();
        assert!(details.amenities.is_empty());
        assert!(db.rooms().delete_amenity(&wifi.id).await.unwrap_err().is_not_found());
    }
}
