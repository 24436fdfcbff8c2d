//! # Booking Repository
//!
//! Bookings, their addon lines, and the writes that must be atomic.
//!
//! ## Claiming a Room
//! ```text
//! BEGIN
//!   INSERT INTO bookings (...)            ◄── first statement: takes the
//!   SELECT ..., r.id                          write lock before the
//!   FROM rooms r                              availability predicate runs
//!   WHERE r.room_type_id = ?
//!     AND <room is free for [in, out)>
//!   ORDER BY <natural room number> LIMIT 1
//!   RETURNING room_id                     ◄── no row: nothing was free
//!
//!   INSERT INTO booking_addons ... × N    ◄── frozen unit prices
//! COMMIT
//! ```
//!
//! A racing writer blocks on the lock (busy timeout) and evaluates the
//! predicate only after this transaction commits, so it sees the new booking.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};
use uuid::Uuid;

use super::room::{ROOM_IS_FREE, ROOM_NUMBER_ORDER};
use crate::error::{DbError, DbResult};
use hotel_core::{Booking, BookingAddon, BookingDetail, BookingStatus, PriceBreakdown};

const BOOKING_COLUMNS: &str = r#"
    b.id, b.user_id, b.rate_plan_id, b.room_id, b.check_in_date, b.check_out_date,
    b.num_adults, b.status, b.room_subtotal_cents, b.addon_subtotal_cents,
    b.taxes_cents, b.total_cents, b.created_at, b.updated_at, b.expired_at
"#;

const DETAIL_JOINS: &str = r#"
    JOIN rate_plans rp ON rp.id = b.rate_plan_id
    JOIN rooms r ON r.id = b.room_id
    JOIN room_types rt ON rt.id = r.room_type_id
    JOIN users u ON u.id = b.user_id
"#;

const ADDON_LINE_COLUMNS: &str = r#"
    ba.id, ba.booking_id, ba.addon_id, a.name AS addon_name,
    ba.quantity, ba.price_at_booking_cents, ba.position
"#;

// =============================================================================
// Write Models
// =============================================================================

/// An addon line priced at the catalog's current price, ready to freeze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedAddonLine {
    pub addon_id: String,
    pub addon_name: String,
    pub quantity: i64,
    pub price_at_booking_cents: i64,
}

/// Everything needed to insert a pending booking except the room, which is
/// chosen by the claim itself.
#[derive(Debug, Clone)]
pub struct NewBookingRecord {
    pub id: String,
    pub user_id: String,
    pub rate_plan_id: String,
    pub room_type_id: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub num_adults: i64,
    pub breakdown: PriceBreakdown,
    pub created_at: DateTime<Utc>,
    pub expired_at: DateTime<Utc>,
    pub addons: Vec<PricedAddonLine>,
}

impl NewBookingRecord {
    /// Creates a record with a fresh booking ID.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        user_id: impl Into<String>,
        rate_plan_id: impl Into<String>,
        room_type_id: impl Into<String>,
        check_in: NaiveDate,
        check_out: NaiveDate,
        num_adults: i64,
        breakdown: PriceBreakdown,
        created_at: DateTime<Utc>,
        expired_at: DateTime<Utc>,
    ) -> Self {
        NewBookingRecord {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            rate_plan_id: rate_plan_id.into(),
            room_type_id: room_type_id.into(),
            check_in,
            check_out,
            num_adults,
            breakdown,
            created_at,
            expired_at,
            addons: Vec::new(),
        }
    }

    pub fn with_addons(mut self, addons: Vec<PricedAddonLine>) -> Self {
        self.addons = addons;
        self
    }
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for bookings and booking addon lines.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    /// Creates a new BookingRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookingRepository { pool }
    }

    /// Claims the lowest-numbered free room of the requested type and inserts
    /// the pending booking with its addon lines, all in one transaction.
    ///
    /// ## Returns
    /// * `Ok(Booking)` - the persisted booking, addon lines included
    /// * `Err(DbError::NotFound)` - no room of that type is free for the stay
    pub async fn create_with_claim(&self, record: &NewBookingRecord) -> DbResult<Booking> {
        debug!(
            id = %record.id,
            room_type_id = %record.room_type_id,
            check_in = %record.check_in,
            check_out = %record.check_out,
            "Claiming room"
        );

        let mut tx = self.pool.begin().await?;

        let claim_sql = format!(
            r#"
            INSERT INTO bookings (
                id, user_id, rate_plan_id, room_id, check_in_date, check_out_date,
                num_adults, status, room_subtotal_cents, addon_subtotal_cents,
                taxes_cents, total_cents, created_at, updated_at, expired_at
            )
            SELECT ?4, ?5, ?6, r.id, ?1, ?2,
                   ?7, 'pending', ?8, ?9,
                   ?10, ?11, ?12, ?12, ?13
            FROM rooms r
            WHERE r.room_type_id = ?3
              AND {ROOM_IS_FREE}
            ORDER BY {ROOM_NUMBER_ORDER}
            LIMIT 1
            RETURNING room_id
            "#
        );

        let room_id: Option<String> = sqlx::query_scalar(&claim_sql)
            .bind(record.check_in)
            .bind(record.check_out)
            .bind(&record.room_type_id)
            .bind(&record.id)
            .bind(&record.user_id)
            .bind(&record.rate_plan_id)
            .bind(record.num_adults)
            .bind(record.breakdown.room_subtotal.cents())
            .bind(record.breakdown.addon_subtotal.cents())
            .bind(record.breakdown.taxes.cents())
            .bind(record.breakdown.total.cents())
            .bind(record.created_at)
            .bind(record.expired_at)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(room_id) = room_id else {
            // Dropping the transaction rolls it back.
            return Err(DbError::not_found("Available room", &record.room_type_id));
        };

        insert_addon_lines(&mut tx, &record.id, &record.addons).await?;

        tx.commit().await?;

        info!(id = %record.id, room_id = %room_id, "Booking created");

        self.get_by_id(&record.id)
            .await?
            .ok_or_else(|| DbError::not_found("Booking", &record.id))
    }

    /// Gets a booking by ID with its addon lines.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Booking>> {
        let sql = format!("SELECT {BOOKING_COLUMNS} FROM bookings b WHERE b.id = ?1");

        let booking = sqlx::query_as::<_, Booking>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match booking {
            Some(mut booking) => {
                booking.addons = self.get_addon_lines(id).await?;
                Ok(Some(booking))
            }
            None => Ok(None),
        }
    }

    /// Gets a booking with rate plan, room and user names, and its addon lines.
    pub async fn get_detail(&self, id: &str) -> DbResult<Option<BookingDetail>> {
        let sql = format!(
            r#"
            SELECT {BOOKING_COLUMNS},
                   rp.name AS rate_plan_name,
                   r.room_number,
                   rt.name AS room_type_name,
                   u.username,
                   u.email AS user_email
            FROM bookings b
            {DETAIL_JOINS}
            WHERE b.id = ?1
            "#
        );

        let detail = sqlx::query_as::<_, BookingDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match detail {
            Some(mut detail) => {
                detail.booking.addons = self.get_addon_lines(id).await?;
                Ok(Some(detail))
            }
            None => Ok(None),
        }
    }

    /// Gets the addon lines of a booking in request order.
    pub async fn get_addon_lines(&self, booking_id: &str) -> DbResult<Vec<BookingAddon>> {
        let sql = format!(
            r#"
            SELECT {ADDON_LINE_COLUMNS}
            FROM booking_addons ba
            JOIN addons a ON a.id = ba.addon_id
            WHERE ba.booking_id = ?1
            ORDER BY ba.position
            "#
        );

        let lines = sqlx::query_as::<_, BookingAddon>(&sql)
            .bind(booking_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(lines)
    }

    /// Lists a user's bookings, newest first.
    pub async fn list_by_user(&self, user_id: &str) -> DbResult<Vec<BookingDetail>> {
        let sql = format!(
            r#"
            SELECT {BOOKING_COLUMNS},
                   rp.name AS rate_plan_name,
                   r.room_number,
                   rt.name AS room_type_name,
                   u.username,
                   u.email AS user_email
            FROM bookings b
            {DETAIL_JOINS}
            WHERE b.user_id = ?1
            ORDER BY julianday(b.created_at) DESC, b.id
            "#
        );

        let details = sqlx::query_as::<_, BookingDetail>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        let lines_sql = format!(
            r#"
            SELECT {ADDON_LINE_COLUMNS}
            FROM booking_addons ba
            JOIN addons a ON a.id = ba.addon_id
            JOIN bookings b ON b.id = ba.booking_id
            WHERE b.user_id = ?1
            ORDER BY ba.booking_id, ba.position
            "#
        );

        let lines = sqlx::query_as::<_, BookingAddon>(&lines_sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(attach_lines(details, lines))
    }

    /// Lists every booking, newest first.
    pub async fn list_all(&self) -> DbResult<Vec<BookingDetail>> {
        let sql = format!(
            r#"
            SELECT {BOOKING_COLUMNS},
                   rp.name AS rate_plan_name,
                   r.room_number,
                   rt.name AS room_type_name,
                   u.username,
                   u.email AS user_email
            FROM bookings b
            {DETAIL_JOINS}
            ORDER BY julianday(b.created_at) DESC, b.id
            "#
        );

        let details = sqlx::query_as::<_, BookingDetail>(&sql)
            .fetch_all(&self.pool)
            .await?;

        let lines_sql = format!(
            r#"
            SELECT {ADDON_LINE_COLUMNS}
            FROM booking_addons ba
            JOIN addons a ON a.id = ba.addon_id
            ORDER BY ba.booking_id, ba.position
            "#
        );

        let lines = sqlx::query_as::<_, BookingAddon>(&lines_sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(attach_lines(details, lines))
    }

    /// Moves a booking from `from` to `to` if it is still in `from`.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - booking doesn't exist
    /// * `Err(DbError::Conflict)` - status changed underneath the caller
    pub async fn update_status(
        &self,
        id: &str,
        from: BookingStatus,
        to: BookingStatus,
        now: DateTime<Utc>,
    ) -> DbResult<()> {
        debug!(id = %id, %from, %to, "Updating booking status");

        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET status = ?3, updated_at = ?4
            WHERE id = ?1 AND status = ?2
            "#,
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(self.missing_or_conflict(id, format!(
                "booking {id} is no longer {from}"
            )).await);
        }

        Ok(())
    }

    /// Replaces the addon lines of an open booking and rewrites its totals,
    /// in one transaction.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - booking doesn't exist
    /// * `Err(DbError::Conflict)` - booking is cancelled or checked out
    /// * any insert failure leaves the booking exactly as it was
    pub async fn replace_addons(
        &self,
        id: &str,
        lines: &[PricedAddonLine],
        breakdown: &PriceBreakdown,
        now: DateTime<Utc>,
    ) -> DbResult<Booking> {
        debug!(id = %id, lines = lines.len(), "Replacing booking addons");

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE bookings
            SET room_subtotal_cents = ?2,
                addon_subtotal_cents = ?3,
                taxes_cents = ?4,
                total_cents = ?5,
                updated_at = ?6
            WHERE id = ?1 AND status NOT IN ('cancelled', 'checked-out')
            "#,
        )
        .bind(id)
        .bind(breakdown.room_subtotal.cents())
        .bind(breakdown.addon_subtotal.cents())
        .bind(breakdown.taxes.cents())
        .bind(breakdown.total.cents())
        .bind(now)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            drop(tx);
            return Err(self
                .missing_or_conflict(id, format!("booking {id} is closed"))
                .await);
        }

        sqlx::query("DELETE FROM booking_addons WHERE booking_id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        insert_addon_lines(&mut tx, id, lines).await?;

        tx.commit().await?;

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Booking", id))
    }

    /// Cancels every pending booking whose hold expired strictly before `now`.
    ///
    /// Returns the IDs of the cancelled bookings.
    pub async fn cancel_expired(&self, now: DateTime<Utc>) -> DbResult<Vec<String>> {
        // julianday() compares instants regardless of how many fractional
        // digits the stored timestamp carries.
        let cancelled: Vec<String> = sqlx::query_scalar(
            r#"
            UPDATE bookings
            SET status = 'cancelled', updated_at = ?1
            WHERE status = 'pending'
              AND julianday(expired_at) < julianday(?1)
            RETURNING id
            "#,
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        if !cancelled.is_empty() {
            info!(count = cancelled.len(), "Cancelled expired holds");
        }

        Ok(cancelled)
    }

    async fn missing_or_conflict(&self, id: &str, conflict: String) -> DbError {
        let exists: Result<i64, sqlx::Error> =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM bookings WHERE id = ?1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await;

        match exists {
            Ok(1) => DbError::conflict(conflict),
            Ok(_) => DbError::not_found("Booking", id),
            Err(e) => e.into(),
        }
    }
}

async fn insert_addon_lines(
    tx: &mut Transaction<'_, Sqlite>,
    booking_id: &str,
    lines: &[PricedAddonLine],
) -> DbResult<()> {
    for (position, line) in lines.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO booking_addons (
                id, booking_id, addon_id, quantity, price_at_booking_cents, position
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(booking_id)
        .bind(&line.addon_id)
        .bind(line.quantity)
        .bind(line.price_at_booking_cents)
        .bind(position as i64)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

fn attach_lines(mut details: Vec<BookingDetail>, lines: Vec<BookingAddon>) -> Vec<BookingDetail> {
    let mut by_booking: HashMap<String, Vec<BookingAddon>> = HashMap::new();
    for line in lines {
        by_booking.entry(line.booking_id.clone()).or_default().push(line);
    }

    for detail in &mut details {
        if let Some(lines) = by_booking.remove(&detail.booking.id) {
            detail.booking.addons = lines;
        }
    }

    details
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use chrono::Duration;
    use hotel_core::{Addon, AddonCategory, Money, RatePlan, Room, RoomType, User};

    struct Fixture {
        db: Database,
        user: User,
        plan: RatePlan,
        deluxe: RoomType,
        rooms: Vec<Room>,
        breakfast: Addon,
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn breakdown(room: i64, addon: i64, taxes: i64) -> PriceBreakdown {
        PriceBreakdown {
            room_subtotal: Money::from_cents(room),
            addon_subtotal: Money::from_cents(addon),
            taxes: Money::from_cents(taxes),
            total: Money::from_cents(room + addon + taxes),
        }
    }

    async fn fixture(room_count: usize) -> Fixture {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let user = User::new("alice", "alice@example.com");
        db.users().insert(&user).await.unwrap();

        let plan = RatePlan::new("Standard");
        db.rate_plans().insert(&plan).await.unwrap();

        let deluxe = RoomType::new("Deluxe", 2);
        db.rooms().insert_room_type(&deluxe).await.unwrap();

        let mut rooms = Vec::new();
        for n in 0..room_count {
            let room = Room::new(&deluxe.id, format!("10{}", n + 1));
            db.rooms().insert_room(&room).await.unwrap();
            rooms.push(room);
        }

        let food = AddonCategory::new("Food");
        db.addons().insert_category(&food).await.unwrap();
        let breakfast = Addon::new(&food.id, "Breakfast", Money::from_cents(35_000));
        db.addons().insert(&breakfast).await.unwrap();

        Fixture {
            db,
            user,
            plan,
            deluxe,
            rooms,
            breakfast,
        }
    }

    fn record(f: &Fixture, check_in: &str, check_out: &str, now: DateTime<Utc>) -> NewBookingRecord {
        NewBookingRecord::new(
            &f.user.id,
            &f.plan.id,
            &f.deluxe.id,
            date(check_in),
            date(check_out),
            2,
            breakdown(200_000, 0, 14_000),
            now,
            now + Duration::minutes(30),
        )
    }

    #[tokio::test]
    async fn test_claim_takes_lowest_room_then_runs_out() {
        let f = fixture(2).await;
        let now = Utc::now();

        let first = f
            .db
            .bookings()
            .create_with_claim(&record(&f, "2024-01-10", "2024-01-12", now))
            .await
            .unwrap();
        assert_eq!(first.room_id, f.rooms[0].id);
        assert_eq!(first.status, BookingStatus::Pending);
        assert_eq!(first.total_cents, 214_000);

        let second = f
            .db
            .bookings()
            .create_with_claim(&record(&f, "2024-01-11", "2024-01-13", now))
            .await
            .unwrap();
        assert_eq!(second.room_id, f.rooms[1].id);

        let third = f
            .db
            .bookings()
            .create_with_claim(&record(&f, "2024-01-11", "2024-01-12", now))
            .await;
        assert!(third.unwrap_err().is_not_found());

        // Back-to-back stay reuses the first room.
        let fourth = f
            .db
            .bookings()
            .create_with_claim(&record(&f, "2024-01-12", "2024-01-14", now))
            .await
            .unwrap();
        assert_eq!(fourth.room_id, f.rooms[0].id);
    }

    #[tokio::test]
    async fn test_claim_uses_natural_room_number_order() {
        let f = fixture(0).await;
        let r1000 = Room::new(&f.deluxe.id, "1000");
        let r101 = Room::new(&f.deluxe.id, "101");
        f.db.rooms().insert_room(&r1000).await.unwrap();
        f.db.rooms().insert_room(&r101).await.unwrap();

        let booking = f
            .db
            .bookings()
            .create_with_claim(&record(&f, "2024-01-10", "2024-01-12", Utc::now()))
            .await
            .unwrap();
        assert_eq!(booking.room_id, r101.id);
    }

    #[tokio::test]
    async fn test_addon_lines_keep_order_and_price() {
        let f = fixture(1).await;
        let now = Utc::now();

        let spa = Addon::new(&f.breakfast.category_id, "Spa", Money::from_cents(90_000));
        f.db.addons().insert(&spa).await.unwrap();

        let lines = vec![
            PricedAddonLine {
                addon_id: spa.id.clone(),
                addon_name: spa.name.clone(),
                quantity: 1,
                price_at_booking_cents: 90_000,
            },
            PricedAddonLine {
                addon_id: f.breakfast.id.clone(),
                addon_name: f.breakfast.name.clone(),
                quantity: 2,
                price_at_booking_cents: 35_000,
            },
        ];
        let rec = record(&f, "2024-02-01", "2024-02-02", now).with_addons(lines);
        let booking = f.db.bookings().create_with_claim(&rec).await.unwrap();

        assert_eq!(booking.addons.len(), 2);
        assert_eq!(booking.addons[0].addon_name, "Spa");
        assert_eq!(booking.addons[1].line_total().cents(), 70_000);

        f.db
            .addons()
            .update_price(&f.breakfast.id, Money::from_cents(99_900))
            .await
            .unwrap();
        let lines = f.db.bookings().get_addon_lines(&booking.id).await.unwrap();
        assert_eq!(lines[1].price_at_booking_cents, 35_000);
    }

    #[tokio::test]
    async fn test_status_compare_and_swap() {
        let f = fixture(1).await;
        let now = Utc::now();
        let booking = f
            .db
            .bookings()
            .create_with_claim(&record(&f, "2024-01-10", "2024-01-12", now))
            .await
            .unwrap();

        f.db
            .bookings()
            .update_status(&booking.id, BookingStatus::Pending, BookingStatus::Confirmed, now)
            .await
            .unwrap();

        let stale = f
            .db
            .bookings()
            .update_status(&booking.id, BookingStatus::Pending, BookingStatus::Cancelled, now)
            .await;
        assert!(matches!(stale, Err(DbError::Conflict(_))));

        let missing = f
            .db
            .bookings()
            .update_status("nope", BookingStatus::Pending, BookingStatus::Confirmed, now)
            .await;
        assert!(missing.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_cancel_expired_is_strict_and_frees_room() {
        let f = fixture(1).await;
        let t = Utc::now();
        let booking = f
            .db
            .bookings()
            .create_with_claim(&record(&f, "2024-01-10", "2024-01-12", t))
            .await
            .unwrap();

        let none = f
            .db
            .bookings()
            .cancel_expired(t + Duration::minutes(30))
            .await
            .unwrap();
        assert!(none.is_empty());

        let swept = f
            .db
            .bookings()
            .cancel_expired(t + Duration::minutes(31))
            .await
            .unwrap();
        assert_eq!(swept, vec![booking.id.clone()]);

        let again = f
            .db
            .bookings()
            .create_with_claim(&record(&f, "2024-01-10", "2024-01-12", t))
            .await
            .unwrap();
        assert_eq!(again.room_id, booking.room_id);
    }

    #[tokio::test]
    async fn test_replace_addons_failure_rolls_back() {
        let f = fixture(1).await;
        let now = Utc::now();
        let rec = record(&f, "2024-01-10", "2024-01-12", now).with_addons(vec![PricedAddonLine {
            addon_id: f.breakfast.id.clone(),
            addon_name: f.breakfast.name.clone(),
            quantity: 1,
            price_at_booking_cents: 35_000,
        }]);
        let booking = f.db.bookings().create_with_claim(&rec).await.unwrap();

        let bad = vec![PricedAddonLine {
            addon_id: "does-not-exist".to_string(),
            addon_name: "Ghost".to_string(),
            quantity: 1,
            price_at_booking_cents: 1_000,
        }];
        let result = f
            .db
            .bookings()
            .replace_addons(&booking.id, &bad, &breakdown(200_000, 1_000, 14_070), now)
            .await;
        assert!(matches!(result, Err(DbError::ForeignKeyViolation { .. })));

        let unchanged = f.db.bookings().get_by_id(&booking.id).await.unwrap().unwrap();
        assert_eq!(unchanged.total_cents, booking.total_cents);
        assert_eq!(unchanged.addons, booking.addons);
    }

    #[tokio::test]
    async fn test_replace_addons_on_cancelled_booking_conflicts() {
        let f = fixture(1).await;
        let now = Utc::now();
        let booking = f
            .db
            .bookings()
            .create_with_claim(&record(&f, "2024-01-10", "2024-01-12", now))
            .await
            .unwrap();
        f.db
            .bookings()
            .update_status(&booking.id, BookingStatus::Pending, BookingStatus::Cancelled, now)
            .await
            .unwrap();

        let result = f
            .db
            .bookings()
            .replace_addons(&booking.id, &[], &breakdown(200_000, 0, 14_000), now)
            .await;
        assert!(matches!(result, Err(DbError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_detail_and_history() {
        let f = fixture(2).await;
        let t = Utc::now();
        let older = f
            .db
            .bookings()
            .create_with_claim(&record(&f, "2024-01-10", "2024-01-12", t))
            .await
            .unwrap();
        let newer = f
            .db
            .bookings()
            .create_with_claim(&record(&f, "2024-01-10", "2024-01-12", t + Duration::seconds(5)))
            .await
            .unwrap();

        let detail = f.db.bookings().get_detail(&older.id).await.unwrap().unwrap();
        assert_eq!(detail.room_number, "101");
        assert_eq!(detail.room_type_name, "Deluxe");
        assert_eq!(detail.rate_plan_name, "Standard");
        assert_eq!(detail.user_email, "alice@example.com");

        let history = f.db.bookings().list_by_user(&f.user.id).await.unwrap();
        let ids: Vec<_> = history.iter().map(|d| d.booking.id.clone()).collect();
        assert_eq!(ids, vec![newer.id.clone(), older.id.clone()]);

        assert!(f.db.bookings().list_by_user("someone-else").await.unwrap().is_empty());
        assert_eq!(f.db.bookings().list_all().await.unwrap().len(), 2);
    }
}
