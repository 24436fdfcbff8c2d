//! # Rate Plan Repository
//!
//! Rate plans and their nightly price per room type.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use hotel_core::validation::{validate_name, validate_price_cents};
use hotel_core::{Money, RatePlan, RatePlanOffer, RoomTypeRatePrice};

/// Repository for rate plans and the `room_type_rate_prices` table.
#[derive(Debug, Clone)]
pub struct RatePlanRepository {
    pool: SqlitePool,
}

impl RatePlanRepository {
    /// Creates a new RatePlanRepository.
    pub fn new(pool: SqlitePool) -> Self {
        RatePlanRepository { pool }
    }

    /// Inserts a rate plan.
    pub async fn insert(&self, plan: &RatePlan) -> DbResult<()> {
        validate_name("name", &plan.name)?;

        debug!(id = %plan.id, name = %plan.name, "Inserting rate plan");

        sqlx::query(
            r#"
            INSERT INTO rate_plans (
                id, name, description, is_special_package, allow_free_cancel,
                allow_pay_later, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&plan.id)
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(plan.is_special_package)
        .bind(plan.allow_free_cancel)
        .bind(plan.allow_pay_later)
        .bind(plan.created_at)
        .bind(plan.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a rate plan by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<RatePlan>> {
        let plan = sqlx::query_as::<_, RatePlan>(
            r#"
            SELECT id, name, description, is_special_package, allow_free_cancel,
                   allow_pay_later, created_at, updated_at
            FROM rate_plans
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(plan)
    }

    /// Lists all rate plans by name.
    pub async fn list(&self) -> DbResult<Vec<RatePlan>> {
        let plans = sqlx::query_as::<_, RatePlan>(
            r#"
            SELECT id, name, description, is_special_package, allow_free_cancel,
                   allow_pay_later, created_at, updated_at
            FROM rate_plans
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(plans)
    }

    /// Updates the name, description and policy flags of a rate plan.
    pub async fn update(&self, plan: &RatePlan, now: DateTime<Utc>) -> DbResult<()> {
        validate_name("name", &plan.name)?;

        let result = sqlx::query(
            r#"
            UPDATE rate_plans SET
                name = ?2,
                description = ?3,
                is_special_package = ?4,
                allow_free_cancel = ?5,
                allow_pay_later = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(&plan.id)
        .bind(&plan.name)
        .bind(&plan.description)
        .bind(plan.is_special_package)
        .bind(plan.allow_free_cancel)
        .bind(plan.allow_pay_later)
        .bind(now)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Rate plan", &plan.id));
        }

        Ok(())
    }

    /// Deletes a rate plan and its prices. Fails with a foreign key
    /// violation while bookings reference it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM rate_plans WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Rate plan", id));
        }

        Ok(())
    }

    /// Sets (inserts or replaces) the nightly price of a plan for a room type.
    ///
    /// ## Returns
    /// * `Err(DbError::Invalid)` - negative or above `MAX_PRICE_CENTS`
    pub async fn set_price(&self, room_type_id: &str, rate_plan_id: &str, nightly: Money) -> DbResult<()> {
        validate_price_cents(nightly.cents())?;

        debug!(room_type_id, rate_plan_id, price = %nightly, "Setting nightly price");

        sqlx::query(
            r#"
            INSERT INTO room_type_rate_prices (room_type_id, rate_plan_id, price_cents)
            VALUES (?1, ?2, ?3)
            ON CONFLICT (room_type_id, rate_plan_id) DO UPDATE SET price_cents = excluded.price_cents
            "#,
        )
        .bind(room_type_id)
        .bind(rate_plan_id)
        .bind(nightly.cents())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets the nightly price of a plan for a room type.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - the plan is not sold for this room type
    pub async fn get_price(&self, room_type_id: &str, rate_plan_id: &str) -> DbResult<Money> {
        let cents: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT price_cents FROM room_type_rate_prices
            WHERE room_type_id = ?1 AND rate_plan_id = ?2
            "#,
        )
        .bind(room_type_id)
        .bind(rate_plan_id)
        .fetch_optional(&self.pool)
        .await?;

        cents
            .map(Money::from_cents)
            .ok_or_else(|| DbError::not_found("Rate price", format!("{room_type_id}/{rate_plan_id}")))
    }

    /// Lists the prices of every room type under a plan.
    pub async fn list_prices(&self, rate_plan_id: &str) -> DbResult<Vec<RoomTypeRatePrice>> {
        let prices = sqlx::query_as::<_, RoomTypeRatePrice>(
            r#"
            SELECT room_type_id, rate_plan_id, price_cents
            FROM room_type_rate_prices
            WHERE rate_plan_id = ?1
            ORDER BY room_type_id
            "#,
        )
        .bind(rate_plan_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(prices)
    }

    /// Lists the plans sold for a room type with their nightly price,
    /// cheapest first.
    pub async fn list_by_room_type(&self, room_type_id: &str) -> DbResult<Vec<RatePlanOffer>> {
        let offers = sqlx::query_as::<_, RatePlanOffer>(
            r#"
            SELECT rp.id, rp.name, rp.description, rp.is_special_package,
                   rp.allow_free_cancel, rp.allow_pay_later, rp.created_at,
                   rp.updated_at, p.price_cents
            FROM room_type_rate_prices p
            JOIN rate_plans rp ON rp.id = p.rate_plan_id
            WHERE p.room_type_id = ?1
            ORDER BY p.price_cents, rp.name
            "#,
        )
        .bind(room_type_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(offers)
    }

    /// Stops selling a plan for a room type.
    pub async fn delete_price(&self, room_type_id: &str, rate_plan_id: &str) -> DbResult<()> {
        let result = sqlx::query(
            "DELETE FROM room_type_rate_prices WHERE room_type_id = ?1 AND rate_plan_id = ?2",
        )
        .bind(room_type_id)
        .bind(rate_plan_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(
                "Rate price",
                format!("{room_type_id}/{rate_plan_id}"),
            ));
        }

        Ok(())
    }
}
