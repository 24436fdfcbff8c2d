//! # Addon Repository
//!
//! Addon categories and the addon catalog. Prices here are *current* prices;
//! bookings keep their own frozen copy in `booking_addons`.

use std::collections::HashMap;

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use hotel_core::validation::{validate_name, validate_price_cents};
use hotel_core::{Addon, AddonCategory, Money};

const ADDON_COLUMNS: &str =
    "id, category_id, name, description, price_cents, unit_name, picture_url";

/// Repository for the addon catalog.
#[derive(Debug, Clone)]
pub struct AddonRepository {
    pool: SqlitePool,
}

impl AddonRepository {
    /// Creates a new AddonRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AddonRepository { pool }
    }

    pub async fn insert_category(&self, category: &AddonCategory) -> DbResult<()> {
        validate_name("category name", &category.name)?;

        sqlx::query("INSERT INTO addon_categories (id, name) VALUES (?1, ?2)")
            .bind(&category.id)
            .bind(&category.name)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub async fn list_categories(&self) -> DbResult<Vec<AddonCategory>> {
        let categories = sqlx::query_as::<_, AddonCategory>(
            "SELECT id, name FROM addon_categories ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    /// Renames a category.
    pub async fn update_category(&self, category: &AddonCategory) -> DbResult<()> {
        validate_name("category name", &category.name)?;

        let result = sqlx::query("UPDATE addon_categories SET name = ?2 WHERE id = ?1")
            .bind(&category.id)
            .bind(&category.name)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Addon category", &category.id));
        }

        Ok(())
    }

    /// Deletes an empty category. Fails with a foreign key violation while
    /// addons still belong to it.
    pub async fn delete_category(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM addon_categories WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Addon category", id));
        }

        Ok(())
    }

    /// Inserts an addon.
    pub async fn insert(&self, addon: &Addon) -> DbResult<()> {
        validate_name("name", &addon.name)?;
        validate_price_cents(addon.price_cents)?;

        debug!(id = %addon.id, name = %addon.name, "Inserting addon");

        sqlx::query(
            r#"
            INSERT INTO addons (id, category_id, name, description, price_cents, unit_name, picture_url)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&addon.id)
        .bind(&addon.category_id)
        .bind(&addon.name)
        .bind(&addon.description)
        .bind(addon.price_cents)
        .bind(&addon.unit_name)
        .bind(&addon.picture_url)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets an addon by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Addon>> {
        let sql = format!("SELECT {ADDON_COLUMNS} FROM addons WHERE id = ?1");
        let addon = sqlx::query_as::<_, Addon>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(addon)
    }

    /// Fetches the given addons keyed by ID. Unknown IDs are simply absent.
    pub async fn get_many(&self, ids: &[String]) -> DbResult<HashMap<String, Addon>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!("SELECT {ADDON_COLUMNS} FROM addons WHERE id IN ({placeholders})");

        let mut query = sqlx::query_as::<_, Addon>(&sql);
        for id in ids {
            query = query.bind(id);
        }

        let addons = query.fetch_all(&self.pool).await?;
        Ok(addons.into_iter().map(|a| (a.id.clone(), a)).collect())
    }

    /// Lists all addons grouped by category, then by name.
    pub async fn list(&self) -> DbResult<Vec<Addon>> {
        let sql = format!("SELECT {ADDON_COLUMNS} FROM addons ORDER BY category_id, name");
        let addons = sqlx::query_as::<_, Addon>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(addons)
    }

    /// Lists the addons of one category by name.
    pub async fn list_by_category(&self, category_id: &str) -> DbResult<Vec<Addon>> {
        let sql = format!("SELECT {ADDON_COLUMNS} FROM addons WHERE category_id = ?1 ORDER BY name");
        let addons = sqlx::query_as::<_, Addon>(&sql)
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(addons)
    }

    /// Changes the current catalog price. Existing booking lines are unaffected.
    pub async fn update_price(&self, id: &str, price: Money) -> DbResult<()> {
        validate_price_cents(price.cents())?;

        debug!(id = %id, price = %price, "Updating addon price");

        let result = sqlx::query("UPDATE addons SET price_cents = ?2 WHERE id = ?1")
            .bind(id)
            .bind(price.cents())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Addon", id));
        }

        Ok(())
    }

    /// Deletes an addon. Fails with a foreign key violation while bookings
    /// still reference it.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM addons WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Addon", id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    #[tokio::test]
    async fn test_get_many_skips_unknown_ids() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let food = AddonCategory::new("Food");
        db.addons().insert_category(&food).await.unwrap();

        let breakfast = Addon::new(&food.id, "Breakfast", Money::from_cents(35_000))
            .with_unit_name("person");
        let dinner = Addon::new(&food.id, "Dinner", Money::from_cents(80_000));
        db.addons().insert(&breakfast).await.unwrap();
        db.addons().insert(&dinner).await.unwrap();

        let found = db
            .addons()
            .get_many(&[breakfast.id.clone(), "missing".to_string()])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[&breakfast.id].unit_name, "person");

        assert!(db.addons().get_many(&[]).await.unwrap().is_empty());
        assert_eq!(db.addons().list().await.unwrap().len(), 2);
        assert_eq!(db.addons().list_categories().await.unwrap(), vec![food]);
    }

    #[tokio::test]
    async fn test_update_price() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let spa = AddonCategory::new("Spa");
        db.addons().insert_category(&spa).await.unwrap();
        let massage = Addon::new(&spa.id, "Massage", Money::from_cents(150_000));
        db.addons().insert(&massage).await.unwrap();

        db.addons()
            .update_price(&massage.id, Money::from_cents(175_000))
            .await
            .unwrap();
        let stored = db.addons().get_by_id(&massage.id).await.unwrap().unwrap();
        assert_eq!(stored.price().cents(), 175_000);

        assert!(db
            .addons()
            .update_price("missing", Money::zero())
            .await
            .unwrap_err()
            .is_not_found());

        db.addons().delete(&massage.id).await.unwrap();
        assert!(db.addons().get_by_id(&massage.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_prices_are_bounded() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let spa = AddonCategory::new("Spa");
        db.addons().insert_category(&spa).await.unwrap();

        let gold = Addon::new(&spa.id, "Gold Facial", Money::from_cents(i64::MAX / 2));
        assert!(matches!(db.addons().insert(&gold).await, Err(DbError::Invalid(_))));

        let facial = Addon::new(&spa.id, "Facial", Money::from_cents(200_000));
        db.addons().insert(&facial).await.unwrap();
        let err = db
            .addons()
            .update_price(&facial.id, Money::from_cents(-100))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Invalid(_)));

        let stored = db.addons().get_by_id(&facial.id).await.unwrap().unwrap();
        assert_eq!(stored.price_cents, 200_000);
    }

    #[tokio::test]
    async fn test_category_update_delete_and_listing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let food = AddonCategory::new("Food");
        let transport = AddonCategory::new("Transport");
        db.addons().insert_category(&food).await.unwrap();
        db.addons().insert_category(&transport).await.unwrap();

        let lunch = Addon::new(&food.id, "Lunch", Money::from_cents(45_000));
        let breakfast = Addon::new(&food.id, "Breakfast", Money::from_cents(35_000));
        let shuttle = Addon::new(&transport.id, "Airport Shuttle", Money::from_cents(80_000));
        for addon in [&lunch, &breakfast, &shuttle] {
            db.addons().insert(addon).await.unwrap();
        }

        let names: Vec<String> = db
            .addons()
            .list_by_category(&food.id)
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.name)
            .collect();
        assert_eq!(names, vec!["Breakfast", "Lunch"]);
        assert!(db.addons().list_by_category("missing").await.unwrap().is_empty());

        let renamed = AddonCategory {
            name: "Dining".to_string(),
            ..food.clone()
        };
        db.addons().update_category(&renamed).await.unwrap();
        assert_eq!(
            db.addons().list_categories().await.unwrap(),
            vec![renamed.clone(), transport.clone()]
        );
        assert!(db
            .addons()
            .update_category(&AddonCategory::new("Ghost"))
            .await
            .unwrap_err()
            .is_not_found());

        let in_use = db.addons().delete_category(&transport.id).await;
        assert!(matches!(in_use, Err(DbError::ForeignKeyViolation { .. })));

        db.addons().delete(&shuttle.id).await.unwrap();
        db.addons().delete_category(&transport.id).await.unwrap();
        assert_eq!(db.addons().list_categories().await.unwrap(), vec![renamed]);
        assert!(db
            .addons()
            .delete_category(&transport.id)
            .await
            .unwrap_err()
            .is_not_found());
    }
}
