//! # User Repository
//!
//! Booking owners. Authentication lives outside the engine; a user here is
//! just an ID, a display name and the address confirmations go to.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use hotel_core::validation::{validate_email, validate_name};
use hotel_core::User;

#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a user. Emails are unique.
    pub async fn insert(&self, user: &User) -> DbResult<()> {
        validate_name("username", &user.username)?;
        validate_email(&user.email)?;

        debug!(id = %user.id, username = %user.username, "Inserting user");

        sqlx::query("INSERT INTO users (id, username, email, created_at) VALUES (?1, ?2, ?3, ?4)")
            .bind(&user.id)
            .bind(&user.username)
            .bind(&user.email)
            .bind(user.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &user.email),
                other => other,
            })?;

        Ok(())
    }

    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, email, created_at FROM users WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn exists(&self, id: &str) -> DbResult<bool> {
        let exists: i64 = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM users WHERE id = ?1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists == 1)
    }
}
