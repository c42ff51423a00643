use sqlx::Sqlite;
use sqlx::pool::PoolConnection;

use crate::auth::password;
use crate::db::models::User;
use crate::db::{SqlitePool, is_unique_violation, map_pool_error};
use crate::error::SproutError;

/// Persistence for user records.
#[derive(Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn acquire(&self) -> Result<PoolConnection<Sqlite>, SproutError> {
        self.pool.acquire().await.map_err(map_pool_error)
    }

    /// Insert a new user. The unique index on `email` is the authoritative
    /// guard; a duplicate surfaces as [`SproutError::Conflict`].
    pub async fn register(
        &self,
        email: &str,
        password_hash: &str,
        username: &str,
    ) -> Result<i64, SproutError> {
        let mut conn = self.acquire().await?;
        let result = sqlx::query(
            "INSERT INTO users (email, password_hash, username, is_verified) VALUES (?, ?, ?, 1)",
        )
        .bind(email)
        .bind(password_hash)
        .bind(username)
        .execute(&mut *conn)
        .await;

        match result {
            Ok(done) => Ok(done.last_insert_rowid()),
            Err(e) if is_unique_violation(&e) => Err(SproutError::Conflict),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<User, SproutError> {
        let mut conn = self.acquire().await?;
        sqlx::query_as::<_, User>(
            "SELECT id, username, email, password_hash, is_verified FROM users WHERE email = ?",
        )
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(SproutError::NotFound)
    }

    /// Look up by email and check the presented password against the
    /// stored digest. The digest never leaves this module's return path
    /// except inside the full [`User`] row.
    pub async fn verify_credentials(
        &self,
        email: &str,
        plaintext: &str,
    ) -> Result<User, SproutError> {
        let user = self.find_by_email(email).await?;
        if !password::verify(&user.password_hash, plaintext) {
            return Err(SproutError::InvalidCredentials);
        }
        Ok(user)
    }

    pub async fn update_password(
        &self,
        email: &str,
        new_hash: &str,
    ) -> Result<bool, SproutError> {
        let mut conn = self.acquire().await?;
        let done = sqlx::query("UPDATE users SET password_hash = ? WHERE email = ?")
            .bind(new_hash)
            .bind(email)
            .execute(&mut *conn)
            .await?;
        Ok(done.rows_affected() > 0)
    }

    /// Remove the account and everything it owns in one transaction:
    /// comments under the user's posts, the user's own comments elsewhere,
    /// the user's posts, then the user row.
    pub async fn delete(&self, email: &str) -> Result<bool, SproutError> {
        let mut tx = self.pool.begin().await.map_err(map_pool_error)?;

        sqlx::query(
            "DELETE FROM comments WHERE post_id IN (SELECT id FROM posts WHERE author_email = ?)",
        )
        .bind(email)
        .execute(&mut *tx)
        .await?;
        sqlx::query("DELETE FROM comments WHERE author_email = ?")
            .bind(email)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM posts WHERE author_email = ?")
            .bind(email)
            .execute(&mut *tx)
            .await?;
        let done = sqlx::query("DELETE FROM users WHERE email = ?")
            .bind(email)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(done.rows_affected() > 0)
    }
}
