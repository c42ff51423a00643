use chrono::Utc;
use sqlx::pool::PoolConnection;
use sqlx::{Sqlite, Transaction};

use crate::db::models::{Comment, Post};
use crate::db::{SqlitePool, map_pool_error};
use crate::error::SproutError;

/// Persistence for the discussion board. Ownership checks run inside the
/// same transaction as the mutation they protect.
#[derive(Clone)]
pub struct BoardStore {
    pool: SqlitePool,
}

impl BoardStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn acquire(&self) -> Result<PoolConnection<Sqlite>, SproutError> {
        self.pool.acquire().await.map_err(map_pool_error)
    }

    async fn begin(&self) -> Result<Transaction<'static, Sqlite>, SproutError> {
        self.pool.begin().await.map_err(map_pool_error)
    }

    pub async fn create_post(
        &self,
        title: &str,
        content: &str,
        author_email: &str,
    ) -> Result<i64, SproutError> {
        let mut conn = self.acquire().await?;
        let done = sqlx::query(
            "INSERT INTO posts (title, content, author_email, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(title)
        .bind(content)
        .bind(author_email)
        .bind(Utc::now())
        .execute(&mut *conn)
        .await?;
        Ok(done.last_insert_rowid())
    }

    /// All posts, newest first.
    pub async fn list_posts(&self) -> Result<Vec<Post>, SproutError> {
        let mut conn = self.acquire().await?;
        let posts = sqlx::query_as::<_, Post>(
            "SELECT id, title, content, author_email, created_at FROM posts \
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&mut *conn)
        .await?;
        Ok(posts)
    }

    pub async fn get_post(&self, id: i64) -> Result<Post, SproutError> {
        let mut conn = self.acquire().await?;
        sqlx::query_as::<_, Post>(
            "SELECT id, title, content, author_email, created_at FROM posts WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(SproutError::NotFound)
    }

    /// Comments of one post, oldest first.
    pub async fn get_comments(&self, post_id: i64) -> Result<Vec<Comment>, SproutError> {
        let mut conn = self.acquire().await?;
        let comments = sqlx::query_as::<_, Comment>(
            "SELECT id, post_id, content, author_email, created_at FROM comments \
             WHERE post_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(post_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(comments)
    }

    pub async fn update_post(
        &self,
        id: i64,
        title: &str,
        content: &str,
        requester_email: &str,
    ) -> Result<(), SproutError> {
        let mut tx = self.begin().await?;
        check_post_owner(&mut tx, id, requester_email).await?;
        sqlx::query("UPDATE posts SET title = ?, content = ? WHERE id = ?")
            .bind(title)
            .bind(content)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    /// Delete a post and its comments. Cascade runs in the same
    /// transaction so no orphaned comment rows survive.
    pub async fn delete_post(&self, id: i64, requester_email: &str) -> Result<(), SproutError> {
        let mut tx = self.begin().await?;
        check_post_owner(&mut tx, id, requester_email).await?;
        sqlx::query("DELETE FROM comments WHERE post_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM posts WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    /// Insert a comment under an existing post.
    pub async fn create_comment(
        &self,
        post_id: i64,
        content: &str,
        author_email: &str,
    ) -> Result<i64, SproutError> {
        let mut tx = self.begin().await?;
        let exists: Option<(i64,)> = sqlx::query_as("SELECT id FROM posts WHERE id = ?")
            .bind(post_id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(SproutError::NotFound);
        }
        let done = sqlx::query(
            "INSERT INTO comments (post_id, content, author_email, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(post_id)
        .bind(content)
        .bind(author_email)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(done.last_insert_rowid())
    }

    pub async fn update_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        content: &str,
        requester_email: &str,
    ) -> Result<(), SproutError> {
        let mut tx = self.begin().await?;
        check_comment_owner(&mut tx, post_id, comment_id, requester_email).await?;
        sqlx::query("UPDATE comments SET content = ? WHERE id = ?")
            .bind(content)
            .bind(comment_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    pub async fn delete_comment(
        &self,
        post_id: i64,
        comment_id: i64,
        requester_email: &str,
    ) -> Result<(), SproutError> {
        let mut tx = self.begin().await?;
        check_comment_owner(&mut tx, post_id, comment_id, requester_email).await?;
        sqlx::query("DELETE FROM comments WHERE id = ?")
            .bind(comment_id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

/// NotFound when the post is missing, Forbidden when the requester is not
/// its author. Runs on the caller's transaction.
async fn check_post_owner(
    tx: &mut Transaction<'static, Sqlite>,
    post_id: i64,
    requester_email: &str,
) -> Result<(), SproutError> {
    let row: Option<(String,)> = sqlx::query_as("SELECT author_email FROM posts WHERE id = ?")
        .bind(post_id)
        .fetch_optional(&mut **tx)
        .await?;
    let (author,) = row.ok_or(SproutError::NotFound)?;
    if author != requester_email {
        return Err(SproutError::Forbidden);
    }
    Ok(())
}

/// Same contract as [`check_post_owner`]; a comment that exists under a
/// different post counts as missing.
async fn check_comment_owner(
    tx: &mut Transaction<'static, Sqlite>,
    post_id: i64,
    comment_id: i64,
    requester_email: &str,
) -> Result<(), SproutError> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT author_email FROM comments WHERE id = ? AND post_id = ?")
            .bind(comment_id)
            .bind(post_id)
            .fetch_optional(&mut **tx)
            .await?;
    let (author,) = row.ok_or(SproutError::NotFound)?;
    if author != requester_email {
        return Err(SproutError::Forbidden);
    }
    Ok(())
}
