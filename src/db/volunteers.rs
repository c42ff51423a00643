use sqlx::Sqlite;
use sqlx::pool::PoolConnection;

use crate::db::models::VolunteerProgram;
use crate::db::{SqlitePool, map_pool_error};
use crate::error::SproutError;

/// Persistence for volunteer listings fetched from the upstream service.
#[derive(Clone)]
pub struct VolunteerStore {
    pool: SqlitePool,
}

impl VolunteerStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn acquire(&self) -> Result<PoolConnection<Sqlite>, SproutError> {
        self.pool.acquire().await.map_err(map_pool_error)
    }

    /// Keep the first record seen for a registration number; refetches of
    /// the same program are no-ops.
    pub async fn insert_if_absent(&self, program: &VolunteerProgram) -> Result<(), SproutError> {
        let mut conn = self.acquire().await?;
        sqlx::query(
            "INSERT INTO volunteer_programs (registration_no, title, begin_date, end_date, place) \
             VALUES (?, ?, ?, ?, ?) \
             ON CONFLICT(registration_no) DO NOTHING",
        )
        .bind(&program.registration_no)
        .bind(&program.title)
        .bind(&program.begin_date)
        .bind(&program.end_date)
        .bind(&program.place)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    pub async fn get(&self, registration_no: &str) -> Result<VolunteerProgram, SproutError> {
        let mut conn = self.acquire().await?;
        sqlx::query_as::<_, VolunteerProgram>(
            "SELECT registration_no, title, begin_date, end_date, place \
             FROM volunteer_programs WHERE registration_no = ?",
        )
        .bind(registration_no)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(SproutError::NotFound)
    }
}
