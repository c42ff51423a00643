//! Database module: pooled SQLite storage for users, board content and
//! cached volunteer listings.
//!
//! Layout:
//! - `schema.rs`: SQL DDL for initializing the database
//! - `models.rs`: Rust structs mirroring DB rows and projections
//! - `users.rs` / `board.rs` / `volunteers.rs`: one store per entity family
//!
//! Every store operation borrows exactly one connection (or one
//! transaction) from the bounded pool for its duration; release happens on
//! every exit path when the guard drops.

pub mod board;
pub mod models;
pub mod schema;
pub mod users;
pub mod volunteers;

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};

use crate::config::Config;
use crate::error::SproutError;

pub use board::BoardStore;
pub use schema::SQLITE_INIT;
pub use users::UserStore;
pub use volunteers::VolunteerStore;

pub type SqlitePool = Pool<Sqlite>;

/// Build the bounded connection pool from configuration.
///
/// `pool_max_connections` caps concurrently outstanding connections and
/// `pool_acquire_timeout_secs` bounds how long an operation waits for one.
pub async fn connect(cfg: &Config) -> Result<SqlitePool, SproutError> {
    let opts = SqliteConnectOptions::from_str(&cfg.database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));
    let pool = SqlitePoolOptions::new()
        .max_connections(cfg.pool_max_connections)
        .acquire_timeout(Duration::from_secs(cfg.pool_acquire_timeout_secs))
        .connect_with(opts)
        .await?;
    Ok(pool)
}

/// Initialize the schema by executing the bundled DDL.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), SproutError> {
    // execute statement by statement (sqlx::query does not run multi-command strings)
    for stmt in SQLITE_INIT.split(';') {
        let s = stmt.trim();
        if s.is_empty() {
            continue;
        }
        sqlx::query(s).execute(pool).await?;
    }
    Ok(())
}

/// Translate pool-acquisition failures into the 503 taxonomy; anything
/// else stays a database error.
pub(crate) fn map_pool_error(e: sqlx::Error) -> SproutError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => SproutError::Unavailable,
        other => SproutError::Database(other),
    }
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}
