//! SQL DDL for initializing the backing store. SQLite-first design.

/// Schema notes:
/// - `users.email` UNIQUE is the authoritative duplicate-registration
///   guard; concurrent inserts race on the index, not on a pre-check.
/// - `created_at` columns hold UTC timestamps encoded as text; a single
///   encoding per column keeps lexicographic order chronological.
/// - comments are not FK-enforced; cascades are done in store
///   transactions so the behavior is explicit.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    is_verified INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    author_email TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS comments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    post_id INTEGER NOT NULL,
    content TEXT NOT NULL,
    author_email TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS volunteer_programs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    registration_no TEXT NOT NULL UNIQUE,
    title TEXT NOT NULL,
    begin_date TEXT NULL,
    end_date TEXT NULL,
    place TEXT NULL
);

CREATE INDEX IF NOT EXISTS idx_posts_created_at ON posts(created_at);
CREATE INDEX IF NOT EXISTS idx_posts_author_email ON posts(author_email);
CREATE INDEX IF NOT EXISTS idx_comments_post_id ON comments(post_id);
"#;
