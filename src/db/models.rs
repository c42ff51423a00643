use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Full user row. Carries the password digest; never serialize this to a
/// client, hand out [`UserProfile`] instead.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_verified: bool,
}

/// Client-safe projection of [`User`] without the digest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub is_verified: bool,
}

impl From<User> for UserProfile {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            is_verified: u.is_verified,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author_email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub content: String,
    pub author_email: String,
    pub created_at: DateTime<Utc>,
}

/// Normalized volunteer listing record, the only shape that crosses the
/// upstream-API boundary. Dates stay in the upstream's `yyyymmdd` form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct VolunteerProgram {
    pub registration_no: String,
    pub title: String,
    pub begin_date: Option<String>,
    pub end_date: Option<String>,
    pub place: Option<String>,
}
