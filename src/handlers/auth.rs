use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::info;

use crate::auth::password;
use crate::error::SproutError;
use crate::handlers::{MAX_EMAIL_LEN, MAX_PASSWORD_LEN, MAX_USERNAME_LEN, max_len, required};
use crate::router::SproutState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub username: Option<String>,
}

pub async fn register(
    State(state): State<SproutState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), SproutError> {
    let email = required(&req.email, "email")?;
    let plain = required(&req.password, "password")?;
    let username = required(&req.username, "username")?;
    max_len(email, "email", MAX_EMAIL_LEN)?;
    max_len(plain, "password", MAX_PASSWORD_LEN)?;
    max_len(username, "username", MAX_USERNAME_LEN)?;

    // The plaintext stops here; only the digest travels further.
    let digest = password::hash(plain)?;
    let id = state.users.register(email, &digest, username).await?;

    info!(user_id = id, "user registered");
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
}

pub async fn login(
    State(state): State<SproutState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, SproutError> {
    let email = required(&req.email, "email")?;
    let plain = required(&req.password, "password")?;

    // Unknown email and wrong password answer identically so the endpoint
    // does not reveal which addresses are registered.
    let user = state
        .users
        .verify_credentials(email, plain)
        .await
        .map_err(|e| match e {
            SproutError::NotFound => SproutError::InvalidCredentials,
            other => other,
        })?;

    let access_token = state.sessions.issue(&user.email)?;
    Ok(Json(LoginResponse { access_token }))
}
