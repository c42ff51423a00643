use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::auth::password;
use crate::db::models::UserProfile;
use crate::error::SproutError;
use crate::handlers::{MAX_PASSWORD_LEN, max_len, required};
use crate::middleware::AuthUser;
use crate::router::SproutState;

pub async fn profile(
    State(state): State<SproutState>,
    AuthUser(email): AuthUser,
) -> Result<Json<UserProfile>, SproutError> {
    let user = state.users.find_by_email(&email).await?;
    Ok(Json(UserProfile::from(user)))
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

pub async fn change_password(
    State(state): State<SproutState>,
    AuthUser(email): AuthUser,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<Value>, SproutError> {
    let current = required(&req.current_password, "current_password")?;
    let new_plain = required(&req.new_password, "new_password")?;
    max_len(new_plain, "new_password", MAX_PASSWORD_LEN)?;

    let user = state.users.find_by_email(&email).await?;
    if !password::verify(&user.password_hash, current) {
        return Err(SproutError::Validation(
            "current password does not match".to_string(),
        ));
    }

    let digest = password::hash(new_plain)?;
    if !state.users.update_password(&email, &digest).await? {
        return Err(SproutError::NotFound);
    }

    info!(user_id = user.id, "password changed");
    Ok(Json(json!({ "message": "password updated" })))
}

pub async fn delete_account(
    State(state): State<SproutState>,
    AuthUser(email): AuthUser,
) -> Result<Json<Value>, SproutError> {
    if !state.users.delete(&email).await? {
        return Err(SproutError::NotFound);
    }
    info!("account deleted");
    Ok(Json(json!({ "message": "account deleted" })))
}
