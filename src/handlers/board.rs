use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::db::models::{Comment, Post};
use crate::error::SproutError;
use crate::handlers::required;
use crate::middleware::AuthUser;
use crate::router::SproutState;

#[derive(Debug, Deserialize)]
pub struct PostBody {
    pub title: Option<String>,
    pub content: Option<String>,
}

pub async fn create_post(
    State(state): State<SproutState>,
    AuthUser(email): AuthUser,
    Json(req): Json<PostBody>,
) -> Result<(StatusCode, Json<Value>), SproutError> {
    let title = required(&req.title, "title")?;
    let content = required(&req.content, "content")?;
    let id = state.board.create_post(title, content, &email).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn list_posts(
    State(state): State<SproutState>,
) -> Result<Json<Vec<Post>>, SproutError> {
    Ok(Json(state.board.list_posts().await?))
}

#[derive(Debug, Serialize)]
pub struct PostDetail {
    pub post: Post,
    pub comments: Vec<Comment>,
}

pub async fn get_post(
    State(state): State<SproutState>,
    Path(id): Path<i64>,
) -> Result<Json<PostDetail>, SproutError> {
    let post = state.board.get_post(id).await?;
    let comments = state.board.get_comments(id).await?;
    Ok(Json(PostDetail { post, comments }))
}

pub async fn update_post(
    State(state): State<SproutState>,
    AuthUser(email): AuthUser,
    Path(id): Path<i64>,
    Json(req): Json<PostBody>,
) -> Result<Json<Value>, SproutError> {
    let title = required(&req.title, "title")?;
    let content = required(&req.content, "content")?;
    state.board.update_post(id, title, content, &email).await?;
    Ok(Json(json!({ "message": "post updated" })))
}

pub async fn delete_post(
    State(state): State<SproutState>,
    AuthUser(email): AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Value>, SproutError> {
    state.board.delete_post(id, &email).await?;
    Ok(Json(json!({ "message": "post deleted" })))
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    pub content: Option<String>,
}

pub async fn create_comment(
    State(state): State<SproutState>,
    AuthUser(email): AuthUser,
    Path(post_id): Path<i64>,
    Json(req): Json<CommentBody>,
) -> Result<(StatusCode, Json<Value>), SproutError> {
    let content = required(&req.content, "content")?;
    let id = state.board.create_comment(post_id, content, &email).await?;
    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}

pub async fn update_comment(
    State(state): State<SproutState>,
    AuthUser(email): AuthUser,
    Path((post_id, comment_id)): Path<(i64, i64)>,
    Json(req): Json<CommentBody>,
) -> Result<Json<Value>, SproutError> {
    let content = required(&req.content, "content")?;
    state
        .board
        .update_comment(post_id, comment_id, content, &email)
        .await?;
    Ok(Json(json!({ "message": "comment updated" })))
}

pub async fn delete_comment(
    State(state): State<SproutState>,
    AuthUser(email): AuthUser,
    Path((post_id, comment_id)): Path<(i64, i64)>,
) -> Result<Json<Value>, SproutError> {
    state
        .board
        .delete_comment(post_id, comment_id, &email)
        .await?;
    Ok(Json(json!({ "message": "comment deleted" })))
}
