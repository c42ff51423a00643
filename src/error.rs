use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum SproutError {
    #[error("validation failed: {0}")]
    Validation(String),

    #[error("missing or malformed credentials")]
    Unauthorized,

    #[error("token has expired")]
    ExpiredToken,

    #[error("token signature or shape is invalid")]
    InvalidSignature,

    #[error("email or password does not match")]
    InvalidCredentials,

    #[error("requester is not the owner of this resource")]
    Forbidden,

    #[error("resource not found")]
    NotFound,

    #[error("email is already registered")]
    Conflict,

    #[error("no database connection available")]
    Unavailable,

    #[error("upstream listings service failed: {0}")]
    Upstream(String),

    #[error("token signing failed: {0}")]
    TokenSigning(String),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("database error: {0}")]
    Database(#[from] SqlxError),

    #[error("upstream request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl IntoResponse for SproutError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match &self {
            SproutError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "VALIDATION_ERROR".to_string(),
                    message: msg.clone(),
                },
            ),
            SproutError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code: "UNAUTHORIZED".to_string(),
                    message: "A valid bearer token is required.".to_string(),
                },
            ),
            SproutError::ExpiredToken => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code: "TOKEN_EXPIRED".to_string(),
                    message: "The bearer token has expired.".to_string(),
                },
            ),
            SproutError::InvalidSignature => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code: "TOKEN_INVALID".to_string(),
                    message: "The bearer token could not be verified.".to_string(),
                },
            ),
            SproutError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message: "Email or password does not match.".to_string(),
                },
            ),
            SproutError::Forbidden => (
                StatusCode::FORBIDDEN,
                ApiErrorBody {
                    code: "FORBIDDEN".to_string(),
                    message: "Only the author may modify this resource.".to_string(),
                },
            ),
            SproutError::NotFound => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    code: "NOT_FOUND".to_string(),
                    message: "The requested resource does not exist.".to_string(),
                },
            ),
            SproutError::Conflict => (
                StatusCode::CONFLICT,
                ApiErrorBody {
                    code: "CONFLICT".to_string(),
                    message: "This email is already registered.".to_string(),
                },
            ),
            SproutError::Unavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiErrorBody {
                    code: "UNAVAILABLE".to_string(),
                    message: "The service is temporarily unable to take the request.".to_string(),
                },
            ),
            SproutError::Upstream(_) | SproutError::Http(_) => (
                StatusCode::BAD_GATEWAY,
                ApiErrorBody {
                    code: "UPSTREAM_ERROR".to_string(),
                    message: "The listings service is unavailable.".to_string(),
                },
            ),
            SproutError::Database(e) => {
                error!(error = %e, "database failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorBody {
                        code: "INTERNAL_ERROR".to_string(),
                        message: "An internal server error occurred.".to_string(),
                    },
                )
            }
            SproutError::TokenSigning(e) | SproutError::PasswordHash(e) => {
                error!(error = %e, "crypto failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorBody {
                        code: "INTERNAL_ERROR".to_string(),
                        message: "An internal server error occurred.".to_string(),
                    },
                )
            }
        };
        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
