use axum::RequestPartsExt;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::typed_header::TypedHeader;
use headers::{Authorization, authorization::Bearer};

use crate::error::SproutError;
use crate::router::SproutState;

/// The resolved identity of an authenticated request: the email embedded
/// in a verified bearer token.
///
/// Adding this extractor to a handler is what makes a route "protected".
/// A missing header rejects with 401 before the handler runs; the identity
/// lives only for the span of this one request.
#[derive(Debug, Clone)]
pub struct AuthUser(pub String);

impl<S> FromRequestParts<S> for AuthUser
where
    SproutState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = SproutError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| SproutError::Unauthorized)?;

        let state = SproutState::from_ref(state);
        let identity = state.sessions.verify(bearer.token())?;
        Ok(AuthUser(identity))
    }
}
