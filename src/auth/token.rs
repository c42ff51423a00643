use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

use crate::error::SproutError;

/// Claims embedded in a session token. `sub` carries the user's email and
/// is the sole authorization fact trusted downstream of verification.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Issues and verifies signed, time-limited bearer tokens.
///
/// Tokens are self-contained; nothing is persisted. Rotating the secret
/// invalidates every outstanding token, and there is no revocation list.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_secs),
            validation,
        }
    }

    /// Produce a token embedding `identity` with an expiry of now + ttl.
    pub fn issue(&self, identity: &str) -> Result<String, SproutError> {
        let now = Utc::now();
        let claims = Claims {
            sub: identity.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| SproutError::TokenSigning(e.to_string()))
    }

    /// Check signature and expiry, returning the embedded identity.
    pub fn verify(&self, token: &str) -> Result<String, SproutError> {
        match decode::<Claims>(token, &self.decoding, &self.validation) {
            Ok(data) => Ok(data.claims.sub),
            Err(e) => match e.kind() {
                ErrorKind::ExpiredSignature => Err(SproutError::ExpiredToken),
                _ => Err(SproutError::InvalidSignature),
            },
        }
    }
}
