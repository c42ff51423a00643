use argon2::{
    Argon2, PasswordHasher, PasswordVerifier,
    password_hash::{PasswordHash, SaltString, rand_core::OsRng},
};

use crate::error::SproutError;

/// Hash a plaintext password into an Argon2id digest safe to persist.
pub fn hash(plain: &str) -> Result<String, SproutError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| SproutError::PasswordHash(e.to_string()))
}

/// Check a plaintext password against a stored digest. An unparseable
/// digest counts as a mismatch rather than an error.
pub fn verify(digest: &str, plain: &str) -> bool {
    PasswordHash::new(digest)
        .map(|parsed| {
            Argon2::default()
                .verify_password(plain.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}
