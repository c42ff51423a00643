pub mod auth;
pub mod board;
pub mod user;
pub mod volunteer;

use axum::Json;
use serde_json::{Value, json};

use crate::error::SproutError;

// Caps mirror what the mobile client enforces on its side.
pub(crate) const MAX_EMAIL_LEN: usize = 254;
pub(crate) const MAX_PASSWORD_LEN: usize = 120;
pub(crate) const MAX_USERNAME_LEN: usize = 64;

pub async fn home() -> Json<Value> {
    Json(json!({ "service": "sprout", "status": "ok" }))
}

/// Pull a required field out of a request body, trimmed. Absent or
/// blank-after-trim values are the client's fault.
pub(crate) fn required<'a>(
    field: &'a Option<String>,
    name: &str,
) -> Result<&'a str, SproutError> {
    match field.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(SproutError::Validation(format!("{name} is required"))),
    }
}

pub(crate) fn max_len(value: &str, name: &str, cap: usize) -> Result<(), SproutError> {
    if value.len() > cap {
        return Err(SproutError::Validation(format!(
            "{name} must be at most {cap} bytes"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_trims_and_rejects_blank() {
        let some = Some("  hi  ".to_string());
        assert_eq!(required(&some, "x").expect("should pass"), "hi");

        let blank = Some("   ".to_string());
        assert!(matches!(
            required(&blank, "x"),
            Err(SproutError::Validation(_))
        ));
        assert!(matches!(required(&None, "x"), Err(SproutError::Validation(_))));
    }

    #[test]
    fn max_len_is_byte_based() {
        assert!(max_len("1234", "x", 4).is_ok());
        assert!(max_len("12345", "x", 4).is_err());
    }
}
