//! Request gate — every API route requires a shared secret in the
//! `x-api-key` header. Checked before any collaborator is invoked.

use axum::http::HeaderMap;

use crate::errors::AppError;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Returns `Ok(())` iff the caller presented exactly the configured secret.
/// Missing or mismatched credentials are indistinguishable to the caller.
pub fn require_auth(headers: &HeaderMap, secret: &str) -> Result<(), AppError> {
    match headers.get(API_KEY_HEADER).and_then(|v| v.to_str().ok()) {
        Some(provided) if provided == secret => Ok(()),
        _ => Err(AppError::Unauthorized),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_key(key: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_str(key).unwrap());
        headers
    }

    #[test]
    fn test_exact_match_is_authorized() {
        assert!(require_auth(&headers_with_key("s3cret"), "s3cret").is_ok());
    }

    #[test]
    fn test_mismatch_is_unauthorized() {
        let result = require_auth(&headers_with_key("wrong"), "s3cret");
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_missing_header_is_unauthorized() {
        let result = require_auth(&HeaderMap::new(), "s3cret");
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[test]
    fn test_prefix_of_secret_is_unauthorized() {
        let result = require_auth(&headers_with_key("s3cre"), "s3cret");
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
