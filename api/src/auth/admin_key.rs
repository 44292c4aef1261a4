//! Admin key authentication middleware

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use sha2::{Digest, Sha256};

use crate::error::AppError;
use crate::AppState;

/// Extract the bearer key from the Authorization header
fn extract_api_key(request: &Request<Body>) -> Option<&str> {
    request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

/// Hash a key for comparison
pub fn hash_api_key(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compare a presented key against the configured one by digest
fn key_matches(presented: &str, expected: &str) -> bool {
    hash_api_key(presented) == hash_api_key(expected)
}

/// Authentication middleware for the admin surface
///
/// Requires `Authorization: Bearer <ADMIN_API_KEY>`. When no admin key is
/// configured every request is rejected.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.config.admin_api_key.as_deref() else {
        tracing::warn!("Admin key not configured, rejecting admin request");
        return Err(AppError::Unauthorized);
    };

    let presented = extract_api_key(&request).ok_or(AppError::Unauthorized)?;
    if !key_matches(presented, expected) {
        tracing::warn!(path = %request.uri().path(), "Invalid admin key");
        return Err(AppError::Unauthorized);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_hashing() {
        let key = "admin-secret";
        let hash1 = hash_api_key(key);
        let hash2 = hash_api_key(key);
        assert_eq!(hash1, hash2);
        assert_ne!(hash1, key);
        assert_eq!(hash1.len(), 64);
    }

    #[test]
    fn key_comparison() {
        assert!(key_matches("admin-secret", "admin-secret"));
        assert!(!key_matches("admin-secret ", "admin-secret"));
        assert!(!key_matches("", "admin-secret"));
    }

    #[test]
    fn bearer_prefix_is_required() {
        let request = Request::builder()
            .header("Authorization", "Token abc")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_api_key(&request), None);

        let request = Request::builder()
            .header("Authorization", "Bearer abc")
            .body(Body::empty())
            .unwrap();
        assert_eq!(extract_api_key(&request), Some("abc"));
    }
}
