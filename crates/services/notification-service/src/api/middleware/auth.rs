//! API key authentication middleware.

use axum::{
    body::Body,
    extract::State,
    http::{header::AUTHORIZATION, Request},
    middleware::Next,
    response::Response,
};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use common::{AppError, AppResult};
use domain::BEARER_TOKEN_PREFIX;

use crate::api::state::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Require `Authorization: Bearer <key>` when an API key is configured.
///
/// Without a configured key every request passes through.
pub async fn api_key_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if let Some(expected) = state.api_key.as_deref() {
        let presented = extract_token(&request)?;
        if !keys_match(expected, presented) {
            return Err(AppError::Unauthorized);
        }
    }

    Ok(next.run(request).await)
}

/// Extract bearer token from Authorization header.
fn extract_token(request: &Request<Body>) -> AppResult<&str> {
    request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .ok_or(AppError::Unauthorized)
}

/// Compare keys in constant time.
///
/// Both sides are MACed under the expected key so unequal lengths take the
/// same path as unequal bytes.
fn keys_match(expected: &str, presented: &str) -> bool {
    let Ok(mut reference) = HmacSha256::new_from_slice(expected.as_bytes()) else {
        return false;
    };
    let mut candidate = reference.clone();
    reference.update(expected.as_bytes());
    candidate.update(presented.as_bytes());
    candidate
        .verify_slice(&reference.finalize().into_bytes())
        .is_ok()
}
