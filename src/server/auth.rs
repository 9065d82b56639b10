//! Bearer token check for the channel routes.
//!
//! Tokens are compared by SHA-256 digest with a fold over every byte, so the
//! comparison time does not depend on how long a matching prefix is.

use axum::http::{header::AUTHORIZATION, HeaderMap};
use sha2::{Digest, Sha256};

pub type TokenDigest = [u8; 32];

pub fn token_digest(token: &str) -> TokenDigest {
    Sha256::digest(token.as_bytes()).into()
}

/// Short hex prefix of the token digest, safe to log.
pub fn token_fingerprint(token: &str) -> String {
    hex::encode(&token_digest(token)[..4])
}

/// Returns true if `headers` carry `Authorization: Bearer <token>` matching
/// `expected`.
pub fn is_authorized(headers: &HeaderMap, expected: &TokenDigest) -> bool {
    let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    let Some(token) = value.strip_prefix("Bearer ") else {
        return false;
    };

    let presented = token_digest(token);
    presented
        .iter()
        .zip(expected.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b))
        == 0
}
