//! Shared application state for the HTTP server.

use chrono::{DateTime, Utc};

use crate::bridge::Bridge;
use crate::server::auth::{token_digest, TokenDigest};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The interception bridge this server exposes.
    pub bridge: Bridge,
    /// SHA-256 of the accepted bearer token.
    pub token: TokenDigest,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Creates new app state accepting `api_token` on the channel routes.
    pub fn new(bridge: Bridge, api_token: &str) -> Self {
        Self {
            bridge,
            token: token_digest(api_token),
            started_at: Utc::now(),
        }
    }
}
