//! Health check endpoint (no auth).

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use crate::bridge::CaptureMode;
use crate::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub platform: &'static str,
    pub capturing: bool,
    pub subscribed: bool,
    pub delivered: u64,
    pub dropped: u64,
    pub started_at: String,
}

/// GET /health
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let bridge = &state.bridge;
    let (delivered, dropped) = bridge.broker().counts();

    Json(HealthResponse {
        status: "ok",
        platform: std::env::consts::OS,
        capturing: bridge.mode() == CaptureMode::Capturing,
        subscribed: bridge.broker().is_subscribed(),
        delivered,
        dropped,
        started_at: state.started_at.to_rfc3339(),
    })
}
