//! Control channel endpoint.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

use crate::bridge::BridgeError;
use crate::server::auth::is_authorized;
use crate::server::state::AppState;

/// A method invocation on the control channel.
#[derive(Debug, Deserialize)]
pub struct MethodCall {
    pub method: String,
    /// Accepted for wire compatibility; no current method takes arguments.
    #[serde(default)]
    pub arguments: Option<serde_json::Value>,
}

/// POST /channels/com.ntwritecode.flowcontroller/volume
///
/// Replies `{"result": true}` for a known method and `501` with
/// `{"error": "unimplemented"}` for anything else. Requests without a valid
/// bearer token are dropped with an empty `204` before the body is looked at,
/// so a malformed body only gets a rejection once the caller is authorized.
pub async fn invoke_method(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Result<Json<MethodCall>, JsonRejection>,
) -> Response {
    if !is_authorized(&headers, &state.token) {
        return StatusCode::NO_CONTENT.into_response();
    }

    let call = match body {
        Ok(Json(call)) => call,
        Err(rejection) => return rejection.into_response(),
    };

    match state.bridge.control().invoke(&call.method) {
        Ok(result) => Json(json!({ "result": result })).into_response(),
        Err(BridgeError::UnsupportedOperation(method)) => (
            StatusCode::NOT_IMPLEMENTED,
            Json(json!({ "error": "unimplemented", "method": method })),
        )
            .into_response(),
    }
}
