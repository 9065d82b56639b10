//! HTTP server exposing the bridge's control and event channels.
//!
//! - `GET  /health` (no auth)
//! - `POST /channels/com.ntwritecode.flowcontroller/volume`
//! - `GET  /channels/com.ntwritecode.flowcontroller/volume_events` (WebSocket)

pub mod auth;
pub mod routes;
pub mod state;
pub mod ws;

use crate::bridge::{CONTROL_CHANNEL, EVENT_CHANNEL};
use crate::server::routes::{control, health};
use crate::server::state::AppState;
use crate::server::ws::ws_handler;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread::JoinHandle;
use tower_http::cors::{Any, CorsLayer};

/// Route path for a named channel.
pub fn channel_path(channel: &str) -> String {
    format!("/channels/{channel}")
}

/// Unknown paths and methods get an empty `204`, the same as a request that
/// fails auth, so probing does not reveal which routes exist.
async fn drop_request() -> StatusCode {
    StatusCode::NO_CONTENT
}

/// Builds the router for the given state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .route(
            &channel_path(CONTROL_CHANNEL),
            post(control::invoke_method).fallback(drop_request),
        )
        .route(
            &channel_path(EVENT_CHANNEL),
            get(ws_handler).fallback(drop_request),
        )
        .fallback(drop_request)
        .layer(cors)
        .with_state(Arc::new(state))
}

/// Starts the HTTP server on a background thread with its own runtime.
pub fn start_server(state: AppState, addr: SocketAddr) -> std::io::Result<JoinHandle<()>> {
    let rt = tokio::runtime::Runtime::new()?;

    let handle = std::thread::Builder::new()
        .name("flowbridge-http".into())
        .spawn(move || {
            rt.block_on(async {
                if let Err(e) = run_server(state, addr).await {
                    tracing::error!(?e, %addr, "HTTP server stopped");
                }
            });
        })?;

    tracing::info!(%addr, "HTTP server starting");
    Ok(handle)
}

/// Runs the axum server.
async fn run_server(state: AppState, addr: SocketAddr) -> std::io::Result<()> {
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on http://{}", addr);
    axum::serve(listener, app).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::{Bridge, CaptureMode};
    use axum::body::Body;
    use axum::http::{header, Request};
    use tower::ServiceExt;

    async fn send(app: Router, request: Request<Body>) -> StatusCode {
        app.oneshot(request).await.unwrap().status()
    }

    fn app() -> (Router, Bridge) {
        let bridge = Bridge::default();
        (router(AppState::new(bridge.clone(), "token")), bridge)
    }

    #[test]
    fn test_channel_paths() {
        assert_eq!(
            channel_path(CONTROL_CHANNEL),
            "/channels/com.ntwritecode.flowcontroller/volume"
        );
        assert_eq!(
            channel_path(EVENT_CHANNEL),
            "/channels/com.ntwritecode.flowcontroller/volume_events"
        );
    }

    #[tokio::test]
    async fn test_unauthorized_bad_body_is_dropped_silently() {
        let (app, _) = app();
        let request = Request::post(channel_path(CONTROL_CHANNEL))
            .body(Body::from("garbage"))
            .unwrap();

        assert_eq!(send(app, request).await, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_unauthorized_plain_get_on_events_is_dropped_silently() {
        let (app, bridge) = app();
        let request = Request::get(channel_path(EVENT_CHANNEL))
            .body(Body::empty())
            .unwrap();

        assert_eq!(send(app, request).await, StatusCode::NO_CONTENT);
        assert!(!bridge.broker().is_subscribed());
    }

    #[tokio::test]
    async fn test_authorized_bad_body_is_rejected() {
        let (app, bridge) = app();
        let request = Request::post(channel_path(CONTROL_CHANNEL))
            .header(header::AUTHORIZATION, "Bearer token")
            .body(Body::from("garbage"))
            .unwrap();

        assert!(send(app, request).await.is_client_error());
        assert_eq!(bridge.mode(), CaptureMode::Passthrough);
    }

    #[tokio::test]
    async fn test_authorized_json_call_through_router() {
        let (app, bridge) = app();
        let request = Request::post(channel_path(CONTROL_CHANNEL))
            .header(header::AUTHORIZATION, "Bearer token")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"method":"enableVolumeButtons"}"#))
            .unwrap();

        assert_eq!(send(app, request).await, StatusCode::OK);
        assert_eq!(bridge.mode(), CaptureMode::Capturing);
    }

    #[tokio::test]
    async fn test_authorized_get_without_upgrade_is_rejected() {
        let (app, bridge) = app();
        let request = Request::get(channel_path(EVENT_CHANNEL))
            .header(header::AUTHORIZATION, "Bearer token")
            .body(Body::empty())
            .unwrap();

        assert!(send(app, request).await.is_client_error());
        assert!(!bridge.broker().is_subscribed());
    }

    #[tokio::test]
    async fn test_unknown_route_and_method_are_dropped_silently() {
        let (app, _) = app();
        let unknown = Request::get("/api/stats").body(Body::empty()).unwrap();
        assert_eq!(send(app.clone(), unknown).await, StatusCode::NO_CONTENT);

        let wrong_method = Request::get(channel_path(CONTROL_CHANNEL))
            .body(Body::empty())
            .unwrap();
        assert_eq!(send(app, wrong_method).await, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_health_needs_no_token() {
        let (app, _) = app();
        let request = Request::get("/health").body(Body::empty()).unwrap();
        assert_eq!(send(app, request).await, StatusCode::OK);
    }
}
