//! flowbridge - volume key interception bridge.
//!
//! On Windows the process installs a low-level keyboard hook and a tray icon
//! and pumps messages on the main thread. Elsewhere it runs the control and
//! event channels only, until Ctrl+C.

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use flowbridge::bridge::{Bridge, CONTROL_CHANNEL, EVENT_CHANNEL};
use flowbridge::config::BridgeConfig;
use flowbridge::server::{self, auth::token_fingerprint, state::AppState};
use std::net::{IpAddr, SocketAddr};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("flowbridge=info")),
        )
        .init();

    let mut config = BridgeConfig::load()?;
    let (token, generated) = config.resolve_token();

    let bridge = Bridge::new(config.keymap(), config.event_buffer);

    let ip: IpAddr = config.host.parse()?;
    let addr = SocketAddr::new(ip, config.port);
    let _server = server::start_server(AppState::new(bridge.clone(), &token), addr)?;

    println!("════════════════════════════════════════════════════════════════");
    println!("🔊 flowbridge is running");
    println!("   • Control: POST http://{addr}{}", server::channel_path(CONTROL_CHANNEL));
    println!("   • Events:  WS   ws://{addr}{}", server::channel_path(EVENT_CHANNEL));
    if generated {
        println!("   • Token:   {token}  (generated, set api_token in config to keep it)");
    }
    println!("════════════════════════════════════════════════════════════════");
    tracing::info!(
        keymap = ?config.keymap,
        token = %token_fingerprint(&token),
        generated,
        "Bridge ready, capture disabled"
    );

    let shutdown = Arc::new(AtomicBool::new(false));
    run_host(bridge, Arc::clone(&shutdown))?;

    shutdown.store(true, Ordering::SeqCst);
    println!("\n👋 flowbridge has exited.");
    Ok(())
}

/// Installs the keyboard hook and tray, then pumps messages until quit.
#[cfg(windows)]
fn run_host(bridge: Bridge, shutdown: Arc<AtomicBool>) -> Result<(), Box<dyn std::error::Error>> {
    use flowbridge::host::{
        keyboard_hook_proc, post_quit_message, register_bridge, run_message_loop, HookGuard,
    };
    use flowbridge::tray::setup_tray;

    register_bridge(bridge.clone());

    let _tray = match setup_tray(bridge, Arc::clone(&shutdown)) {
        Ok(tray) => Some(tray),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to create system tray, continuing without it");
            None
        }
    };

    let shutdown_ctrlc = Arc::clone(&shutdown);
    ctrlc::set_handler(move || {
        println!("\n🛑 Shutdown signal received...");
        shutdown_ctrlc.store(true, Ordering::SeqCst);
        post_quit_message(0);
    })?;

    let _keyboard_hook = HookGuard::install_keyboard_hook(Some(keyboard_hook_proc))?;

    tracing::info!("Running message loop...");
    run_message_loop();
    Ok(())
}

/// No input hook on this platform: serve the channels until Ctrl+C.
#[cfg(not(windows))]
fn run_host(_bridge: Bridge, shutdown: Arc<AtomicBool>) -> Result<(), Box<dyn std::error::Error>> {
    let (tx, rx) = std::sync::mpsc::channel();
    ctrlc::set_handler(move || {
        println!("\n🛑 Shutdown signal received...");
        shutdown.store(true, Ordering::SeqCst);
        let _ = tx.send(());
    })?;

    tracing::warn!("No keyboard hook on this platform; key events will not be captured");
    let _ = rx.recv();
    Ok(())
}
