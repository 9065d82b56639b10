//! System tray module.
//!
//! Lets the local user toggle volume key capture without a controller
//! connected, and exit the process.

pub mod icon;
pub mod menu;

pub use icon::*;
pub use menu::*;

use crate::bridge::Bridge;
use crate::host::post_quit_message;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tray_icon::menu::MenuEvent;
use tray_icon::{TrayIcon, TrayIconBuilder};

/// Sets up the tray icon and menu.
///
/// Keep the returned `TrayIcon` alive for the icon to stay visible.
pub fn setup_tray(
    bridge: Bridge,
    shutdown: Arc<AtomicBool>,
) -> Result<TrayIcon, Box<dyn std::error::Error>> {
    let icon = create_default_icon()?;
    let menu = create_tray_menu();

    let tray = TrayIconBuilder::new()
        .with_tooltip("flowbridge - volume key bridge")
        .with_icon(icon)
        .with_menu(Box::new(menu))
        .build()?;

    spawn_menu_handler(bridge, shutdown);

    tracing::info!("System tray initialized");
    Ok(tray)
}

fn spawn_menu_handler(bridge: Bridge, shutdown: Arc<AtomicBool>) {
    std::thread::spawn(move || {
        let receiver = MenuEvent::receiver();

        loop {
            if let Ok(event) = receiver.try_recv() {
                handle_menu_event(&event.id.0, &bridge, &shutdown);
            }

            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            std::thread::sleep(std::time::Duration::from_millis(100));
        }
    });
}

fn handle_menu_event(menu_id: &str, bridge: &Bridge, shutdown: &Arc<AtomicBool>) {
    match menu_id {
        MENU_ID_CAPTURE => {
            bridge.control().enable();
        }
        MENU_ID_RELEASE => {
            bridge.control().disable();
        }
        MENU_ID_EXIT => {
            tracing::info!("Exit requested from tray menu");
            shutdown.store(true, Ordering::SeqCst);
            post_quit_message(0);
        }
        _ => {
            tracing::debug!(menu_id, "Unknown menu event");
        }
    }
}
