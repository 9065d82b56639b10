//! flowbridge - volume key interception bridge.
//!
//! While capture is enabled, presses of the hardware volume keys are swallowed
//! before they change the system volume and are forwarded to a single
//! subscribed controller instead.

pub mod bridge;
pub mod config;
pub mod server;

#[cfg(windows)]
pub mod host;
#[cfg(windows)]
pub mod tray;
