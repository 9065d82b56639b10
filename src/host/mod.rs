//! Windows input host.
//!
//! Feeds raw keyboard events from a `WH_KEYBOARD_LL` hook into the bridge and
//! keeps the message loop the hook depends on.

pub mod hooks;
pub mod keyboard;
pub mod message_loop;

pub use hooks::*;
pub use keyboard::*;
pub use message_loop::*;
