//! Low-level keyboard hook procedure.
//!
//! # Performance Critical
//!
//! The hook procedure runs synchronously in the Windows input pipeline; any
//! delay here is system-wide input lag. Returning a nonzero `LRESULT` without
//! calling `CallNextHookEx` swallows the key, which is how a captured volume
//! key is kept away from the system volume control.

use once_cell::sync::OnceCell;
use windows::Win32::Foundation::{LPARAM, LRESULT, WPARAM};
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, HC_ACTION, KBDLLHOOKSTRUCT, WM_KEYDOWN, WM_SYSKEYDOWN,
};

use crate::bridge::{Bridge, KeyAction, RawKeyEvent};

/// The hook procedure has no user-data pointer, so the bridge it serves is
/// registered here once at startup.
static HOOK_BRIDGE: OnceCell<Bridge> = OnceCell::new();

/// Registers the bridge the keyboard hook dispatches to.
///
/// Returns `false` if a bridge was already registered.
pub fn register_bridge(bridge: Bridge) -> bool {
    HOOK_BRIDGE.set(bridge).is_ok()
}

/// Low-level keyboard hook callback.
///
/// # Safety
/// Called by Windows on the thread running the message loop, with `lparam`
/// pointing at a valid `KBDLLHOOKSTRUCT` whenever `code == HC_ACTION`.
pub unsafe extern "system" fn keyboard_hook_proc(
    code: i32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if code == HC_ACTION as i32 {
        if let Some(bridge) = HOOK_BRIDGE.get() {
            let info = &*(lparam.0 as *const KBDLLHOOKSTRUCT);
            let msg = wparam.0 as u32;
            let action = if msg == WM_KEYDOWN || msg == WM_SYSKEYDOWN {
                KeyAction::Down
            } else {
                KeyAction::Up
            };

            let event = RawKeyEvent {
                code: info.vkCode,
                action,
            };
            if bridge.handle_key(event).is_handled() {
                tracing::trace!(vk = info.vkCode, "Key consumed");
                return LRESULT(1);
            }
        }
    }

    CallNextHookEx(None, code, wparam, lparam)
}
