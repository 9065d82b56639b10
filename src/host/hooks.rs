//! Ownership of the system-wide keyboard hook.
//!
//! The bridge sees volume keys only while a `WH_KEYBOARD_LL` hook is
//! registered. [`HookGuard`] ties that registration to a value on the
//! message-loop thread; dropping it hands the keys back to the system.

use windows::Win32::UI::WindowsAndMessaging::{
    SetWindowsHookExW, UnhookWindowsHookEx, HHOOK, HOOKPROC, WH_KEYBOARD_LL,
};

/// Registered low-level keyboard hook, removed on drop.
pub struct HookGuard {
    handle: HHOOK,
}

impl HookGuard {
    /// Registers `callback` for every keyboard event on the desktop.
    ///
    /// Must be called from the thread that will run
    /// [`run_message_loop`](super::run_message_loop); Windows delivers hook
    /// calls through that thread's queue.
    pub fn install_keyboard_hook(callback: HOOKPROC) -> windows::core::Result<Self> {
        let handle = unsafe { SetWindowsHookExW(WH_KEYBOARD_LL, callback, None, 0)? };
        tracing::info!("Keyboard hook registered, volume keys routed through bridge");
        Ok(Self { handle })
    }

    pub fn handle(&self) -> HHOOK {
        self.handle
    }
}

impl Drop for HookGuard {
    fn drop(&mut self) {
        match unsafe { UnhookWindowsHookEx(self.handle) } {
            Ok(()) => tracing::info!("Keyboard hook removed, volume keys back to system"),
            Err(e) => tracing::error!(error = ?e, "Failed to remove keyboard hook"),
        }
    }
}
