//! Windows message pump.
//!
//! The low-level keyboard hook is serviced on the thread that installed it,
//! and only while that thread pumps messages. The tray icon needs the same
//! loop.

use std::sync::atomic::{AtomicU32, Ordering};
use windows::Win32::Foundation::{LPARAM, WPARAM};
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    DispatchMessageW, GetMessageW, PostThreadMessageW, TranslateMessage, MSG, WM_QUIT,
};

/// Thread running the message loop, for cross-thread quit.
static LOOP_THREAD_ID: AtomicU32 = AtomicU32::new(0);

/// Pumps messages until `WM_QUIT`.
pub fn run_message_loop() {
    let thread_id = unsafe { GetCurrentThreadId() };
    LOOP_THREAD_ID.store(thread_id, Ordering::SeqCst);

    tracing::debug!(thread_id, "Message loop starting");

    let mut msg = MSG::default();
    loop {
        let status = unsafe { GetMessageW(&mut msg, None, 0, 0) }.0;
        if !is_message(status) {
            if status < 0 {
                tracing::error!(
                    error = ?windows::core::Error::from_win32(),
                    "GetMessageW failed, leaving message loop"
                );
            }
            break;
        }
        unsafe {
            let _ = TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    tracing::debug!("Message loop exited");
}

/// `GetMessageW` returns 0 on `WM_QUIT` and -1 on error; only a positive
/// value means a message was retrieved.
#[inline]
fn is_message(status: i32) -> bool {
    status > 0
}

/// Posts `WM_QUIT` to the message loop thread. Callable from any thread.
pub fn post_quit_message(exit_code: i32) {
    let thread_id = LOOP_THREAD_ID.load(Ordering::SeqCst);
    if thread_id == 0 {
        tracing::warn!("Message loop not running, cannot post quit message");
        return;
    }

    let result = unsafe {
        PostThreadMessageW(thread_id, WM_QUIT, WPARAM(exit_code as usize), LPARAM(0))
    };
    match result {
        Ok(()) => tracing::debug!(exit_code, thread_id, "Posted quit message"),
        Err(e) => tracing::error!(?e, "Failed to post quit message"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_positive_status_is_a_message() {
        assert!(is_message(1));
        assert!(!is_message(0));
        assert!(!is_message(-1));
    }
}
