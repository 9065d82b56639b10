//! Consume-or-passthrough decision for raw key events.
//!
//! # Performance Critical
//!
//! [`Interceptor::handle`] runs synchronously inside the host input pipeline
//! (on Windows, inside the low-level keyboard hook). The pass-through path
//! reads one atomic and does a two-way compare; it never locks or allocates.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::broker::EventBroker;
use super::events::{KeyAction, KeyDisposition, KeyMap, RawKeyEvent};

/// Interceptor state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    Passthrough,
    Capturing,
}

/// The capture toggle. Starts disabled; never persisted.
#[derive(Debug, Default)]
pub struct CaptureState {
    enabled: AtomicBool,
}

impl CaptureState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Sets the flag, returning the previous value.
    pub fn set(&self, enabled: bool) -> bool {
        self.enabled.swap(enabled, Ordering::AcqRel)
    }

    pub fn mode(&self) -> CaptureMode {
        if self.is_enabled() {
            CaptureMode::Capturing
        } else {
            CaptureMode::Passthrough
        }
    }
}

/// Decides, per raw event, whether to consume it and notify the subscriber.
pub struct Interceptor {
    capture: CaptureState,
    keymap: KeyMap,
    broker: Arc<EventBroker>,
}

impl Interceptor {
    pub fn new(keymap: KeyMap, broker: Arc<EventBroker>) -> Self {
        Self {
            capture: CaptureState::new(),
            keymap,
            broker,
        }
    }

    pub fn capture(&self) -> &CaptureState {
        &self.capture
    }

    pub fn mode(&self) -> CaptureMode {
        self.capture.mode()
    }

    pub fn keymap(&self) -> KeyMap {
        self.keymap
    }

    /// Offers a raw event to the interceptor.
    ///
    /// Only key-down events for a monitored code while capturing are consumed.
    /// A consumed event is pushed to the broker even when nobody is listening;
    /// the broker drops it in that case but the event is still consumed.
    pub fn handle(&self, event: RawKeyEvent) -> KeyDisposition {
        if event.action != KeyAction::Down || !self.capture.is_enabled() {
            return KeyDisposition::NotHandled;
        }

        let Some(input) = self.keymap.lookup(event.code) else {
            return KeyDisposition::NotHandled;
        };

        self.broker.push(input);
        KeyDisposition::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::events::{InputEvent, VK_VOLUME_DOWN, VK_VOLUME_UP};
    use proptest::prelude::*;

    fn interceptor() -> (Interceptor, Arc<EventBroker>) {
        let broker = Arc::new(EventBroker::default());
        (Interceptor::new(KeyMap::WINDOWS, Arc::clone(&broker)), broker)
    }

    #[test]
    fn test_starts_in_passthrough() {
        let (interceptor, _) = interceptor();
        assert_eq!(interceptor.mode(), CaptureMode::Passthrough);
        assert!(!interceptor.capture().is_enabled());
    }

    #[test]
    fn test_passthrough_never_handles_monitored_keys() {
        let (interceptor, broker) = interceptor();
        let mut sub = broker.subscribe();

        let result = interceptor.handle(RawKeyEvent::down(VK_VOLUME_UP));

        assert_eq!(result, KeyDisposition::NotHandled);
        assert_eq!(sub.try_recv(), None);
        assert_eq!(broker.counts(), (0, 0));
    }

    #[test]
    fn test_capturing_consumes_and_pushes() {
        let (interceptor, broker) = interceptor();
        let mut sub = broker.subscribe();
        interceptor.capture().set(true);

        assert!(interceptor.handle(RawKeyEvent::down(VK_VOLUME_UP)).is_handled());
        assert!(interceptor.handle(RawKeyEvent::down(VK_VOLUME_DOWN)).is_handled());

        assert_eq!(sub.try_recv(), Some(InputEvent::VolumeUp));
        assert_eq!(sub.try_recv(), Some(InputEvent::VolumeDown));
        assert_eq!(sub.try_recv(), None);
    }

    #[test]
    fn test_capturing_ignores_key_up_and_other_codes() {
        let (interceptor, broker) = interceptor();
        let mut sub = broker.subscribe();
        interceptor.capture().set(true);

        assert_eq!(
            interceptor.handle(RawKeyEvent::up(VK_VOLUME_UP)),
            KeyDisposition::NotHandled
        );
        // 'A'
        assert_eq!(
            interceptor.handle(RawKeyEvent::down(0x41)),
            KeyDisposition::NotHandled
        );
        assert_eq!(sub.try_recv(), None);
    }

    #[test]
    fn test_capturing_without_subscriber_still_consumes() {
        let (interceptor, broker) = interceptor();
        interceptor.capture().set(true);

        assert!(interceptor.handle(RawKeyEvent::down(VK_VOLUME_DOWN)).is_handled());
        assert_eq!(broker.counts(), (0, 1));
    }

    proptest! {
        #[test]
        fn prop_passthrough_handles_nothing(code in any::<u32>(), down in any::<bool>()) {
            let (interceptor, broker) = interceptor();
            let mut sub = broker.subscribe();
            let event = if down { RawKeyEvent::down(code) } else { RawKeyEvent::up(code) };

            prop_assert_eq!(interceptor.handle(event), KeyDisposition::NotHandled);
            prop_assert_eq!(sub.try_recv(), None);
        }

        #[test]
        fn prop_capturing_handles_only_monitored_key_downs(code in any::<u32>()) {
            let (interceptor, broker) = interceptor();
            let mut sub = broker.subscribe();
            interceptor.capture().set(true);

            let monitored = KeyMap::WINDOWS.lookup(code);
            let handled = interceptor.handle(RawKeyEvent::down(code)).is_handled();

            prop_assert_eq!(handled, monitored.is_some());
            prop_assert_eq!(sub.try_recv(), monitored);
        }
    }
}
