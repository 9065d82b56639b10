//! Volume key interception bridge.
//!
//! [`Bridge`] is the owned context shared by the two entry points: the host
//! input dispatch path calls [`Bridge::handle_key`], while the controller uses
//! [`Bridge::control`] and [`Bridge::subscribe`].

pub mod broker;
pub mod control;
pub mod error;
pub mod events;
pub mod interceptor;

pub use broker::*;
pub use control::*;
pub use error::BridgeError;
pub use events::*;
pub use interceptor::*;

use std::sync::Arc;

/// Shared bridge context. Cheap to clone.
#[derive(Clone)]
pub struct Bridge {
    interceptor: Arc<Interceptor>,
    broker: Arc<EventBroker>,
    control: ControlSurface,
}

impl Bridge {
    /// Builds a bridge in passthrough mode with no subscriber.
    pub fn new(keymap: KeyMap, event_buffer: usize) -> Self {
        let broker = Arc::new(EventBroker::new(event_buffer));
        let interceptor = Arc::new(Interceptor::new(keymap, Arc::clone(&broker)));
        let control = ControlSurface::new(Arc::clone(&interceptor));
        Self {
            interceptor,
            broker,
            control,
        }
    }

    pub fn control(&self) -> &ControlSurface {
        &self.control
    }

    pub fn broker(&self) -> &EventBroker {
        &self.broker
    }

    pub fn mode(&self) -> CaptureMode {
        self.interceptor.mode()
    }

    pub fn keymap(&self) -> KeyMap {
        self.interceptor.keymap()
    }

    /// Host dispatch entry point.
    #[inline]
    pub fn handle_key(&self, event: RawKeyEvent) -> KeyDisposition {
        self.interceptor.handle(event)
    }

    pub fn subscribe(&self) -> Subscription {
        self.broker.subscribe()
    }

    pub fn unsubscribe(&self) {
        self.broker.unsubscribe()
    }
}

impl Default for Bridge {
    fn default() -> Self {
        Self::new(KeyMap::default(), DEFAULT_EVENT_BUFFER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_enable_subscribe_and_capture() {
        let bridge = Bridge::default();

        assert_eq!(bridge.control().invoke(METHOD_ENABLE), Ok(true));
        let mut sub = bridge.subscribe();

        let result = bridge.handle_key(RawKeyEvent::down(VK_VOLUME_UP));
        assert_eq!(result, KeyDisposition::Handled);
        assert_eq!(sub.recv().await, Some(InputEvent::VolumeUp));

        // Unrelated key passes through with no emission
        let result = bridge.handle_key(RawKeyEvent::down(0x20));
        assert_eq!(result, KeyDisposition::NotHandled);
        assert_eq!(sub.try_recv(), None);
    }

    #[test]
    fn test_resubscribe_routes_to_latest() {
        let bridge = Bridge::default();
        bridge.control().enable();

        let mut first = bridge.subscribe();
        let mut second = bridge.subscribe();

        bridge.handle_key(RawKeyEvent::down(VK_VOLUME_UP));
        bridge.handle_key(RawKeyEvent::down(VK_VOLUME_DOWN));

        assert_eq!(first.try_recv(), None);
        assert_eq!(second.try_recv(), Some(InputEvent::VolumeUp));
        assert_eq!(second.try_recv(), Some(InputEvent::VolumeDown));
    }

    #[test]
    fn test_disable_after_enable_stops_capture() {
        let bridge = Bridge::default();
        let mut sub = bridge.subscribe();

        assert_eq!(bridge.control().invoke(METHOD_ENABLE), Ok(true));
        assert_eq!(bridge.control().invoke(METHOD_DISABLE), Ok(true));

        assert!(!bridge.handle_key(RawKeyEvent::down(VK_VOLUME_UP)).is_handled());
        assert!(!bridge.handle_key(RawKeyEvent::down(VK_VOLUME_DOWN)).is_handled());
        assert_eq!(sub.try_recv(), None);
    }

    #[test]
    fn test_capture_after_unsubscribe_is_silent() {
        let bridge = Bridge::default();
        bridge.control().enable();
        let mut sub = bridge.subscribe();
        bridge.unsubscribe();

        assert!(bridge.handle_key(RawKeyEvent::down(VK_VOLUME_UP)).is_handled());
        assert_eq!(sub.try_recv(), None);
        assert_eq!(bridge.broker().counts(), (0, 1));
    }

    #[test]
    fn test_clones_share_state() {
        let bridge = Bridge::new(KeyMap::ANDROID, 4);
        let host_side = bridge.clone();

        bridge.control().enable();
        let mut sub = bridge.subscribe();

        assert!(host_side
            .handle_key(RawKeyEvent::down(ANDROID_KEYCODE_VOLUME_DOWN))
            .is_handled());
        assert_eq!(sub.try_recv(), Some(InputEvent::VolumeDown));
        assert_eq!(host_side.mode(), CaptureMode::Capturing);
    }
}
