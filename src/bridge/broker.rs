//! Single-subscriber event stream broker.
//!
//! Holds at most one live subscriber. A new subscription replaces the previous
//! one outright: the old receiver simply stops getting events. Delivery never
//! blocks the caller; if there is no subscriber or its buffer is full, the
//! event is dropped and counted.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::events::InputEvent;

/// Default inbound buffer capacity for a subscriber.
pub const DEFAULT_EVENT_BUFFER: usize = 16;

/// Identifies one subscription for the lifetime of the broker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Result of a single push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PushOutcome {
    Delivered,
    NoSubscriber,
    BufferFull,
}

/// Receiving half handed to the subscriber.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    rx: mpsc::Receiver<InputEvent>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Waits for the next event.
    ///
    /// Returns `None` once this subscription has been replaced or cancelled
    /// and every event delivered before that has been read.
    pub async fn recv(&mut self) -> Option<InputEvent> {
        self.rx.recv().await
    }

    /// Returns an already-delivered event without waiting.
    pub fn try_recv(&mut self) -> Option<InputEvent> {
        self.rx.try_recv().ok()
    }
}

struct Slot {
    id: SubscriptionId,
    tx: mpsc::Sender<InputEvent>,
}

/// The queue-of-one between the interceptor and the controller.
pub struct EventBroker {
    slot: Mutex<Option<Slot>>,
    capacity: usize,
    next_id: AtomicU64,
    delivered: AtomicU64,
    dropped: AtomicU64,
}

impl EventBroker {
    /// Creates a broker whose subscribers buffer up to `capacity` events.
    pub fn new(capacity: usize) -> Self {
        Self {
            slot: Mutex::new(None),
            capacity: capacity.max(1),
            next_id: AtomicU64::new(1),
            delivered: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
        }
    }

    fn slot(&self) -> MutexGuard<'_, Option<Slot>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Registers a new sole subscriber, replacing any existing one.
    pub fn subscribe(&self) -> Subscription {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (tx, rx) = mpsc::channel(self.capacity);

        let previous = self.slot().replace(Slot { id, tx });
        match previous {
            Some(old) => tracing::info!(
                subscription = %id,
                replaced = %old.id,
                "Event subscriber replaced"
            ),
            None => tracing::info!(subscription = %id, "Event subscriber attached"),
        }

        Subscription { id, rx }
    }

    /// Clears the current subscriber, whoever it is.
    pub fn unsubscribe(&self) {
        if let Some(old) = self.slot().take() {
            tracing::info!(subscription = %old.id, "Event subscriber detached");
        }
    }

    /// Clears the subscriber only if `id` is still the current one.
    ///
    /// Returns `false` when `id` was already replaced, so a stale detach never
    /// removes its successor.
    pub fn cancel(&self, id: SubscriptionId) -> bool {
        let mut slot = self.slot();
        if slot.as_ref().is_some_and(|s| s.id == id) {
            *slot = None;
            tracing::info!(subscription = %id, "Event subscriber cancelled");
            true
        } else {
            tracing::debug!(subscription = %id, "Cancel for inactive subscription ignored");
            false
        }
    }

    /// Id of the current subscriber, if any.
    pub fn current(&self) -> Option<SubscriptionId> {
        self.slot().as_ref().map(|s| s.id)
    }

    /// Whether a subscriber is currently registered.
    pub fn is_subscribed(&self) -> bool {
        self.slot().is_some()
    }

    /// Delivers `event` to the current subscriber without blocking.
    pub fn push(&self, event: InputEvent) -> PushOutcome {
        let mut slot = self.slot();
        let Some(current) = slot.as_ref() else {
            self.dropped.fetch_add(1, Ordering::Relaxed);
            tracing::debug!(%event, reason = "no_subscriber", "Event dropped");
            return PushOutcome::NoSubscriber;
        };

        match current.tx.try_send(event) {
            Ok(()) => {
                self.delivered.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(%event, subscription = %current.id, "Event delivered");
                PushOutcome::Delivered
            }
            Err(TrySendError::Full(_)) => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(%event, reason = "buffer_full", "Event dropped");
                PushOutcome::BufferFull
            }
            Err(TrySendError::Closed(_)) => {
                // Receiver went away without cancelling; treat as detached.
                tracing::info!(subscription = %current.id, "Event subscriber detached");
                *slot = None;
                self.dropped.fetch_add(1, Ordering::Relaxed);
                tracing::debug!(%event, reason = "no_subscriber", "Event dropped");
                PushOutcome::NoSubscriber
            }
        }
    }

    /// Returns (delivered, dropped) counts since startup.
    pub fn counts(&self) -> (u64, u64) {
        (
            self.delivered.load(Ordering::Relaxed),
            self.dropped.load(Ordering::Relaxed),
        )
    }
}

impl Default for EventBroker {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER)
    }
}
