//! Host-frame collaborator surface
//!
//! The widget runs inside a host application frame. The host hands over a
//! context (who is viewing, display insets), accepts a small set of
//! actions, and emits lifecycle events. This module defines those
//! interfaces as the engine consumes them; the host SDK itself lives
//! outside this crate. Not every variant is produced by the built-in CLI
//! host.
#![allow(dead_code)]

use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::core::Fid;

/// Safe-area display insets supplied by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SafeAreaInsets {
    pub top: u32,
    pub bottom: u32,
    pub left: u32,
    pub right: u32,
}

/// Context the host yields when the frame loads
#[derive(Debug, Clone, Default)]
pub struct FrameContext {
    /// The viewing user, if the host knows one
    pub subject: Option<Fid>,

    /// Whether the client has already added the widget to favorites
    pub client_added: bool,

    pub safe_area: SafeAreaInsets,
}

/// Failure from a host action
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("rejected by user: {0}")]
    Rejected(String),

    #[error("invalid domain manifest: {0}")]
    InvalidManifest(String),

    #[error("host action failed: {0}")]
    Unavailable(String),
}

/// Action surface exposed by the host
#[async_trait]
pub trait HostActions: Send + Sync {
    /// Tell the host the widget is ready to be shown
    async fn signal_ready(&self) -> Result<(), HostError>;

    /// Ask the host to add the widget to the user's favorites
    async fn request_add(&self) -> Result<(), HostError>;

    /// Open a URL through the host
    async fn open_url(&self, url: &str) -> Result<(), HostError>;
}

/// Lifecycle notifications published by the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    Added,
    AddRejected { reason: String },
    Removed,
    NotificationsEnabled,
    NotificationsDisabled,
    PrimaryButtonPressed,
}

/// Fan-out bus for host events.
///
/// Each subscriber gets its own [`Subscription`] handle; releasing (or
/// dropping) the handle unregisters exactly that listener. There is no
/// remove-all operation against shared state.
#[derive(Clone, Default)]
pub struct EventBus {
    inner: Arc<Mutex<BusInner>>,
}

#[derive(Default)]
struct BusInner {
    next_id: u64,
    listeners: Vec<(u64, mpsc::UnboundedSender<HostEvent>)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener and return its handle.
    pub fn subscribe(&self) -> Subscription {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = {
            let mut inner = match self.inner.lock() {
                Ok(inner) => inner,
                Err(poisoned) => poisoned.into_inner(),
            };
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, tx));
            id
        };
        Subscription {
            id,
            events: rx,
            bus: Arc::downgrade(&self.inner),
        }
    }

    /// Deliver an event to every live subscription.
    pub fn publish(&self, event: HostEvent) {
        let mut inner = match self.inner.lock() {
            Ok(inner) => inner,
            Err(poisoned) => poisoned.into_inner(),
        };
        inner
            .listeners
            .retain(|(_, tx)| tx.send(event.clone()).is_ok());
    }
}

/// Handle for one registered listener; dropping it unregisters the listener
pub struct Subscription {
    id: u64,
    events: mpsc::UnboundedReceiver<HostEvent>,
    bus: Weak<Mutex<BusInner>>,
}

impl Subscription {
    /// Wait for the next event; `None` once the bus is gone.
    pub async fn next(&mut self) -> Option<HostEvent> {
        self.events.recv().await
    }

    /// Non-blocking poll for an already-delivered event.
    pub fn try_next(&mut self) -> Option<HostEvent> {
        self.events.try_recv().ok()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(bus) = self.bus.upgrade() {
            if let Ok(mut inner) = bus.lock() {
                inner.listeners.retain(|(id, _)| *id != self.id);
            }
        }
    }
}
