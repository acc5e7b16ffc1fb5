//! Event bus for cross-component communication.
//!
//! Provides a publish-subscribe system so the embedding surface (a toast
//! area, a debug panel) can follow what the coordinator does without the
//! coordinator knowing about it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::PageKey;
use crate::handlers::BulkAction;

/// Events published by the coordinator.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A page/tab was (re)built.
    Bundled {
        page: PageKey,
        messages: usize,
        bundles: usize,
    },
    /// A bundle was opened by the user.
    BundleOpened(String),
    /// Every bundle was closed by the user.
    BundlesClosed,
    /// The starred page's dividers were redrawn.
    DatesRefreshed,
    /// A bulk action reached the host toolbar.
    BulkActionDispatched { action: BulkAction, rows: usize },
    /// Show a notification.
    ShowNotification(Notification),
}

/// A user notification.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Unique ID for this notification.
    pub id: String,
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: Option<String>,
    /// Notification severity level.
    pub level: NotificationLevel,
}

/// Notification severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Warning,
    Error,
}

impl Notification {
    pub fn warning(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: None,
            level: NotificationLevel::Warning,
        }
    }

    pub fn error(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            body: None,
            level: NotificationLevel::Error,
        }
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

/// Event handler function type.
pub type EventHandler = Box<dyn Fn(&AppEvent) + Send + Sync>;

/// Event bus for publish-subscribe communication.
///
/// Cloning yields another handle onto the same subscribers.
pub struct EventBus {
    handlers: Arc<Mutex<HashMap<u64, EventHandler>>>,
    next_id: Arc<Mutex<u64>>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl EventBus {
    /// Create a new event bus.
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(Mutex::new(0)),
        }
    }

    /// Subscribe to all events.
    pub fn subscribe<F>(&self, handler: F) -> SubscriberId
    where
        F: Fn(&AppEvent) + Send + Sync + 'static,
    {
        let mut next_id = lock(&self.next_id);
        let id = *next_id;
        *next_id += 1;

        lock(&self.handlers).insert(id, Box::new(handler));

        SubscriberId(id)
    }

    /// Publish an event to all subscribers.
    pub fn publish(&self, event: AppEvent) {
        let handlers = lock(&self.handlers);
        for handler in handlers.values() {
            handler(&event);
        }
    }

    /// Get the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        lock(&self.handlers).len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            handlers: Arc::clone(&self.handlers),
            next_id: Arc::clone(&self.next_id),
        }
    }
}
