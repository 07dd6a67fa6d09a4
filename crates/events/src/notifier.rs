//! Observer registry with broadcast delivery.

use std::sync::{Arc, Mutex};

use crate::listener::ModelChangedListener;

/// Fan-out registry owned by a record store.
///
/// Delivery snapshots the current subscriber set and invokes every listener
/// sequentially with the same slice, so by the time a notify call returns,
/// all subscribers have observed the notification. No ordering between
/// distinct subscribers is guaranteed.
pub struct ChangeNotifier<M: 'static> {
    listeners: Mutex<Vec<Arc<dyn ModelChangedListener<M>>>>,
}

impl<M: 'static> ChangeNotifier<M> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Duplicate subscriptions of the same `Arc`
    /// collapse into one.
    pub fn subscribe(&self, listener: Arc<dyn ModelChangedListener<M>>) {
        let Ok(mut listeners) = self.listeners.lock() else {
            return;
        };
        if listeners.iter().any(|l| Arc::ptr_eq(l, &listener)) {
            return;
        }
        listeners.push(listener);
    }

    /// Remove a listener, matched by `Arc` identity.
    pub fn unsubscribe(&self, listener: &Arc<dyn ModelChangedListener<M>>) {
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.retain(|l| !Arc::ptr_eq(l, listener));
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.lock().map(|l| l.len()).unwrap_or(0)
    }

    // Listeners are invoked outside the lock so a callback may re-enter
    // subscribe/unsubscribe.
    fn snapshot(&self) -> Vec<Arc<dyn ModelChangedListener<M>>> {
        self.listeners.lock().map(|l| l.clone()).unwrap_or_default()
    }

    pub fn notify_added(&self, models: &[M]) {
        let listeners = self.snapshot();
        tracing::trace!(subscribers = listeners.len(), records = models.len(), "notify added");
        for listener in listeners {
            listener.on_model_added(models);
        }
    }

    pub fn notify_updated(&self, models: &[M]) {
        let listeners = self.snapshot();
        tracing::trace!(subscribers = listeners.len(), records = models.len(), "notify updated");
        for listener in listeners {
            listener.on_model_updated(models);
        }
    }

    pub fn notify_deleted(&self, models: &[M]) {
        let listeners = self.snapshot();
        tracing::trace!(subscribers = listeners.len(), records = models.len(), "notify deleted");
        for listener in listeners {
            listener.on_model_deleted(models);
        }
    }

    pub fn notify_upserted(&self, models: &[M]) {
        let listeners = self.snapshot();
        tracing::trace!(subscribers = listeners.len(), records = models.len(), "notify upserted");
        for listener in listeners {
            listener.on_model_upserted(models);
        }
    }
}

impl<M: 'static> Default for ChangeNotifier<M> {
    fn default() -> Self {
        Self {
            listeners: Mutex::new(Vec::new()),
        }
    }
}
