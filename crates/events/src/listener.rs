//! Listener and subscription contracts.

use std::sync::Arc;

/// Observer of record changes for one entity type.
///
/// Each callback receives every entity affected by a single write, already
/// resolved to its post-write state (pre-deletion state for
/// [`ModelChangedListener::on_model_deleted`]). All current subscribers are
/// invoked with the same list.
pub trait ModelChangedListener<M>: Send + Sync {
    fn on_model_added(&self, models: &[M]);

    fn on_model_updated(&self, models: &[M]);

    fn on_model_deleted(&self, models: &[M]);

    /// A combined add-or-update outcome, keyed by identifier.
    fn on_model_upserted(&self, models: &[M]);
}

/// Subscription surface of a record store.
///
/// Listener identity is the `Arc` allocation: subscribing the same handle
/// twice has no additional effect, and unsubscribing matches by identity,
/// never by content.
pub trait ChangeSource<M: 'static> {
    fn subscribe(&self, listener: Arc<dyn ModelChangedListener<M>>);

    fn unsubscribe(&self, listener: &Arc<dyn ModelChangedListener<M>>);
}
