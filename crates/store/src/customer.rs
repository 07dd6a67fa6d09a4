//! Customer record store.

use std::sync::Arc;

use ledger_core::CustomerId;
use ledger_customers::Customer;
use ledger_events::{ChangeNotifier, ChangeSource, ModelChangedListener};

use crate::dao::CustomerDao;

/// Source of truth for customer records.
///
/// Writes run persist → re-read → notify, strictly in that order, so every
/// notification carries the fully resolved row.
pub struct CustomerStore {
    dao: Arc<dyn CustomerDao>,
    notifier: ChangeNotifier<Customer>,
}

impl CustomerStore {
    pub fn new(dao: Arc<dyn CustomerDao>) -> Self {
        Self {
            dao,
            notifier: ChangeNotifier::new(),
        }
    }

    pub async fn select_all(&self) -> Vec<Customer> {
        self.dao.select_all().await
    }

    pub async fn select_by_id(&self, id: Option<CustomerId>) -> Option<Customer> {
        match id {
            Some(id) => self.dao.select_by_id(id).await,
            None => None,
        }
    }

    pub async fn select_by_ids(&self, ids: &[CustomerId]) -> Vec<Customer> {
        self.dao.select_by_ids(ids).await
    }

    pub async fn is_exists_by_id(&self, id: Option<CustomerId>) -> bool {
        match id {
            Some(id) => self.dao.is_exists_by_id(id).await,
            None => false,
        }
    }

    pub async fn search(&self, query: &str) -> Vec<Customer> {
        self.dao.search(query).await
    }

    /// Insert and notify. Returns the new id, `None` for a zero-effect
    /// insert.
    pub async fn add(&self, customer: Customer) -> Option<CustomerId> {
        let row = self.dao.insert(&customer).await;
        let id = self.dao.id_by_row(row).await?;
        if let Some(inserted) = self.dao.select_by_id(id).await {
            self.notifier.notify_added(&[inserted]);
        }
        Some(id)
    }

    /// Update and notify. An unpersisted customer is rejected before any
    /// I/O; a zero-effect update emits no notification.
    pub async fn update(&self, customer: Customer) -> u64 {
        let Some(id) = customer.id else {
            tracing::warn!("rejecting customer update without an id");
            return 0;
        };
        let affected = self.dao.update(&customer).await;
        if affected > 0 {
            if let Some(updated) = self.dao.select_by_id(id).await {
                self.notifier.notify_updated(&[updated]);
            }
        }
        affected
    }

    /// Delete and notify with the pre-deletion row.
    pub async fn delete(&self, customer: Customer) -> u64 {
        let Some(existing) = self.select_by_id(customer.id).await else {
            return 0;
        };
        let affected = self.dao.delete(&existing).await;
        if affected > 0 {
            self.notifier.notify_deleted(&[existing]);
        }
        affected
    }
}

impl ChangeSource<Customer> for CustomerStore {
    fn subscribe(&self, listener: Arc<dyn ModelChangedListener<Customer>>) {
        self.notifier.subscribe(listener);
    }

    fn unsubscribe(&self, listener: &Arc<dyn ModelChangedListener<Customer>>) {
        self.notifier.unsubscribe(listener);
    }
}
