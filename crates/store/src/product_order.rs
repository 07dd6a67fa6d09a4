//! Product-order record store.
//!
//! Product orders are created as part of a queue write and deleted with
//! their owning queue; the queue orchestrator drives the batch operations
//! here, and each batch publishes one notification carrying every affected
//! row.

use std::sync::Arc;

use ledger_core::{ProductOrderId, QueueId};
use ledger_events::{ChangeNotifier, ChangeSource, ModelChangedListener};
use ledger_queues::ProductOrder;

use crate::dao::ProductOrderDao;

/// Source of truth for product-order records.
pub struct ProductOrderStore {
    dao: Arc<dyn ProductOrderDao>,
    notifier: ChangeNotifier<ProductOrder>,
}

impl ProductOrderStore {
    pub fn new(dao: Arc<dyn ProductOrderDao>) -> Self {
        Self {
            dao,
            notifier: ChangeNotifier::new(),
        }
    }

    pub async fn select_all(&self) -> Vec<ProductOrder> {
        self.dao.select_all().await
    }

    pub async fn select_by_id(&self, id: Option<ProductOrderId>) -> Option<ProductOrder> {
        match id {
            Some(id) => self.dao.select_by_id(id).await,
            None => None,
        }
    }

    pub async fn select_by_ids(&self, ids: &[ProductOrderId]) -> Vec<ProductOrder> {
        self.dao.select_by_ids(ids).await
    }

    pub async fn is_exists_by_id(&self, id: Option<ProductOrderId>) -> bool {
        match id {
            Some(id) => self.dao.is_exists_by_id(id).await,
            None => false,
        }
    }

    pub async fn select_all_by_queue_id(&self, queue_id: Option<QueueId>) -> Vec<ProductOrder> {
        match queue_id {
            Some(queue_id) => self.dao.select_all_by_queue_id(queue_id).await,
            None => Vec::new(),
        }
    }

    /// Insert one row and notify. Invalid lines are rejected before any
    /// I/O.
    pub async fn add(&self, order: ProductOrder) -> Option<ProductOrderId> {
        if let Err(reason) = order.validate() {
            tracing::warn!(%reason, "rejecting product-order insert");
            return None;
        }
        let row = self.dao.insert(&order).await;
        let id = self.dao.id_by_row(row).await?;
        if let Some(inserted) = self.dao.select_by_id(id).await {
            self.notifier.notify_added(&[inserted]);
        }
        Some(id)
    }

    /// Insert a batch and publish one "added" notification carrying every
    /// inserted row. Returns the new ids.
    pub async fn add_many(&self, orders: Vec<ProductOrder>) -> Vec<ProductOrderId> {
        if orders.iter().any(|o| o.validate().is_err()) {
            tracing::warn!("rejecting product-order batch insert with invalid lines");
            return Vec::new();
        }
        let mut ids = Vec::with_capacity(orders.len());
        for order in &orders {
            let row = self.dao.insert(order).await;
            if let Some(id) = self.dao.id_by_row(row).await {
                ids.push(id);
            }
        }
        let inserted = self.dao.select_by_ids(&ids).await;
        if !inserted.is_empty() {
            self.notifier.notify_added(&inserted);
        }
        ids
    }

    pub async fn update(&self, order: ProductOrder) -> u64 {
        let Some(id) = order.id else {
            tracing::warn!("rejecting product-order update without an id");
            return 0;
        };
        if let Err(reason) = order.validate() {
            tracing::warn!(%reason, "rejecting product-order update");
            return 0;
        }
        let affected = self.dao.update(&order).await;
        if affected > 0 {
            if let Some(updated) = self.dao.select_by_id(id).await {
                self.notifier.notify_updated(&[updated]);
            }
        }
        affected
    }

    /// Insert-or-replace a batch, keyed purely by identifier, and publish
    /// one "upserted" notification with the resulting rows.
    pub async fn upsert_many(&self, orders: Vec<ProductOrder>) -> Vec<ProductOrderId> {
        if orders.iter().any(|o| o.validate().is_err()) {
            tracing::warn!("rejecting product-order upsert with invalid lines");
            return Vec::new();
        }
        let mut ids = Vec::with_capacity(orders.len());
        for order in &orders {
            if let Some(id) = self.dao.upsert(order).await {
                ids.push(id);
            }
        }
        let upserted = self.dao.select_by_ids(&ids).await;
        if !upserted.is_empty() {
            self.notifier.notify_upserted(&upserted);
        }
        ids
    }

    pub async fn delete(&self, order: ProductOrder) -> u64 {
        let Some(existing) = self.select_by_id(order.id).await else {
            return 0;
        };
        let affected = self.dao.delete(&existing).await;
        if affected > 0 {
            self.notifier.notify_deleted(&[existing]);
        }
        affected
    }

    /// Delete a batch and publish one "deleted" notification with the
    /// pre-deletion rows. Returns the affected count.
    pub async fn delete_many(&self, orders: Vec<ProductOrder>) -> u64 {
        let mut deleted = Vec::new();
        let mut affected = 0;
        for order in &orders {
            let Some(existing) = self.select_by_id(order.id).await else {
                continue;
            };
            affected += self.dao.delete(&existing).await;
            deleted.push(existing);
        }
        if !deleted.is_empty() {
            self.notifier.notify_deleted(&deleted);
        }
        affected
    }
}

impl ChangeSource<ProductOrder> for ProductOrderStore {
    fn subscribe(&self, listener: Arc<dyn ModelChangedListener<ProductOrder>>) {
        self.notifier.subscribe(listener);
    }

    fn unsubscribe(&self, listener: &Arc<dyn ModelChangedListener<ProductOrder>>) {
        self.notifier.unsubscribe(listener);
    }
}
