//! Queue record store: the multi-entity write orchestrator.
//!
//! A queue write must leave the queue row, its product-order rows, and the
//! affected customer's balance/debt mutually consistent. Dependent-entity
//! writes always complete before the root queue write completes and before
//! the queue notification fires, so an observer reacting to a notification
//! only ever sees a fully resolved joined snapshot, never a queue
//! referencing stale orders or a customer whose account hasn't caught up.
//!
//! Any step that reports zero affected rows short-circuits the remainder of
//! the chain and returns a zero/empty result; no notification is published
//! for a failed write. Already-completed dependent writes are not rolled
//! back.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use ledger_accounting::{
    balance_on_made_payment, balance_on_reverted_payment, balance_on_updated_payment,
    debt_on_reverted_payment, debt_on_updated_payment,
};
use ledger_core::QueueId;
use ledger_customers::Customer;
use ledger_events::{ChangeNotifier, ChangeSource, ModelChangedListener};
use ledger_queues::{ProductOrder, Queue};

use crate::dao::QueueDao;
use crate::{CustomerStore, ProductOrderStore};

/// Source of truth for queue records.
pub struct QueueStore {
    dao: Arc<dyn QueueDao>,
    customers: Arc<CustomerStore>,
    product_orders: Arc<ProductOrderStore>,
    notifier: ChangeNotifier<Queue>,
}

impl QueueStore {
    pub fn new(
        dao: Arc<dyn QueueDao>,
        customers: Arc<CustomerStore>,
        product_orders: Arc<ProductOrderStore>,
    ) -> Self {
        Self {
            dao,
            customers,
            product_orders,
            notifier: ChangeNotifier::new(),
        }
    }

    /// Attach the customer snapshot and the current product orders to a
    /// bare queue row, yielding a consistent joined value.
    async fn map_fields(&self, queue: Queue) -> Queue {
        let customer = self.customers.select_by_id(queue.customer_id).await;
        let product_orders = self.product_orders.select_all_by_queue_id(queue.id).await;
        Queue {
            customer,
            product_orders,
            ..queue
        }
    }

    pub async fn select_all(&self) -> Vec<Queue> {
        let mut joined = Vec::new();
        for queue in self.dao.select_all().await {
            joined.push(self.map_fields(queue).await);
        }
        joined
    }

    pub async fn select_by_id(&self, id: Option<QueueId>) -> Option<Queue> {
        let queue = self.dao.select_by_id(id?).await?;
        Some(self.map_fields(queue).await)
    }

    pub async fn select_by_ids(&self, ids: &[QueueId]) -> Vec<Queue> {
        let mut joined = Vec::new();
        for queue in self.dao.select_by_ids(ids).await {
            joined.push(self.map_fields(queue).await);
        }
        joined
    }

    pub async fn is_exists_by_id(&self, id: Option<QueueId>) -> bool {
        match id {
            Some(id) => self.dao.is_exists_by_id(id).await,
            None => false,
        }
    }

    pub async fn select_all_in_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Vec<Queue> {
        let mut joined = Vec::new();
        for queue in self.dao.select_all_in_range(start, end).await {
            joined.push(self.map_fields(queue).await);
        }
        joined
    }

    /// Normalize incoming lines for a persisted queue: attach the queue id
    /// (they may be newly created) and re-derive each total instead of
    /// trusting the caller's value.
    fn attached_orders(queue_id: QueueId, orders: &[ProductOrder]) -> Vec<ProductOrder> {
        orders
            .iter()
            .map(|order| {
                ProductOrder {
                    queue_id: Some(queue_id),
                    ..order.clone()
                }
                .recomputed()
            })
            .collect()
    }

    fn has_invalid_orders(queue: &Queue) -> bool {
        queue
            .product_orders
            .iter()
            .any(|order| order.validate().is_err())
    }

    /// Create a queue: persist the row, persist its lines under the new
    /// id, make the customer pay it, then publish one "added" notification
    /// with the fully joined value. Returns the new id.
    pub async fn add(&self, queue: Queue) -> Option<QueueId> {
        if Self::has_invalid_orders(&queue) {
            tracing::warn!("rejecting queue insert with invalid product orders");
            return None;
        }

        let row = self.dao.insert(&queue).await;
        let id = self.dao.id_by_row(row).await?;

        let orders = Self::attached_orders(id, &queue.product_orders);
        self.product_orders.add_many(orders).await;

        // First joined read: the queue mapped with its inserted orders.
        let inserted = self.select_by_id(Some(id)).await?;

        if let Some(customer) = self.customers.select_by_id(inserted.customer_id).await {
            // Make the customer pay the already inserted queue. Only the
            // balance moves on insert; debt is reconciled through the same
            // rules on later updates.
            let paid = Customer {
                balance: balance_on_made_payment(&customer, &inserted),
                ..customer
            };
            self.customers.update(paid).await;
        }

        // Second joined read: the notification must carry the updated
        // customer snapshot.
        let joined = self.select_by_id(Some(id)).await?;
        tracing::debug!(queue = id.as_i64(), "queue added");
        self.notifier.notify_added(&[joined]);
        Some(id)
    }

    /// Update a queue: reconcile its lines by identifier, reconcile the
    /// old/new customer accounts, persist the row, then publish one
    /// "updated" notification. Affected-row count.
    pub async fn update(&self, queue: Queue) -> u64 {
        if Self::has_invalid_orders(&queue) {
            tracing::warn!("rejecting queue update with invalid product orders");
            return 0;
        }
        let Some(old) = self.select_by_id(queue.id).await else {
            return 0;
        };
        let Some(id) = old.id else {
            return 0;
        };

        // Reconcile lines purely by identifier: incoming rows are
        // upserted, old rows missing from the incoming set are deleted.
        let incoming = Self::attached_orders(id, &queue.product_orders);
        let removed: Vec<ProductOrder> = old
            .product_orders
            .iter()
            .filter(|order| !incoming.iter().any(|kept| kept.id == order.id))
            .cloned()
            .collect();
        let updated = Queue {
            product_orders: incoming.clone(),
            ..queue
        };

        self.product_orders.upsert_many(incoming).await;
        self.product_orders.delete_many(removed).await;

        self.reconcile_customers(&old, &updated).await;

        let affected = self.dao.update(&updated).await;
        if affected > 0 {
            if let Some(joined) = self.select_by_id(Some(id)).await {
                tracing::debug!(queue = id.as_i64(), "queue updated");
                self.notifier.notify_updated(&[joined]);
            }
        }
        affected
    }

    /// Revert the old customer independently of charging the new one; the
    /// two collapse to a single delta when the customer is unchanged.
    async fn reconcile_customers(&self, old: &Queue, updated: &Queue) {
        let old_customer = self.customers.select_by_id(old.customer_id).await;
        let new_customer = self.customers.select_by_id(updated.customer_id).await;

        if let Some(old_customer) = &old_customer {
            let is_replaced = match &new_customer {
                Some(new_customer) => new_customer.id != old_customer.id,
                None => true,
            };
            if old_customer.id.is_some() && is_replaced {
                // Revert the old customer when a different customer (or
                // none) is selected.
                let reverted = Customer {
                    balance: balance_on_reverted_payment(old_customer, old),
                    debt: debt_on_reverted_payment(old_customer, old),
                    ..old_customer.clone()
                };
                self.customers.update(reverted).await;
            }
        }

        if let Some(new_customer) = new_customer {
            let paid = Customer {
                balance: balance_on_updated_payment(&new_customer, Some(old), updated),
                debt: debt_on_updated_payment(&new_customer, Some(old), updated),
                ..new_customer
            };
            self.customers.update(paid).await;
        }
    }

    /// Delete a queue: remove the row (product orders cascade at the
    /// schema level), revert the customer's balance/debt, then publish one
    /// "deleted" notification carrying the pre-deletion joined value.
    pub async fn delete(&self, queue: Queue) -> u64 {
        let Some(old) = self.select_by_id(queue.id).await else {
            return 0;
        };
        let affected = self.dao.delete(&old).await;
        if affected == 0 {
            return 0;
        }

        if let Some(customer) = self.customers.select_by_id(old.customer_id).await {
            // Revert the customer's account.
            let reverted = Customer {
                balance: balance_on_reverted_payment(&customer, &old),
                debt: debt_on_reverted_payment(&customer, &old),
                ..customer
            };
            self.customers.update(reverted).await;
        }

        tracing::debug!(queue = ?old.id, "queue deleted");
        self.notifier.notify_deleted(&[old]);
        affected
    }
}

impl ChangeSource<Queue> for QueueStore {
    fn subscribe(&self, listener: Arc<dyn ModelChangedListener<Queue>>) {
        self.notifier.subscribe(listener);
    }

    fn unsubscribe(&self, listener: &Arc<dyn ModelChangedListener<Queue>>) {
        self.notifier.unsubscribe(listener);
    }
}
