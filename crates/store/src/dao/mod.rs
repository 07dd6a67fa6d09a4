//! Persistence collaborator contracts.
//!
//! The ledger core consumes storage through these narrow traits: select by
//! identifier, insert returning a raw row handle, and update/delete
//! reporting affected-row counts. Engine internals (schema, indices,
//! migrations) stay behind the implementation. The schema-level behavior
//! the stores rely on (queue deletion cascading its product orders,
//! customer deletion nulling the queue's customer id) is owned by the
//! collaborator and not re-implemented above it.

mod memory;

pub use memory::MemoryDatabase;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use ledger_core::{ProductOrderId, QueueId, Record, RowId};
use ledger_customers::Customer;
use ledger_products::Product;
use ledger_queues::{ProductOrder, Queue};

/// CRUD-by-identifier surface shared by every entity table.
#[async_trait]
pub trait RecordDao<M>: Send + Sync
where
    M: Record + Clone + Send + Sync + 'static,
{
    async fn select_all(&self) -> Vec<M>;

    async fn select_by_id(&self, id: M::Id) -> Option<M>;

    /// Rows for the given ids, in input order; missing ids are skipped.
    async fn select_by_ids(&self, ids: &[M::Id]) -> Vec<M>;

    async fn is_exists_by_id(&self, id: M::Id) -> bool;

    /// Insert a row and return its raw row handle.
    async fn insert(&self, record: &M) -> RowId;

    /// Replace the row keyed by the record's id. Affected-row count.
    async fn update(&self, record: &M) -> u64;

    /// Delete the row keyed by the record's id. Affected-row count.
    async fn delete(&self, record: &M) -> u64;

    /// Translate a raw insert row handle back to the public identifier.
    async fn id_by_row(&self, row: RowId) -> Option<M::Id>;
}

#[async_trait]
pub trait CustomerDao: RecordDao<Customer> {
    /// Case-insensitive name search.
    async fn search(&self, query: &str) -> Vec<Customer>;
}

#[async_trait]
pub trait ProductDao: RecordDao<Product> {
    /// Case-insensitive name search.
    async fn search(&self, query: &str) -> Vec<Product>;
}

#[async_trait]
pub trait ProductOrderDao: RecordDao<ProductOrder> {
    async fn select_all_by_queue_id(&self, queue_id: QueueId) -> Vec<ProductOrder>;

    /// Insert-if-absent-else-update, keyed purely by identifier. Returns
    /// the resulting row's id.
    async fn upsert(&self, order: &ProductOrder) -> Option<ProductOrderId>;
}

#[async_trait]
pub trait QueueDao: RecordDao<Queue> {
    /// Bare queue rows dated within `[start, end]`.
    async fn select_all_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Queue>;
}
