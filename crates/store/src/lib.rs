//! `ledger-store` — record stores and the queue write orchestrator.
//!
//! Each store wraps the persistence collaborator for one entity type,
//! exposes CRUD-style operations, and fans out change notifications for
//! its type. Write chains run strictly sequentially (persist → dependent
//! entities → re-read → notify); distinct top-level operations are not
//! synchronized against each other, and callers serialize concurrent
//! writes to the same rows if races must be prevented.
//!
//! Stores are constructed once at process start and passed around
//! explicitly; [`LedgerStores::bootstrap`] wires the full set over a
//! shared in-memory database.

pub mod dao;

mod customer;
mod product;
mod product_order;
mod queue;

pub use customer::CustomerStore;
pub use product::ProductStore;
pub use product_order::ProductOrderStore;
pub use queue::QueueStore;

use std::sync::Arc;

use crate::dao::MemoryDatabase;

/// One record store per entity type, wired over a shared database handle.
pub struct LedgerStores {
    pub customers: Arc<CustomerStore>,
    pub products: Arc<ProductStore>,
    pub product_orders: Arc<ProductOrderStore>,
    pub queues: Arc<QueueStore>,
}

impl LedgerStores {
    /// Construct the process-wide store set over one in-memory database.
    pub fn bootstrap(db: Arc<MemoryDatabase>) -> Self {
        let customers = Arc::new(CustomerStore::new(db.clone()));
        let products = Arc::new(ProductStore::new(db.clone()));
        let product_orders = Arc::new(ProductOrderStore::new(db.clone()));
        let queues = Arc::new(QueueStore::new(
            db,
            customers.clone(),
            product_orders.clone(),
        ));
        Self {
            customers,
            products,
            product_orders,
            queues,
        }
    }
}
