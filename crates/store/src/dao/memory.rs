//! In-memory persistence collaborator.
//!
//! Intended for tests/dev. Row ids are allocated monotonically per table
//! and double as the public identifiers, as with SQLite rowids.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use ledger_core::{CustomerId, ProductId, ProductOrderId, QueueId, RowId};
use ledger_customers::Customer;
use ledger_products::Product;
use ledger_queues::{ProductOrder, Queue};

use super::{CustomerDao, ProductDao, ProductOrderDao, QueueDao, RecordDao};

#[derive(Debug)]
struct Table<M> {
    rows: BTreeMap<i64, M>,
    next_row_id: i64,
}

impl<M: Clone> Table<M> {
    fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_row_id: 1,
        }
    }

    fn all(&self) -> Vec<M> {
        self.rows.values().cloned().collect()
    }

    fn get(&self, raw: i64) -> Option<M> {
        self.rows.get(&raw).cloned()
    }

    fn contains(&self, raw: i64) -> bool {
        self.rows.contains_key(&raw)
    }

    fn insert_with(&mut self, build: impl FnOnce(i64) -> M) -> i64 {
        let row_id = self.next_row_id;
        self.next_row_id += 1;
        self.rows.insert(row_id, build(row_id));
        row_id
    }

    /// Insert or replace at an explicit key, keeping row allocation ahead
    /// of it.
    fn put(&mut self, raw: i64, record: M) {
        self.rows.insert(raw, record);
        if raw >= self.next_row_id {
            self.next_row_id = raw + 1;
        }
    }

    fn replace(&mut self, raw: i64, record: M) -> u64 {
        match self.rows.get_mut(&raw) {
            Some(slot) => {
                *slot = record;
                1
            }
            None => 0,
        }
    }

    fn remove(&mut self, raw: i64) -> u64 {
        u64::from(self.rows.remove(&raw).is_some())
    }
}

/// In-memory database backing all four entity tables.
///
/// Schema behavior lives here, not in the stores: deleting a queue cascades
/// its product-order rows, and deleting a customer nulls the customer id on
/// that customer's queues.
#[derive(Debug)]
pub struct MemoryDatabase {
    customers: RwLock<Table<Customer>>,
    products: RwLock<Table<Product>>,
    product_orders: RwLock<Table<ProductOrder>>,
    queues: RwLock<Table<Queue>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for MemoryDatabase {
    fn default() -> Self {
        Self {
            customers: RwLock::new(Table::new()),
            products: RwLock::new(Table::new()),
            product_orders: RwLock::new(Table::new()),
            queues: RwLock::new(Table::new()),
        }
    }
}

/// Queue rows are stored bare: the customer snapshot and order list are
/// join products, not columns.
fn bare_queue_row(queue: &Queue) -> Queue {
    Queue {
        customer: None,
        product_orders: Vec::new(),
        ..queue.clone()
    }
}

#[async_trait]
impl RecordDao<Customer> for MemoryDatabase {
    async fn select_all(&self) -> Vec<Customer> {
        self.customers.read().map(|t| t.all()).unwrap_or_default()
    }

    async fn select_by_id(&self, id: CustomerId) -> Option<Customer> {
        self.customers.read().ok().and_then(|t| t.get(id.as_i64()))
    }

    async fn select_by_ids(&self, ids: &[CustomerId]) -> Vec<Customer> {
        let Ok(table) = self.customers.read() else {
            return Vec::new();
        };
        ids.iter().filter_map(|id| table.get(id.as_i64())).collect()
    }

    async fn is_exists_by_id(&self, id: CustomerId) -> bool {
        self.customers
            .read()
            .map(|t| t.contains(id.as_i64()))
            .unwrap_or(false)
    }

    async fn insert(&self, record: &Customer) -> RowId {
        let Ok(mut table) = self.customers.write() else {
            return RowId::new(0);
        };
        let record = record.clone();
        let row = table.insert_with(|raw| Customer {
            id: Some(CustomerId::new(raw)),
            ..record
        });
        RowId::new(row)
    }

    async fn update(&self, record: &Customer) -> u64 {
        let Some(id) = record.id else {
            return 0;
        };
        let Ok(mut table) = self.customers.write() else {
            return 0;
        };
        table.replace(id.as_i64(), record.clone())
    }

    async fn delete(&self, record: &Customer) -> u64 {
        let Some(id) = record.id else {
            return 0;
        };
        let affected = match self.customers.write() {
            Ok(mut table) => table.remove(id.as_i64()),
            Err(_) => 0,
        };
        if affected > 0 {
            // Queues referencing the deleted customer keep existing with a
            // NULL customer id.
            if let Ok(mut queues) = self.queues.write() {
                for queue in queues.rows.values_mut() {
                    if queue.customer_id == Some(id) {
                        queue.customer_id = None;
                    }
                }
            }
        }
        affected
    }

    async fn id_by_row(&self, row: RowId) -> Option<CustomerId> {
        let Ok(table) = self.customers.read() else {
            return None;
        };
        table
            .contains(row.as_i64())
            .then(|| CustomerId::new(row.as_i64()))
    }
}

#[async_trait]
impl CustomerDao for MemoryDatabase {
    async fn search(&self, query: &str) -> Vec<Customer> {
        let needle = query.to_lowercase();
        let Ok(table) = self.customers.read() else {
            return Vec::new();
        };
        table
            .rows
            .values()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RecordDao<Product> for MemoryDatabase {
    async fn select_all(&self) -> Vec<Product> {
        self.products.read().map(|t| t.all()).unwrap_or_default()
    }

    async fn select_by_id(&self, id: ProductId) -> Option<Product> {
        self.products.read().ok().and_then(|t| t.get(id.as_i64()))
    }

    async fn select_by_ids(&self, ids: &[ProductId]) -> Vec<Product> {
        let Ok(table) = self.products.read() else {
            return Vec::new();
        };
        ids.iter().filter_map(|id| table.get(id.as_i64())).collect()
    }

    async fn is_exists_by_id(&self, id: ProductId) -> bool {
        self.products
            .read()
            .map(|t| t.contains(id.as_i64()))
            .unwrap_or(false)
    }

    async fn insert(&self, record: &Product) -> RowId {
        let Ok(mut table) = self.products.write() else {
            return RowId::new(0);
        };
        let record = record.clone();
        let row = table.insert_with(|raw| Product {
            id: Some(ProductId::new(raw)),
            ..record
        });
        RowId::new(row)
    }

    async fn update(&self, record: &Product) -> u64 {
        let Some(id) = record.id else {
            return 0;
        };
        let Ok(mut table) = self.products.write() else {
            return 0;
        };
        table.replace(id.as_i64(), record.clone())
    }

    async fn delete(&self, record: &Product) -> u64 {
        let Some(id) = record.id else {
            return 0;
        };
        match self.products.write() {
            Ok(mut table) => table.remove(id.as_i64()),
            Err(_) => 0,
        }
    }

    async fn id_by_row(&self, row: RowId) -> Option<ProductId> {
        let Ok(table) = self.products.read() else {
            return None;
        };
        table
            .contains(row.as_i64())
            .then(|| ProductId::new(row.as_i64()))
    }
}

#[async_trait]
impl ProductDao for MemoryDatabase {
    async fn search(&self, query: &str) -> Vec<Product> {
        let needle = query.to_lowercase();
        let Ok(table) = self.products.read() else {
            return Vec::new();
        };
        table
            .rows
            .values()
            .filter(|p| p.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

#[async_trait]
impl RecordDao<ProductOrder> for MemoryDatabase {
    async fn select_all(&self) -> Vec<ProductOrder> {
        self.product_orders
            .read()
            .map(|t| t.all())
            .unwrap_or_default()
    }

    async fn select_by_id(&self, id: ProductOrderId) -> Option<ProductOrder> {
        self.product_orders
            .read()
            .ok()
            .and_then(|t| t.get(id.as_i64()))
    }

    async fn select_by_ids(&self, ids: &[ProductOrderId]) -> Vec<ProductOrder> {
        let Ok(table) = self.product_orders.read() else {
            return Vec::new();
        };
        ids.iter().filter_map(|id| table.get(id.as_i64())).collect()
    }

    async fn is_exists_by_id(&self, id: ProductOrderId) -> bool {
        self.product_orders
            .read()
            .map(|t| t.contains(id.as_i64()))
            .unwrap_or(false)
    }

    async fn insert(&self, record: &ProductOrder) -> RowId {
        let Ok(mut table) = self.product_orders.write() else {
            return RowId::new(0);
        };
        let record = record.clone();
        let row = table.insert_with(|raw| ProductOrder {
            id: Some(ProductOrderId::new(raw)),
            ..record
        });
        RowId::new(row)
    }

    async fn update(&self, record: &ProductOrder) -> u64 {
        let Some(id) = record.id else {
            return 0;
        };
        let Ok(mut table) = self.product_orders.write() else {
            return 0;
        };
        table.replace(id.as_i64(), record.clone())
    }

    async fn delete(&self, record: &ProductOrder) -> u64 {
        let Some(id) = record.id else {
            return 0;
        };
        match self.product_orders.write() {
            Ok(mut table) => table.remove(id.as_i64()),
            Err(_) => 0,
        }
    }

    async fn id_by_row(&self, row: RowId) -> Option<ProductOrderId> {
        let Ok(table) = self.product_orders.read() else {
            return None;
        };
        table
            .contains(row.as_i64())
            .then(|| ProductOrderId::new(row.as_i64()))
    }
}

#[async_trait]
impl ProductOrderDao for MemoryDatabase {
    async fn select_all_by_queue_id(&self, queue_id: QueueId) -> Vec<ProductOrder> {
        let Ok(table) = self.product_orders.read() else {
            return Vec::new();
        };
        table
            .rows
            .values()
            .filter(|o| o.queue_id == Some(queue_id))
            .cloned()
            .collect()
    }

    async fn upsert(&self, order: &ProductOrder) -> Option<ProductOrderId> {
        let Ok(mut table) = self.product_orders.write() else {
            return None;
        };
        match order.id {
            Some(id) => {
                table.put(id.as_i64(), order.clone());
                Some(id)
            }
            None => {
                let order = order.clone();
                let row = table.insert_with(|raw| ProductOrder {
                    id: Some(ProductOrderId::new(raw)),
                    ..order
                });
                Some(ProductOrderId::new(row))
            }
        }
    }
}

#[async_trait]
impl RecordDao<Queue> for MemoryDatabase {
    async fn select_all(&self) -> Vec<Queue> {
        self.queues.read().map(|t| t.all()).unwrap_or_default()
    }

    async fn select_by_id(&self, id: QueueId) -> Option<Queue> {
        self.queues.read().ok().and_then(|t| t.get(id.as_i64()))
    }

    async fn select_by_ids(&self, ids: &[QueueId]) -> Vec<Queue> {
        let Ok(table) = self.queues.read() else {
            return Vec::new();
        };
        ids.iter().filter_map(|id| table.get(id.as_i64())).collect()
    }

    async fn is_exists_by_id(&self, id: QueueId) -> bool {
        self.queues
            .read()
            .map(|t| t.contains(id.as_i64()))
            .unwrap_or(false)
    }

    async fn insert(&self, record: &Queue) -> RowId {
        let Ok(mut table) = self.queues.write() else {
            return RowId::new(0);
        };
        let record = bare_queue_row(record);
        let row = table.insert_with(|raw| Queue {
            id: Some(QueueId::new(raw)),
            ..record
        });
        RowId::new(row)
    }

    async fn update(&self, record: &Queue) -> u64 {
        let Some(id) = record.id else {
            return 0;
        };
        let Ok(mut table) = self.queues.write() else {
            return 0;
        };
        table.replace(id.as_i64(), bare_queue_row(record))
    }

    async fn delete(&self, record: &Queue) -> u64 {
        let Some(id) = record.id else {
            return 0;
        };
        let affected = match self.queues.write() {
            Ok(mut table) => table.remove(id.as_i64()),
            Err(_) => 0,
        };
        if affected > 0 {
            // ON DELETE CASCADE on the product-order table.
            if let Ok(mut orders) = self.product_orders.write() {
                orders.rows.retain(|_, o| o.queue_id != Some(id));
            }
        }
        affected
    }

    async fn id_by_row(&self, row: RowId) -> Option<QueueId> {
        let Ok(table) = self.queues.read() else {
            return None;
        };
        table
            .contains(row.as_i64())
            .then(|| QueueId::new(row.as_i64()))
    }
}

#[async_trait]
impl QueueDao for MemoryDatabase {
    async fn select_all_in_range(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Queue> {
        let Ok(table) = self.queues.read() else {
            return Vec::new();
        };
        table
            .rows
            .values()
            .filter(|q| q.date >= start && q.date <= end)
            .cloned()
            .collect()
    }
}
