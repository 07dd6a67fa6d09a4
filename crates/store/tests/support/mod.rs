#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use chrono::Utc;
use rust_decimal::Decimal;

use ledger_core::CustomerId;
use ledger_customers::Customer;
use ledger_events::ModelChangedListener;
use ledger_products::Product;
use ledger_queues::{PaymentMethod, ProductOrder, Queue, QueueStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    Added,
    Updated,
    Deleted,
    Upserted,
}

/// Test listener that records every notification it receives.
pub struct Recorder<M> {
    seen: Mutex<Vec<(Change, Vec<M>)>>,
}

impl<M: Clone> Recorder<M> {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
        })
    }

    pub fn take(&self) -> Vec<(Change, Vec<M>)> {
        std::mem::take(&mut *self.seen.lock().unwrap())
    }

    fn push(&self, change: Change, models: &[M]) {
        self.seen.lock().unwrap().push((change, models.to_vec()));
    }
}

impl<M: Clone + Send + Sync> ModelChangedListener<M> for Recorder<M> {
    fn on_model_added(&self, models: &[M]) {
        self.push(Change::Added, models);
    }

    fn on_model_updated(&self, models: &[M]) {
        self.push(Change::Updated, models);
    }

    fn on_model_deleted(&self, models: &[M]) {
        self.push(Change::Deleted, models);
    }

    fn on_model_upserted(&self, models: &[M]) {
        self.push(Change::Upserted, models);
    }
}

pub fn customer(name: &str, balance: i64) -> Customer {
    Customer {
        id: None,
        name: name.into(),
        balance,
        debt: Decimal::ZERO,
    }
}

pub fn product(name: &str, price: i64) -> Product {
    Product {
        id: None,
        name: name.into(),
        price,
    }
}

pub fn order(product_name: &str, price: i64, quantity: Decimal) -> ProductOrder {
    ProductOrder {
        id: None,
        queue_id: None,
        product_id: None,
        product_name: product_name.into(),
        product_price: price,
        quantity,
        discount_percent: Decimal::ZERO,
        total_price: ProductOrder::total_price_of(price, quantity, Decimal::ZERO),
    }
}

pub fn queue(
    customer_id: Option<CustomerId>,
    status: QueueStatus,
    payment_method: PaymentMethod,
    product_orders: Vec<ProductOrder>,
) -> Queue {
    Queue {
        id: None,
        customer_id,
        customer: None,
        date: Utc::now(),
        status,
        payment_method,
        product_orders,
    }
}
