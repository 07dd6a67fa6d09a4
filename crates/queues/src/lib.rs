//! `ledger-queues` — queues (orders) and their product-order lines.

pub mod product_order;
pub mod queue;

pub use product_order::ProductOrder;
pub use queue::{PaymentMethod, Queue, QueueStatus};
