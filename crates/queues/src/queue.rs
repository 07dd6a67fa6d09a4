use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledger_core::{CustomerId, QueueId, Record};
use ledger_customers::Customer;

use crate::product_order::ProductOrder;

/// Queue lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QueueStatus {
    InQueue,
    InProcess,
    Unpaid,
    Completed,
}

/// How a queue is (to be) paid.
///
/// Paying from the account balance is only offered when the customer's
/// balance would stay non-negative; callers gate on
/// `is_balance_sufficient` before accepting the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaymentMethod {
    Cash,
    AccountBalance,
}

/// A customer order composed of product-order lines.
///
/// `customer` is a point-in-time snapshot attached on joined reads; it must
/// be refreshed by re-reading, never treated as a live reference. A queue
/// with no customer (`customer_id == None`) is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Queue {
    pub id: Option<QueueId>,
    pub customer_id: Option<CustomerId>,
    pub customer: Option<Customer>,
    pub date: DateTime<Utc>,
    pub status: QueueStatus,
    pub payment_method: PaymentMethod,
    pub product_orders: Vec<ProductOrder>,
}

impl Queue {
    /// Sum of the current product orders' total prices.
    ///
    /// Always derived from the current lines, never cached, so it cannot go
    /// stale across product-order mutations.
    pub fn grand_total_price(&self) -> Decimal {
        self.product_orders
            .iter()
            .map(|order| order.total_price)
            .sum()
    }

    /// Sum of the per-line discount amounts.
    pub fn total_discount(&self) -> Decimal {
        self.product_orders
            .iter()
            .map(|order| order.discount_amount())
            .sum()
    }
}

impl Record for Queue {
    type Id = QueueId;

    fn id(&self) -> Option<QueueId> {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_products::Product;
    use rust_decimal_macros::dec;

    fn queue_with(orders: Vec<ProductOrder>) -> Queue {
        Queue {
            id: None,
            customer_id: None,
            customer: None,
            date: Utc::now(),
            status: QueueStatus::InQueue,
            payment_method: PaymentMethod::Cash,
            product_orders: orders,
        }
    }

    #[test]
    fn grand_total_sums_line_totals() {
        let apple = Product {
            id: None,
            name: "Apple".into(),
            price: 1000,
        };
        let orange = Product {
            id: None,
            name: "Orange".into(),
            price: 250,
        };
        let queue = queue_with(vec![
            ProductOrder::from_product(&apple, dec!(2), dec!(0)),
            ProductOrder::from_product(&orange, dec!(4), dec!(50)),
        ]);

        assert_eq!(queue.grand_total_price(), dec!(2500.00));
        assert_eq!(queue.total_discount(), dec!(500.00));
    }

    #[test]
    fn empty_queue_totals_are_zero() {
        let queue = queue_with(Vec::new());

        assert_eq!(queue.grand_total_price(), Decimal::ZERO);
        assert_eq!(queue.total_discount(), Decimal::ZERO);
    }

    #[test]
    fn statuses_use_kebab_case_wire_names() {
        assert_eq!(
            serde_json::to_string(&QueueStatus::InQueue).unwrap(),
            "\"in-queue\""
        );
        assert_eq!(
            serde_json::to_string(&PaymentMethod::AccountBalance).unwrap(),
            "\"account-balance\""
        );
    }
}
