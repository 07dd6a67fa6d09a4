use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use ledger_core::{DomainError, DomainResult, ProductId, ProductOrderId, QueueId, Record};
use ledger_products::Product;

/// One line item of a queue.
///
/// `product_name` and `product_price` are point-in-time snapshots taken
/// when the order was made; they are not refreshed when the product
/// changes. `queue_id` stays `None` until the owning queue is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOrder {
    pub id: Option<ProductOrderId>,
    pub queue_id: Option<QueueId>,
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub product_price: i64,
    pub quantity: Decimal,
    pub discount_percent: Decimal,
    /// Derived from (price, quantity, discount); must stay consistent with
    /// them, so writers recompute instead of trusting a stale value.
    pub total_price: Decimal,
}

impl ProductOrder {
    /// Build a line from a product snapshot, with the total derived.
    pub fn from_product(product: &Product, quantity: Decimal, discount_percent: Decimal) -> Self {
        Self {
            id: None,
            queue_id: None,
            product_id: product.id,
            product_name: product.name.clone(),
            product_price: product.price,
            quantity,
            discount_percent,
            total_price: Self::total_price_of(product.price, quantity, discount_percent),
        }
    }

    /// price × quantity × (1 − discount/100), rounded to two decimal
    /// places, midpoint away from zero.
    pub fn total_price_of(product_price: i64, quantity: Decimal, discount_percent: Decimal) -> Decimal {
        let gross = Decimal::from(product_price) * quantity;
        let kept = (Decimal::ONE_HUNDRED - discount_percent) / Decimal::ONE_HUNDRED;
        (gross * kept).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Absolute discount on this line, under the same rounding policy as
    /// [`ProductOrder::total_price_of`].
    pub fn discount_amount(&self) -> Decimal {
        let gross = Decimal::from(self.product_price) * self.quantity;
        (gross * self.discount_percent / Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Copy with `total_price` re-derived from (price, quantity, discount).
    pub fn recomputed(mut self) -> Self {
        self.total_price =
            Self::total_price_of(self.product_price, self.quantity, self.discount_percent);
        self
    }

    /// Boundary validation: quantity must not be negative and the discount
    /// percent must lie within 0..=100.
    pub fn validate(&self) -> DomainResult<()> {
        if self.quantity.is_sign_negative() {
            return Err(DomainError::validation("quantity must not be negative"));
        }
        if self.discount_percent.is_sign_negative() || self.discount_percent > Decimal::ONE_HUNDRED
        {
            return Err(DomainError::validation(
                "discount percent must be within 0..=100",
            ));
        }
        Ok(())
    }
}

impl Record for ProductOrder {
    type Id = ProductOrderId;

    fn id(&self) -> Option<ProductOrderId> {
        self.id
    }
}
