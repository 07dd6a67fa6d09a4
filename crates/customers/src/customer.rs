use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use ledger_core::{CustomerId, Record};

/// A customer account.
///
/// `balance` is prepaid credit in whole currency units and may go negative.
/// `debt` is a signed decimal; a negative value is money owed by the
/// customer. Both fields change only through the payment accounting rules
/// or direct edits; they are never synthesized from queues except by
/// explicit recomputation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: Option<CustomerId>,
    pub name: String,
    pub balance: i64,
    pub debt: Decimal,
}

impl Customer {
    /// A not-yet-persisted customer with a zeroed account.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            balance: 0,
            debt: Decimal::ZERO,
        }
    }
}

impl Record for Customer {
    type Id = CustomerId;

    fn id(&self) -> Option<CustomerId> {
        self.id
    }
}
