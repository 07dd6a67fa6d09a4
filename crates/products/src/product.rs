use serde::{Deserialize, Serialize};

use ledger_core::{ProductId, Record};

/// A sellable product. Read-only with respect to queue accounting; product
/// orders take a snapshot of its name and price rather than referencing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: Option<ProductId>,
    pub name: String,
    /// Price in whole currency units.
    pub price: i64,
}

impl Product {
    pub fn new(name: impl Into<String>, price: i64) -> Self {
        Self {
            id: None,
            name: name.into(),
            price,
        }
    }
}

impl Record for Product {
    type Id = ProductId;

    fn id(&self) -> Option<ProductId> {
        self.id
    }
}
