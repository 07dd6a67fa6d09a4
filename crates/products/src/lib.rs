//! `ledger-products` — the product entity.

pub mod product;

pub use product::Product;
