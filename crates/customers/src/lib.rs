//! `ledger-customers` — the customer entity.

pub mod customer;

pub use customer::Customer;
