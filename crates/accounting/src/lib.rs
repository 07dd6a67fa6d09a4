//! `ledger-accounting` — payment accounting rules.

pub mod payment;

pub use payment::{
    balance_on_made_payment, balance_on_reverted_payment, balance_on_updated_payment,
    debt_on_made_payment, debt_on_reverted_payment, debt_on_updated_payment,
    is_balance_sufficient,
};
