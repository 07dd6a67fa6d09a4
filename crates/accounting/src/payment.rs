//! Payment accounting rules.
//!
//! Pure functions over a customer and one or two queue states: no I/O, no
//! mutation of external state. Each rule returns the customer's would-be
//! balance or debt; persisting the result is the caller's concern.
//!
//! Every rule is a no-op whenever the queue's customer id does not match
//! the customer under evaluation (an unpersisted customer never matches).
//! The "updated" variants are composed from the reverted/made paths, so a
//! no-change update is exactly a no-op and both sides share one rounding
//! behavior.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use ledger_customers::Customer;
use ledger_queues::{PaymentMethod, Queue, QueueStatus};

fn is_own_queue(customer: &Customer, queue: &Queue) -> bool {
    customer.id.is_some() && queue.customer_id == customer.id
}

fn is_balance_charged(queue: &Queue) -> bool {
    queue.status == QueueStatus::Completed && queue.payment_method == PaymentMethod::AccountBalance
}

/// Whole-unit charge of a queue, truncated toward zero.
fn charged_total(queue: &Queue) -> i64 {
    queue.grand_total_price().trunc().to_i64().unwrap_or(0)
}

/// Balance after the customer pays `queue`.
///
/// Deducts the grand total only for a completed queue paid from the account
/// balance; any other combination leaves the balance untouched. The balance
/// may go negative: sufficiency is an input-time gate
/// ([`is_balance_sufficient`]), not part of the rule.
pub fn balance_on_made_payment(customer: &Customer, queue: &Queue) -> i64 {
    if is_own_queue(customer, queue) && is_balance_charged(queue) {
        customer.balance - charged_total(queue)
    } else {
        customer.balance
    }
}

/// Exact inverse of [`balance_on_made_payment`].
pub fn balance_on_reverted_payment(customer: &Customer, queue: &Queue) -> i64 {
    if is_own_queue(customer, queue) && is_balance_charged(queue) {
        customer.balance + charged_total(queue)
    } else {
        customer.balance
    }
}

/// Balance after replacing `old` with `new`.
///
/// Reverts the old queue's effect, then applies the new queue's effect,
/// each side gated on its own queue's customer id. A missing `old` (or an
/// old queue owned by nobody or by someone else) contributes zero revert
/// effect.
pub fn balance_on_updated_payment(customer: &Customer, old: Option<&Queue>, new: &Queue) -> i64 {
    let reverted = match old {
        Some(old) => balance_on_reverted_payment(customer, old),
        None => customer.balance,
    };
    let hypothetical = Customer {
        balance: reverted,
        ..customer.clone()
    };
    balance_on_made_payment(&hypothetical, new)
}

/// Input-validation gate: would the balance stay non-negative if `old` were
/// reverted and `new` applied? Never mutates anything; with `old == None`
/// only the new queue's effect is checked.
pub fn is_balance_sufficient(customer: &Customer, old: Option<&Queue>, new: &Queue) -> bool {
    balance_on_updated_payment(customer, old, new) >= 0
}

/// Debt after the customer's account reflects `queue`.
///
/// An unpaid queue moves the debt by the negated grand total (the customer
/// owes that much more). Payment method is irrelevant to debt.
pub fn debt_on_made_payment(customer: &Customer, queue: &Queue) -> Decimal {
    if is_own_queue(customer, queue) && queue.status == QueueStatus::Unpaid {
        customer.debt - queue.grand_total_price()
    } else {
        customer.debt
    }
}

/// Exact inverse of [`debt_on_made_payment`].
pub fn debt_on_reverted_payment(customer: &Customer, queue: &Queue) -> Decimal {
    if is_own_queue(customer, queue) && queue.status == QueueStatus::Unpaid {
        customer.debt + queue.grand_total_price()
    } else {
        customer.debt
    }
}

/// Debt after replacing `old` with `new`; same composition as
/// [`balance_on_updated_payment`].
pub fn debt_on_updated_payment(customer: &Customer, old: Option<&Queue>, new: &Queue) -> Decimal {
    let reverted = match old {
        Some(old) => debt_on_reverted_payment(customer, old),
        None => customer.debt,
    };
    let hypothetical = Customer {
        debt: reverted,
        ..customer.clone()
    };
    debt_on_made_payment(&hypothetical, new)
}
