//! Simple record-store behavior: CRUD surface, search, notification
//! fan-out, and schema-level side effects.

mod support;

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal_macros::dec;

use ledger_core::CustomerId;
use ledger_customers::Customer;
use ledger_events::{ChangeSource, ModelChangedListener};
use ledger_queues::{PaymentMethod, QueueStatus};
use ledger_store::dao::MemoryDatabase;
use ledger_store::LedgerStores;

use support::{customer, order, product, queue, Change, Recorder};

fn stores() -> LedgerStores {
    LedgerStores::bootstrap(Arc::new(MemoryDatabase::new()))
}

#[tokio::test]
async fn adding_a_customer_assigns_an_id_and_notifies_with_the_row() {
    let stores = stores();
    let recorder = Recorder::new();
    stores.customers.subscribe(recorder.clone());

    let id = stores.customers.add(customer("Amy", 500)).await.unwrap();

    let events = recorder.take();
    assert_eq!(events.len(), 1);
    let (change, payload) = &events[0];
    assert_eq!(*change, Change::Added);
    assert_eq!(payload[0].id, Some(id));
    assert_eq!(payload[0].name, "Amy");
}

#[tokio::test]
async fn updating_a_customer_notifies_and_persists() {
    let stores = stores();
    let id = stores.customers.add(customer("Amy", 500)).await.unwrap();

    let recorder = Recorder::new();
    stores.customers.subscribe(recorder.clone());

    let renamed = Customer {
        id: Some(id),
        ..customer("Amy R", 700)
    };
    assert_eq!(stores.customers.update(renamed).await, 1);

    let stored = stores.customers.select_by_id(Some(id)).await.unwrap();
    assert_eq!(stored.name, "Amy R");
    assert_eq!(stored.balance, 700);

    let events = recorder.take();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, Change::Updated);
}

#[tokio::test]
async fn unpersisted_or_missing_customers_are_zero_effect_writes() {
    let stores = stores();
    let recorder = Recorder::new();
    stores.customers.subscribe(recorder.clone());

    assert_eq!(stores.customers.update(customer("Ghost", 0)).await, 0);
    assert_eq!(stores.customers.delete(customer("Ghost", 0)).await, 0);

    let missing = Customer {
        id: Some(CustomerId::new(404)),
        ..customer("Ghost", 0)
    };
    assert_eq!(stores.customers.update(missing.clone()).await, 0);
    assert_eq!(stores.customers.delete(missing).await, 0);

    assert!(recorder.take().is_empty());
}

#[tokio::test]
async fn deleting_a_customer_notifies_with_the_pre_deletion_row() {
    let stores = stores();
    let id = stores.customers.add(customer("Amy", 500)).await.unwrap();

    let recorder = Recorder::new();
    stores.customers.subscribe(recorder.clone());

    let stored = stores.customers.select_by_id(Some(id)).await.unwrap();
    assert_eq!(stores.customers.delete(stored).await, 1);
    assert_eq!(stores.customers.select_by_id(Some(id)).await, None);

    let events = recorder.take();
    assert_eq!(events.len(), 1);
    let (change, payload) = &events[0];
    assert_eq!(*change, Change::Deleted);
    assert_eq!(payload[0].id, Some(id));
    assert_eq!(payload[0].balance, 500);
}

#[tokio::test]
async fn deleting_a_customer_detaches_their_queues() {
    let stores = stores();
    let amy = stores.customers.add(customer("Amy", 500)).await.unwrap();
    let id = stores
        .queues
        .add(queue(
            Some(amy),
            QueueStatus::InQueue,
            PaymentMethod::Cash,
            vec![order("Apple", 100, dec!(1))],
        ))
        .await
        .unwrap();

    let stored = stores.customers.select_by_id(Some(amy)).await.unwrap();
    assert_eq!(stores.customers.delete(stored).await, 1);

    // The queue survives with no customer attached.
    let joined = stores.queues.select_by_id(Some(id)).await.unwrap();
    assert_eq!(joined.customer_id, None);
    assert!(joined.customer.is_none());
}

#[tokio::test]
async fn search_matches_names_case_insensitively() {
    let stores = stores();
    stores.customers.add(customer("Amy", 0)).await.unwrap();
    stores.customers.add(customer("amir", 0)).await.unwrap();
    stores.customers.add(customer("Ben", 0)).await.unwrap();

    let hits = stores.customers.search("AM").await;
    assert_eq!(hits.len(), 2);

    stores.products.add(product("Apple", 100)).await.unwrap();
    stores.products.add(product("Pineapple", 150)).await.unwrap();
    stores.products.add(product("Orange", 50)).await.unwrap();

    let hits = stores.products.search("apple").await;
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn duplicate_subscriptions_deliver_once_and_unsubscribe_stops_delivery() {
    let stores = stores();
    let recorder = Recorder::new();
    let handle: Arc<dyn ModelChangedListener<Customer>> = recorder.clone();

    stores.customers.subscribe(handle.clone());
    stores.customers.subscribe(handle.clone());

    stores.customers.add(customer("Amy", 0)).await.unwrap();
    assert_eq!(recorder.take().len(), 1);

    stores.customers.unsubscribe(&handle);
    stores.customers.add(customer("Ben", 0)).await.unwrap();
    assert!(recorder.take().is_empty());
}

#[tokio::test]
async fn product_store_roundtrip() {
    let stores = stores();
    let id = stores.products.add(product("Apple", 100)).await.unwrap();
    assert!(stores.products.is_exists_by_id(Some(id)).await);

    let mut stored = stores.products.select_by_id(Some(id)).await.unwrap();
    stored.price = 120;
    assert_eq!(stores.products.update(stored.clone()).await, 1);

    assert_eq!(
        stores
            .products
            .select_by_id(Some(id))
            .await
            .unwrap()
            .price,
        120
    );

    assert_eq!(stores.products.delete(stored).await, 1);
    assert!(!stores.products.is_exists_by_id(Some(id)).await);
}

#[tokio::test]
async fn upserting_product_orders_inserts_or_replaces_by_id() {
    let stores = stores();
    let recorder = Recorder::new();
    stores.product_orders.subscribe(recorder.clone());

    // No id: insert.
    let ids = stores
        .product_orders
        .upsert_many(vec![order("Apple", 100, dec!(1))])
        .await;
    assert_eq!(ids.len(), 1);

    // Same id: replace, not duplicate.
    let mut replacement = stores
        .product_orders
        .select_by_id(Some(ids[0]))
        .await
        .unwrap();
    replacement.quantity = dec!(5);
    let replaced_ids = stores.product_orders.upsert_many(vec![replacement]).await;
    assert_eq!(replaced_ids, ids);
    assert_eq!(stores.product_orders.select_all().await.len(), 1);
    assert_eq!(
        stores
            .product_orders
            .select_by_id(Some(ids[0]))
            .await
            .unwrap()
            .quantity,
        dec!(5)
    );

    let events = recorder.take();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|(change, _)| *change == Change::Upserted));
}

#[tokio::test]
async fn select_all_in_range_filters_by_queue_date() {
    let stores = stores();
    let id = stores
        .queues
        .add(queue(
            None,
            QueueStatus::InQueue,
            PaymentMethod::Cash,
            vec![order("Apple", 100, dec!(1))],
        ))
        .await
        .unwrap();

    let now = Utc::now();
    let hits = stores
        .queues
        .select_all_in_range(now - Duration::hours(1), now + Duration::hours(1))
        .await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, Some(id));
    assert_eq!(hits[0].product_orders.len(), 1);

    let misses = stores
        .queues
        .select_all_in_range(now + Duration::hours(2), now + Duration::hours(3))
        .await;
    assert!(misses.is_empty());
}
