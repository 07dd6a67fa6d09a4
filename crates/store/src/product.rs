//! Product record store.

use std::sync::Arc;

use ledger_core::ProductId;
use ledger_events::{ChangeNotifier, ChangeSource, ModelChangedListener};
use ledger_products::Product;

use crate::dao::ProductDao;

/// Source of truth for product records.
pub struct ProductStore {
    dao: Arc<dyn ProductDao>,
    notifier: ChangeNotifier<Product>,
}

impl ProductStore {
    pub fn new(dao: Arc<dyn ProductDao>) -> Self {
        Self {
            dao,
            notifier: ChangeNotifier::new(),
        }
    }

    pub async fn select_all(&self) -> Vec<Product> {
        self.dao.select_all().await
    }

    pub async fn select_by_id(&self, id: Option<ProductId>) -> Option<Product> {
        match id {
            Some(id) => self.dao.select_by_id(id).await,
            None => None,
        }
    }

    pub async fn select_by_ids(&self, ids: &[ProductId]) -> Vec<Product> {
        self.dao.select_by_ids(ids).await
    }

    pub async fn is_exists_by_id(&self, id: Option<ProductId>) -> bool {
        match id {
            Some(id) => self.dao.is_exists_by_id(id).await,
            None => false,
        }
    }

    pub async fn search(&self, query: &str) -> Vec<Product> {
        self.dao.search(query).await
    }

    pub async fn add(&self, product: Product) -> Option<ProductId> {
        let row = self.dao.insert(&product).await;
        let id = self.dao.id_by_row(row).await?;
        if let Some(inserted) = self.dao.select_by_id(id).await {
            self.notifier.notify_added(&[inserted]);
        }
        Some(id)
    }

    pub async fn update(&self, product: Product) -> u64 {
        let Some(id) = product.id else {
            tracing::warn!("rejecting product update without an id");
            return 0;
        };
        let affected = self.dao.update(&product).await;
        if affected > 0 {
            if let Some(updated) = self.dao.select_by_id(id).await {
                self.notifier.notify_updated(&[updated]);
            }
        }
        affected
    }

    pub async fn delete(&self, product: Product) -> u64 {
        let Some(existing) = self.select_by_id(product.id).await else {
            return 0;
        };
        let affected = self.dao.delete(&existing).await;
        if affected > 0 {
            self.notifier.notify_deleted(&[existing]);
        }
        affected
    }
}

impl ChangeSource<Product> for ProductStore {
    fn subscribe(&self, listener: Arc<dyn ModelChangedListener<Product>>) {
        self.notifier.subscribe(listener);
    }

    fn unsubscribe(&self, listener: &Arc<dyn ModelChangedListener<Product>>) {
        self.notifier.unsubscribe(listener);
    }
}
