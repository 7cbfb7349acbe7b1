use crate::application::ports::LocalStore;
use crate::domain::entities::{CachedProduct, CartItem, OfflineOrder, OrderDraft};
use crate::domain::value_objects::{ClientRef, OrderLocalId, ProductId, SyncState};
use crate::shared::error::AppError;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::warn;

/// Store wrapper for environments where persistent storage could not be
/// opened. Reads come back empty, bookkeeping writes become no-ops, and only
/// `enqueue_order` reports the loss — it is the one operation that cannot
/// pretend it succeeded, since callers rely on the durable identity it
/// returns.
pub struct FailSoftStore {
    inner: Option<Arc<dyn LocalStore>>,
}

impl FailSoftStore {
    pub fn new(inner: Option<Arc<dyn LocalStore>>) -> Self {
        if inner.is_none() {
            warn!("local store unavailable, offline features degraded to no-ops");
        }
        Self { inner }
    }

    pub fn available(&self) -> bool {
        self.inner.is_some()
    }
}

#[async_trait]
impl LocalStore for FailSoftStore {
    async fn replace_products(&self, products: Vec<CachedProduct>) -> Result<(), AppError> {
        match &self.inner {
            Some(store) => store.replace_products(products).await,
            None => Ok(()),
        }
    }

    async fn all_products(&self) -> Result<Vec<CachedProduct>, AppError> {
        match &self.inner {
            Some(store) => store.all_products().await,
            None => Ok(Vec::new()),
        }
    }

    async fn product_by_id(&self, id: &ProductId) -> Result<Option<CachedProduct>, AppError> {
        match &self.inner {
            Some(store) => store.product_by_id(id).await,
            None => Ok(None),
        }
    }

    async fn products_by_category(&self, category: &str) -> Result<Vec<CachedProduct>, AppError> {
        match &self.inner {
            Some(store) => store.products_by_category(category).await,
            None => Ok(Vec::new()),
        }
    }

    async fn enqueue_order(
        &self,
        draft: OrderDraft,
        client_ref: ClientRef,
    ) -> Result<OfflineOrder, AppError> {
        match &self.inner {
            Some(store) => store.enqueue_order(draft, client_ref).await,
            None => Err(AppError::Storage(
                "local store unavailable, cannot queue order".to_string(),
            )),
        }
    }

    async fn unsynced_orders(&self) -> Result<Vec<OfflineOrder>, AppError> {
        match &self.inner {
            Some(store) => store.unsynced_orders().await,
            None => Ok(Vec::new()),
        }
    }

    async fn mark_order_synced(
        &self,
        id: OrderLocalId,
        remote_id: Option<&str>,
    ) -> Result<(), AppError> {
        match &self.inner {
            Some(store) => store.mark_order_synced(id, remote_id).await,
            None => Ok(()),
        }
    }

    async fn record_order_rejection(
        &self,
        id: OrderLocalId,
        error: &str,
        max_attempts: u32,
    ) -> Result<SyncState, AppError> {
        match &self.inner {
            Some(store) => store.record_order_rejection(id, error, max_attempts).await,
            None => Ok(SyncState::Queued),
        }
    }

    async fn count_unsynced(&self) -> Result<u32, AppError> {
        match &self.inner {
            Some(store) => store.count_unsynced().await,
            None => Ok(0),
        }
    }

    async fn count_failed(&self) -> Result<u32, AppError> {
        match &self.inner {
            Some(store) => store.count_failed().await,
            None => Ok(0),
        }
    }

    async fn failed_orders(&self) -> Result<Vec<OfflineOrder>, AppError> {
        match &self.inner {
            Some(store) => store.failed_orders().await,
            None => Ok(Vec::new()),
        }
    }

    async fn purge_synced_orders(&self, older_than: i64) -> Result<u32, AppError> {
        match &self.inner {
            Some(store) => store.purge_synced_orders(older_than).await,
            None => Ok(0),
        }
    }

    async fn cart_items(&self) -> Result<Vec<CartItem>, AppError> {
        match &self.inner {
            Some(store) => store.cart_items().await,
            None => Ok(Vec::new()),
        }
    }

    async fn put_cart_item(&self, product_id: &ProductId, quantity: u32) -> Result<(), AppError> {
        match &self.inner {
            Some(store) => store.put_cart_item(product_id, quantity).await,
            None => Ok(()),
        }
    }

    async fn clear_cart(&self) -> Result<(), AppError> {
        match &self.inner {
            Some(store) => store.clear_cart().await,
            None => Ok(()),
        }
    }
}
