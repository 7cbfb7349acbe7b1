use crate::application::ports::{LocalStore, ProductGateway};
use crate::domain::entities::CachedProduct;
use crate::domain::value_objects::ProductId;
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::{debug, warn};

/// Network-first product catalog. Every read of the full list tries the
/// remote API and rewrites the cache on success; any failure falls back to
/// whatever the cache currently holds, never to an error. An empty result is
/// a valid outcome, not a failure.
pub struct CatalogService {
    store: Arc<dyn LocalStore>,
    products: Arc<dyn ProductGateway>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn LocalStore>, products: Arc<dyn ProductGateway>) -> Self {
        Self { store, products }
    }

    pub async fn all_products(&self) -> Result<Vec<CachedProduct>, AppError> {
        match self.products.fetch_products().await {
            Ok(fresh) => {
                self.store.replace_products(fresh.clone()).await?;
                debug!(count = fresh.len(), "product cache refreshed");
                Ok(fresh)
            }
            Err(err) => {
                warn!(error = %err, "product fetch failed, serving cache");
                self.store.all_products().await
            }
        }
    }

    /// Cache-only: assumes `all_products` has warmed the cache.
    pub async fn product_by_id(&self, id: &ProductId) -> Result<Option<CachedProduct>, AppError> {
        self.store.product_by_id(id).await
    }

    pub async fn products_by_category(
        &self,
        category: &str,
    ) -> Result<Vec<CachedProduct>, AppError> {
        self.store.products_by_category(category).await
    }

    /// Case-insensitive substring match over cached product names. An empty
    /// query is a full listing.
    pub async fn search_products(&self, query: &str) -> Result<Vec<CachedProduct>, AppError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return self.all_products().await;
        }
        let cached = self.store.all_products().await?;
        Ok(cached
            .into_iter()
            .filter(|product| product.matches_name(trimmed))
            .collect())
    }
}
