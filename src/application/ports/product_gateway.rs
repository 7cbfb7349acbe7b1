use crate::domain::entities::CachedProduct;
use crate::shared::error::AppError;
use async_trait::async_trait;

/// Remote Product API. A full-list fetch is the only contract the cache
/// needs; filtering happens locally.
#[async_trait]
pub trait ProductGateway: Send + Sync {
    async fn fetch_products(&self) -> Result<Vec<CachedProduct>, AppError>;
}
