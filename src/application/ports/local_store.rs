use crate::domain::entities::{CachedProduct, CartItem, OfflineOrder, OrderDraft};
use crate::domain::value_objects::{ClientRef, OrderLocalId, ProductId, SyncState};
use crate::shared::error::AppError;
use async_trait::async_trait;

/// On-device durable store: product cache, persisted cart and the
/// offline-order queue. The store is the sole owner of all three tables'
/// lifetimes; the sync engine only flips sync bookkeeping, the catalog only
/// rewrites the product table.
#[async_trait]
pub trait LocalStore: Send + Sync {
    /// Replace-all semantics: clear then bulk-insert in one transaction, so a
    /// reader never observes a partially cleared cache.
    async fn replace_products(&self, products: Vec<CachedProduct>) -> Result<(), AppError>;
    async fn all_products(&self) -> Result<Vec<CachedProduct>, AppError>;
    async fn product_by_id(&self, id: &ProductId) -> Result<Option<CachedProduct>, AppError>;
    async fn products_by_category(&self, category: &str) -> Result<Vec<CachedProduct>, AppError>;

    /// Freeze a validated draft into the queue: assigns the local id, stamps
    /// `created_at`, starts out `queued`.
    async fn enqueue_order(
        &self,
        draft: OrderDraft,
        client_ref: ClientRef,
    ) -> Result<OfflineOrder, AppError>;
    /// Queued orders in insertion order, oldest first.
    async fn unsynced_orders(&self) -> Result<Vec<OfflineOrder>, AppError>;
    /// Idempotent: marking an already-synced order again is a no-op.
    async fn mark_order_synced(
        &self,
        id: OrderLocalId,
        remote_id: Option<&str>,
    ) -> Result<(), AppError>;
    /// Count a server-side rejection against the order's attempt budget.
    /// Returns the resulting state; `FailedPermanent` once the budget is spent.
    async fn record_order_rejection(
        &self,
        id: OrderLocalId,
        error: &str,
        max_attempts: u32,
    ) -> Result<SyncState, AppError>;
    async fn count_unsynced(&self) -> Result<u32, AppError>;
    async fn count_failed(&self) -> Result<u32, AppError>;
    async fn failed_orders(&self) -> Result<Vec<OfflineOrder>, AppError>;
    /// Optional retention policy: drop synced orders created before the cutoff
    /// (unix seconds). Returns how many were removed.
    async fn purge_synced_orders(&self, older_than: i64) -> Result<u32, AppError>;

    async fn cart_items(&self) -> Result<Vec<CartItem>, AppError>;
    /// Upsert; a quantity of zero removes the line.
    async fn put_cart_item(&self, product_id: &ProductId, quantity: u32) -> Result<(), AppError>;
    async fn clear_cart(&self) -> Result<(), AppError>;
}
