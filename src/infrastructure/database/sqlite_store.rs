use crate::application::ports::LocalStore;
use crate::domain::entities::{CachedProduct, CartItem, OfflineOrder, OrderDraft, OrderLine};
use crate::domain::value_objects::{ClientRef, OrderLocalId, ProductId, SyncState};
use crate::infrastructure::database::rows::{
    CartItemRow, OfflineOrderRow, OrderItemRow, ProductRow,
};
use crate::shared::error::AppError;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

/// SQLite-backed durable store. Multi-statement writes (cache replacement,
/// order plus its lines) run inside one transaction each; no cross-table
/// transaction is ever needed.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn order_lines(&self, order_id: i64) -> Result<Vec<OrderLine>, AppError> {
        let rows = sqlx::query_as::<_, OrderItemRow>(
            "SELECT * FROM offline_order_items WHERE order_id = ?1 ORDER BY id ASC",
        )
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(OrderItemRow::into_line).collect()
    }

    async fn orders_in_state(&self, state: SyncState) -> Result<Vec<OfflineOrder>, AppError> {
        let rows = sqlx::query_as::<_, OfflineOrderRow>(
            "SELECT * FROM offline_orders WHERE sync_state = ?1 ORDER BY id ASC",
        )
        .bind(state.as_str())
        .fetch_all(&self.pool)
        .await?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in rows {
            let lines = self.order_lines(row.id).await?;
            orders.push(row.into_order(lines)?);
        }
        Ok(orders)
    }

    async fn count_in_state(&self, state: SyncState) -> Result<u32, AppError> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM offline_orders WHERE sync_state = ?1")
                .bind(state.as_str())
                .fetch_one(&self.pool)
                .await?;
        Ok(u32::try_from(count).unwrap_or(0))
    }
}

#[async_trait]
impl LocalStore for SqliteStore {
    async fn replace_products(&self, products: Vec<CachedProduct>) -> Result<(), AppError> {
        let cached_at = Utc::now().timestamp();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM cached_products")
            .execute(&mut *tx)
            .await?;

        for product in &products {
            sqlx::query(
                r#"
                INSERT INTO cached_products (
                    id, name, category, unit, price, quantity,
                    images, producer_id, status, cached_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
                "#,
            )
            .bind(product.id.as_str())
            .bind(&product.name)
            .bind(&product.category)
            .bind(&product.unit)
            .bind(product.price)
            .bind(product.quantity)
            .bind(serde_json::to_string(&product.images)?)
            .bind(&product.producer_id)
            .bind(&product.status)
            .bind(cached_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn all_products(&self) -> Result<Vec<CachedProduct>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT * FROM cached_products ORDER BY name COLLATE NOCASE ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ProductRow::into_product).collect()
    }

    async fn product_by_id(&self, id: &ProductId) -> Result<Option<CachedProduct>, AppError> {
        let row = sqlx::query_as::<_, ProductRow>("SELECT * FROM cached_products WHERE id = ?1")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;
        row.map(ProductRow::into_product).transpose()
    }

    async fn products_by_category(&self, category: &str) -> Result<Vec<CachedProduct>, AppError> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT * FROM cached_products WHERE category = ?1 ORDER BY name COLLATE NOCASE ASC",
        )
        .bind(category)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(ProductRow::into_product).collect()
    }

    async fn enqueue_order(
        &self,
        draft: OrderDraft,
        client_ref: ClientRef,
    ) -> Result<OfflineOrder, AppError> {
        let created_at = Utc::now().timestamp();
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO offline_orders (
                client_ref, customer_name, customer_phone, city, delivery_desc,
                total_amount, gps_lat, gps_lng, voice_note,
                sync_state, sync_attempts, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 'queued', 0, ?10)
            "#,
        )
        .bind(client_ref.as_str())
        .bind(&draft.customer_name)
        .bind(draft.customer_phone.as_str())
        .bind(&draft.city)
        .bind(&draft.delivery_desc)
        .bind(draft.total_amount)
        .bind(draft.gps.map(|g| g.lat()))
        .bind(draft.gps.map(|g| g.lng()))
        .bind(&draft.voice_note)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        let local_id = result.last_insert_rowid();
        for line in &draft.lines {
            sqlx::query(
                r#"
                INSERT INTO offline_order_items (order_id, product_id, name, quantity, unit_price)
                VALUES (?1, ?2, ?3, ?4, ?5)
                "#,
            )
            .bind(local_id)
            .bind(line.product_id.as_str())
            .bind(&line.name)
            .bind(i64::from(line.quantity))
            .bind(line.unit_price)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(OfflineOrder {
            local_id: OrderLocalId::new(local_id).map_err(AppError::Database)?,
            client_ref,
            customer_name: draft.customer_name,
            customer_phone: draft.customer_phone,
            city: draft.city,
            delivery_desc: draft.delivery_desc,
            lines: draft.lines,
            total_amount: draft.total_amount,
            gps: draft.gps,
            voice_note: draft.voice_note,
            sync_state: SyncState::Queued,
            sync_attempts: 0,
            last_error: None,
            remote_id: None,
            created_at,
            synced_at: None,
        })
    }

    async fn unsynced_orders(&self) -> Result<Vec<OfflineOrder>, AppError> {
        self.orders_in_state(SyncState::Queued).await
    }

    async fn mark_order_synced(
        &self,
        id: OrderLocalId,
        remote_id: Option<&str>,
    ) -> Result<(), AppError> {
        let synced_at = Utc::now().timestamp();
        sqlx::query(
            r#"
            UPDATE offline_orders
            SET sync_state = 'synced', synced_at = ?1, remote_id = COALESCE(?2, remote_id)
            WHERE id = ?3 AND sync_state != 'synced'
            "#,
        )
        .bind(synced_at)
        .bind(remote_id)
        .bind(id.value())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn record_order_rejection(
        &self,
        id: OrderLocalId,
        error: &str,
        max_attempts: u32,
    ) -> Result<SyncState, AppError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT sync_attempts FROM offline_orders WHERE id = ?1 AND sync_state = 'queued'",
        )
        .bind(id.value())
        .fetch_optional(&mut *tx)
        .await?;

        let Some((attempts,)) = row else {
            return Err(AppError::NotFound(format!("queued order {id}")));
        };

        let attempts = u32::try_from(attempts).unwrap_or(0) + 1;
        let state = if attempts >= max_attempts {
            SyncState::FailedPermanent
        } else {
            SyncState::Queued
        };

        sqlx::query(
            "UPDATE offline_orders SET sync_attempts = ?1, last_error = ?2, sync_state = ?3 WHERE id = ?4",
        )
        .bind(i64::from(attempts))
        .bind(error)
        .bind(state.as_str())
        .bind(id.value())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(state)
    }

    async fn count_unsynced(&self) -> Result<u32, AppError> {
        self.count_in_state(SyncState::Queued).await
    }

    async fn count_failed(&self) -> Result<u32, AppError> {
        self.count_in_state(SyncState::FailedPermanent).await
    }

    async fn failed_orders(&self) -> Result<Vec<OfflineOrder>, AppError> {
        self.orders_in_state(SyncState::FailedPermanent).await
    }

    async fn purge_synced_orders(&self, older_than: i64) -> Result<u32, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            DELETE FROM offline_order_items WHERE order_id IN (
                SELECT id FROM offline_orders
                WHERE sync_state = 'synced' AND created_at < ?1
            )
            "#,
        )
        .bind(older_than)
        .execute(&mut *tx)
        .await?;

        let result = sqlx::query(
            "DELETE FROM offline_orders WHERE sync_state = 'synced' AND created_at < ?1",
        )
        .bind(older_than)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(u32::try_from(result.rows_affected()).unwrap_or(0))
    }

    async fn cart_items(&self) -> Result<Vec<CartItem>, AppError> {
        let rows = sqlx::query_as::<_, CartItemRow>("SELECT * FROM cart_items ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;
        rows.into_iter().map(CartItemRow::into_item).collect()
    }

    async fn put_cart_item(&self, product_id: &ProductId, quantity: u32) -> Result<(), AppError> {
        if quantity == 0 {
            sqlx::query("DELETE FROM cart_items WHERE product_id = ?1")
                .bind(product_id.as_str())
                .execute(&self.pool)
                .await?;
            return Ok(());
        }

        sqlx::query(
            r#"
            INSERT INTO cart_items (product_id, quantity, added_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(product_id) DO UPDATE SET quantity = excluded.quantity
            "#,
        )
        .bind(product_id.as_str())
        .bind(i64::from(quantity))
        .bind(Utc::now().timestamp())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn clear_cart(&self) -> Result<(), AppError> {
        sqlx::query("DELETE FROM cart_items")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
