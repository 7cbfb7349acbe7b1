use crate::application::ports::{Connectivity, LocalStore, OrderGateway, OrderPayload};
use crate::application::services::sync_service::SyncService;
use crate::domain::entities::{OrderDraft, OrderLine};
use crate::domain::value_objects::{ClientRef, Gps, OrderLocalId, OrderStatus, PhoneNumber};
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::{info, warn};

/// Where a submission ended up: straight on the server, or durably queued
/// for the sync engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Submitted { order_id: String },
    Queued { local_id: OrderLocalId, pending_count: u32 },
}

/// Delivery metadata collected at checkout time, alongside the cart.
#[derive(Debug, Clone)]
pub struct CheckoutContact {
    pub customer_name: String,
    pub customer_phone: PhoneNumber,
    pub city: Option<String>,
    pub delivery_desc: Option<String>,
    pub gps: Option<Gps>,
    pub voice_note: Option<Vec<u8>>,
}

/// Client-side order intake: validates a draft, then routes it to direct
/// remote submission when online, falling back to the offline queue when
/// offline or when the direct attempt fails. The same client ref travels both
/// paths, so a direct attempt that died after the server persisted it cannot
/// duplicate on the queued retry.
pub struct OrderService {
    store: Arc<dyn LocalStore>,
    orders: Arc<dyn OrderGateway>,
    connectivity: Arc<dyn Connectivity>,
    sync: Option<Arc<SyncService>>,
}

impl OrderService {
    pub fn new(
        store: Arc<dyn LocalStore>,
        orders: Arc<dyn OrderGateway>,
        connectivity: Arc<dyn Connectivity>,
    ) -> Self {
        Self {
            store,
            orders,
            connectivity,
            sync: None,
        }
    }

    /// Wire up the sync trigger so queued submissions nudge it immediately
    /// instead of waiting for the safety-net poll.
    pub fn with_sync(mut self, sync: Arc<SyncService>) -> Self {
        self.sync = Some(sync);
        self
    }

    pub async fn submit_order(&self, draft: OrderDraft) -> Result<SubmissionOutcome, AppError> {
        draft.validate().map_err(AppError::Validation)?;

        let client_ref = ClientRef::generate();

        if self.connectivity.is_online() {
            let payload = OrderPayload::from_draft(&draft, &client_ref);
            match self
                .orders
                .submit_order(&payload, draft.voice_note.as_deref())
                .await
            {
                Ok(ack) => {
                    info!(order = %ack.order_id, "order submitted directly");
                    return Ok(SubmissionOutcome::Submitted {
                        order_id: ack.order_id,
                    });
                }
                Err(err) => {
                    warn!(error = %err, "direct submission failed, queueing order");
                }
            }
        }

        let order = self.store.enqueue_order(draft, client_ref).await?;
        if let Some(sync) = &self.sync {
            sync.notify_queue_changed().await;
        }
        let pending = self.store.count_unsynced().await?;
        info!(local = %order.local_id, pending, "order queued for sync");
        Ok(SubmissionOutcome::Queued {
            local_id: order.local_id,
            pending_count: pending,
        })
    }

    /// Freeze the persisted cart into an order: quantities come from the
    /// cart, names and prices are snapshotted from the cached products. The
    /// cart is cleared only once the order was accepted or queued.
    pub async fn checkout_cart(
        &self,
        contact: CheckoutContact,
    ) -> Result<SubmissionOutcome, AppError> {
        let items = self.store.cart_items().await?;
        if items.is_empty() {
            return Err(AppError::Validation("Cart is empty".to_string()));
        }

        let mut lines = Vec::with_capacity(items.len());
        for item in &items {
            let product = self
                .store
                .product_by_id(&item.product_id)
                .await?
                .ok_or_else(|| {
                    AppError::Validation(format!(
                        "Product '{}' is no longer available",
                        item.product_id
                    ))
                })?;
            lines.push(OrderLine {
                product_id: product.id.clone(),
                name: product.name.clone(),
                quantity: item.quantity,
                unit_price: product.price,
            });
        }

        let total_amount = lines.iter().map(OrderLine::subtotal).sum();
        let draft = OrderDraft {
            customer_name: contact.customer_name,
            customer_phone: contact.customer_phone,
            city: contact.city,
            delivery_desc: contact.delivery_desc,
            lines,
            total_amount,
            gps: contact.gps,
            voice_note: contact.voice_note,
        };

        let outcome = self.submit_order(draft).await?;
        self.store.clear_cart().await?;
        Ok(outcome)
    }

    /// Producer/admin path: push a status transition for an accepted order.
    pub async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<(), AppError> {
        self.orders.update_order_status(order_id, status).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::OrderAck;
    use crate::domain::entities::CachedProduct;
    use crate::domain::value_objects::ProductId;
    use crate::infrastructure::database::{ConnectionPool, SqliteStore};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use tokio::sync::watch;

    struct ScriptedOrderGateway {
        responses: Mutex<VecDeque<Result<OrderAck, AppError>>>,
        submitted: Mutex<Vec<OrderPayload>>,
    }

    impl ScriptedOrderGateway {
        fn new(responses: Vec<Result<OrderAck, AppError>>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                submitted: Mutex::new(Vec::new()),
            }
        }

        fn call_count(&self) -> usize {
            self.submitted.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl OrderGateway for ScriptedOrderGateway {
        async fn submit_order(
            &self,
            payload: &OrderPayload,
            _voice_note: Option<&[u8]>,
        ) -> Result<OrderAck, AppError> {
            self.submitted.lock().unwrap().push(payload.clone());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Ok(OrderAck {
                        order_id: "ord_1".to_string(),
                    })
                })
        }

        async fn update_order_status(
            &self,
            _order_id: &str,
            _status: OrderStatus,
        ) -> Result<(), AppError> {
            Ok(())
        }
    }

    struct StaticConnectivity {
        tx: watch::Sender<bool>,
    }

    impl StaticConnectivity {
        fn new(online: bool) -> Self {
            Self {
                tx: watch::channel(online).0,
            }
        }
    }

    impl Connectivity for StaticConnectivity {
        fn is_online(&self) -> bool {
            *self.tx.borrow()
        }

        fn subscribe(&self) -> watch::Receiver<bool> {
            self.tx.subscribe()
        }
    }

    async fn setup_store() -> Arc<SqliteStore> {
        let pool = ConnectionPool::from_memory().await.unwrap();
        pool.migrate().await.unwrap();
        Arc::new(SqliteStore::new(pool.get_pool().clone()))
    }

    fn valid_draft() -> OrderDraft {
        OrderDraft {
            customer_name: "Awa".to_string(),
            customer_phone: PhoneNumber::new("70000000".to_string()).unwrap(),
            city: None,
            delivery_desc: Some("Near the big market".to_string()),
            lines: vec![OrderLine {
                product_id: ProductId::new("p1".to_string()).unwrap(),
                name: "Tomatoes".to_string(),
                quantity: 2,
                unit_price: 750.0,
            }],
            total_amount: 1500.0,
            gps: Some(Gps::new(12.37, -1.53).unwrap()),
            voice_note: None,
        }
    }

    fn product(id: &str, price: f64) -> CachedProduct {
        CachedProduct {
            id: ProductId::new(id.to_string()).unwrap(),
            name: format!("Product {id}"),
            category: "misc".to_string(),
            unit: "kg".to_string(),
            price,
            quantity: 50,
            images: vec![],
            producer_id: "prod_1".to_string(),
            status: "active".to_string(),
        }
    }

    #[tokio::test]
    async fn invalid_draft_never_reaches_queue_or_network() {
        let store = setup_store().await;
        let gateway = Arc::new(ScriptedOrderGateway::new(vec![]));
        let service = OrderService::new(
            store.clone(),
            gateway.clone(),
            Arc::new(StaticConnectivity::new(true)),
        );

        let mut draft = valid_draft();
        draft.lines.clear();
        let err = service.submit_order(draft).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(gateway.call_count(), 0);
        assert_eq!(store.count_unsynced().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn online_submission_goes_direct_and_skips_the_queue() {
        let store = setup_store().await;
        let gateway = Arc::new(ScriptedOrderGateway::new(vec![Ok(OrderAck {
            order_id: "ord_7".to_string(),
        })]));
        let service = OrderService::new(
            store.clone(),
            gateway.clone(),
            Arc::new(StaticConnectivity::new(true)),
        );

        let outcome = service.submit_order(valid_draft()).await.unwrap();
        assert_eq!(
            outcome,
            SubmissionOutcome::Submitted {
                order_id: "ord_7".to_string()
            }
        );
        assert_eq!(store.count_unsynced().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn offline_submission_is_queued_without_remote_calls() {
        let store = setup_store().await;
        let gateway = Arc::new(ScriptedOrderGateway::new(vec![]));
        let service = OrderService::new(
            store.clone(),
            gateway.clone(),
            Arc::new(StaticConnectivity::new(false)),
        );

        let outcome = service.submit_order(valid_draft()).await.unwrap();
        match outcome {
            SubmissionOutcome::Queued { pending_count, .. } => assert_eq!(pending_count, 1),
            other => panic!("expected queued outcome, got {other:?}"),
        }
        assert_eq!(gateway.call_count(), 0);
        assert_eq!(store.count_unsynced().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn failed_direct_submission_falls_back_to_queue_with_same_ref() {
        let store = setup_store().await;
        let gateway = Arc::new(ScriptedOrderGateway::new(vec![Err(AppError::Network(
            "timeout".to_string(),
        ))]));
        let service = OrderService::new(
            store.clone(),
            gateway.clone(),
            Arc::new(StaticConnectivity::new(true)),
        );

        let outcome = service.submit_order(valid_draft()).await.unwrap();
        assert!(matches!(outcome, SubmissionOutcome::Queued { .. }));

        let queued = store.unsynced_orders().await.unwrap();
        assert_eq!(queued.len(), 1);
        let submitted = gateway.submitted.lock().unwrap();
        assert_eq!(submitted[0].client_ref, queued[0].client_ref.as_str());
    }

    #[tokio::test]
    async fn checkout_snapshots_cart_against_cache_and_clears_it() {
        let store = setup_store().await;
        store
            .replace_products(vec![product("p1", 750.0), product("p2", 200.0)])
            .await
            .unwrap();
        store
            .put_cart_item(&ProductId::new("p1".to_string()).unwrap(), 2)
            .await
            .unwrap();
        store
            .put_cart_item(&ProductId::new("p2".to_string()).unwrap(), 5)
            .await
            .unwrap();

        let gateway = Arc::new(ScriptedOrderGateway::new(vec![]));
        let service = OrderService::new(
            store.clone(),
            gateway.clone(),
            Arc::new(StaticConnectivity::new(false)),
        );

        let contact = CheckoutContact {
            customer_name: "Awa".to_string(),
            customer_phone: PhoneNumber::new("70000000".to_string()).unwrap(),
            city: None,
            delivery_desc: None,
            gps: None,
            voice_note: None,
        };
        service.checkout_cart(contact).await.unwrap();

        assert!(store.cart_items().await.unwrap().is_empty());
        let queued = store.unsynced_orders().await.unwrap();
        assert_eq!(queued.len(), 1);
        assert_eq!(queued[0].total_amount, 2.0 * 750.0 + 5.0 * 200.0);

        // Later catalog changes must not touch the frozen snapshot.
        store
            .replace_products(vec![product("p1", 9999.0)])
            .await
            .unwrap();
        let after = store.unsynced_orders().await.unwrap();
        assert_eq!(after[0].total_amount, 2.0 * 750.0 + 5.0 * 200.0);
        let p1_line = after[0]
            .lines
            .iter()
            .find(|l| l.product_id.as_str() == "p1")
            .unwrap();
        assert_eq!(p1_line.unit_price, 750.0);
    }

    #[tokio::test]
    async fn checkout_with_empty_cart_is_a_validation_error() {
        let store = setup_store().await;
        let gateway = Arc::new(ScriptedOrderGateway::new(vec![]));
        let service = OrderService::new(
            store,
            gateway,
            Arc::new(StaticConnectivity::new(true)),
        );

        let contact = CheckoutContact {
            customer_name: "Awa".to_string(),
            customer_phone: PhoneNumber::new("70000000".to_string()).unwrap(),
            city: None,
            delivery_desc: None,
            gps: None,
            voice_note: None,
        };
        let err = service.checkout_cart(contact).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
