mod common;

use common::{sample_draft, ScriptedOrderGateway};
use sokoni::application::ports::LocalStore;
use sokoni::application::services::{OrderService, SubmissionOutcome, SyncService};
use sokoni::infrastructure::database::{ConnectionPool, SqliteStore};
use sokoni::infrastructure::network::NetworkMonitor;
use sokoni::shared::config::SyncConfig;
use sokoni::shared::error::AppError;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

async fn setup_store() -> Arc<SqliteStore> {
    let pool = ConnectionPool::from_memory().await.unwrap();
    pool.migrate().await.unwrap();
    Arc::new(SqliteStore::new(pool.get_pool().clone()))
}

fn sync_config() -> SyncConfig {
    SyncConfig {
        auto_sync: true,
        safety_poll_interval_ms: 60_000,
        max_rejection_attempts: 3,
        retain_synced_orders: true,
    }
}

/// Device offline, buyer submits, device reconnects: the order is queued with
/// no remote call, then drained by the trigger once connectivity returns.
#[tokio::test]
async fn offline_order_syncs_on_reconnect() {
    let store = setup_store().await;
    let gateway = Arc::new(ScriptedOrderGateway::new(vec![]));
    let monitor = Arc::new(NetworkMonitor::new());
    monitor.set_online(false);

    let sync = Arc::new(SyncService::new(
        store.clone(),
        gateway.clone(),
        monitor.clone(),
        sync_config(),
    ));
    sync.spawn_auto_sync();
    let orders = OrderService::new(store.clone(), gateway.clone(), monitor.clone())
        .with_sync(sync.clone());

    let outcome = orders.submit_order(sample_draft("Awa")).await.unwrap();
    match outcome {
        SubmissionOutcome::Queued { pending_count, .. } => assert_eq!(pending_count, 1),
        other => panic!("expected queued outcome, got {other:?}"),
    }
    assert_eq!(gateway.call_count(), 0);
    assert_eq!(sync.status().pending_count, 1);

    monitor.set_online(true);

    let mut status_rx = sync.subscribe_status();
    timeout(
        Duration::from_secs(5),
        status_rx.wait_for(|s| s.pending_count == 0 && !s.is_syncing),
    )
    .await
    .expect("queue should drain after reconnect")
    .unwrap();

    assert_eq!(gateway.call_count(), 1);
    assert!(store.unsynced_orders().await.unwrap().is_empty());
}

/// Two orders queued, the remote fails the first and accepts the second: the
/// run reports one of each and the failed order stays pending.
#[tokio::test]
async fn partial_failure_leaves_one_pending() {
    let store = setup_store().await;
    let gateway = Arc::new(ScriptedOrderGateway::new(vec![
        Err(AppError::Network("connection reset".to_string())),
        Ok(()),
    ]));
    let monitor = Arc::new(NetworkMonitor::new());

    let sync = SyncService::new(
        store.clone(),
        gateway.clone(),
        monitor.clone(),
        sync_config(),
    );
    let orders = OrderService::new(store.clone(), gateway.clone(), monitor.clone());

    monitor.set_online(false);
    orders.submit_order(sample_draft("first")).await.unwrap();
    orders.submit_order(sample_draft("second")).await.unwrap();
    monitor.set_online(true);

    let report = sync.process_sync_queue().await.unwrap();
    assert_eq!(report.synced_count, 1);
    assert_eq!(report.errors, 1);

    let remaining = store.unsynced_orders().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].customer_name, "first");
    assert_eq!(sync.status().pending_count, 1);
}

/// A submission while connected goes straight to the remote and the queue
/// stays untouched.
#[tokio::test]
async fn online_submission_never_touches_the_queue() {
    let store = setup_store().await;
    let gateway = Arc::new(ScriptedOrderGateway::new(vec![]));
    let monitor = Arc::new(NetworkMonitor::new());

    let orders = OrderService::new(store.clone(), gateway.clone(), monitor);
    let outcome = orders.submit_order(sample_draft("Awa")).await.unwrap();

    assert!(matches!(outcome, SubmissionOutcome::Submitted { .. }));
    assert_eq!(gateway.call_count(), 1);
    assert_eq!(store.count_unsynced().await.unwrap(), 0);
}
