use crate::application::ports::{Connectivity, LocalStore, OrderGateway, OrderPayload};
use crate::domain::entities::{SyncReport, SyncStatusSnapshot};
use crate::domain::value_objects::SyncState;
use crate::shared::config::SyncConfig;
use crate::shared::error::AppError;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Queue processor and trigger for offline orders.
///
/// One run drains a snapshot of the queue strictly sequentially, oldest
/// first, so the server observes orders in the order the buyer created them.
/// At most one run is active at a time; a trigger arriving mid-run is
/// dropped, not queued, since the next natural trigger re-checks state
/// anyway.
pub struct SyncService {
    store: Arc<dyn LocalStore>,
    orders: Arc<dyn OrderGateway>,
    connectivity: Arc<dyn Connectivity>,
    config: SyncConfig,
    running: AtomicBool,
    queue_changed: Notify,
    status_tx: watch::Sender<SyncStatusSnapshot>,
}

impl SyncService {
    pub fn new(
        store: Arc<dyn LocalStore>,
        orders: Arc<dyn OrderGateway>,
        connectivity: Arc<dyn Connectivity>,
        config: SyncConfig,
    ) -> Self {
        let status = SyncStatusSnapshot {
            is_online: connectivity.is_online(),
            ..SyncStatusSnapshot::default()
        };
        Self {
            store,
            orders,
            connectivity,
            config,
            running: AtomicBool::new(false),
            queue_changed: Notify::new(),
            status_tx: watch::channel(status).0,
        }
    }

    pub fn status(&self) -> SyncStatusSnapshot {
        self.status_tx.borrow().clone()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<SyncStatusSnapshot> {
        self.status_tx.subscribe()
    }

    /// Tell the trigger the queue mutated. Permits accumulate, so a nudge
    /// landing while a run is in flight is picked up on the next wait.
    pub async fn notify_queue_changed(&self) {
        self.refresh_counts().await;
        self.queue_changed.notify_one();
    }

    /// Drain the current queue snapshot. Re-entrant calls are ignored: a
    /// second trigger while a run is in flight returns an empty report
    /// without touching the store or the network.
    pub async fn process_sync_queue(&self) -> Result<SyncReport, AppError> {
        if self
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("sync run already in flight, ignoring trigger");
            return Ok(SyncReport::empty());
        }

        self.status_tx.send_modify(|s| s.is_syncing = true);
        let result = self.drain_queue().await;
        self.status_tx.send_modify(|s| {
            s.is_syncing = false;
            s.last_sync_at = Some(chrono::Utc::now().timestamp());
        });
        if let Ok(report) = &result {
            if !self.config.retain_synced_orders && report.synced_count > 0 {
                match self
                    .store
                    .purge_synced_orders(chrono::Utc::now().timestamp() + 1)
                    .await
                {
                    Ok(purged) => debug!(purged, "dropped synced orders per retention policy"),
                    Err(err) => warn!(error = %err, "failed to purge synced orders"),
                }
            }
        }
        self.refresh_counts().await;
        self.running.store(false, Ordering::Release);
        result
    }

    async fn drain_queue(&self) -> Result<SyncReport, AppError> {
        let queue = self.store.unsynced_orders().await?;
        if queue.is_empty() {
            return Ok(SyncReport::empty());
        }

        info!(count = queue.len(), "processing offline order queue");
        let mut report = SyncReport::empty();

        for order in &queue {
            let payload = OrderPayload::from(order);
            match self
                .orders
                .submit_order(&payload, order.voice_note.as_deref())
                .await
            {
                Ok(ack) => {
                    self.store
                        .mark_order_synced(order.local_id, Some(&ack.order_id))
                        .await?;
                    report.synced_count += 1;
                    debug!(order = %order.local_id, remote = %ack.order_id, "order synced");
                }
                Err(AppError::RemoteRejected(reason)) => {
                    report.errors += 1;
                    let state = self
                        .store
                        .record_order_rejection(
                            order.local_id,
                            &reason,
                            self.config.max_rejection_attempts,
                        )
                        .await?;
                    if state == SyncState::FailedPermanent {
                        warn!(order = %order.local_id, %reason, "order rejected permanently, needs manual resolution");
                    } else {
                        debug!(order = %order.local_id, %reason, "order rejected, will retry");
                    }
                }
                Err(err) => {
                    // Transient: persisted state untouched, a failing order
                    // must not block the rest of the queue.
                    report.errors += 1;
                    warn!(order = %order.local_id, error = %err, "transmission failed, order stays queued");
                }
            }
        }

        Ok(report)
    }

    async fn refresh_counts(&self) {
        let pending = self.store.count_unsynced().await.unwrap_or(0);
        let failed = self.store.count_failed().await.unwrap_or(0);
        self.status_tx.send_modify(|s| {
            s.pending_count = pending;
            s.failed_count = failed;
        });
    }

    /// Event-driven trigger: re-evaluates on connectivity transitions, queue
    /// nudges and a low-frequency safety-net poll. Never a tight loop.
    pub fn spawn_auto_sync(self: &Arc<Self>) -> JoinHandle<()> {
        let service = Arc::clone(self);
        tokio::spawn(async move { service.auto_sync_loop().await })
    }

    async fn auto_sync_loop(&self) {
        let mut online_rx = self.connectivity.subscribe();
        let mut poll = tokio::time::interval(Duration::from_millis(
            self.config.safety_poll_interval_ms.max(1),
        ));
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                changed = online_rx.changed() => {
                    if changed.is_err() {
                        debug!("connectivity sensor dropped, stopping auto-sync");
                        break;
                    }
                    let online = *online_rx.borrow_and_update();
                    self.status_tx.send_modify(|s| s.is_online = online);
                    if !online {
                        continue;
                    }
                }
                _ = self.queue_changed.notified() => {}
                _ = poll.tick() => {}
            }

            if !self.connectivity.is_online() {
                continue;
            }
            let pending = self.store.count_unsynced().await.unwrap_or(0);
            if pending == 0 {
                continue;
            }
            if let Err(err) = self.process_sync_queue().await {
                warn!(error = %err, "sync run failed");
            }
        }
    }
}
