use crate::application::ports::LocalStore;
use crate::application::services::{CatalogService, OrderService, SyncService};
use crate::infrastructure::api::RemoteApiClient;
use crate::infrastructure::database::{ConnectionPool, FailSoftStore, SqliteStore};
use crate::infrastructure::network::NetworkMonitor;
use crate::shared::config::{AppConfig, DatabaseConfig};
use crate::shared::error::AppError;
use std::sync::Arc;
use tracing::warn;

/// Client-side composition root: opens the durable store (degrading to
/// fail-soft no-ops when it cannot be opened), wires the remote client and
/// connectivity monitor into the services, and starts the auto-sync trigger.
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<FailSoftStore>,
    pub monitor: Arc<NetworkMonitor>,
    pub catalog: Arc<CatalogService>,
    pub orders: Arc<OrderService>,
    pub sync: Arc<SyncService>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> Result<Self, AppError> {
        config.validate().map_err(AppError::Configuration)?;

        let api = Arc::new(RemoteApiClient::new(&config.api)?);
        let store = Arc::new(FailSoftStore::new(open_store(&config.database).await));
        let monitor = Arc::new(NetworkMonitor::new());

        let catalog = Arc::new(CatalogService::new(
            store.clone() as Arc<dyn LocalStore>,
            api.clone(),
        ));
        let sync = Arc::new(SyncService::new(
            store.clone(),
            api.clone(),
            monitor.clone(),
            config.sync.clone(),
        ));
        if config.sync.auto_sync {
            sync.spawn_auto_sync();
        }
        let orders = Arc::new(
            OrderService::new(store.clone(), api.clone(), monitor.clone())
                .with_sync(sync.clone()),
        );

        Ok(Self {
            config,
            store,
            monitor,
            catalog,
            orders,
            sync,
        })
    }
}

async fn open_store(config: &DatabaseConfig) -> Option<Arc<dyn LocalStore>> {
    match try_open_store(config).await {
        Ok(store) => Some(store),
        Err(err) => {
            warn!(error = %err, url = %config.url, "could not open local store");
            None
        }
    }
}

async fn try_open_store(config: &DatabaseConfig) -> Result<Arc<dyn LocalStore>, AppError> {
    let pool = ConnectionPool::new(&config.url, config.max_connections).await?;
    pool.migrate().await?;
    Ok(Arc::new(SqliteStore::new(pool.get_pool().clone())))
}
