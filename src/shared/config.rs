use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub database: DatabaseConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub per_order_timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub auto_sync: bool,
    pub safety_poll_interval_ms: u64,
    pub max_rejection_attempts: u32,
    pub retain_synced_orders: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:8080".to_string(),
                per_order_timeout_ms: 20_000,
            },
            database: DatabaseConfig {
                url: "sqlite:data/sokoni.db?mode=rwc".to_string(),
                max_connections: 5,
            },
            sync: SyncConfig {
                auto_sync: true,
                safety_poll_interval_ms: 10_000,
                max_rejection_attempts: 3,
                retain_synced_orders: true,
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("SOKONI_API_BASE_URL") {
            if !v.trim().is_empty() {
                cfg.api.base_url = v.trim().trim_end_matches('/').to_string();
            }
        }
        if let Ok(v) = std::env::var("SOKONI_PER_ORDER_TIMEOUT_MS") {
            if let Some(value) = parse_u64(&v) {
                cfg.api.per_order_timeout_ms = value;
            }
        }
        if let Ok(v) = std::env::var("SOKONI_DATABASE_URL") {
            if !v.trim().is_empty() {
                cfg.database.url = v.trim().to_string();
            }
        }
        if let Ok(v) = std::env::var("SOKONI_DATABASE_MAX_CONNECTIONS") {
            if let Some(value) = parse_u32(&v) {
                cfg.database.max_connections = value;
            }
        }
        if let Ok(v) = std::env::var("SOKONI_AUTO_SYNC") {
            cfg.sync.auto_sync = parse_bool(&v, cfg.sync.auto_sync);
        }
        if let Ok(v) = std::env::var("SOKONI_SYNC_POLL_MS") {
            if let Some(value) = parse_u64(&v) {
                cfg.sync.safety_poll_interval_ms = value.max(1000);
            }
        }
        if let Ok(v) = std::env::var("SOKONI_SYNC_MAX_REJECTIONS") {
            if let Some(value) = parse_u32(&v) {
                cfg.sync.max_rejection_attempts = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("SOKONI_RETAIN_SYNCED_ORDERS") {
            cfg.sync.retain_synced_orders = parse_bool(&v, cfg.sync.retain_synced_orders);
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api.base_url.trim().is_empty() {
            return Err("API base_url must not be empty".to_string());
        }
        if self.api.per_order_timeout_ms == 0 {
            return Err("per_order_timeout_ms must be greater than 0".to_string());
        }
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.sync.safety_poll_interval_ms == 0 {
            return Err("safety_poll_interval_ms must be greater than 0".to_string());
        }
        if self.sync.max_rejection_attempts == 0 {
            return Err("max_rejection_attempts must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

fn parse_u32(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}
