mod orders;
mod products;

use crate::shared::error::AppError;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use serde::Serialize;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Remote end of the sync pipeline: accepts order submissions (multipart),
/// order status transitions, and serves the product catalog the client
/// caches.
#[derive(Clone)]
pub struct NodeState {
    pub pool: SqlitePool,
}

pub struct NodeConfig {
    pub addr: SocketAddr,
    pub database_url: String,
}

impl NodeConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let addr = std::env::var("SOKONI_NODE_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .map_err(|err| AppError::Configuration(format!("invalid SOKONI_NODE_ADDR: {err}")))?;
        let database_url = std::env::var("SOKONI_NODE_DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:data/sokoni-node.db?mode=rwc".to_string());
        Ok(Self { addr, database_url })
    }
}

pub async fn init_schema(pool: &SqlitePool) -> Result<(), AppError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            client_ref TEXT UNIQUE,
            customer_name TEXT NOT NULL,
            customer_phone TEXT NOT NULL,
            city TEXT,
            delivery_desc TEXT,
            total_amount REAL NOT NULL,
            gps_lat REAL,
            gps_lng REAL,
            voice_note BLOB,
            status TEXT NOT NULL DEFAULT 'pending',
            created_at INTEGER NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS order_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            order_id INTEGER NOT NULL REFERENCES orders(id),
            product_id TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            price REAL NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS products (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            category TEXT NOT NULL DEFAULT '',
            unit TEXT NOT NULL DEFAULT '',
            price REAL NOT NULL,
            quantity INTEGER NOT NULL DEFAULT 0,
            images TEXT NOT NULL DEFAULT '[]',
            producer_id TEXT NOT NULL DEFAULT '',
            status TEXT NOT NULL DEFAULT 'active'
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

pub fn router(state: NodeState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/products", get(products::list_products))
        .route("/orders/sync", post(orders::sync_order))
        .route("/orders/{id}", patch(orders::update_status))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(config: NodeConfig) -> anyhow::Result<()> {
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&config.database_url)
        .await?;
    init_schema(&pool).await?;

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(addr = %config.addr, "sokoni node listening");
    axum::serve(listener, router(NodeState { pool })).await?;
    Ok(())
}

#[derive(Serialize)]
struct HealthStatus {
    status: String,
}

async fn healthz(State(state): State<NodeState>) -> impl IntoResponse {
    match sqlx::query("SELECT 1").execute(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthStatus {
                status: "ok".to_string(),
            }),
        ),
        Err(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(HealthStatus {
                status: "unavailable".to_string(),
            }),
        ),
    }
}
