use crate::node::NodeState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use sqlx::FromRow;
use tracing::warn;

#[derive(Debug, Clone, FromRow)]
struct ProductRow {
    id: String,
    name: String,
    category: String,
    unit: String,
    price: f64,
    quantity: i64,
    images: String,
    producer_id: String,
    status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub price: f64,
    pub quantity: i64,
    pub images: Vec<String>,
    pub producer_id: String,
    pub status: String,
}

/// Full catalog listing; the client caches this wholesale.
pub async fn list_products(
    State(state): State<NodeState>,
) -> Result<Json<Vec<ProductRecord>>, StatusCode> {
    let rows = sqlx::query_as::<_, ProductRow>(
        "SELECT * FROM products ORDER BY name COLLATE NOCASE ASC",
    )
    .fetch_all(&state.pool)
    .await
    .map_err(|err| {
        warn!(error = %err, "product listing failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let records = rows
        .into_iter()
        .map(|row| ProductRecord {
            id: row.id,
            name: row.name,
            category: row.category,
            unit: row.unit,
            price: row.price,
            quantity: row.quantity,
            images: serde_json::from_str(&row.images).unwrap_or_default(),
            producer_id: row.producer_id,
            status: row.status,
        })
        .collect();

    Ok(Json(records))
}
