use crate::domain::value_objects::OrderStatus;
use crate::node::NodeState;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::{info, warn};

/// JSON `data` part of a synced order submission.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSyncData {
    #[serde(default)]
    pub client_ref: Option<String>,
    pub customer_name: String,
    pub customer_phone: String,
    pub total_amount: f64,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub gps_lat: Option<f64>,
    #[serde(default)]
    pub gps_lng: Option<f64>,
    #[serde(default)]
    pub delivery_desc: Option<String>,
    pub product_ids: Vec<OrderSyncLine>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSyncLine {
    pub product_id: String,
    pub quantity: u32,
    pub price: f64,
}

impl OrderSyncData {
    fn validate(&self) -> Result<(), String> {
        if self.customer_name.trim().is_empty() {
            return Err("customerName is required".to_string());
        }
        if self.customer_phone.trim().is_empty() {
            return Err("customerPhone is required".to_string());
        }
        if self.product_ids.is_empty() {
            return Err("productIds must not be empty".to_string());
        }
        if self.total_amount < 0.0 {
            return Err("totalAmount cannot be negative".to_string());
        }
        for line in &self.product_ids {
            if line.product_id.trim().is_empty() {
                return Err("productId is required on every line".to_string());
            }
            if line.quantity == 0 {
                return Err(format!("product '{}' has zero quantity", line.product_id));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct SyncResponseBody {
    pub success: bool,
    #[serde(rename = "orderId", skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncResponseBody {
    fn ok(order_id: String) -> Json<Self> {
        Json(Self {
            success: true,
            order_id: Some(order_id),
            error: None,
        })
    }

    fn err(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: false,
            order_id: None,
            error: Some(message.into()),
        })
    }
}

fn format_order_id(rowid: i64) -> String {
    format!("ord_{rowid}")
}

fn parse_order_id(raw: &str) -> Option<i64> {
    raw.strip_prefix("ord_").unwrap_or(raw).parse().ok()
}

/// Accepts the multipart payload the sync engine transmits: a `data` JSON
/// part plus an optional `voiceNote` binary part. Replays carrying a known
/// clientRef resolve to the original order instead of a duplicate.
pub async fn sync_order(
    State(state): State<NodeState>,
    mut multipart: Multipart,
) -> (StatusCode, Json<SyncResponseBody>) {
    let mut data: Option<OrderSyncData> = None;
    let mut voice_note: Option<Vec<u8>> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                return (
                    StatusCode::BAD_REQUEST,
                    SyncResponseBody::err(format!("malformed multipart body: {err}")),
                );
            }
        };

        let name = field.name().map(ToString::to_string);
        match name.as_deref() {
            Some("data") => {
                let text = match field.text().await {
                    Ok(text) => text,
                    Err(err) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            SyncResponseBody::err(format!("unreadable data part: {err}")),
                        );
                    }
                };
                match serde_json::from_str(&text) {
                    Ok(parsed) => data = Some(parsed),
                    Err(err) => {
                        return (
                            StatusCode::BAD_REQUEST,
                            SyncResponseBody::err(format!("invalid order data: {err}")),
                        );
                    }
                }
            }
            Some("voiceNote") => match field.bytes().await {
                Ok(bytes) => voice_note = Some(bytes.to_vec()),
                Err(err) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        SyncResponseBody::err(format!("unreadable voice note: {err}")),
                    );
                }
            },
            _ => {}
        }
    }

    let Some(data) = data else {
        return (
            StatusCode::BAD_REQUEST,
            SyncResponseBody::err("missing data part"),
        );
    };
    if let Err(reason) = data.validate() {
        return (StatusCode::BAD_REQUEST, SyncResponseBody::err(reason));
    }

    match persist_order(&state, &data, voice_note).await {
        Ok(order_id) => (StatusCode::OK, SyncResponseBody::ok(order_id)),
        Err(err) => {
            warn!(error = %err, "failed to persist synced order");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                SyncResponseBody::err("storage failure"),
            )
        }
    }
}

async fn persist_order(
    state: &NodeState,
    data: &OrderSyncData,
    voice_note: Option<Vec<u8>>,
) -> Result<String, sqlx::Error> {
    let mut tx = state.pool.begin().await?;

    if let Some(client_ref) = data.client_ref.as_deref() {
        let existing: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM orders WHERE client_ref = ?1")
                .bind(client_ref)
                .fetch_optional(&mut *tx)
                .await?;
        if let Some((id,)) = existing {
            info!(order = id, client_ref, "replayed submission, returning original order");
            return Ok(format_order_id(id));
        }
    }

    let result = sqlx::query(
        r#"
        INSERT INTO orders (
            client_ref, customer_name, customer_phone, city, delivery_desc,
            total_amount, gps_lat, gps_lng, voice_note, status, created_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 'pending', ?10)
        "#,
    )
    .bind(&data.client_ref)
    .bind(&data.customer_name)
    .bind(&data.customer_phone)
    .bind(&data.city)
    .bind(&data.delivery_desc)
    .bind(data.total_amount)
    .bind(data.gps_lat)
    .bind(data.gps_lng)
    .bind(&voice_note)
    .bind(Utc::now().timestamp())
    .execute(&mut *tx)
    .await?;

    let order_id = result.last_insert_rowid();
    for line in &data.product_ids {
        sqlx::query(
            "INSERT INTO order_items (order_id, product_id, quantity, price) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(order_id)
        .bind(&line.product_id)
        .bind(i64::from(line.quantity))
        .bind(line.price)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    info!(order = order_id, "order accepted");
    Ok(format_order_id(order_id))
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub total_amount: f64,
    pub status: String,
    pub created_at: i64,
}

pub async fn update_status(
    State(state): State<NodeState>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<OrderRecord>, (StatusCode, Json<SyncResponseBody>)> {
    let status = OrderStatus::from_str(&update.status).map_err(|reason| {
        (StatusCode::BAD_REQUEST, SyncResponseBody::err(reason))
    })?;
    let Some(rowid) = parse_order_id(&id) else {
        return Err((
            StatusCode::NOT_FOUND,
            SyncResponseBody::err(format!("unknown order '{id}'")),
        ));
    };

    let result = sqlx::query("UPDATE orders SET status = ?1 WHERE id = ?2")
        .bind(status.as_str())
        .bind(rowid)
        .execute(&state.pool)
        .await
        .map_err(|err| {
            warn!(error = %err, "status update failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                SyncResponseBody::err("storage failure"),
            )
        })?;

    if result.rows_affected() == 0 {
        return Err((
            StatusCode::NOT_FOUND,
            SyncResponseBody::err(format!("unknown order '{id}'")),
        ));
    }

    let row: (String, String, f64, String, i64) = sqlx::query_as(
        "SELECT customer_name, customer_phone, total_amount, status, created_at FROM orders WHERE id = ?1",
    )
    .bind(rowid)
    .fetch_one(&state.pool)
    .await
    .map_err(|err| {
        warn!(error = %err, "order lookup failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            SyncResponseBody::err("storage failure"),
        )
    })?;

    Ok(Json(OrderRecord {
        id: format_order_id(rowid),
        customer_name: row.0,
        customer_phone: row.1,
        total_amount: row.2,
        status: row.3,
        created_at: row.4,
    }))
}
