use crate::application::ports::{OrderAck, OrderGateway, OrderPayload, ProductGateway};
use crate::domain::entities::CachedProduct;
use crate::domain::value_objects::{OrderStatus, ProductId};
use crate::shared::config::ApiConfig;
use crate::shared::error::AppError;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Catalog entry as served by the remote Product API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProductRecord {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    unit: String,
    price: f64,
    #[serde(default)]
    quantity: i64,
    #[serde(default)]
    images: Vec<String>,
    #[serde(default)]
    producer_id: String,
    #[serde(default)]
    status: String,
}

impl ProductRecord {
    fn into_product(self) -> Result<CachedProduct, AppError> {
        Ok(CachedProduct {
            id: ProductId::new(self.id).map_err(AppError::Serialization)?,
            name: self.name,
            category: self.category,
            unit: self.unit,
            price: self.price,
            quantity: self.quantity,
            images: self.images,
            producer_id: self.producer_id,
            status: self.status,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SyncResponse {
    success: bool,
    #[serde(rename = "orderId")]
    order_id: Option<String>,
    error: Option<String>,
}

/// HTTP adapter for both remote APIs. One shared client; the configured
/// per-order timeout bounds every request, and expiry surfaces as a
/// transient network error.
pub struct RemoteApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl RemoteApiClient {
    pub fn new(config: &ApiConfig) -> Result<Self, AppError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.per_order_timeout_ms))
            .build()
            .map_err(|err| AppError::Configuration(err.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ProductGateway for RemoteApiClient {
    async fn fetch_products(&self) -> Result<Vec<CachedProduct>, AppError> {
        let url = format!("{}/products", self.base_url);
        let response = self.http.get(&url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Network(format!(
                "product fetch returned {status}"
            )));
        }

        let records: Vec<ProductRecord> = response.json().await?;
        debug!(count = records.len(), "fetched product catalog");
        records.into_iter().map(ProductRecord::into_product).collect()
    }
}

#[async_trait]
impl OrderGateway for RemoteApiClient {
    async fn submit_order(
        &self,
        payload: &OrderPayload,
        voice_note: Option<&[u8]>,
    ) -> Result<OrderAck, AppError> {
        let url = format!("{}/orders/sync", self.base_url);
        let data = serde_json::to_string(payload)?;

        let mut form = Form::new().part("data", Part::text(data).mime_str("application/json")?);
        if let Some(bytes) = voice_note {
            form = form.part(
                "voiceNote",
                Part::bytes(bytes.to_vec())
                    .file_name("voice-note.webm")
                    .mime_str("audio/webm")?,
            );
        }

        let response = self.http.post(&url).multipart(form).send().await?;
        let status = response.status();

        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::RemoteRejected(reject_reason(status, &body)));
        }
        if !status.is_success() {
            return Err(AppError::Network(format!("order sync returned {status}")));
        }

        let ack: SyncResponse = response
            .json()
            .await
            .map_err(|err| AppError::Network(format!("malformed acknowledgment: {err}")))?;

        if !ack.success {
            return Err(AppError::RemoteRejected(
                ack.error.unwrap_or_else(|| "order refused".to_string()),
            ));
        }
        match ack.order_id {
            Some(order_id) => Ok(OrderAck { order_id }),
            None => Err(AppError::Network(
                "acknowledgment missing orderId".to_string(),
            )),
        }
    }

    async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<(), AppError> {
        let url = format!("{}/orders/{}", self.base_url, order_id);
        let response = self
            .http
            .patch(&url)
            .json(&serde_json::json!({ "status": status.as_str() }))
            .send()
            .await?;

        let http_status = response.status();
        if http_status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("order {order_id}")));
        }
        if http_status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::RemoteRejected(reject_reason(http_status, &body)));
        }
        if !http_status.is_success() {
            return Err(AppError::Network(format!(
                "status update returned {http_status}"
            )));
        }
        Ok(())
    }
}

fn reject_reason(status: reqwest::StatusCode, body: &str) -> String {
    #[derive(Deserialize)]
    struct ErrorBody {
        error: Option<String>,
    }

    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| format!("status {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_record_tolerates_missing_optional_fields() {
        let record: ProductRecord =
            serde_json::from_str(r#"{"id":"p1","price":750.0,"producerId":"farm_9"}"#).unwrap();
        let product = record.into_product().unwrap();
        assert_eq!(product.id.as_str(), "p1");
        assert_eq!(product.producer_id, "farm_9");
        assert!(product.images.is_empty());
    }

    #[test]
    fn sync_response_parses_both_shapes() {
        let ok: SyncResponse =
            serde_json::from_str(r#"{"success":true,"orderId":"ord_1"}"#).unwrap();
        assert!(ok.success);
        assert_eq!(ok.order_id.as_deref(), Some("ord_1"));

        let err: SyncResponse =
            serde_json::from_str(r#"{"success":false,"error":"unknown product"}"#).unwrap();
        assert!(!err.success);
        assert_eq!(err.error.as_deref(), Some("unknown product"));
    }

    #[test]
    fn reject_reason_prefers_the_server_message() {
        let status = reqwest::StatusCode::BAD_REQUEST;
        assert_eq!(
            reject_reason(status, r#"{"success":false,"error":"missing phone"}"#),
            "missing phone"
        );
        assert_eq!(reject_reason(status, "not json"), "status 400 Bad Request");
    }

    #[test]
    fn order_payload_serializes_to_the_wire_contract() {
        let payload = OrderPayload {
            client_ref: "0d4ce2f0-a7a4-4b33-9ff4-6f5b80f0f3aa".to_string(),
            customer_name: "Awa".to_string(),
            customer_phone: "70000000".to_string(),
            total_amount: 1500.0,
            city: None,
            gps_lat: Some(12.37),
            gps_lng: Some(-1.53),
            delivery_desc: None,
            product_ids: vec![crate::application::ports::OrderPayloadLine {
                product_id: "p1".to_string(),
                quantity: 2,
                price: 750.0,
            }],
        };

        let value: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&payload).unwrap()).unwrap();
        assert_eq!(value["customerName"], "Awa");
        assert_eq!(value["customerPhone"], "70000000");
        assert_eq!(value["productIds"][0]["productId"], "p1");
        assert_eq!(value["gpsLat"], 12.37);
        // Absent optionals are omitted, not null.
        assert!(value.get("city").is_none());
    }
}
