use crate::domain::entities::{OfflineOrder, OrderDraft};
use crate::domain::value_objects::{ClientRef, OrderStatus};
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// JSON `data` part of an order submission. One line per purchased product,
/// with the price captured at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    pub client_ref: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub total_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gps_lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_desc: Option<String>,
    pub product_ids: Vec<OrderPayloadLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayloadLine {
    pub product_id: String,
    pub quantity: u32,
    pub price: f64,
}

impl OrderPayload {
    pub fn from_draft(draft: &OrderDraft, client_ref: &ClientRef) -> Self {
        Self {
            client_ref: client_ref.as_str().to_string(),
            customer_name: draft.customer_name.clone(),
            customer_phone: draft.customer_phone.as_str().to_string(),
            total_amount: draft.total_amount,
            city: draft.city.clone(),
            gps_lat: draft.gps.map(|g| g.lat()),
            gps_lng: draft.gps.map(|g| g.lng()),
            delivery_desc: draft.delivery_desc.clone(),
            product_ids: draft
                .lines
                .iter()
                .map(|line| OrderPayloadLine {
                    product_id: line.product_id.as_str().to_string(),
                    quantity: line.quantity,
                    price: line.unit_price,
                })
                .collect(),
        }
    }
}

impl From<&OfflineOrder> for OrderPayload {
    fn from(order: &OfflineOrder) -> Self {
        Self {
            client_ref: order.client_ref.as_str().to_string(),
            customer_name: order.customer_name.clone(),
            customer_phone: order.customer_phone.as_str().to_string(),
            total_amount: order.total_amount,
            city: order.city.clone(),
            gps_lat: order.gps.map(|g| g.lat()),
            gps_lng: order.gps.map(|g| g.lng()),
            delivery_desc: order.delivery_desc.clone(),
            product_ids: order
                .lines
                .iter()
                .map(|line| OrderPayloadLine {
                    product_id: line.product_id.as_str().to_string(),
                    quantity: line.quantity,
                    price: line.unit_price,
                })
                .collect(),
        }
    }
}

/// Server acknowledgment of a persisted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderAck {
    pub order_id: String,
}

/// Remote Order API.
///
/// Error contract: `AppError::Network` for anything worth retrying
/// indefinitely (unreachable host, timeout, 5xx, malformed acknowledgment);
/// `AppError::RemoteRejected` when the server explicitly refused the payload.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn submit_order(
        &self,
        payload: &OrderPayload,
        voice_note: Option<&[u8]>,
    ) -> Result<OrderAck, AppError>;
    async fn update_order_status(
        &self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<(), AppError>;
}
