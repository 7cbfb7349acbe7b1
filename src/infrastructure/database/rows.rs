use crate::domain::entities::{CachedProduct, CartItem, OfflineOrder, OrderLine};
use crate::domain::value_objects::{ClientRef, Gps, OrderLocalId, PhoneNumber, ProductId};
use crate::shared::error::AppError;
use sqlx::FromRow;
use std::str::FromStr;

#[derive(Debug, Clone, FromRow)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub price: f64,
    pub quantity: i64,
    pub images: String,
    pub producer_id: String,
    pub status: String,
    #[allow(dead_code)]
    pub cached_at: i64,
}

impl ProductRow {
    pub fn into_product(self) -> Result<CachedProduct, AppError> {
        Ok(CachedProduct {
            id: ProductId::new(self.id).map_err(AppError::Database)?,
            name: self.name,
            category: self.category,
            unit: self.unit,
            price: self.price,
            quantity: self.quantity,
            images: serde_json::from_str(&self.images)?,
            producer_id: self.producer_id,
            status: self.status,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct OfflineOrderRow {
    pub id: i64,
    pub client_ref: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub city: Option<String>,
    pub delivery_desc: Option<String>,
    pub total_amount: f64,
    pub gps_lat: Option<f64>,
    pub gps_lng: Option<f64>,
    pub voice_note: Option<Vec<u8>>,
    pub sync_state: String,
    pub sync_attempts: i64,
    pub last_error: Option<String>,
    pub remote_id: Option<String>,
    pub created_at: i64,
    pub synced_at: Option<i64>,
}

impl OfflineOrderRow {
    pub fn into_order(self, lines: Vec<OrderLine>) -> Result<OfflineOrder, AppError> {
        let gps = match (self.gps_lat, self.gps_lng) {
            (Some(lat), Some(lng)) => Some(Gps::new(lat, lng).map_err(AppError::Database)?),
            _ => None,
        };
        Ok(OfflineOrder {
            local_id: OrderLocalId::new(self.id).map_err(AppError::Database)?,
            client_ref: ClientRef::new(self.client_ref).map_err(AppError::Database)?,
            customer_name: self.customer_name,
            customer_phone: PhoneNumber::new(self.customer_phone).map_err(AppError::Database)?,
            city: self.city,
            delivery_desc: self.delivery_desc,
            lines,
            total_amount: self.total_amount,
            gps,
            voice_note: self.voice_note,
            sync_state: FromStr::from_str(&self.sync_state).map_err(AppError::Database)?,
            sync_attempts: u32::try_from(self.sync_attempts)
                .map_err(|_| AppError::Database("negative sync_attempts".to_string()))?,
            last_error: self.last_error,
            remote_id: self.remote_id,
            created_at: self.created_at,
            synced_at: self.synced_at,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct OrderItemRow {
    #[allow(dead_code)]
    pub id: i64,
    #[allow(dead_code)]
    pub order_id: i64,
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
    pub unit_price: f64,
}

impl OrderItemRow {
    pub fn into_line(self) -> Result<OrderLine, AppError> {
        Ok(OrderLine {
            product_id: ProductId::new(self.product_id).map_err(AppError::Database)?,
            name: self.name,
            quantity: u32::try_from(self.quantity)
                .map_err(|_| AppError::Database("invalid line quantity".to_string()))?,
            unit_price: self.unit_price,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct CartItemRow {
    #[allow(dead_code)]
    pub id: i64,
    pub product_id: String,
    pub quantity: i64,
    pub added_at: i64,
}

impl CartItemRow {
    pub fn into_item(self) -> Result<CartItem, AppError> {
        Ok(CartItem {
            product_id: ProductId::new(self.product_id).map_err(AppError::Database)?,
            quantity: u32::try_from(self.quantity)
                .map_err(|_| AppError::Database("invalid cart quantity".to_string()))?,
            added_at: self.added_at,
        })
    }
}
