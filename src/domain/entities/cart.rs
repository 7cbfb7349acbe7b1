use crate::domain::value_objects::ProductId;
use serde::{Deserialize, Serialize};

/// Working-basket line. Ephemeral next to the order queue: checkout freezes
/// the basket into an order draft and clears it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: u32,
    pub added_at: i64,
}
