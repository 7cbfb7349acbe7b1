use crate::domain::value_objects::ProductId;
use serde::{Deserialize, Serialize};

/// Local mirror of a remote catalog entry. The whole table is overwritten on
/// every successful fetch, so a row is only as fresh as the last refresh and
/// never survives a server-side deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedProduct {
    pub id: ProductId,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub price: f64,
    pub quantity: i64,
    pub images: Vec<String>,
    pub producer_id: String,
    pub status: String,
}

impl CachedProduct {
    pub fn matches_name(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}
