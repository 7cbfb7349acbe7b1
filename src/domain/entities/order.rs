use crate::domain::value_objects::{
    ClientRef, Gps, OrderLocalId, PhoneNumber, ProductId, SyncState,
};
use serde::{Deserialize, Serialize};

/// One line of an order. Name and unit price are copied out of the catalog at
/// submission time, so the line stays historically accurate when the cached
/// product is later repriced or removed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl OrderLine {
    pub fn subtotal(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// A candidate order as assembled by the UI, before intake validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer_name: String,
    pub customer_phone: PhoneNumber,
    pub city: Option<String>,
    pub delivery_desc: Option<String>,
    pub lines: Vec<OrderLine>,
    pub total_amount: f64,
    pub gps: Option<Gps>,
    pub voice_note: Option<Vec<u8>>,
}

/// Tolerance for comparing a submitted total against the line subtotals.
const TOTAL_TOLERANCE: f64 = 0.01;

impl OrderDraft {
    pub fn validate(&self) -> Result<(), String> {
        if self.customer_name.trim().is_empty() {
            return Err("Customer name is required".to_string());
        }
        if self.lines.is_empty() {
            return Err("Order must contain at least one item".to_string());
        }
        for line in &self.lines {
            if line.quantity == 0 {
                return Err(format!("Item '{}' has zero quantity", line.product_id));
            }
            if line.unit_price < 0.0 {
                return Err(format!("Item '{}' has a negative price", line.product_id));
            }
        }
        if self.total_amount < 0.0 {
            return Err("Total amount cannot be negative".to_string());
        }
        let computed: f64 = self.lines.iter().map(OrderLine::subtotal).sum();
        if (computed - self.total_amount).abs() > TOTAL_TOLERANCE {
            return Err(format!(
                "Total amount {} does not match line items ({computed})",
                self.total_amount
            ));
        }
        Ok(())
    }
}

/// A frozen order in the on-device queue. Everything but the sync bookkeeping
/// is immutable after creation; an order is never edited, only re-created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfflineOrder {
    pub local_id: OrderLocalId,
    pub client_ref: ClientRef,
    pub customer_name: String,
    pub customer_phone: PhoneNumber,
    pub city: Option<String>,
    pub delivery_desc: Option<String>,
    pub lines: Vec<OrderLine>,
    pub total_amount: f64,
    pub gps: Option<Gps>,
    pub voice_note: Option<Vec<u8>>,
    pub sync_state: SyncState,
    pub sync_attempts: u32,
    pub last_error: Option<String>,
    pub remote_id: Option<String>,
    pub created_at: i64,
    pub synced_at: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, qty: u32, price: f64) -> OrderLine {
        OrderLine {
            product_id: ProductId::new(id.to_string()).unwrap(),
            name: id.to_string(),
            quantity: qty,
            unit_price: price,
        }
    }

    fn draft(lines: Vec<OrderLine>, total: f64) -> OrderDraft {
        OrderDraft {
            customer_name: "Awa".to_string(),
            customer_phone: PhoneNumber::new("70000000".to_string()).unwrap(),
            city: None,
            delivery_desc: None,
            lines,
            total_amount: total,
            gps: None,
            voice_note: None,
        }
    }

    #[test]
    fn accepts_consistent_draft() {
        assert!(draft(vec![line("p1", 2, 750.0)], 1500.0).validate().is_ok());
    }

    #[test]
    fn rejects_empty_items_and_blank_name() {
        assert!(draft(vec![], 0.0).validate().is_err());

        let mut d = draft(vec![line("p1", 1, 100.0)], 100.0);
        d.customer_name = "   ".to_string();
        assert!(d.validate().is_err());
    }

    #[test]
    fn rejects_zero_quantity_and_mismatched_total() {
        assert!(draft(vec![line("p1", 0, 100.0)], 0.0).validate().is_err());
        assert!(draft(vec![line("p1", 2, 750.0)], 1400.0).validate().is_err());
    }
}
