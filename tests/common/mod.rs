#![allow(dead_code)]

use async_trait::async_trait;
use sokoni::application::ports::{OrderAck, OrderGateway, OrderPayload};
use sokoni::domain::entities::{OrderDraft, OrderLine};
use sokoni::domain::value_objects::{OrderStatus, PhoneNumber, ProductId};
use sokoni::shared::error::AppError;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Order gateway fake with scripted per-call outcomes; unscripted calls
/// succeed.
pub struct ScriptedOrderGateway {
    responses: Mutex<VecDeque<Result<(), AppError>>>,
    calls: AtomicU32,
}

impl ScriptedOrderGateway {
    pub fn new(responses: Vec<Result<(), AppError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicU32::new(0),
        }
    }

    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderGateway for ScriptedOrderGateway {
    async fn submit_order(
        &self,
        _payload: &OrderPayload,
        _voice_note: Option<&[u8]>,
    ) -> Result<OrderAck, AppError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let outcome = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(()));
        outcome.map(|_| OrderAck {
            order_id: format!("ord_{}", call + 1),
        })
    }

    async fn update_order_status(
        &self,
        _order_id: &str,
        _status: OrderStatus,
    ) -> Result<(), AppError> {
        Ok(())
    }
}

pub fn sample_draft(name: &str) -> OrderDraft {
    OrderDraft {
        customer_name: name.to_string(),
        customer_phone: PhoneNumber::new("70000000".to_string()).unwrap(),
        city: Some("Ouagadougou".to_string()),
        delivery_desc: Some("Near the water tower".to_string()),
        lines: vec![OrderLine {
            product_id: ProductId::new("p1".to_string()).unwrap(),
            name: "Tomatoes".to_string(),
            quantity: 2,
            unit_price: 750.0,
        }],
        total_amount: 1500.0,
        gps: None,
        voice_note: None,
    }
}
