//! Payment gateway port

use async_trait::async_trait;

use crate::domain::DomainResult;

/// Gateway order handle returned to the client for checkout.
#[derive(Debug, Clone)]
pub struct OrderRef {
    pub order_id: String,
    /// Amount in the gateway's smallest unit (paise).
    pub amount: i64,
    pub currency: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a gateway order for the booking's total (whole rupees).
    async fn create_order(&self, booking_id: i32, amount: i64) -> DomainResult<OrderRef>;

    /// Check the gateway's callback signature over (order_id, payment_id).
    fn verify_signature(&self, order_id: &str, payment_id: &str, signature: &str) -> bool;
}
