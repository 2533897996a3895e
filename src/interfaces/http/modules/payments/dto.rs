//! Payment DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::gateway::OrderRef;

/// Gateway order handed to the client for checkout
#[derive(Debug, Serialize, ToSchema)]
pub struct OrderDto {
    pub order_id: String,
    /// Amount in paise
    pub amount: i64,
    pub currency: String,
}

impl From<OrderRef> for OrderDto {
    fn from(o: OrderRef) -> Self {
        Self {
            order_id: o.order_id,
            amount: o.amount,
            currency: o.currency,
        }
    }
}

/// Order creation result. `order` is null when nothing is outstanding.
#[derive(Debug, Serialize, ToSchema)]
pub struct CreateOrderResponse {
    pub order: Option<OrderDto>,
}

/// Checkout callback payload from the client
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyPaymentRequest {
    #[validate(length(min = 1, max = 128))]
    pub order_id: String,
    #[validate(length(min = 1, max = 128))]
    pub payment_id: String,
    #[validate(length(min = 1, max = 256))]
    pub signature: String,
}
