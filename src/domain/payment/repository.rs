//! Payment repository interface

use async_trait::async_trait;

use super::model::Payment;
use crate::domain::booking::Booking;
use crate::domain::DomainResult;

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn find_for_booking(&self, booking_id: i32) -> DomainResult<Vec<Payment>>;

    /// Record a verified gateway payment and mark the booking paid in
    /// full, atomically: inserts a SUCCESS payment row for the booking's
    /// total and sets `paid_amount = total_amount`, `payment_status = PAID`.
    async fn record_gateway_success(
        &self,
        booking_id: i32,
        gateway_order_id: &str,
        gateway_payment_id: &str,
    ) -> DomainResult<Booking>;
}
