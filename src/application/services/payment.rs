//! Payment service
//!
//! Bridges the gateway port and the payment repository: order creation
//! for the outstanding balance, and signed-callback confirmation.

use std::sync::Arc;

use crate::domain::booking::Booking;
use crate::domain::gateway::{OrderRef, PaymentGateway};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::{DomainError, DomainResult};

pub struct PaymentService {
    repos: Arc<dyn RepositoryProvider>,
    gateway: Arc<dyn PaymentGateway>,
}

impl PaymentService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { repos, gateway }
    }

    /// Create a gateway order for the booking's outstanding balance.
    /// `None` when nothing is owed.
    pub async fn create_order(&self, booking_id: i32) -> DomainResult<Option<OrderRef>> {
        let booking = self.require_booking(booking_id).await?;
        let outstanding = booking.total_amount - booking.paid_amount;
        if outstanding <= 0 {
            return Ok(None);
        }
        let order = self.gateway.create_order(booking_id, outstanding).await?;
        Ok(Some(order))
    }

    /// Confirm a gateway callback: the signature must check out before
    /// anything is written.
    pub async fn confirm(
        &self,
        booking_id: i32,
        order_id: &str,
        payment_id: &str,
        signature: &str,
    ) -> DomainResult<Booking> {
        if !self.gateway.verify_signature(order_id, payment_id, signature) {
            return Err(DomainError::Validation(
                "invalid payment signature".to_string(),
            ));
        }
        self.repos
            .payments()
            .record_gateway_success(booking_id, order_id, payment_id)
            .await
    }

    async fn require_booking(&self, booking_id: i32) -> DomainResult<Booking> {
        self.repos
            .bookings()
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "booking",
                field: "id",
                value: booking_id.to_string(),
            })
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    use crate::config::PaymentGatewayConfig;
    use crate::domain::booking::{
        BookingRepository, NewSelfDriveBooking, PaymentStatus, PricingQuote, TimeWindow,
    };
    use crate::infrastructure::database::repositories::SeaOrmRepositoryProvider;
    use crate::infrastructure::database::test_support::{seed_car, seed_user, test_db};
    use crate::infrastructure::gateway::HmacPaymentGateway;

    async fn setup() -> (PaymentService, Arc<HmacPaymentGateway>, Booking) {
        let db = test_db().await;
        let host = seed_user(&db, "host@zipdrive.in", "HOST").await;
        let guest = seed_user(&db, "guest@zipdrive.in", "GUEST").await;
        let car = seed_car(&db, host, 100).await;

        let start = Utc::now() + Duration::hours(2);
        let window = TimeWindow::new(start, start + Duration::hours(4)).unwrap();
        let repos = Arc::new(SeaOrmRepositoryProvider::new(db));
        let (booking, _) = repos
            .bookings()
            .create_self_drive(NewSelfDriveBooking {
                guest_id: guest,
                car_id: car,
                window,
                pickup_address: "MG Road".into(),
                pickup_lat: 12.97,
                pickup_long: 77.60,
                drop_address: "MG Road".into(),
                drop_lat: 12.97,
                drop_long: 77.60,
                pricing: PricingQuote::compute(100, &window, 50, 0, 0, 0.18),
            })
            .await
            .unwrap();

        let gateway = Arc::new(HmacPaymentGateway::new(PaymentGatewayConfig {
            key_id: "rzp_test_key".into(),
            key_secret: "rzp_test_secret".into(),
        }));
        let service = PaymentService::new(repos, gateway.clone());
        (service, gateway, booking)
    }

    #[tokio::test]
    async fn order_covers_the_outstanding_balance() {
        let (service, _, booking) = setup().await;
        let order = service.create_order(booking.id).await.unwrap().unwrap();
        assert_eq!(order.amount, booking.total_amount * 100);
    }

    #[tokio::test]
    async fn confirm_requires_a_valid_signature() {
        let (service, _, booking) = setup().await;

        let err = service
            .confirm(booking.id, "order_x", "pay_y", "bogus")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn valid_signature_settles_the_booking() {
        let (service, gateway, booking) = setup().await;
        let order = service.create_order(booking.id).await.unwrap().unwrap();

        // What the client-side checkout would post back.
        let signature = gateway.sign(&order.order_id, "pay_123");

        let settled = service
            .confirm(booking.id, &order.order_id, "pay_123", &signature)
            .await
            .unwrap();
        assert_eq!(settled.paid_amount, settled.total_amount);
        assert_eq!(settled.payment_status, PaymentStatus::Paid);

        // Fully paid now, so no further order is needed.
        assert!(service.create_order(booking.id).await.unwrap().is_none());
    }
}
