//! SeaORM payment repository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};

use super::convert::{booking_to_domain, db_err, payment_to_domain};
use crate::domain::booking::{Booking, PaymentStatus};
use crate::domain::payment::{Payment, PaymentMethod, PaymentOutcome, PaymentRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{booking, payment};

pub struct SeaOrmPaymentRepository {
    db: DatabaseConnection,
}

impl SeaOrmPaymentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl PaymentRepository for SeaOrmPaymentRepository {
    async fn find_for_booking(&self, booking_id: i32) -> DomainResult<Vec<Payment>> {
        payment::Entity::find()
            .filter(payment::Column::BookingId.eq(booking_id))
            .order_by_asc(payment::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(payment_to_domain)
            .collect()
    }

    async fn record_gateway_success(
        &self,
        booking_id: i32,
        gateway_order_id: &str,
        gateway_payment_id: &str,
    ) -> DomainResult<Booking> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let header = booking::Entity::find_by_id(booking_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::NotFound {
                entity: "booking",
                field: "id",
                value: booking_id.to_string(),
            })?;

        let now = Utc::now();
        payment::ActiveModel {
            booking_id: Set(header.id),
            amount: Set(header.total_amount),
            currency: Set("INR".to_string()),
            payment_method: Set(PaymentMethod::Razorpay.as_str().to_string()),
            gateway_order_id: Set(Some(gateway_order_id.to_string())),
            gateway_payment_id: Set(Some(gateway_payment_id.to_string())),
            status: Set(PaymentOutcome::Success.as_str().to_string()),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        let total = header.total_amount;
        let mut active: booking::ActiveModel = header.into();
        active.paid_amount = Set(total);
        active.payment_status = Set(PaymentStatus::Paid.as_str().to_string());
        active.updated_at = Set(now);
        let updated = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        booking_to_domain(updated)
    }
}

// ── Tests ──────────────────────────────────────────────────────
