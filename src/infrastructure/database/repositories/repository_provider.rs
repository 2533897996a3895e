//! SeaORM-backed repository provider

use sea_orm::DatabaseConnection;

use super::{SeaOrmBookingRepository, SeaOrmOtpRepository, SeaOrmPaymentRepository};
use crate::domain::booking::BookingRepository;
use crate::domain::otp::OtpRepository;
use crate::domain::payment::PaymentRepository;
use crate::domain::repositories::RepositoryProvider;

pub struct SeaOrmRepositoryProvider {
    bookings: SeaOrmBookingRepository,
    otps: SeaOrmOtpRepository,
    payments: SeaOrmPaymentRepository,
}

impl SeaOrmRepositoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            bookings: SeaOrmBookingRepository::new(db.clone()),
            otps: SeaOrmOtpRepository::new(db.clone()),
            payments: SeaOrmPaymentRepository::new(db),
        }
    }
}

impl RepositoryProvider for SeaOrmRepositoryProvider {
    fn bookings(&self) -> &dyn BookingRepository {
        &self.bookings
    }

    fn otps(&self) -> &dyn OtpRepository {
        &self.otps
    }

    fn payments(&self) -> &dyn PaymentRepository {
        &self.payments
    }
}
