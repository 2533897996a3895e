//! SeaORM OTP repository
//!
//! The (booking_id, otp_type) unique index turns issuance into an
//! upsert, and `verify_and_advance` couples code acceptance with the
//! booking state transition in a single transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};

use super::convert::{booking_to_domain, db_err, otp_to_domain};
use crate::domain::booking::Booking;
use crate::domain::otp::{BookingOtp, NewBookingOtp, OtpRepository, OtpType, OtpVerifier};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{booking, booking_otp};

pub struct SeaOrmOtpRepository {
    db: DatabaseConnection,
}

impl SeaOrmOtpRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl OtpRepository for SeaOrmOtpRepository {
    async fn find(&self, booking_id: i32, otp_type: OtpType) -> DomainResult<Option<BookingOtp>> {
        booking_otp::Entity::find()
            .filter(booking_otp::Column::BookingId.eq(booking_id))
            .filter(booking_otp::Column::OtpType.eq(otp_type.as_str()))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(otp_to_domain)
            .transpose()
    }

    async fn upsert(&self, otp: NewBookingOtp) -> DomainResult<BookingOtp> {
        let now = Utc::now();
        let row = booking_otp::ActiveModel {
            booking_id: Set(otp.booking_id),
            otp_type: Set(otp.otp_type.as_str().to_string()),
            otp_code: Set(otp.otp_code),
            expires_at: Set(otp.expires_at),
            verified_at: Set(None),
            verified_by: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        booking_otp::Entity::insert(row)
            .on_conflict(
                OnConflict::columns([booking_otp::Column::BookingId, booking_otp::Column::OtpType])
                    .update_columns([
                        booking_otp::Column::OtpCode,
                        booking_otp::Column::ExpiresAt,
                        booking_otp::Column::VerifiedAt,
                        booking_otp::Column::VerifiedBy,
                        booking_otp::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        // Re-read: on the conflict path the insert result's id points at
        // nothing useful.
        self.find(otp.booking_id, otp.otp_type)
            .await?
            .ok_or_else(|| DomainError::Storage("otp row missing after upsert".to_string()))
    }

    async fn verify_and_advance(
        &self,
        booking_id: i32,
        otp_type: OtpType,
        code: &str,
        verified_by: OtpVerifier,
        now: DateTime<Utc>,
    ) -> DomainResult<Booking> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let row = booking_otp::Entity::find()
            .filter(booking_otp::Column::BookingId.eq(booking_id))
            .filter(booking_otp::Column::OtpType.eq(otp_type.as_str()))
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or(DomainError::InvalidOrExpiredOtp)?;

        // One opaque error for mismatch, reuse and expiry alike.
        if row.otp_code != code || row.verified_at.is_some() || row.expires_at <= now {
            return Err(DomainError::InvalidOrExpiredOtp);
        }

        let header = booking::Entity::find_by_id(booking_id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::NotFound {
                entity: "booking",
                field: "id",
                value: booking_id.to_string(),
            })?;
        let current = booking_to_domain(header.clone())?;
        current.ensure_transition(otp_type.target_status())?;

        let mut otp_active: booking_otp::ActiveModel = row.into();
        otp_active.verified_at = Set(Some(now));
        otp_active.verified_by = Set(Some(verified_by.as_str().to_string()));
        otp_active.updated_at = Set(now);
        otp_active.update(&txn).await.map_err(db_err)?;

        let mut booking_active: booking::ActiveModel = header.into();
        booking_active.status = Set(otp_type.target_status().as_str().to_string());
        booking_active.updated_at = Set(now);
        let advanced = booking_active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        booking_to_domain(advanced)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    use crate::domain::booking::{
        BookingRepository, BookingStatus, NewSelfDriveBooking, PricingQuote, TimeWindow,
    };
    use crate::infrastructure::database::repositories::SeaOrmBookingRepository;
    use crate::infrastructure::database::test_support::{seed_car, seed_user, test_db};

    fn utc(h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 10, h, 0, 0).unwrap()
    }

    async fn setup() -> (DatabaseConnection, Booking) {
        let db = test_db().await;
        let host = seed_user(&db, "host@zipdrive.in", "HOST").await;
        let guest = seed_user(&db, "guest@zipdrive.in", "GUEST").await;
        let car = seed_car(&db, host, 100).await;

        let window = TimeWindow::new(utc(10), utc(14)).unwrap();
        let bookings = SeaOrmBookingRepository::new(db.clone());
        let (header, _) = bookings
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
                pricing: PricingQuote::compute(100, &window, 0, 0, 0, 0.18),
            })
            .await
            .unwrap();
        (db, header)
    }

    fn issue(booking_id: i32, code: &str, expires_at: DateTime<Utc>) -> NewBookingOtp {
        NewBookingOtp {
            booking_id,
            otp_type: OtpType::Pickup,
            otp_code: code.to_string(),
            expires_at,
        }
    }

    #[tokio::test]
    async fn upsert_overwrites_the_single_row() {
        let (db, header) = setup().await;
        let repo = SeaOrmOtpRepository::new(db.clone());

        let first = repo.upsert(issue(header.id, "111111", utc(10))).await.unwrap();
        let second = repo.upsert(issue(header.id, "222222", utc(10))).await.unwrap();

        assert_eq!(second.otp_code, "222222");
        assert_eq!(first.booking_id, second.booking_id);

        let rows = booking_otp::Entity::find().all(&db).await.unwrap();
        assert_eq!(rows.len(), 1);
    }

    #[tokio::test]
    async fn verification_advances_confirmed_to_active() {
        let (db, header) = setup().await;
        let repo = SeaOrmOtpRepository::new(db);
        repo.upsert(issue(header.id, "123456", utc(10))).await.unwrap();

        let advanced = repo
            .verify_and_advance(
                header.id,
                OtpType::Pickup,
                "123456",
                OtpVerifier::Guest,
                utc(10) - Duration::minutes(10),
            )
            .await
            .unwrap();
        assert_eq!(advanced.status, BookingStatus::Active);

        let row = repo.find(header.id, OtpType::Pickup).await.unwrap().unwrap();
        assert!(row.verified_at.is_some());
        assert_eq!(row.verified_by, Some(OtpVerifier::Guest));
    }

    #[tokio::test]
    async fn wrong_code_leaves_everything_untouched() {
        let (db, header) = setup().await;
        let repo = SeaOrmOtpRepository::new(db.clone());
        repo.upsert(issue(header.id, "123456", utc(10))).await.unwrap();

        let err = repo
            .verify_and_advance(
                header.id,
                OtpType::Pickup,
                "654321",
                OtpVerifier::Guest,
                utc(9),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidOrExpiredOtp));

        let bookings = SeaOrmBookingRepository::new(db);
        let unchanged = bookings.find_by_id(header.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn verified_code_cannot_be_reused() {
        let (db, header) = setup().await;
        let repo = SeaOrmOtpRepository::new(db);
        repo.upsert(issue(header.id, "123456", utc(10))).await.unwrap();

        repo.verify_and_advance(header.id, OtpType::Pickup, "123456", OtpVerifier::Guest, utc(9))
            .await
            .unwrap();
        let err = repo
            .verify_and_advance(header.id, OtpType::Pickup, "123456", OtpVerifier::Guest, utc(9))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidOrExpiredOtp));
    }

    #[tokio::test]
    async fn expired_code_is_rejected() {
        let (db, header) = setup().await;
        let repo = SeaOrmOtpRepository::new(db);
        repo.upsert(issue(header.id, "123456", utc(10))).await.unwrap();

        // Expiry boundary itself is already invalid.
        let err = repo
            .verify_and_advance(header.id, OtpType::Pickup, "123456", OtpVerifier::Guest, utc(10))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidOrExpiredOtp));
    }

    #[tokio::test]
    async fn drop_otp_requires_active_booking() {
        let (db, header) = setup().await;
        let repo = SeaOrmOtpRepository::new(db);
        repo.upsert(NewBookingOtp {
            booking_id: header.id,
            otp_type: OtpType::Drop,
            otp_code: "777777".into(),
            expires_at: utc(14),
        })
        .await
        .unwrap();

        // Booking is still CONFIRMED; drop verification must not jump it
        // straight to COMPLETED.
        let err = repo
            .verify_and_advance(header.id, OtpType::Drop, "777777", OtpVerifier::Host, utc(13))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::IllegalTransition { .. }));
    }

    #[tokio::test]
    async fn pickup_and_drop_rows_coexist() {
        let (db, header) = setup().await;
        let repo = SeaOrmOtpRepository::new(db.clone());

        repo.upsert(issue(header.id, "111111", utc(10))).await.unwrap();
        repo.upsert(NewBookingOtp {
            booking_id: header.id,
            otp_type: OtpType::Drop,
            otp_code: "222222".into(),
            expires_at: utc(14),
        })
        .await
        .unwrap();

        let rows = booking_otp::Entity::find().all(&db).await.unwrap();
        assert_eq!(rows.len(), 2);
    }
}
