//! SeaORM booking repository
//!
//! Owns the cross-mode overlap query and the transactional aggregate
//! writers. SQLite has no row locks, so the writers re-run the overlap
//! predicate on the transaction connection before inserting; the
//! service layer additionally serializes writers per car.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QueryTrait, Set, TransactionTrait,
};

use super::convert::{
    booking_to_domain, db_err, intercity_to_domain, self_drive_to_domain,
};
use crate::domain::booking::{
    Booking, BookingDetail, BookingRepository, BookingStatus, BookingType, DueBooking,
    IntercityDetail, NewIntercityBooking, NewSelfDriveBooking, SelfDriveDetail, TimeWindow,
};
use crate::domain::payment::{PaymentMethod, PaymentOutcome};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{
    booking, car, intercity_booking, payment, self_drive_booking,
};

pub struct SeaOrmBookingRepository {
    db: DatabaseConnection,
}

impl SeaOrmBookingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Overlap predicate, runnable on the pool or inside a transaction.
///
/// A window conflicts iff an existing CONFIRMED or ACTIVE booking of
/// either mode on the same car satisfies `existing.start < end &&
/// existing.end > start`. Strict comparisons: touching boundaries are
/// legal back-to-back rentals.
async fn conflict_exists<C: ConnectionTrait>(
    conn: &C,
    car_id: i32,
    window: &TimeWindow,
    exclude_booking: Option<i32>,
) -> DomainResult<bool> {
    let blocking = [
        BookingStatus::Confirmed.as_str(),
        BookingStatus::Active.as_str(),
    ];

    let self_drive = self_drive_booking::Entity::find()
        .inner_join(booking::Entity)
        .filter(booking::Column::CarId.eq(car_id))
        .filter(booking::Column::Status.is_in(blocking))
        .filter(self_drive_booking::Column::StartDatetime.lt(window.end))
        .filter(self_drive_booking::Column::EndDatetime.gt(window.start))
        .apply_if(exclude_booking, |q, id| {
            q.filter(booking::Column::Id.ne(id))
        })
        .count(conn)
        .await
        .map_err(db_err)?;
    if self_drive > 0 {
        return Ok(true);
    }

    let intercity = intercity_booking::Entity::find()
        .inner_join(booking::Entity)
        .filter(booking::Column::CarId.eq(car_id))
        .filter(booking::Column::Status.is_in(blocking))
        .filter(intercity_booking::Column::PickupDatetime.lt(window.end))
        .filter(intercity_booking::Column::DropDatetime.gt(window.start))
        .apply_if(exclude_booking, |q, id| {
            q.filter(booking::Column::Id.ne(id))
        })
        .count(conn)
        .await
        .map_err(db_err)?;
    Ok(intercity > 0)
}

/// Insert the booking header plus the initial ZERO_RS payment row.
/// Runs inside the caller's transaction.
async fn insert_header<C: ConnectionTrait>(
    txn: &C,
    guest_id: i32,
    car_id: i32,
    booking_type: BookingType,
    total_amount: i64,
    now: DateTime<Utc>,
) -> DomainResult<booking::Model> {
    let header = booking::ActiveModel {
        guest_id: Set(guest_id),
        car_id: Set(car_id),
        booking_type: Set(booking_type.as_str().to_string()),
        status: Set(BookingStatus::Confirmed.as_str().to_string()),
        total_amount: Set(total_amount),
        paid_amount: Set(0),
        payment_status: Set(crate::domain::booking::PaymentStatus::Paid.as_str().to_string()),
        cancelled_reason: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(txn)
    .await
    .map_err(db_err)?;

    payment::ActiveModel {
        booking_id: Set(header.id),
        amount: Set(0),
        currency: Set("INR".to_string()),
        payment_method: Set(PaymentMethod::ZeroRs.as_str().to_string()),
        gateway_order_id: Set(None),
        gateway_payment_id: Set(None),
        status: Set(PaymentOutcome::Success.as_str().to_string()),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(txn)
    .await
    .map_err(db_err)?;

    Ok(header)
}

#[async_trait]
impl BookingRepository for SeaOrmBookingRepository {
    async fn has_conflict(
        &self,
        car_id: i32,
        window: &TimeWindow,
        exclude_booking: Option<i32>,
    ) -> DomainResult<bool> {
        conflict_exists(&self.db, car_id, window, exclude_booking).await
    }

    async fn create_self_drive(
        &self,
        new: NewSelfDriveBooking,
    ) -> DomainResult<(Booking, SelfDriveDetail)> {
        let txn = self.db.begin().await.map_err(db_err)?;

        if conflict_exists(&txn, new.car_id, &new.window, None).await? {
            txn.rollback().await.map_err(db_err)?;
            return Err(DomainError::Conflict(
                "car is already booked for the requested window".to_string(),
            ));
        }

        let now = Utc::now();
        let header = insert_header(
            &txn,
            new.guest_id,
            new.car_id,
            BookingType::SelfDrive,
            new.pricing.total_amount,
            now,
        )
        .await?;

        let detail = self_drive_booking::ActiveModel {
            booking_id: Set(header.id),
            start_datetime: Set(new.window.start),
            end_datetime: Set(new.window.end),
            pickup_address: Set(new.pickup_address),
            pickup_lat: Set(new.pickup_lat),
            pickup_long: Set(new.pickup_long),
            drop_address: Set(new.drop_address),
            drop_lat: Set(new.drop_lat),
            drop_long: Set(new.drop_long),
            hourly_rate_snapshot: Set(new.pricing.hourly_rate_snapshot),
            base_amount: Set(new.pricing.base_amount),
            insure_amount: Set(new.pricing.insure_amount),
            driver_amount: Set(new.pricing.driver_amount),
            drop_charge: Set(new.pricing.drop_charge),
            gst_amount: Set(new.pricing.gst_amount),
            total_amount: Set(new.pricing.total_amount),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok((booking_to_domain(header)?, self_drive_to_domain(detail)))
    }

    async fn create_intercity(
        &self,
        new: NewIntercityBooking,
    ) -> DomainResult<(Booking, IntercityDetail)> {
        let txn = self.db.begin().await.map_err(db_err)?;

        if conflict_exists(&txn, new.car_id, &new.window, None).await? {
            txn.rollback().await.map_err(db_err)?;
            return Err(DomainError::Conflict(
                "car is already booked for the requested window".to_string(),
            ));
        }

        let now = Utc::now();
        let header = insert_header(
            &txn,
            new.guest_id,
            new.car_id,
            BookingType::Intercity,
            new.total_amount,
            now,
        )
        .await?;

        let detail = intercity_booking::ActiveModel {
            booking_id: Set(header.id),
            pickup_datetime: Set(new.window.start),
            drop_datetime: Set(new.window.end),
            pickup_address: Set(new.pickup_address),
            pickup_lat: Set(new.pickup_lat),
            pickup_long: Set(new.pickup_long),
            drop_address: Set(new.drop_address),
            drop_lat: Set(new.drop_lat),
            drop_long: Set(new.drop_long),
            pax: Set(new.pax),
            luggage: Set(new.luggage),
            distance_km: Set(new.distance_km),
            driver_amount: Set(new.driver_amount),
            created_at: Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        Ok((booking_to_domain(header)?, intercity_to_domain(detail)))
    }

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>> {
        booking::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?
            .map(booking_to_domain)
            .transpose()
    }

    async fn find_detail(&self, booking_id: i32) -> DomainResult<Option<BookingDetail>> {
        if let Some(m) = self_drive_booking::Entity::find()
            .filter(self_drive_booking::Column::BookingId.eq(booking_id))
            .one(&self.db)
            .await
            .map_err(db_err)?
        {
            return Ok(Some(BookingDetail::SelfDrive(self_drive_to_domain(m))));
        }
        if let Some(m) = intercity_booking::Entity::find()
            .filter(intercity_booking::Column::BookingId.eq(booking_id))
            .one(&self.db)
            .await
            .map_err(db_err)?
        {
            return Ok(Some(BookingDetail::Intercity(intercity_to_domain(m))));
        }
        Ok(None)
    }

    async fn find_for_guest(&self, guest_id: i32) -> DomainResult<Vec<Booking>> {
        booking::Entity::find()
            .filter(booking::Column::GuestId.eq(guest_id))
            .order_by_desc(booking::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(booking_to_domain)
            .collect()
    }

    async fn find_for_host(&self, host_id: i32) -> DomainResult<Vec<Booking>> {
        booking::Entity::find()
            .inner_join(car::Entity)
            .filter(car::Column::HostId.eq(host_id))
            .order_by_desc(booking::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(booking_to_domain)
            .collect()
    }

    async fn cancel(&self, id: i32, reason: &str) -> DomainResult<Booking> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let model = booking::Entity::find_by_id(id)
            .one(&txn)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::NotFound {
                entity: "booking",
                field: "id",
                value: id.to_string(),
            })?;

        let current = booking_to_domain(model.clone())?;
        current.ensure_transition(BookingStatus::Cancelled)?;

        let mut active: booking::ActiveModel = model.into();
        active.status = Set(BookingStatus::Cancelled.as_str().to_string());
        active.cancelled_reason = Set(Some(reason.to_string()));
        active.updated_at = Set(Utc::now());
        let updated = active.update(&txn).await.map_err(db_err)?;

        txn.commit().await.map_err(db_err)?;
        booking_to_domain(updated)
    }

    async fn find_due_for_pickup(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DomainResult<Vec<DueBooking>> {
        let mut due = Vec::new();

        let self_drive = self_drive_booking::Entity::find()
            .find_also_related(booking::Entity)
            .filter(booking::Column::Status.eq(BookingStatus::Confirmed.as_str()))
            .filter(self_drive_booking::Column::StartDatetime.gte(from))
            .filter(self_drive_booking::Column::StartDatetime.lt(until))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        for (detail, header) in self_drive {
            if let Some(header) = header {
                due.push(DueBooking {
                    booking: booking_to_domain(header)?,
                    scheduled_at: detail.start_datetime,
                });
            }
        }

        let intercity = intercity_booking::Entity::find()
            .find_also_related(booking::Entity)
            .filter(booking::Column::Status.eq(BookingStatus::Confirmed.as_str()))
            .filter(intercity_booking::Column::PickupDatetime.gte(from))
            .filter(intercity_booking::Column::PickupDatetime.lt(until))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        for (detail, header) in intercity {
            if let Some(header) = header {
                due.push(DueBooking {
                    booking: booking_to_domain(header)?,
                    scheduled_at: detail.pickup_datetime,
                });
            }
        }

        Ok(due)
    }

    async fn find_due_for_drop(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DomainResult<Vec<DueBooking>> {
        let mut due = Vec::new();

        let self_drive = self_drive_booking::Entity::find()
            .find_also_related(booking::Entity)
            .filter(booking::Column::Status.eq(BookingStatus::Active.as_str()))
            .filter(self_drive_booking::Column::EndDatetime.gte(from))
            .filter(self_drive_booking::Column::EndDatetime.lt(until))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        for (detail, header) in self_drive {
            if let Some(header) = header {
                due.push(DueBooking {
                    booking: booking_to_domain(header)?,
                    scheduled_at: detail.end_datetime,
                });
            }
        }

        let intercity = intercity_booking::Entity::find()
            .find_also_related(booking::Entity)
            .filter(booking::Column::Status.eq(BookingStatus::Active.as_str()))
            .filter(intercity_booking::Column::DropDatetime.gte(from))
            .filter(intercity_booking::Column::DropDatetime.lt(until))
            .all(&self.db)
            .await
            .map_err(db_err)?;
        for (detail, header) in intercity {
            if let Some(header) = header {
                due.push(DueBooking {
                    booking: booking_to_domain(header)?,
                    scheduled_at: detail.drop_datetime,
                });
            }
        }

        Ok(due)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use sea_orm::{ActiveModelTrait, Set};

    use crate::domain::booking::{PaymentStatus, PricingQuote};
    use crate::infrastructure::database::test_support::{seed_car, seed_user, test_db};

    fn utc(d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, d, h, 0, 0).unwrap()
    }

    fn window(d: u32, h1: u32, h2: u32) -> TimeWindow {
        TimeWindow::new(utc(d, h1), utc(d, h2)).unwrap()
    }

    fn new_self_drive(guest_id: i32, car_id: i32, window: TimeWindow) -> NewSelfDriveBooking {
        NewSelfDriveBooking {
            guest_id,
            car_id,
            window,
            pickup_address: "MG Road, Bengaluru".into(),
            pickup_lat: 12.9756,
            pickup_long: 77.6068,
            drop_address: "MG Road, Bengaluru".into(),
            drop_lat: 12.9756,
            drop_long: 77.6068,
            pricing: PricingQuote::compute(100, &window, 50, 0, 0, 0.18),
        }
    }

    fn new_intercity(guest_id: i32, car_id: i32, window: TimeWindow) -> NewIntercityBooking {
        NewIntercityBooking {
            guest_id,
            car_id,
            window,
            pickup_address: "Bengaluru".into(),
            pickup_lat: 12.97,
            pickup_long: 77.59,
            drop_address: "Mysuru".into(),
            drop_lat: 12.30,
            drop_long: 76.65,
            pax: 3,
            luggage: 2,
            distance_km: 145.0,
            driver_amount: 1200,
            total_amount: 4500,
        }
    }

    async fn setup() -> (sea_orm::DatabaseConnection, i32, i32) {
        let db = test_db().await;
        let host = seed_user(&db, "host@zipdrive.in", "HOST").await;
        let guest = seed_user(&db, "guest@zipdrive.in", "GUEST").await;
        let car = seed_car(&db, host, 100).await;
        (db, guest, car)
    }

    #[tokio::test]
    async fn creates_aggregate_with_zero_payment_row() {
        let (db, guest, car) = setup().await;
        let repo = SeaOrmBookingRepository::new(db.clone());

        let (header, detail) = repo
            .create_self_drive(new_self_drive(guest, car, window(10, 10, 14)))
            .await
            .unwrap();

        assert_eq!(header.status, BookingStatus::Confirmed);
        assert_eq!(header.payment_status, PaymentStatus::Paid);
        assert_eq!(header.paid_amount, 0);
        assert_eq!(header.total_amount, 531);
        assert_eq!(detail.pricing.total_amount, 531);

        let payments = payment::Entity::find()
            .filter(payment::Column::BookingId.eq(header.id))
            .all(&db)
            .await
            .unwrap();
        assert_eq!(payments.len(), 1);
        assert_eq!(payments[0].amount, 0);
        assert_eq!(payments[0].payment_method, "ZERO_RS");
        assert_eq!(payments[0].status, "SUCCESS");
    }

    #[tokio::test]
    async fn overlapping_self_drive_is_rejected() {
        let (db, guest, car) = setup().await;
        let repo = SeaOrmBookingRepository::new(db);

        repo.create_self_drive(new_self_drive(guest, car, window(10, 10, 14)))
            .await
            .unwrap();

        let err = repo
            .create_self_drive(new_self_drive(guest, car, window(10, 13, 16)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn cross_mode_overlap_is_rejected() {
        let (db, guest, car) = setup().await;
        let repo = SeaOrmBookingRepository::new(db);

        repo.create_self_drive(new_self_drive(guest, car, window(10, 10, 14)))
            .await
            .unwrap();

        let err = repo
            .create_intercity(new_intercity(guest, car, window(10, 12, 18)))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn back_to_back_windows_are_accepted() {
        let (db, guest, car) = setup().await;
        let repo = SeaOrmBookingRepository::new(db);

        repo.create_self_drive(new_self_drive(guest, car, window(10, 10, 14)))
            .await
            .unwrap();

        // Starts exactly when the first ends.
        repo.create_self_drive(new_self_drive(guest, car, window(10, 14, 18)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn cancelled_booking_frees_the_window() {
        let (db, guest, car) = setup().await;
        let repo = SeaOrmBookingRepository::new(db);

        let (header, _) = repo
            .create_self_drive(new_self_drive(guest, car, window(10, 10, 14)))
            .await
            .unwrap();
        repo.cancel(header.id, "guest changed plans").await.unwrap();

        repo.create_self_drive(new_self_drive(guest, car, window(10, 10, 14)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn same_window_on_a_different_car_is_fine() {
        let (db, guest, car) = setup().await;
        let host2 = seed_user(&db, "host2@zipdrive.in", "HOST").await;
        let car2 = seed_car(&db, host2, 150).await;
        let repo = SeaOrmBookingRepository::new(db);

        repo.create_self_drive(new_self_drive(guest, car, window(10, 10, 14)))
            .await
            .unwrap();
        repo.create_self_drive(new_self_drive(guest, car2, window(10, 10, 14)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn failed_detail_insert_rolls_back_the_whole_aggregate() {
        let (db, guest, car) = setup().await;
        let repo = SeaOrmBookingRepository::new(db.clone());

        // Inverted window, built via struct literal to bypass validation.
        // The CHECK constraint on the detail table rejects it after the
        // header and payment rows have been inserted.
        let inverted = TimeWindow {
            start: utc(10, 14),
            end: utc(10, 10),
        };
        let err = repo
            .create_self_drive(new_self_drive(guest, car, inverted))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Storage(_)));

        let headers = booking::Entity::find().all(&db).await.unwrap();
        assert!(headers.is_empty());
        let payments = payment::Entity::find().all(&db).await.unwrap();
        assert!(payments.is_empty());
    }

    #[tokio::test]
    async fn pricing_snapshot_survives_rate_changes() {
        let (db, guest, car) = setup().await;
        let repo = SeaOrmBookingRepository::new(db.clone());

        let (header, _) = repo
            .create_self_drive(new_self_drive(guest, car, window(10, 10, 14)))
            .await
            .unwrap();

        let car_row = car::Entity::find_by_id(car).one(&db).await.unwrap().unwrap();
        let mut active: car::ActiveModel = car_row.into();
        active.price_per_hour = Set(999);
        active.update(&db).await.unwrap();

        let detail = match repo.find_detail(header.id).await.unwrap().unwrap() {
            BookingDetail::SelfDrive(d) => d,
            other => panic!("unexpected detail: {:?}", other),
        };
        assert_eq!(detail.pricing.hourly_rate_snapshot, 100);
        assert_eq!(detail.pricing.total_amount, 531);
        let refreshed = repo.find_by_id(header.id).await.unwrap().unwrap();
        assert_eq!(refreshed.total_amount, 531);
    }

    #[tokio::test]
    async fn cancel_requires_confirmed_status() {
        let (db, guest, car) = setup().await;
        let repo = SeaOrmBookingRepository::new(db.clone());

        let (header, _) = repo
            .create_self_drive(new_self_drive(guest, car, window(10, 10, 14)))
            .await
            .unwrap();

        // Force ACTIVE, then cancelling must fail.
        let row = booking::Entity::find_by_id(header.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        let mut active: booking::ActiveModel = row.into();
        active.status = Set("ACTIVE".to_string());
        active.update(&db).await.unwrap();

        let err = repo.cancel(header.id, "too late").await.unwrap_err();
        assert!(matches!(err, DomainError::IllegalTransition { .. }));
    }

    #[tokio::test]
    async fn due_queries_pick_up_both_modes() {
        let (db, guest, car) = setup().await;
        let host2 = seed_user(&db, "host2@zipdrive.in", "HOST").await;
        let car2 = seed_car(&db, host2, 200).await;
        let repo = SeaOrmBookingRepository::new(db.clone());

        let (sd, _) = repo
            .create_self_drive(new_self_drive(guest, car, window(10, 10, 14)))
            .await
            .unwrap();
        let (ic, _) = repo
            .create_intercity(new_intercity(guest, car2, window(10, 10, 20)))
            .await
            .unwrap();

        let due = repo
            .find_due_for_pickup(utc(10, 9), utc(10, 11))
            .await
            .unwrap();
        let ids: Vec<i32> = due.iter().map(|d| d.booking.id).collect();
        assert!(ids.contains(&sd.id));
        assert!(ids.contains(&ic.id));
        assert!(due.iter().all(|d| d.scheduled_at == utc(10, 10)));

        // Nothing due outside the window.
        let none = repo
            .find_due_for_pickup(utc(10, 11), utc(10, 12))
            .await
            .unwrap();
        assert!(none.is_empty());

        // Drop pass only sees ACTIVE bookings.
        let none = repo.find_due_for_drop(utc(10, 13), utc(10, 15)).await.unwrap();
        assert!(none.is_empty());

        let row = booking::Entity::find_by_id(sd.id)
            .one(&db)
            .await
            .unwrap()
            .unwrap();
        let mut active: booking::ActiveModel = row.into();
        active.status = Set("ACTIVE".to_string());
        active.update(&db).await.unwrap();

        let due = repo.find_due_for_drop(utc(10, 13), utc(10, 15)).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].booking.id, sd.id);
        assert_eq!(due[0].scheduled_at, utc(10, 14));
    }

    #[tokio::test]
    async fn guest_and_host_listings() {
        let (db, guest, car) = setup().await;
        let repo = SeaOrmBookingRepository::new(db.clone());

        repo.create_self_drive(new_self_drive(guest, car, window(10, 10, 14)))
            .await
            .unwrap();
        repo.create_self_drive(new_self_drive(guest, car, window(11, 10, 14)))
            .await
            .unwrap();

        let mine = repo.find_for_guest(guest).await.unwrap();
        assert_eq!(mine.len(), 2);

        let host_row = car::Entity::find_by_id(car).one(&db).await.unwrap().unwrap();
        let host_bookings = repo.find_for_host(host_row.host_id).await.unwrap();
        assert_eq!(host_bookings.len(), 2);

        let nobody = repo.find_for_guest(9999).await.unwrap();
        assert!(nobody.is_empty());
    }
}
