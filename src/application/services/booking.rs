//! Booking service
//!
//! Validates requests, snapshots pricing and serializes aggregate
//! creation per car. SQLite gives us no row locks, so concurrent
//! writers for the same car queue on an in-process async mutex; the
//! repository re-checks the overlap predicate inside its transaction
//! as the hard guarantee.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::warn;

use crate::domain::booking::{
    Booking, BookingDetail, IntercityDetail, NewIntercityBooking, NewSelfDriveBooking,
    PricingQuote, SelfDriveDetail, TimeWindow,
};
use crate::domain::directory::{CarRef, Directory, UserRef};
use crate::domain::notifier::{Notifier, NotifyPayload, TemplateKind};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::{DomainError, DomainResult};

/// Self-drive booking request, amounts in whole rupees.
#[derive(Debug, Clone)]
pub struct SelfDriveBookingRequest {
    pub guest_id: i32,
    pub car_id: i32,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub pickup_address: String,
    pub pickup_lat: f64,
    pub pickup_long: f64,
    pub drop_address: String,
    pub drop_lat: f64,
    pub drop_long: f64,
    pub insure_amount: i64,
    pub driver_amount: i64,
    pub drop_charge: i64,
}

/// Intercity booking request. The fare is quoted upstream and arrives
/// as `total_amount`; only the window is engine-priced territory here.
#[derive(Debug, Clone)]
pub struct IntercityBookingRequest {
    pub guest_id: i32,
    pub car_id: i32,
    pub pickup_datetime: DateTime<Utc>,
    pub drop_datetime: DateTime<Utc>,
    pub pickup_address: String,
    pub pickup_lat: f64,
    pub pickup_long: f64,
    pub drop_address: String,
    pub drop_lat: f64,
    pub drop_long: f64,
    pub pax: i32,
    pub luggage: i32,
    pub distance_km: f64,
    pub driver_amount: i64,
    pub total_amount: i64,
}

pub struct BookingService {
    repos: Arc<dyn RepositoryProvider>,
    directory: Arc<dyn Directory>,
    notifier: Arc<dyn Notifier>,
    gst_rate: f64,
    car_locks: DashMap<i32, Arc<Mutex<()>>>,
}

impl BookingService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        directory: Arc<dyn Directory>,
        notifier: Arc<dyn Notifier>,
        gst_rate: f64,
    ) -> Self {
        Self {
            repos,
            directory,
            notifier,
            gst_rate,
            car_locks: DashMap::new(),
        }
    }

    fn car_lock(&self, car_id: i32) -> Arc<Mutex<()>> {
        self.car_locks
            .entry(car_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    async fn resolve_guest(&self, guest_id: i32) -> DomainResult<UserRef> {
        self.directory
            .get_user(guest_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "user",
                field: "id",
                value: guest_id.to_string(),
            })
    }

    async fn resolve_car(&self, car_id: i32) -> DomainResult<CarRef> {
        self.directory
            .get_car(car_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "car",
                field: "id",
                value: car_id.to_string(),
            })
    }

    fn validated_window(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<TimeWindow> {
        let window = TimeWindow::new(start, end)?;
        if window.start <= Utc::now() {
            return Err(DomainError::Validation(
                "booking must start in the future".to_string(),
            ));
        }
        Ok(window)
    }

    /// Fire the booking confirmation to guest and host. Delivery
    /// failures are logged, never surfaced: the booking is committed.
    async fn announce_booking(&self, booking: &Booking, guest: &UserRef, host_id: i32) {
        let payload = NotifyPayload {
            first_name: guest.first_name.clone(),
            booking_id: booking.id,
            otp_code: None,
            scheduled_at: None,
            total_amount: Some(booking.total_amount),
        };
        if let Err(e) = self
            .notifier
            .notify(&guest.email, TemplateKind::BookingInitiated, &payload)
            .await
        {
            warn!(booking_id = booking.id, error = %e, "guest notification failed");
        }

        match self.directory.get_user(host_id).await {
            Ok(Some(host)) => {
                let payload = NotifyPayload {
                    first_name: host.first_name.clone(),
                    ..payload
                };
                if let Err(e) = self
                    .notifier
                    .notify(&host.email, TemplateKind::BookingInitiated, &payload)
                    .await
                {
                    warn!(booking_id = booking.id, error = %e, "host notification failed");
                }
            }
            Ok(None) => warn!(booking_id = booking.id, host_id, "host not found for notification"),
            Err(e) => warn!(booking_id = booking.id, error = %e, "host lookup failed"),
        }
    }

    pub async fn create_self_drive_booking(
        &self,
        req: SelfDriveBookingRequest,
    ) -> DomainResult<(Booking, SelfDriveDetail)> {
        let window = Self::validated_window(req.start, req.end)?;
        let guest = self.resolve_guest(req.guest_id).await?;
        let car = self.resolve_car(req.car_id).await?;

        let pricing = PricingQuote::compute(
            car.price_per_hour,
            &window,
            req.insure_amount,
            req.driver_amount,
            req.drop_charge,
            self.gst_rate,
        );

        let lock = self.car_lock(car.id);
        let created = {
            let _guard = lock.lock().await;
            self.repos
                .bookings()
                .create_self_drive(NewSelfDriveBooking {
                    guest_id: guest.id,
                    car_id: car.id,
                    window,
                    pickup_address: req.pickup_address,
                    pickup_lat: req.pickup_lat,
                    pickup_long: req.pickup_long,
                    drop_address: req.drop_address,
                    drop_lat: req.drop_lat,
                    drop_long: req.drop_long,
                    pricing,
                })
                .await?
        };

        self.announce_booking(&created.0, &guest, car.host_id).await;
        Ok(created)
    }

    pub async fn create_intercity_booking(
        &self,
        req: IntercityBookingRequest,
    ) -> DomainResult<(Booking, IntercityDetail)> {
        let window = Self::validated_window(req.pickup_datetime, req.drop_datetime)?;
        if req.total_amount <= 0 {
            return Err(DomainError::Validation(
                "total amount must be positive".to_string(),
            ));
        }
        if req.pax <= 0 {
            return Err(DomainError::Validation(
                "passenger count must be positive".to_string(),
            ));
        }
        let guest = self.resolve_guest(req.guest_id).await?;
        let car = self.resolve_car(req.car_id).await?;

        let lock = self.car_lock(car.id);
        let created = {
            let _guard = lock.lock().await;
            self.repos
                .bookings()
                .create_intercity(NewIntercityBooking {
                    guest_id: guest.id,
                    car_id: car.id,
                    window,
                    pickup_address: req.pickup_address,
                    pickup_lat: req.pickup_lat,
                    pickup_long: req.pickup_long,
                    drop_address: req.drop_address,
                    drop_lat: req.drop_lat,
                    drop_long: req.drop_long,
                    pax: req.pax,
                    luggage: req.luggage,
                    distance_km: req.distance_km,
                    driver_amount: req.driver_amount,
                    total_amount: req.total_amount,
                })
                .await?
        };

        self.announce_booking(&created.0, &guest, car.host_id).await;
        Ok(created)
    }

    /// Read-only availability probe for a car and window.
    pub async fn check_availability(
        &self,
        car_id: i32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<bool> {
        let window = TimeWindow::new(start, end)?;
        Ok(!self.repos.bookings().has_conflict(car_id, &window, None).await?)
    }

    pub async fn cancel_booking(&self, id: i32, reason: &str) -> DomainResult<Booking> {
        self.repos.bookings().cancel(id, reason).await
    }

    pub async fn get_booking(&self, id: i32) -> DomainResult<(Booking, Option<BookingDetail>)> {
        let booking = self
            .repos
            .bookings()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "booking",
                field: "id",
                value: id.to_string(),
            })?;
        let detail = self.repos.bookings().find_detail(id).await?;
        Ok((booking, detail))
    }

    pub async fn list_for_guest(&self, guest_id: i32) -> DomainResult<Vec<Booking>> {
        self.repos.bookings().find_for_guest(guest_id).await
    }

    pub async fn list_for_host(&self, host_id: i32) -> DomainResult<Vec<Booking>> {
        self.repos.bookings().find_for_host(host_id).await
    }
}

// ── Tests ──────────────────────────────────────────────────────
