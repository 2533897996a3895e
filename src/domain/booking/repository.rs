//! Booking repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{
    Booking, BookingDetail, DueBooking, IntercityDetail, NewIntercityBooking, NewSelfDriveBooking,
    SelfDriveDetail, TimeWindow,
};
use crate::domain::DomainResult;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Whether any CONFIRMED/ACTIVE booking of either mode overlaps the
    /// given half-open window for this car. Read-only; the aggregate
    /// writers re-run the same predicate inside their transaction.
    async fn has_conflict(
        &self,
        car_id: i32,
        window: &TimeWindow,
        exclude_booking: Option<i32>,
    ) -> DomainResult<bool>;

    /// Atomically create header + self-drive detail + initial payment.
    /// Re-checks the overlap predicate on the transaction connection and
    /// fails with `Conflict` before writing anything.
    async fn create_self_drive(
        &self,
        new: NewSelfDriveBooking,
    ) -> DomainResult<(Booking, SelfDriveDetail)>;

    /// Intercity counterpart of [`create_self_drive`](Self::create_self_drive).
    async fn create_intercity(
        &self,
        new: NewIntercityBooking,
    ) -> DomainResult<(Booking, IntercityDetail)>;

    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Booking>>;

    /// The mode-specific detail record for a booking, if present.
    async fn find_detail(&self, booking_id: i32) -> DomainResult<Option<BookingDetail>>;

    async fn find_for_guest(&self, guest_id: i32) -> DomainResult<Vec<Booking>>;

    /// Bookings against any car owned by this host.
    async fn find_for_host(&self, host_id: i32) -> DomainResult<Vec<Booking>>;

    /// Cancel a CONFIRMED booking, recording the reason.
    async fn cancel(&self, id: i32, reason: &str) -> DomainResult<Booking>;

    /// CONFIRMED bookings whose scheduled pickup/start time falls in
    /// `[from, until)`, both modes.
    async fn find_due_for_pickup(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DomainResult<Vec<DueBooking>>;

    /// ACTIVE bookings whose scheduled end/drop time falls in `[from, until)`.
    async fn find_due_for_drop(
        &self,
        from: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> DomainResult<Vec<DueBooking>>;
}
