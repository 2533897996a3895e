//! OTP repository interface

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::model::{BookingOtp, NewBookingOtp, OtpType, OtpVerifier};
use crate::domain::booking::Booking;
use crate::domain::DomainResult;

#[async_trait]
pub trait OtpRepository: Send + Sync {
    async fn find(&self, booking_id: i32, otp_type: OtpType) -> DomainResult<Option<BookingOtp>>;

    /// Insert or overwrite the single row for (booking_id, otp_type),
    /// clearing any prior verification fields.
    async fn upsert(&self, otp: NewBookingOtp) -> DomainResult<BookingOtp>;

    /// Verify a code and advance the booking, both in one transaction.
    ///
    /// The row must match the code, be unverified and unexpired, and the
    /// booking must be in the status the OTP type starts from; otherwise
    /// `InvalidOrExpiredOtp` / `IllegalTransition` and no state change.
    /// Returns the advanced booking.
    async fn verify_and_advance(
        &self,
        booking_id: i32,
        otp_type: OtpType,
        code: &str,
        verified_by: OtpVerifier,
        now: DateTime<Utc>,
    ) -> DomainResult<Booking>;
}
