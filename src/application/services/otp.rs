//! OTP service
//!
//! Issues, verifies and re-sends handover codes. Expiry is always the
//! booking's own scheduled pickup/drop time.

use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use crate::domain::booking::Booking;
use crate::domain::directory::Directory;
use crate::domain::notifier::{Notifier, NotifyPayload, TemplateKind};
use crate::domain::otp::{generate_code, NewBookingOtp, OtpType, OtpVerifier};
use crate::domain::repositories::RepositoryProvider;
use crate::domain::{DomainError, DomainResult};

pub struct OtpService {
    repos: Arc<dyn RepositoryProvider>,
    directory: Arc<dyn Directory>,
    notifier: Arc<dyn Notifier>,
}

impl OtpService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        directory: Arc<dyn Directory>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            repos,
            directory,
            notifier,
        }
    }

    /// Issue the code for (booking, type), or return `None` when there
    /// is nothing to send: a still-valid or already-verified code
    /// exists, or the booking has no detail record to derive the
    /// expiry from.
    ///
    /// Only an expired, unverified code gets overwritten, so the sweep
    /// may call this every tick without spamming fresh codes.
    pub async fn issue(&self, booking: &Booking, otp_type: OtpType) -> DomainResult<Option<String>> {
        let now = Utc::now();
        if let Some(existing) = self.repos.otps().find(booking.id, otp_type).await? {
            if existing.is_valid(now) || existing.verified_at.is_some() {
                return Ok(None);
            }
        }

        let Some(detail) = self.repos.bookings().find_detail(booking.id).await? else {
            warn!(booking_id = booking.id, "booking has no detail record, cannot issue otp");
            return Ok(None);
        };
        let expires_at = match otp_type {
            OtpType::Pickup => detail.window().start,
            OtpType::Drop => detail.window().end,
        };
        if expires_at <= now {
            // Scheduled time already passed; a fresh code would be dead
            // on arrival.
            return Ok(None);
        }

        let otp = self
            .repos
            .otps()
            .upsert(NewBookingOtp {
                booking_id: booking.id,
                otp_type,
                otp_code: generate_code(),
                expires_at,
            })
            .await?;
        Ok(Some(otp.otp_code))
    }

    /// Verify a presented code and advance the booking's status.
    pub async fn verify(
        &self,
        booking_id: i32,
        otp_type: OtpType,
        code: &str,
        verified_by: OtpVerifier,
    ) -> DomainResult<Booking> {
        self.repos
            .otps()
            .verify_and_advance(booking_id, otp_type, code, verified_by, Utc::now())
            .await
    }

    /// Re-send the stored code without rotating it. The pickup code
    /// goes back to the guest, the drop code to the host.
    pub async fn resend(&self, booking_id: i32, otp_type: OtpType) -> DomainResult<()> {
        let booking = self
            .repos
            .bookings()
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "booking",
                field: "id",
                value: booking_id.to_string(),
            })?;

        let otp = self
            .repos
            .otps()
            .find(booking_id, otp_type)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "otp",
                field: "booking_id",
                value: booking_id.to_string(),
            })?;
        if !otp.is_valid(Utc::now()) {
            return Err(DomainError::Validation(
                "otp already used or expired".to_string(),
            ));
        }

        let recipient_id = match otp_type {
            OtpType::Pickup => booking.guest_id,
            OtpType::Drop => self.host_of(&booking).await?,
        };
        let recipient = self
            .directory
            .get_user(recipient_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "user",
                field: "id",
                value: recipient_id.to_string(),
            })?;

        let kind = match otp_type {
            OtpType::Pickup => TemplateKind::PickupOtp,
            OtpType::Drop => TemplateKind::DropOtp,
        };
        let payload = NotifyPayload {
            first_name: recipient.first_name.clone(),
            booking_id,
            otp_code: Some(otp.otp_code),
            scheduled_at: Some(otp.expires_at),
            total_amount: None,
        };
        if let Err(e) = self.notifier.notify(&recipient.email, kind, &payload).await {
            warn!(booking_id, error = %e, "otp resend dispatch failed");
        }
        Ok(())
    }

    async fn host_of(&self, booking: &Booking) -> DomainResult<i32> {
        let car = self
            .directory
            .get_car(booking.car_id)
            .await?
            .ok_or_else(|| DomainError::NotFound {
                entity: "car",
                field: "id",
                value: booking.car_id.to_string(),
            })?;
        Ok(car.host_id)
    }
}

// ── Tests ──────────────────────────────────────────────────────
