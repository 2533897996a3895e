//! Booking OTP entity
//!
//! One row per (booking, type); re-issuance overwrites in place and the
//! row is kept forever as the handover audit trail.

use chrono::{DateTime, Utc};
use rand::Rng;

use crate::domain::booking::BookingStatus;

pub const OTP_CODE_LEN: usize = 6;

/// What the OTP confirms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OtpType {
    Pickup,
    Drop,
}

impl OtpType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pickup => "PICKUP",
            Self::Drop => "DROP",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PICKUP" => Some(Self::Pickup),
            "DROP" => Some(Self::Drop),
            _ => None,
        }
    }

    /// Booking status a verification of this OTP starts from.
    pub fn source_status(&self) -> BookingStatus {
        match self {
            Self::Pickup => BookingStatus::Confirmed,
            Self::Drop => BookingStatus::Active,
        }
    }

    /// Booking status a successful verification advances to.
    pub fn target_status(&self) -> BookingStatus {
        match self {
            Self::Pickup => BookingStatus::Active,
            Self::Drop => BookingStatus::Completed,
        }
    }
}

impl std::fmt::Display for OtpType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Who presented the code at handover
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpVerifier {
    Guest,
    Host,
    Driver,
}

impl OtpVerifier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Guest => "GUEST",
            Self::Host => "HOST",
            Self::Driver => "DRIVER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "GUEST" => Some(Self::Guest),
            "HOST" => Some(Self::Host),
            "DRIVER" => Some(Self::Driver),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct BookingOtp {
    pub id: i32,
    pub booking_id: i32,
    pub otp_type: OtpType,
    pub otp_code: String,
    /// The booking's scheduled pickup/drop time, never "now + offset".
    pub expires_at: DateTime<Utc>,
    pub verified_at: Option<DateTime<Utc>>,
    pub verified_by: Option<OtpVerifier>,
    pub created_at: DateTime<Utc>,
}

impl BookingOtp {
    /// Still issuable/acceptable: unverified and not past expiry.
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.verified_at.is_none() && self.expires_at > now
    }
}

/// Upsert payload for (re-)issuing a code.
#[derive(Debug, Clone)]
pub struct NewBookingOtp {
    pub booking_id: i32,
    pub otp_type: OtpType,
    pub otp_code: String,
    pub expires_at: DateTime<Utc>,
}

/// Uniformly random fixed-length numeric code. Collisions across
/// bookings are immaterial; uniqueness is scoped per (booking, type).
pub fn generate_code() -> String {
    rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn generated_codes_are_six_digits() {
        for _ in 0..100 {
            let code = generate_code();
            assert_eq!(code.len(), OTP_CODE_LEN);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert_ne!(code.as_bytes()[0], b'0');
        }
    }

    #[test]
    fn validity_requires_unverified_and_unexpired() {
        let now = Utc::now();
        let mut otp = BookingOtp {
            id: 1,
            booking_id: 7,
            otp_type: OtpType::Pickup,
            otp_code: "123456".into(),
            expires_at: now + Duration::minutes(20),
            verified_at: None,
            verified_by: None,
            created_at: now,
        };
        assert!(otp.is_valid(now));

        otp.verified_at = Some(now);
        assert!(!otp.is_valid(now));

        otp.verified_at = None;
        assert!(!otp.is_valid(now + Duration::minutes(20))); // expiry is exclusive
    }

    #[test]
    fn otp_type_maps_onto_state_machine() {
        assert_eq!(OtpType::Pickup.source_status(), BookingStatus::Confirmed);
        assert_eq!(OtpType::Pickup.target_status(), BookingStatus::Active);
        assert_eq!(OtpType::Drop.source_status(), BookingStatus::Active);
        assert_eq!(OtpType::Drop.target_status(), BookingStatus::Completed);
    }
}
