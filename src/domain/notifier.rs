//! Notification dispatch port
//!
//! A constructed dependency injected at process start, never a
//! module-scope global client. Booking success is never gated on
//! delivery: callers log dispatch failures and move on.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateKind {
    BookingInitiated,
    PickupOtp,
    DropOtp,
}

impl TemplateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BookingInitiated => "BOOKING_INITIATED",
            Self::PickupOtp => "PICKUP_OTP",
            Self::DropOtp => "DROP_OTP",
        }
    }
}

/// Template payload. Timestamps stay UTC here; rendering to a local
/// zone happens only when formatting the message body.
#[derive(Debug, Clone)]
pub struct NotifyPayload {
    pub first_name: String,
    pub booking_id: i32,
    pub otp_code: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub total_amount: Option<i64>,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification dispatch failed: {0}")]
    Dispatch(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(
        &self,
        recipient: &str,
        kind: TemplateKind,
        payload: &NotifyPayload,
    ) -> Result<(), NotifyError>;
}
