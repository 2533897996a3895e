//! Payment records
//!
//! Every booking carries at least one payment row from creation: the
//! zero-payment path records a SUCCESS/ZERO_RS row inside the same
//! transaction that creates the booking.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    /// No-online-payment flow: amount 0, recorded for the audit trail.
    ZeroRs,
    Razorpay,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ZeroRs => "ZERO_RS",
            Self::Razorpay => "RAZORPAY",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ZERO_RS" => Some(Self::ZeroRs),
            "RAZORPAY" => Some(Self::Razorpay),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentOutcome {
    Success,
    Failed,
}

impl PaymentOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SUCCESS" => Some(Self::Success),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Payment {
    pub id: i32,
    pub booking_id: i32,
    pub amount: i64,
    pub currency: String,
    pub method: PaymentMethod,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub status: PaymentOutcome,
    pub created_at: DateTime<Utc>,
}
