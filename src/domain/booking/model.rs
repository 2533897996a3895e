//! Booking aggregate: header, detail records, time windows, pricing.

use chrono::{DateTime, Utc};

use crate::domain::{DomainError, DomainResult};

/// Booking mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingType {
    SelfDrive,
    Intercity,
}

impl BookingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelfDrive => "SELF_DRIVE",
            Self::Intercity => "INTERCITY",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "SELF_DRIVE" => Some(Self::SelfDrive),
            "INTERCITY" => Some(Self::Intercity),
            _ => None,
        }
    }
}

impl std::fmt::Display for BookingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Booking lifecycle status.
///
/// Legal transitions: `Confirmed -> Active -> Completed`, plus
/// `Confirmed -> Cancelled`. A booking that has gone Active can no
/// longer be cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingStatus {
    Confirmed,
    Active,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "CONFIRMED",
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CONFIRMED" => Some(Self::Confirmed),
            "ACTIVE" => Some(Self::Active),
            "COMPLETED" => Some(Self::Completed),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    /// Whether a booking in this status blocks the car's calendar.
    pub fn blocks_calendar(&self) -> bool {
        matches!(self, Self::Confirmed | Self::Active)
    }

    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (Self::Confirmed, Self::Active)
                | (Self::Active, Self::Completed)
                | (Self::Confirmed, Self::Cancelled)
        )
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Payment status on the booking header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Paid => "PAID",
            Self::Refunded => "REFUNDED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PAID" => Some(Self::Paid),
            "REFUNDED" => Some(Self::Refunded),
            _ => None,
        }
    }
}

/// A half-open time window `[start, end)`.
///
/// Canonical overlap rule for the whole engine: two windows conflict
/// iff `s1 < e2 && s2 < e1`. Comparisons are strict, so a window that
/// ends exactly when another starts does NOT conflict, so back-to-back
/// rentals are legal. All timestamps are UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<Self> {
        if end <= start {
            return Err(DomainError::Validation(
                "end of time window must be after its start".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn overlaps(&self, other: &TimeWindow) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Billable duration in whole hours, rounded up, minimum 1.
    pub fn billable_hours(&self) -> i64 {
        let secs = (self.end - self.start).num_seconds();
        ((secs + 3599) / 3600).max(1)
    }
}

/// Self-drive pricing snapshot, frozen onto the detail record at
/// booking time. Later rate changes on the car never touch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingQuote {
    pub hourly_rate_snapshot: i64,
    pub base_amount: i64,
    pub insure_amount: i64,
    pub driver_amount: i64,
    pub drop_charge: i64,
    pub gst_amount: i64,
    pub total_amount: i64,
}

impl PricingQuote {
    /// `base = rate * ceil(hours)`, `gst = round(subtotal * gst_rate)`,
    /// `total = subtotal + gst`. Amounts are whole rupees.
    pub fn compute(
        hourly_rate: i64,
        window: &TimeWindow,
        insure_amount: i64,
        driver_amount: i64,
        drop_charge: i64,
        gst_rate: f64,
    ) -> Self {
        let base_amount = hourly_rate * window.billable_hours();
        let subtotal = base_amount + insure_amount + driver_amount + drop_charge;
        let gst_amount = (subtotal as f64 * gst_rate).round() as i64;
        Self {
            hourly_rate_snapshot: hourly_rate,
            base_amount,
            insure_amount,
            driver_amount,
            drop_charge,
            gst_amount,
            total_amount: subtotal + gst_amount,
        }
    }
}

/// Booking aggregate root
#[derive(Debug, Clone)]
pub struct Booking {
    pub id: i32,
    pub guest_id: i32,
    pub car_id: i32,
    pub booking_type: BookingType,
    pub status: BookingStatus,
    pub total_amount: i64,
    pub paid_amount: i64,
    pub payment_status: PaymentStatus,
    pub cancelled_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn ensure_transition(&self, next: BookingStatus) -> DomainResult<()> {
        if self.status.can_transition_to(next) {
            Ok(())
        } else {
            Err(DomainError::IllegalTransition {
                from: self.status.as_str(),
                to: next.as_str(),
            })
        }
    }
}

/// Self-drive detail record (1:1 with its booking)
#[derive(Debug, Clone)]
pub struct SelfDriveDetail {
    pub booking_id: i32,
    pub window: TimeWindow,
    pub pickup_address: String,
    pub pickup_lat: f64,
    pub pickup_long: f64,
    pub drop_address: String,
    pub drop_lat: f64,
    pub drop_long: f64,
    pub pricing: PricingQuote,
}

/// Intercity detail record (1:1 with its booking)
#[derive(Debug, Clone)]
pub struct IntercityDetail {
    pub booking_id: i32,
    pub window: TimeWindow,
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
}

/// Mode-specific detail, exactly one per booking.
#[derive(Debug, Clone)]
pub enum BookingDetail {
    SelfDrive(SelfDriveDetail),
    Intercity(IntercityDetail),
}

impl BookingDetail {
    pub fn window(&self) -> &TimeWindow {
        match self {
            Self::SelfDrive(d) => &d.window,
            Self::Intercity(d) => &d.window,
        }
    }
}

/// Input for the self-drive aggregate writer.
#[derive(Debug, Clone)]
pub struct NewSelfDriveBooking {
    pub guest_id: i32,
    pub car_id: i32,
    pub window: TimeWindow,
    pub pickup_address: String,
    pub pickup_lat: f64,
    pub pickup_long: f64,
    pub drop_address: String,
    pub drop_lat: f64,
    pub drop_long: f64,
    pub pricing: PricingQuote,
}

/// Input for the intercity aggregate writer.
#[derive(Debug, Clone)]
pub struct NewIntercityBooking {
    pub guest_id: i32,
    pub car_id: i32,
    pub window: TimeWindow,
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

/// A booking the scheduler found entering its pickup or drop window.
#[derive(Debug, Clone)]
pub struct DueBooking {
    pub booking: Booking,
    /// Scheduled pickup time (pickup pass) or drop time (drop pass).
    pub scheduled_at: DateTime<Utc>,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn window(h1: u32, h2: u32) -> TimeWindow {
        TimeWindow::new(utc(2025, 1, 10, h1, 0), utc(2025, 1, 10, h2, 0)).unwrap()
    }

    #[test]
    fn overlapping_windows_conflict() {
        assert!(window(10, 14).overlaps(&window(13, 15)));
        assert!(window(13, 15).overlaps(&window(10, 14)));
        assert!(window(10, 14).overlaps(&window(11, 12))); // contained
        assert!(window(11, 12).overlaps(&window(10, 14)));
    }

    #[test]
    fn disjoint_windows_do_not_conflict() {
        assert!(!window(10, 12).overlaps(&window(13, 15)));
        assert!(!window(13, 15).overlaps(&window(10, 12)));
    }

    #[test]
    fn boundary_touch_is_not_a_conflict() {
        // Half-open semantics: one ends exactly when the other starts.
        assert!(!window(10, 14).overlaps(&window(14, 16)));
        assert!(!window(14, 16).overlaps(&window(10, 14)));
    }

    #[test]
    fn window_rejects_inverted_or_empty_range() {
        assert!(TimeWindow::new(utc(2025, 1, 10, 14, 0), utc(2025, 1, 10, 10, 0)).is_err());
        assert!(TimeWindow::new(utc(2025, 1, 10, 10, 0), utc(2025, 1, 10, 10, 0)).is_err());
    }

    #[test]
    fn billable_hours_round_up_with_minimum_one() {
        assert_eq!(window(10, 14).billable_hours(), 4);
        let half = TimeWindow::new(utc(2025, 1, 10, 10, 0), utc(2025, 1, 10, 10, 30)).unwrap();
        assert_eq!(half.billable_hours(), 1);
        let partial = TimeWindow::new(utc(2025, 1, 10, 10, 0), utc(2025, 1, 10, 12, 1)).unwrap();
        assert_eq!(partial.billable_hours(), 3);
    }

    #[test]
    fn pricing_quote_matches_reference_scenario() {
        // 4h at 100/hr, insurance 50: base 400, subtotal 450, gst 81, total 531.
        let q = PricingQuote::compute(100, &window(10, 14), 50, 0, 0, 0.18);
        assert_eq!(q.base_amount, 400);
        assert_eq!(q.gst_amount, 81);
        assert_eq!(q.total_amount, 531);
    }

    #[test]
    fn pricing_quote_includes_driver_and_drop_charges() {
        let q = PricingQuote::compute(200, &window(9, 10), 0, 300, 150, 0.18);
        // subtotal 200 + 300 + 150 = 650, gst 117
        assert_eq!(q.base_amount, 200);
        assert_eq!(q.gst_amount, 117);
        assert_eq!(q.total_amount, 767);
    }

    #[test]
    fn status_transition_matrix() {
        use BookingStatus::*;
        assert!(Confirmed.can_transition_to(Active));
        assert!(Active.can_transition_to(Completed));
        assert!(Confirmed.can_transition_to(Cancelled));

        assert!(!Active.can_transition_to(Cancelled)); // no cancel once active
        assert!(!Completed.can_transition_to(Active));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Confirmed.can_transition_to(Completed)); // must go through Active
    }

    #[test]
    fn only_confirmed_and_active_block_the_calendar() {
        assert!(BookingStatus::Confirmed.blocks_calendar());
        assert!(BookingStatus::Active.blocks_calendar());
        assert!(!BookingStatus::Completed.blocks_calendar());
        assert!(!BookingStatus::Cancelled.blocks_calendar());
    }

    #[test]
    fn status_string_roundtrip() {
        for status in &[
            BookingStatus::Confirmed,
            BookingStatus::Active,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            assert_eq!(BookingStatus::parse(status.as_str()), Some(*status));
        }
        assert_eq!(BookingStatus::parse("BOGUS"), None);
    }
}
