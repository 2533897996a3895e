//! Booking DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::booking::{Booking, BookingDetail, IntercityDetail, SelfDriveDetail};

/// Self-drive booking creation request. Datetimes are RFC 3339 in UTC;
/// amounts are whole rupees.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSelfDriveRequest {
    #[validate(range(min = 1))]
    pub guest_id: i32,
    #[validate(range(min = 1))]
    pub car_id: i32,
    pub start_datetime: String,
    pub end_datetime: String,
    #[validate(length(min = 1, max = 255))]
    pub pickup_address: String,
    pub pickup_lat: f64,
    pub pickup_long: f64,
    #[validate(length(min = 1, max = 255))]
    pub drop_address: String,
    pub drop_lat: f64,
    pub drop_long: f64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub insure_amount: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub driver_amount: i64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub drop_charge: i64,
}

/// Intercity booking creation request. The fare is quoted upstream.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateIntercityRequest {
    #[validate(range(min = 1))]
    pub guest_id: i32,
    #[validate(range(min = 1))]
    pub car_id: i32,
    pub pickup_datetime: String,
    pub drop_datetime: String,
    #[validate(length(min = 1, max = 255))]
    pub pickup_address: String,
    pub pickup_lat: f64,
    pub pickup_long: f64,
    #[validate(length(min = 1, max = 255))]
    pub drop_address: String,
    pub drop_lat: f64,
    pub drop_long: f64,
    #[validate(range(min = 1, max = 16))]
    pub pax: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub luggage: i32,
    #[validate(range(min = 0.0))]
    pub distance_km: f64,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub driver_amount: i64,
    #[validate(range(min = 1))]
    pub total_amount: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CancelBookingRequest {
    #[validate(length(min = 1, max = 500))]
    pub reason: String,
}

/// Booking header as returned by the API
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingDto {
    pub id: i32,
    pub guest_id: i32,
    pub car_id: i32,
    pub booking_type: String,
    pub status: String,
    pub total_amount: i64,
    pub paid_amount: i64,
    pub payment_status: String,
    pub cancelled_reason: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Booking> for BookingDto {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            guest_id: b.guest_id,
            car_id: b.car_id,
            booking_type: b.booking_type.as_str().to_string(),
            status: b.status.as_str().to_string(),
            total_amount: b.total_amount,
            paid_amount: b.paid_amount,
            payment_status: b.payment_status.as_str().to_string(),
            cancelled_reason: b.cancelled_reason,
            created_at: b.created_at.to_rfc3339(),
            updated_at: b.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SelfDriveDetailDto {
    pub start_datetime: String,
    pub end_datetime: String,
    pub pickup_address: String,
    pub drop_address: String,
    pub hourly_rate_snapshot: i64,
    pub base_amount: i64,
    pub insure_amount: i64,
    pub driver_amount: i64,
    pub drop_charge: i64,
    pub gst_amount: i64,
    pub total_amount: i64,
}

impl From<SelfDriveDetail> for SelfDriveDetailDto {
    fn from(d: SelfDriveDetail) -> Self {
        Self {
            start_datetime: d.window.start.to_rfc3339(),
            end_datetime: d.window.end.to_rfc3339(),
            pickup_address: d.pickup_address,
            drop_address: d.drop_address,
            hourly_rate_snapshot: d.pricing.hourly_rate_snapshot,
            base_amount: d.pricing.base_amount,
            insure_amount: d.pricing.insure_amount,
            driver_amount: d.pricing.driver_amount,
            drop_charge: d.pricing.drop_charge,
            gst_amount: d.pricing.gst_amount,
            total_amount: d.pricing.total_amount,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct IntercityDetailDto {
    pub pickup_datetime: String,
    pub drop_datetime: String,
    pub pickup_address: String,
    pub drop_address: String,
    pub pax: i32,
    pub luggage: i32,
    pub distance_km: f64,
    pub driver_amount: i64,
}

impl From<IntercityDetail> for IntercityDetailDto {
    fn from(d: IntercityDetail) -> Self {
        Self {
            pickup_datetime: d.window.start.to_rfc3339(),
            drop_datetime: d.window.end.to_rfc3339(),
            pickup_address: d.pickup_address,
            drop_address: d.drop_address,
            pax: d.pax,
            luggage: d.luggage,
            distance_km: d.distance_km,
            driver_amount: d.driver_amount,
        }
    }
}

/// Mode-specific detail block
#[derive(Debug, Serialize, ToSchema)]
#[serde(tag = "mode")]
pub enum BookingDetailDto {
    #[serde(rename = "SELF_DRIVE")]
    SelfDrive(SelfDriveDetailDto),
    #[serde(rename = "INTERCITY")]
    Intercity(IntercityDetailDto),
}

impl From<BookingDetail> for BookingDetailDto {
    fn from(d: BookingDetail) -> Self {
        match d {
            BookingDetail::SelfDrive(d) => Self::SelfDrive(d.into()),
            BookingDetail::Intercity(d) => Self::Intercity(d.into()),
        }
    }
}

/// Full booking view: header plus detail
#[derive(Debug, Serialize, ToSchema)]
pub struct BookingViewDto {
    #[serde(flatten)]
    pub booking: BookingDto,
    pub detail: Option<BookingDetailDto>,
}

/// Listing filter: exactly one of `guest_id` / `host_id`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ListBookingsQuery {
    pub guest_id: Option<i32>,
    pub host_id: Option<i32>,
}

/// Availability probe parameters (RFC 3339 datetimes)
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct AvailabilityQuery {
    pub start_datetime: String,
    pub end_datetime: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AvailabilityDto {
    pub car_id: i32,
    pub available: bool,
}
