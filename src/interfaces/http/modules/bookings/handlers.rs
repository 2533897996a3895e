//! Booking HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};

use super::dto::*;
use crate::application::{BookingService, IntercityBookingRequest, SelfDriveBookingRequest};
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};
use crate::interfaces::http::error::ApiError;

/// Application state for booking handlers.
#[derive(Clone)]
pub struct BookingAppState {
    pub booking_service: Arc<BookingService>,
}

fn parse_datetime(field: &str, raw: &str) -> Result<DateTime<Utc>, ApiError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ApiError::bad_request(format!("invalid {}: {}", field, e)))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/self-drive",
    tag = "Bookings",
    request_body = CreateSelfDriveRequest,
    responses(
        (status = 200, description = "Booking created", body = ApiResponse<BookingViewDto>),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Guest or car not found"),
        (status = 409, description = "Car already booked for the window")
    )
)]
pub async fn create_self_drive_booking(
    State(state): State<BookingAppState>,
    ValidatedJson(request): ValidatedJson<CreateSelfDriveRequest>,
) -> Result<Json<ApiResponse<BookingViewDto>>, ApiError> {
    let start = parse_datetime("start_datetime", &request.start_datetime)?;
    let end = parse_datetime("end_datetime", &request.end_datetime)?;

    let (booking, detail) = state
        .booking_service
        .create_self_drive_booking(SelfDriveBookingRequest {
            guest_id: request.guest_id,
            car_id: request.car_id,
            start,
            end,
            pickup_address: request.pickup_address,
            pickup_lat: request.pickup_lat,
            pickup_long: request.pickup_long,
            drop_address: request.drop_address,
            drop_lat: request.drop_lat,
            drop_long: request.drop_long,
            insure_amount: request.insure_amount,
            driver_amount: request.driver_amount,
            drop_charge: request.drop_charge,
        })
        .await?;

    Ok(Json(ApiResponse::success(BookingViewDto {
        booking: booking.into(),
        detail: Some(BookingDetailDto::SelfDrive(detail.into())),
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/intercity",
    tag = "Bookings",
    request_body = CreateIntercityRequest,
    responses(
        (status = 200, description = "Booking created", body = ApiResponse<BookingViewDto>),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "Guest or car not found"),
        (status = 409, description = "Car already booked for the window")
    )
)]
pub async fn create_intercity_booking(
    State(state): State<BookingAppState>,
    ValidatedJson(request): ValidatedJson<CreateIntercityRequest>,
) -> Result<Json<ApiResponse<BookingViewDto>>, ApiError> {
    let pickup = parse_datetime("pickup_datetime", &request.pickup_datetime)?;
    let drop = parse_datetime("drop_datetime", &request.drop_datetime)?;

    let (booking, detail) = state
        .booking_service
        .create_intercity_booking(IntercityBookingRequest {
            guest_id: request.guest_id,
            car_id: request.car_id,
            pickup_datetime: pickup,
            drop_datetime: drop,
            pickup_address: request.pickup_address,
            pickup_lat: request.pickup_lat,
            pickup_long: request.pickup_long,
            drop_address: request.drop_address,
            drop_lat: request.drop_lat,
            drop_long: request.drop_long,
            pax: request.pax,
            luggage: request.luggage,
            distance_km: request.distance_km,
            driver_amount: request.driver_amount,
            total_amount: request.total_amount,
        })
        .await?;

    Ok(Json(ApiResponse::success(BookingViewDto {
        booking: booking.into(),
        detail: Some(BookingDetailDto::Intercity(detail.into())),
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    params(("id" = i32, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking with detail", body = ApiResponse<BookingViewDto>),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_booking(
    State(state): State<BookingAppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<BookingViewDto>>, ApiError> {
    let (booking, detail) = state.booking_service.get_booking(id).await?;
    Ok(Json(ApiResponse::success(BookingViewDto {
        booking: booking.into(),
        detail: detail.map(Into::into),
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Bookings",
    params(ListBookingsQuery),
    responses(
        (status = 200, description = "Bookings for the guest or host", body = ApiResponse<Vec<BookingDto>>),
        (status = 400, description = "Missing or ambiguous filter")
    )
)]
pub async fn list_bookings(
    State(state): State<BookingAppState>,
    Query(query): Query<ListBookingsQuery>,
) -> Result<Json<ApiResponse<Vec<BookingDto>>>, ApiError> {
    let bookings = match (query.guest_id, query.host_id) {
        (Some(guest_id), None) => state.booking_service.list_for_guest(guest_id).await?,
        (None, Some(host_id)) => state.booking_service.list_for_host(host_id).await?,
        _ => {
            return Err(ApiError::bad_request(
                "provide exactly one of guest_id or host_id",
            ))
        }
    };
    Ok(Json(ApiResponse::success(
        bookings.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/cancel",
    tag = "Bookings",
    params(("id" = i32, Path, description = "Booking id")),
    request_body = CancelBookingRequest,
    responses(
        (status = 200, description = "Booking cancelled", body = ApiResponse<BookingDto>),
        (status = 404, description = "Booking not found"),
        (status = 409, description = "Booking is past the point of cancellation")
    )
)]
pub async fn cancel_booking(
    State(state): State<BookingAppState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<CancelBookingRequest>,
) -> Result<Json<ApiResponse<BookingDto>>, ApiError> {
    let cancelled = state.booking_service.cancel_booking(id, &request.reason).await?;
    Ok(Json(ApiResponse::success(cancelled.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/cars/{id}/availability",
    tag = "Bookings",
    params(
        ("id" = i32, Path, description = "Car id"),
        AvailabilityQuery
    ),
    responses(
        (status = 200, description = "Availability for the window", body = ApiResponse<AvailabilityDto>),
        (status = 400, description = "Invalid window")
    )
)]
pub async fn check_availability(
    State(state): State<BookingAppState>,
    Path(id): Path<i32>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<ApiResponse<AvailabilityDto>>, ApiError> {
    let start = parse_datetime("start_datetime", &query.start_datetime)?;
    let end = parse_datetime("end_datetime", &query.end_datetime)?;
    let available = state.booking_service.check_availability(id, start, end).await?;
    Ok(Json(ApiResponse::success(AvailabilityDto {
        car_id: id,
        available,
    })))
}
