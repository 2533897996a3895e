//! OTP HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use super::dto::*;
use crate::application::OtpService;
use crate::domain::otp::{OtpType, OtpVerifier};
use crate::interfaces::http::common::{ApiResponse, EmptyData, ValidatedJson};
use crate::interfaces::http::error::ApiError;
use crate::interfaces::http::modules::bookings::BookingDto;

/// Application state for OTP handlers.
#[derive(Clone)]
pub struct OtpAppState {
    pub otp_service: Arc<OtpService>,
}

fn parse_otp_type(raw: &str) -> Result<OtpType, ApiError> {
    OtpType::parse(raw)
        .ok_or_else(|| ApiError::bad_request(format!("unknown otp_type: {}", raw)))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/otp/verify",
    tag = "OTP",
    params(("id" = i32, Path, description = "Booking id")),
    request_body = VerifyOtpRequest,
    responses(
        (status = 200, description = "Booking advanced", body = ApiResponse<BookingDto>),
        (status = 400, description = "Invalid or expired OTP"),
        (status = 409, description = "Booking is not in the right status")
    )
)]
pub async fn verify_otp(
    State(state): State<OtpAppState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<VerifyOtpRequest>,
) -> Result<Json<ApiResponse<BookingDto>>, ApiError> {
    let otp_type = parse_otp_type(&request.otp_type)?;
    let verified_by = OtpVerifier::parse(&request.verified_by).ok_or_else(|| {
        ApiError::bad_request(format!("unknown verified_by: {}", request.verified_by))
    })?;

    let booking = state
        .otp_service
        .verify(id, otp_type, &request.code, verified_by)
        .await?;
    Ok(Json(ApiResponse::success(booking.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/otp/resend",
    tag = "OTP",
    params(("id" = i32, Path, description = "Booking id")),
    request_body = ResendOtpRequest,
    responses(
        (status = 200, description = "Stored code re-sent", body = ApiResponse<EmptyData>),
        (status = 400, description = "Code already used or expired"),
        (status = 404, description = "No code issued for this booking")
    )
)]
pub async fn resend_otp(
    State(state): State<OtpAppState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<ResendOtpRequest>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError> {
    let otp_type = parse_otp_type(&request.otp_type)?;
    state.otp_service.resend(id, otp_type).await?;
    Ok(Json(ApiResponse::success(EmptyData {})))
}
