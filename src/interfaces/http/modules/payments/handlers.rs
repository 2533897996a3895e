//! Payment HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;

use super::dto::*;
use crate::application::PaymentService;
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};
use crate::interfaces::http::error::ApiError;
use crate::interfaces::http::modules::bookings::BookingDto;

/// Application state for payment handlers.
#[derive(Clone)]
pub struct PaymentAppState {
    pub payment_service: Arc<PaymentService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/payments/order",
    tag = "Payments",
    params(("id" = i32, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Gateway order, or null when fully paid", body = ApiResponse<CreateOrderResponse>),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn create_payment_order(
    State(state): State<PaymentAppState>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<CreateOrderResponse>>, ApiError> {
    let order = state.payment_service.create_order(id).await?;
    Ok(Json(ApiResponse::success(CreateOrderResponse {
        order: order.map(Into::into),
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/payments/verify",
    tag = "Payments",
    params(("id" = i32, Path, description = "Booking id")),
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Payment recorded, booking settled", body = ApiResponse<BookingDto>),
        (status = 400, description = "Signature check failed"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn verify_payment(
    State(state): State<PaymentAppState>,
    Path(id): Path<i32>,
    ValidatedJson(request): ValidatedJson<VerifyPaymentRequest>,
) -> Result<Json<ApiResponse<BookingDto>>, ApiError> {
    let booking = state
        .payment_service
        .confirm(id, &request.order_id, &request.payment_id, &request.signature)
        .await?;
    Ok(Json(ApiResponse::success(booking.into())))
}
