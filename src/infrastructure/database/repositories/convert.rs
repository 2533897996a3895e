//! Row ↔ domain conversion helpers shared by the SeaORM repositories.

use crate::domain::booking::{
    Booking, BookingStatus, BookingType, IntercityDetail, PaymentStatus, PricingQuote,
    SelfDriveDetail, TimeWindow,
};
use crate::domain::otp::{BookingOtp, OtpType, OtpVerifier};
use crate::domain::payment::{Payment, PaymentMethod, PaymentOutcome};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{
    booking, booking_otp, intercity_booking, payment, self_drive_booking,
};

pub(super) fn db_err(e: sea_orm::DbErr) -> DomainError {
    DomainError::Storage(e.to_string())
}

fn bad_row(what: &str, value: &str) -> DomainError {
    DomainError::Storage(format!("unexpected {} in row: {}", what, value))
}

pub(super) fn booking_to_domain(m: booking::Model) -> DomainResult<Booking> {
    Ok(Booking {
        id: m.id,
        guest_id: m.guest_id,
        car_id: m.car_id,
        booking_type: BookingType::parse(&m.booking_type)
            .ok_or_else(|| bad_row("booking_type", &m.booking_type))?,
        status: BookingStatus::parse(&m.status).ok_or_else(|| bad_row("status", &m.status))?,
        total_amount: m.total_amount,
        paid_amount: m.paid_amount,
        payment_status: PaymentStatus::parse(&m.payment_status)
            .ok_or_else(|| bad_row("payment_status", &m.payment_status))?,
        cancelled_reason: m.cancelled_reason,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

pub(super) fn self_drive_to_domain(m: self_drive_booking::Model) -> SelfDriveDetail {
    SelfDriveDetail {
        booking_id: m.booking_id,
        window: TimeWindow {
            start: m.start_datetime,
            end: m.end_datetime,
        },
        pickup_address: m.pickup_address,
        pickup_lat: m.pickup_lat,
        pickup_long: m.pickup_long,
        drop_address: m.drop_address,
        drop_lat: m.drop_lat,
        drop_long: m.drop_long,
        pricing: PricingQuote {
            hourly_rate_snapshot: m.hourly_rate_snapshot,
            base_amount: m.base_amount,
            insure_amount: m.insure_amount,
            driver_amount: m.driver_amount,
            drop_charge: m.drop_charge,
            gst_amount: m.gst_amount,
            total_amount: m.total_amount,
        },
    }
}

pub(super) fn intercity_to_domain(m: intercity_booking::Model) -> IntercityDetail {
    IntercityDetail {
        booking_id: m.booking_id,
        window: TimeWindow {
            start: m.pickup_datetime,
            end: m.drop_datetime,
        },
        pickup_address: m.pickup_address,
        pickup_lat: m.pickup_lat,
        pickup_long: m.pickup_long,
        drop_address: m.drop_address,
        drop_lat: m.drop_lat,
        drop_long: m.drop_long,
        pax: m.pax,
        luggage: m.luggage,
        distance_km: m.distance_km,
        driver_amount: m.driver_amount,
    }
}

pub(super) fn payment_to_domain(m: payment::Model) -> DomainResult<Payment> {
    Ok(Payment {
        id: m.id,
        booking_id: m.booking_id,
        amount: m.amount,
        currency: m.currency,
        method: PaymentMethod::parse(&m.payment_method)
            .ok_or_else(|| bad_row("payment_method", &m.payment_method))?,
        gateway_order_id: m.gateway_order_id,
        gateway_payment_id: m.gateway_payment_id,
        status: PaymentOutcome::parse(&m.status).ok_or_else(|| bad_row("status", &m.status))?,
        created_at: m.created_at,
    })
}

pub(super) fn otp_to_domain(m: booking_otp::Model) -> DomainResult<BookingOtp> {
    let verified_by = match m.verified_by {
        Some(s) => Some(OtpVerifier::parse(&s).ok_or_else(|| bad_row("verified_by", &s))?),
        None => None,
    };
    Ok(BookingOtp {
        id: m.id,
        booking_id: m.booking_id,
        otp_type: OtpType::parse(&m.otp_type).ok_or_else(|| bad_row("otp_type", &m.otp_type))?,
        otp_code: m.otp_code,
        expires_at: m.expires_at,
        verified_at: m.verified_at,
        verified_by,
        created_at: m.created_at,
    })
}
