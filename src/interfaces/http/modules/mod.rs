//! HTTP API modules, one per resource

pub mod bookings;
pub mod health;
pub mod otp;
pub mod payments;
