//! SeaORM entities

pub mod booking;
pub mod booking_otp;
pub mod car;
pub mod intercity_booking;
pub mod payment;
pub mod self_drive_booking;
pub mod user;
