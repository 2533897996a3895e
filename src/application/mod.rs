//! Application layer: use-case services and background tasks

pub mod services;

pub use services::{
    BookingService, IntercityBookingRequest, OtpDispatcher, OtpService, PaymentService,
    SelfDriveBookingRequest,
};
