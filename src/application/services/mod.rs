//! Application services

pub mod booking;
pub mod otp;
pub mod otp_dispatch;
pub mod payment;

pub use booking::{BookingService, IntercityBookingRequest, SelfDriveBookingRequest};
pub use otp::OtpService;
pub use otp_dispatch::OtpDispatcher;
pub use payment::PaymentService;
