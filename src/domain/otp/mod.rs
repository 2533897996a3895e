pub mod model;
pub mod repository;

pub use model::{generate_code, BookingOtp, NewBookingOtp, OtpType, OtpVerifier, OTP_CODE_LEN};
pub use repository::OtpRepository;
