//! OTP DTOs

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

/// OTP verification request. `otp_type` is PICKUP or DROP,
/// `verified_by` GUEST, HOST or DRIVER.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyOtpRequest {
    #[validate(length(min = 1, max = 16))]
    pub otp_type: String,
    #[validate(length(equal = 6))]
    pub code: String,
    #[validate(length(min = 1, max = 16))]
    pub verified_by: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResendOtpRequest {
    #[validate(length(min = 1, max = 16))]
    pub otp_type: String,
}
