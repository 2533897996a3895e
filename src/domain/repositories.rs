//! Repository provider
//!
//! Unified access to the per-aggregate repositories. Consumers request
//! only the repository they need:
//!
//! ```ignore
//! async fn handle(repos: &dyn RepositoryProvider) {
//!     let booking = repos.bookings().find_by_id(7).await?;
//!     let otp = repos.otps().find(7, OtpType::Pickup).await?;
//! }
//! ```

use super::booking::BookingRepository;
use super::otp::OtpRepository;
use super::payment::PaymentRepository;

pub trait RepositoryProvider: Send + Sync {
    fn bookings(&self) -> &dyn BookingRepository;
    fn otps(&self) -> &dyn OtpRepository;
    fn payments(&self) -> &dyn PaymentRepository;
}
