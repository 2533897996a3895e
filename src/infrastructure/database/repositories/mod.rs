//! SeaORM implementations of the domain repository ports

mod booking_repository;
mod convert;
mod directory;
mod otp_repository;
mod payment_repository;
mod repository_provider;

pub use booking_repository::SeaOrmBookingRepository;
pub use directory::SeaOrmDirectory;
pub use otp_repository::SeaOrmOtpRepository;
pub use payment_repository::SeaOrmPaymentRepository;
pub use repository_provider::SeaOrmRepositoryProvider;
